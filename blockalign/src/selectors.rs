use clap::ValueEnum;
use lib_blockalign::{UnalignedJustification, multiple_alignment::ResidueColoring};

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum JustificationSelector {
    Left,
    Right,
    Center,
    Split,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum ColoringSelector {
    Flat,
    Identity,
    Variety,
    WeightedVariety,
    InformationContent,
    Fit,
    BlockFit,
    BlockZFit,
    RowZFit,
}

impl From<JustificationSelector> for UnalignedJustification {
    fn from(value: JustificationSelector) -> Self {
        match value {
            JustificationSelector::Left => Self::Left,
            JustificationSelector::Right => Self::Right,
            JustificationSelector::Center => Self::Center,
            JustificationSelector::Split => Self::Split,
        }
    }
}

impl From<ColoringSelector> for ResidueColoring {
    fn from(value: ColoringSelector) -> Self {
        match value {
            ColoringSelector::Flat => Self::Flat,
            ColoringSelector::Identity => Self::Identity,
            ColoringSelector::Variety => Self::Variety,
            ColoringSelector::WeightedVariety => Self::WeightedVariety,
            ColoringSelector::InformationContent => Self::InformationContent,
            ColoringSelector::Fit => Self::Fit,
            ColoringSelector::BlockFit => Self::BlockFit,
            ColoringSelector::BlockZFit => Self::BlockZFit,
            ColoringSelector::RowZFit => Self::RowZFit,
        }
    }
}

impl ColoringSelector {
    /// True if the coloring needs a PSSM.
    pub fn needs_pssm(self) -> bool {
        matches!(
            self,
            Self::Fit | Self::BlockFit | Self::BlockZFit | Self::RowZFit
        )
    }
}
