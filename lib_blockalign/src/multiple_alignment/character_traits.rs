use super::{BlockCursor, BlockMultipleAlignment};
use crate::{
    block::{Block, BlockId, UnalignedJustification},
    color::{AlignmentPalette, Color, ColorMap},
    sequence::{Sequence, same_sequence},
};

/// How aligned residues are colored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ResidueColoring {
    /// All aligned residues get the aligned color of the palette.
    #[default]
    Flat,
    Identity,
    Variety,
    WeightedVariety,
    InformationContent,
    /// Fit of each residue to the PSSM.
    Fit,
    /// Average fit of the row within the block.
    BlockFit,
    /// Z-score of the block fit across the rows of a block.
    BlockZFit,
    /// Z-score of the block fit across the blocks of a row.
    RowZFit,
}

/// Residues highlighted by an outside selection.
pub trait ResidueHighlights {
    fn is_highlighted(&self, sequence: &Sequence, index: usize) -> bool;
}

/// Everything a renderer needs to draw one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterTraits {
    pub character: char,
    pub color: Color,
    pub is_aligned: bool,
    pub is_highlighted: bool,
    /// The background color, or `None` if no background is drawn.
    pub background: Option<Color>,
}

pub struct CharacterTraitsContext<'a> {
    pub coloring: ResidueColoring,
    pub palette: &'a AlignmentPalette,
    pub color_map: &'a dyn ColorMap,
    pub highlights: Option<&'a dyn ResidueHighlights>,
    /// The alignment that this one would be merged into, used to flag cells that would not merge.
    pub reference: Option<&'a BlockMultipleAlignment>,
}

impl BlockMultipleAlignment {
    pub fn character_traits_at(
        &self,
        column: usize,
        row: usize,
        justification: UnalignedJustification,
        context: &CharacterTraitsContext<'_>,
    ) -> Option<CharacterTraits> {
        let residue = self.sequence_and_index_at(column, row, justification)?;
        let (entry, block) = self.block_at(column)?;

        let Some(index) = residue.index else {
            return Some(CharacterTraits {
                character: '~',
                color: context.palette.no_residue,
                is_aligned: residue.is_aligned,
                is_highlighted: false,
                background: None,
            });
        };

        let character = char::from(residue.sequence.residue(index)?);
        let (character, color) = match block {
            Block::Aligned(aligned) => (
                character.to_ascii_uppercase(),
                self.aligned_color(aligned.id(), entry.block_column, row, context),
            ),
            Block::Unaligned(_) => (character.to_ascii_lowercase(), context.palette.unaligned),
        };

        let is_highlighted = context
            .highlights
            .is_some_and(|highlights| highlights.is_highlighted(residue.sequence, index));

        let mut background = None;
        if !is_highlighted {
            if self.is_block_marked(column) {
                background = Some(context.palette.marked_block);
            }
            if self.show_geometry_violations && self.has_geometry_violation(row, index) {
                background = Some(context.palette.geometry_violation);
            }
            if let Some(reference) = context.reference {
                if self.is_unmergeable(reference, column, row, index) {
                    background = Some(context.palette.merge_fail);
                }
            }
        }

        Some(CharacterTraits {
            character,
            color,
            is_aligned: residue.is_aligned,
            is_highlighted,
            background,
        })
    }

    fn aligned_color(
        &self,
        block: BlockId,
        block_column: usize,
        row: usize,
        context: &CharacterTraitsContext<'_>,
    ) -> Color {
        let conservation = self.conservation();
        let (Some(profile_column), Some(block_ordinal)) = (
            conservation.profile_column(block, block_column),
            conservation.block_ordinal(block),
        ) else {
            return context.palette.aligned;
        };

        let scale = match context.coloring {
            ResidueColoring::Flat => return context.palette.aligned,
            ResidueColoring::Identity => conservation.identity_scale(profile_column),
            ResidueColoring::Variety => conservation.variety_scale(profile_column),
            ResidueColoring::WeightedVariety => {
                conservation.weighted_variety_scale(profile_column)
            }
            ResidueColoring::InformationContent => {
                conservation.information_content_scale(profile_column)
            }
            coloring => {
                let Some(fit) = self.fit_scores() else {
                    return context.palette.aligned;
                };
                match coloring {
                    ResidueColoring::Fit => fit.residue_fit_scale(profile_column, row),
                    ResidueColoring::BlockFit => fit.block_fit_scale(block_ordinal, row),
                    ResidueColoring::BlockZFit => fit.block_z_scale(block_ordinal, row),
                    _ => fit.row_z_scale(block_ordinal, row),
                }
            }
        };

        context.color_map.color(scale)
    }

    /// True if merging this alignment into `reference` would conflict at the given cell.
    fn is_unmergeable(
        &self,
        reference: &BlockMultipleAlignment,
        column: usize,
        row: usize,
        index: usize,
    ) -> bool {
        if std::ptr::eq(reference, self) || !same_sequence(self.master(), reference.master()) {
            return false;
        }
        let Some((entry, block)) = self.block_at(column) else {
            return false;
        };

        if row == 0 {
            // an unaligned master residue that the reference aligns
            return !block.is_aligned() && reference.is_residue_aligned(0, index);
        }

        let mut cursor = BlockCursor::default();
        let reference_aligned_block = |master_index: usize, cursor: &mut BlockCursor| {
            reference
                .block_for_residue(0, master_index, cursor)
                .filter(|&block_index| reference.blocks[block_index].is_aligned())
        };

        match block {
            Block::Aligned(aligned) => {
                let master_index = aligned.ranges()[0].offset() + entry.block_column;
                let Some(reference_block) = reference_aligned_block(master_index, &mut cursor)
                else {
                    return false;
                };
                let reference_master = reference.blocks[reference_block].ranges()[0];

                // block edges must not fall inside a reference block
                (entry.block_column == 0 && master_index > reference_master.offset())
                    || (entry.block_column + 1 == aligned.width()
                        && reference_master.last().is_some_and(|last| master_index < last))
            }
            Block::Unaligned(_) => {
                let (Some(previous), Some(next)) = (
                    entry
                        .block_index
                        .checked_sub(1)
                        .and_then(|block_index| self.blocks.get(block_index))
                        .and_then(Block::as_aligned),
                    self.blocks
                        .get(entry.block_index + 1)
                        .and_then(Block::as_aligned),
                ) else {
                    return false;
                };
                let (Some(previous_last), next_first) =
                    (previous.ranges()[0].last(), next.ranges()[0].offset())
                else {
                    return false;
                };

                // an insertion between two master residues that the reference aligns through
                let previous_block = reference_aligned_block(previous_last, &mut cursor);
                previous_block.is_some()
                    && previous_block == reference_aligned_block(next_first, &mut cursor)
            }
        }
    }
}
