use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use lib_blockalign::{
    BlockMultipleAlignment, SequenceRange, UnalignedJustification,
    color::Color,
    multiple_alignment::{CharacterTraitsContext, ExtractedPairwise, Footprint},
};
use log::info;
use serde::Serialize;

/// The block structure of an alignment as written to toml.
#[derive(Debug, Serialize)]
pub struct AlignmentOutput {
    pub rows: Vec<RowOutput>,
    pub blocks: Vec<BlockOutput>,
}

#[derive(Debug, Serialize)]
pub struct RowOutput {
    pub identifier: String,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pssm_score: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BlockOutput {
    pub aligned: bool,
    pub width: usize,
    pub marked: bool,
    pub ranges: Vec<SequenceRange>,
}

#[derive(Debug, Serialize)]
pub struct ExtractOutput {
    pub remaining: AlignmentOutput,
    pub pairwise: Vec<PairwiseOutput>,
}

#[derive(Debug, Serialize)]
pub struct PairwiseOutput {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<Footprint>,
    pub alignment: AlignmentOutput,
}

impl AlignmentOutput {
    pub fn new(alignment: &BlockMultipleAlignment) -> Self {
        let rows = alignment
            .sequences()
            .iter()
            .enumerate()
            .map(|(row, sequence)| {
                let info = alignment.row_info(row).cloned().unwrap_or_default();
                RowOutput {
                    identifier: sequence.identifier().to_string(),
                    length: sequence.len(),
                    score: info.score,
                    status: info.status,
                    pssm_score: alignment.score_row_against_pssm(row),
                }
            })
            .collect();

        let blocks = alignment
            .blocks()
            .iter()
            .enumerate()
            .map(|(block_index, block)| BlockOutput {
                aligned: block.is_aligned(),
                width: block.width(),
                marked: alignment
                    .block_map()
                    .first_column(block_index)
                    .is_some_and(|column| alignment.is_block_marked(column)),
                ranges: block.ranges().to_vec(),
            })
            .collect();

        Self { rows, blocks }
    }
}

impl PairwiseOutput {
    pub fn new(extracted: &ExtractedPairwise) -> Self {
        Self {
            identifier: extracted
                .alignment
                .sequence(1)
                .map(|sequence| sequence.identifier().to_string())
                .unwrap_or_default(),
            footprint: extracted.footprint,
            alignment: AlignmentOutput::new(&extracted.alignment),
        }
    }
}

pub fn write_toml(path: &Path, value: &impl Serialize) -> Result<()> {
    info!("Writing {path:?}");
    let output = toml::to_string(value).context("Unable to serialise output")?;
    fs::write(path, output).with_context(|| format!("Unable to write output file {path:?}"))
}

/// Prints one line per row followed by a block ruler and a conservation line.
///
/// The ruler shows `=` under aligned columns and `#` under marked ones.
/// The conservation line shows `*` under identical columns,
/// `:` under columns with at least half the maximum information content, and `.` under the other aligned columns.
pub fn write_alignment(
    output: &mut impl Write,
    alignment: &BlockMultipleAlignment,
    justification: UnalignedJustification,
    context: &CharacterTraitsContext<'_>,
    ansi: bool,
) -> Result<()> {
    let label_width = alignment
        .sequences()
        .iter()
        .map(|sequence| sequence.identifier().len())
        .max()
        .unwrap_or(0);

    for (row, sequence) in alignment.sequences().iter().enumerate() {
        write!(output, "{:<label_width$} ", sequence.identifier())?;
        for column in 0..alignment.width() {
            let Some(traits) = alignment.character_traits_at(column, row, justification, context)
            else {
                write!(output, " ")?;
                continue;
            };

            if ansi {
                write_ansi_color(output, 38, traits.color)?;
                if let Some(background) = traits.background {
                    write_ansi_color(output, 48, background)?;
                }
                write!(output, "{}\x1b[0m", traits.character)?;
            } else {
                write!(output, "{}", traits.character)?;
            }
        }

        if let Some(info) = alignment.row_info(row) {
            if let Some(score) = info.score {
                write!(output, "  score {score}")?;
            }
            if !info.status.is_empty() {
                write!(output, "  {}", info.status)?;
            }
        }
        if let Some(score) = alignment.score_row_against_pssm(row) {
            write!(output, "  pssm {score}")?;
        }
        writeln!(output)?;
    }

    let conservation = alignment.conservation();
    let mut ruler = String::with_capacity(alignment.width());
    let mut conservation_line = String::with_capacity(alignment.width());
    for (column, entry) in alignment.block_map().entries().iter().enumerate() {
        let Some(block) = alignment.aligned_block_at(column) else {
            ruler.push(' ');
            conservation_line.push(' ');
            continue;
        };
        ruler.push(if alignment.is_block_marked(column) {
            '#'
        } else {
            '='
        });

        let symbol = match conservation.profile_column(block.id(), entry.block_column) {
            Some(profile_column) if conservation.column(profile_column).identity() => '*',
            Some(profile_column)
                if conservation.information_content_scale(profile_column) >= 0.5 =>
            {
                ':'
            }
            _ => '.',
        };
        conservation_line.push(symbol);
    }
    writeln!(output, "{:<label_width$} {}", "", ruler.trim_end())?;
    writeln!(output, "{:<label_width$} {}", "", conservation_line.trim_end())?;

    Ok(())
}

fn write_ansi_color(output: &mut impl Write, layer: u8, color: Color) -> Result<()> {
    let [r, g, b] = color.to_rgb8();
    write!(output, "\x1b[{layer};2;{r};{g};{b}m")?;
    Ok(())
}
