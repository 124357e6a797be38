use std::{
    io::{Write, stdout},
    path::PathBuf,
};

use anyhow::{Result, anyhow, ensure};
use clap::Parser;
use lib_blockalign::{
    color::{AlignmentPalette, ColorRamp},
    multiple_alignment::CharacterTraitsContext,
};
use log::{LevelFilter, info};

use crate::{
    init_logging,
    input::{load_alignment, load_options},
    render::{AlignmentOutput, ExtractOutput, PairwiseOutput, write_alignment, write_toml},
    selectors::{ColoringSelector, JustificationSelector},
};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// A toml file with the master sequence and the pairwise alignments of all dependents to it.
    #[clap(long, short = 'i')]
    input: PathBuf,

    /// A toml file with alignment options.
    #[clap(long)]
    options: Option<PathBuf>,

    /// The dependent rows to extract, separated by commas.
    #[clap(long, short = 'r', required = true, value_delimiter = ',')]
    rows: Vec<usize>,

    /// Columns of aligned blocks to mark before extracting.
    ///
    /// Marked blocks are left out of the extracted pairwise alignments.
    #[clap(long, short = 'm', value_delimiter = ',')]
    mark: Vec<usize>,

    #[clap(long, short = 'j', default_value = "left")]
    justification: JustificationSelector,

    #[clap(long, short = 'c', default_value = "identity")]
    coloring: ColoringSelector,

    /// Print colors as ANSI escape sequences.
    #[clap(long)]
    ansi: bool,

    /// The file to store the remaining alignment and the extracted pairwise alignments in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let options = load_options(cli.options.as_deref())?;
    let justification = cli.justification.into();
    let mut alignment = load_alignment(&cli.input)?;

    for &column in &cli.mark {
        ensure!(
            alignment.mark_block(column),
            "Column {column} is not part of an aligned block"
        );
    }
    info!("Marked {} blocks", alignment.marked_block_count());

    let extracted = alignment
        .extract_rows_to_pairwise(&cli.rows, &options)
        .ok_or_else(|| anyhow!("Unable to extract rows {:?}", cli.rows))?;
    info!(
        "Extracted {} rows, {} remain",
        extracted.len(),
        alignment.row_count()
    );

    let palette = AlignmentPalette::default();
    let color_map = ColorRamp::default();
    let mut context = CharacterTraitsContext {
        coloring: cli.coloring.into(),
        palette: &palette,
        color_map: &color_map,
        highlights: None,
        reference: None,
    };

    let mut output = stdout().lock();
    writeln!(output, "Remaining alignment")?;
    write_alignment(&mut output, &alignment, justification, &context, cli.ansi)?;

    // cells that would not merge back into the remaining alignment get a background
    context.reference = Some(&alignment);
    for pairwise in &extracted {
        writeln!(output)?;
        match pairwise.footprint {
            Some(footprint) => writeln!(
                output,
                "Footprint: master {}, dependent {}",
                footprint.master, footprint.dependent
            )?,
            None => writeln!(output, "No footprint")?,
        }
        write_alignment(
            &mut output,
            &pairwise.alignment,
            justification,
            &context,
            cli.ansi,
        )?;
    }

    if let Some(path) = &cli.output {
        write_toml(
            path,
            &ExtractOutput {
                remaining: AlignmentOutput::new(&alignment),
                pairwise: extracted.iter().map(PairwiseOutput::new).collect(),
            },
        )?;
    }

    Ok(())
}
