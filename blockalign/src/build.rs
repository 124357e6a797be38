use std::{io::stdout, path::PathBuf};

use anyhow::{Result, ensure};
use clap::Parser;
use lib_blockalign::{
    color::{AlignmentPalette, ColorRamp},
    multiple_alignment::CharacterTraitsContext,
    pssm::MasterBlosumPssmBuilder,
};
use log::{LevelFilter, info, warn};

use crate::{
    init_logging,
    input::{load_alignment, load_edits, load_options, load_pssm},
    render::{AlignmentOutput, write_alignment, write_toml},
    selectors::{ColoringSelector, JustificationSelector},
};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// A toml file with the master sequence and the pairwise alignments of all dependents to it.
    #[clap(long, short = 'i')]
    input: PathBuf,

    /// A toml file with a list of edits that are applied in order after building the alignment.
    #[clap(long, short = 'e')]
    edits: Option<PathBuf>,

    /// A toml file with alignment options.
    #[clap(long)]
    options: Option<PathBuf>,

    /// How residues are placed in unaligned blocks, both for display and for column-based edits.
    ///
    /// The leading unaligned block is always right-justified and the trailing one left-justified.
    #[clap(long, short = 'j', default_value = "left")]
    justification: JustificationSelector,

    #[clap(long, short = 'c', default_value = "identity")]
    coloring: ColoringSelector,

    /// A PSSM in plain text format, used for fit colorings and row scores.
    ///
    /// If a fit coloring is selected without a PSSM, the BLOSUM62 rows of the master residues are used.
    #[clap(long, short = 'p')]
    pssm: Option<PathBuf>,

    /// Print colors as ANSI escape sequences.
    #[clap(long)]
    ansi: bool,

    /// Abort if an edit is rejected.
    #[clap(long)]
    strict: bool,

    /// The file to store the resulting block structure in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let options = load_options(cli.options.as_deref())?;
    let justification = cli.justification.into();
    let mut alignment = load_alignment(&cli.input)?;

    if let Some(edits) = &cli.edits {
        for (index, edit) in load_edits(edits)?.into_iter().enumerate() {
            let applied = edit.apply(&mut alignment, justification, &options);
            if applied {
                info!("Applied edit {index}: {edit:?}");
            } else {
                warn!("Rejected edit {index}: {edit:?}");
            }
            ensure!(applied || !cli.strict, "Edit {index} was rejected: {edit:?}");
        }
    }
    alignment.validate()?;

    if let Some(pssm) = &cli.pssm {
        alignment.install_pssm(load_pssm(pssm)?);
    } else if cli.coloring.needs_pssm() {
        alignment.pssm_with(&MasterBlosumPssmBuilder)?;
    }

    let palette = AlignmentPalette::default();
    let color_map = ColorRamp::default();
    let context = CharacterTraitsContext {
        coloring: cli.coloring.into(),
        palette: &palette,
        color_map: &color_map,
        highlights: None,
        reference: None,
    };
    write_alignment(
        &mut stdout().lock(),
        &alignment,
        justification,
        &context,
        cli.ansi,
    )?;

    if let Some(output) = &cli.output {
        write_toml(output, &AlignmentOutput::new(&alignment))?;
    }

    Ok(())
}
