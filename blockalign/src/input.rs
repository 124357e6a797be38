use std::{
    fs::{self, File},
    io::BufReader,
    path::Path,
    sync::Arc,
};

use anyhow::{Context, Result, ensure};
use lib_blockalign::{
    AlignmentOptions, BlockMultipleAlignment, Sequence, UnalignedJustification,
    ibm::{AlignedSegment, create_multiple_from_pairwise},
    pssm::Pssm,
};
use log::{debug, info};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AlignmentInput {
    master: MasterInput,
    dependents: Vec<DependentInput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MasterInput {
    identifier: String,
    residues: String,
    #[serde(default)]
    has_structure: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DependentInput {
    identifier: String,
    residues: String,
    #[serde(default)]
    has_structure: bool,
    segments: Vec<AlignedSegment>,
    score: Option<f64>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditScript {
    #[serde(default)]
    edits: Vec<Edit>,
}

/// One step of an edit script.
///
/// Columns and rows are zero-based and refer to the alignment as it is after all previous edits.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Edit {
    MoveBlockBoundary {
        from: usize,
        to: usize,
    },
    SplitBlock {
        column: usize,
    },
    MergeBlocks {
        from: usize,
        to: usize,
    },
    CreateBlock {
        from: usize,
        to: usize,
    },
    DeleteBlock {
        column: usize,
    },
    DeleteAllBlocks,
    ShiftRow {
        row: usize,
        from: usize,
        to: usize,
    },
    ZipAlignResidue {
        row: usize,
        column: usize,
        #[serde(default)]
        move_right: bool,
    },
    OptimizeBlock {
        row: usize,
        column: usize,
    },
    MarkBlock {
        column: usize,
    },
    ClearMarks,
    DeleteRow {
        row: usize,
    },
}

impl Edit {
    /// Applies the edit and returns false if the alignment rejected it.
    pub fn apply(
        &self,
        alignment: &mut BlockMultipleAlignment,
        justification: UnalignedJustification,
        options: &AlignmentOptions,
    ) -> bool {
        match *self {
            Self::MoveBlockBoundary { from, to } => alignment.move_block_boundary(from, to),
            Self::SplitBlock { column } => alignment.split_block(column),
            Self::MergeBlocks { from, to } => alignment.merge_blocks(from, to),
            Self::CreateBlock { from, to } => alignment.create_block(from, to, justification),
            Self::DeleteBlock { column } => alignment.delete_block(column),
            Self::DeleteAllBlocks => alignment.delete_all_blocks(),
            Self::ShiftRow { row, from, to } => alignment.shift_row(row, from, to, justification),
            Self::ZipAlignResidue {
                row,
                column,
                move_right,
            } => alignment.zip_align_residue(row, column, move_right, justification),
            Self::OptimizeBlock { row, column } => alignment.optimize_block(row, column, options),
            Self::MarkBlock { column } => alignment.mark_block(column),
            Self::ClearMarks => {
                alignment.clear_marks();
                true
            }
            Self::DeleteRow { row } => alignment.delete_row(row),
        }
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let buffer = fs::read_to_string(path)
        .with_context(|| format!("Unable to read input file {path:?}"))?;
    toml::from_str(&buffer).with_context(|| format!("Unable to parse input file {path:?}"))
}

/// Residues are upper-cased, whitespace is dropped so that long sequences can be wrapped.
fn sequence(identifier: String, residues: &str, has_structure: bool) -> Arc<Sequence> {
    let residues: Vec<u8> = residues
        .bytes()
        .filter(|residue| !residue.is_ascii_whitespace())
        .map(|residue| residue.to_ascii_uppercase())
        .collect();
    Arc::new(Sequence::new(identifier, residues).with_structure(has_structure))
}

/// Reads the master with its pairwise alignments and combines them into one multiple alignment.
pub fn load_alignment(path: &Path) -> Result<BlockMultipleAlignment> {
    info!("Loading alignment input {path:?}");
    let input: AlignmentInput = read_toml(path)?;
    ensure!(
        !input.dependents.is_empty(),
        "Input file {path:?} contains no dependent sequences"
    );

    let master = sequence(
        input.master.identifier,
        &input.master.residues,
        input.master.has_structure,
    );
    let mut pairwise = Vec::with_capacity(input.dependents.len());
    for dependent in input.dependents {
        debug!(
            "Dependent {} with {} segments",
            dependent.identifier,
            dependent.segments.len()
        );
        let identifier = dependent.identifier.clone();
        let mut alignment = BlockMultipleAlignment::new_pairwise(
            master.clone(),
            sequence(
                dependent.identifier,
                &dependent.residues,
                dependent.has_structure,
            ),
            &dependent.segments,
        )
        .with_context(|| format!("Invalid pairwise alignment of dependent {identifier}"))?;
        alignment.set_row_score(1, dependent.score);
        alignment.set_row_status(1, dependent.status);
        pairwise.push(alignment);
    }

    Ok(create_multiple_from_pairwise(&pairwise)?)
}

pub fn load_options(path: Option<&Path>) -> Result<AlignmentOptions> {
    let Some(path) = path else {
        return Ok(AlignmentOptions::default());
    };
    info!("Loading options {path:?}");
    read_toml(path)
}

pub fn load_edits(path: &Path) -> Result<Vec<Edit>> {
    info!("Loading edit script {path:?}");
    Ok(read_toml::<EditScript>(path)?.edits)
}

pub fn load_pssm(path: &Path) -> Result<Pssm> {
    info!("Loading PSSM {path:?}");
    let file = File::open(path).with_context(|| format!("Unable to open PSSM file {path:?}"))?;
    Pssm::read_plain(BufReader::new(file))
        .with_context(|| format!("Unable to parse PSSM file {path:?}"))
}
