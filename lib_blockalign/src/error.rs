use thiserror::Error;

use crate::block::BlockId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("A parsing error of kind '{kind:?}' occurred when the remaining input was '{input}'.")]
    Parser {
        input: String,
        kind: nom::error::ErrorKind,
    },

    #[error("Parsing was unsuccessful due to incomplete input: {0:?}.")]
    ParserIncomplete(nom::Needed),

    #[error("An alignment needs at least one sequence.")]
    NoSequences,

    #[error("Expected {expected} rows per block, but a block has {actual}.")]
    WrongRowCount { expected: usize, actual: usize },

    #[error("Aligned block {block:?} has zero width.")]
    ZeroWidthAlignedBlock { block: BlockId },

    #[error(
        "Row {row} of aligned block {block:?} has length {length}, but the block has width {width}."
    )]
    AlignedBlockWidthMismatch {
        block: BlockId,
        row: usize,
        length: usize,
        width: usize,
    },

    #[error("Row {row} of aligned block {block:?} ends at {limit}, beyond the sequence length {length}.")]
    AlignedBlockOutOfBounds {
        block: BlockId,
        row: usize,
        limit: usize,
        length: usize,
    },

    #[error("Row {row} of aligned block {block:?} overlaps or precedes the previous aligned block.")]
    AlignedBlocksOverlap { block: BlockId, row: usize },

    #[error("Row {row} is not tiled contiguously at block {block_index}.")]
    RowNotContiguous { row: usize, block_index: usize },

    #[error("Row {row} is covered up to {covered}, but its sequence has length {length}.")]
    RowNotCovered {
        row: usize,
        covered: usize,
        length: usize,
    },

    #[error("The block map does not match the block list.")]
    StaleBlockMap,

    #[error("No pairwise alignments were given.")]
    NoPairwiseAlignments,

    #[error("Alignment {index} has {rows} rows, but a pairwise alignment must have exactly two.")]
    NotPairwise { index: usize, rows: usize },

    #[error("Pairwise alignment {index} does not share the master sequence '{expected}'.")]
    MasterMismatch { index: usize, expected: String },

    #[error("Aligned segment {index} is empty.")]
    EmptySegment { index: usize },

    #[error("Aligned segment {index} does not fit into the master and dependent sequences.")]
    SegmentOutOfBounds { index: usize },

    #[error("Aligned segment {index} overlaps or precedes the previous segment.")]
    SegmentsNotIncreasing { index: usize },

    #[error("A PSSM needs {expected} columns, but {actual} were given.")]
    PssmColumnCount { expected: usize, actual: usize },

    #[error("The PSSM header lists the residue '{0}' twice or not at all.")]
    PssmHeader(char),
}
