use std::sync::Arc;

use log::trace;

use crate::{
    block::{AlignedBlock, Block, SequenceRange, UnalignedBlock},
    error::{Error, Result},
    sequence::Sequence,
};

/// Builds the complete block list from the aligned blocks alone.
///
/// Every aligned block is checked against the sequences,
/// and every gap between them, including the sequence ends, is filled with an unaligned block.
/// Gaps that are empty in all rows produce no block.
pub(super) fn build_block_list(
    sequences: &[Arc<Sequence>],
    aligned_blocks: Vec<AlignedBlock>,
) -> Result<Vec<Block>> {
    if sequences.is_empty() {
        return Err(Error::NoSequences);
    }

    let mut blocks = Vec::with_capacity(aligned_blocks.len() * 2 + 1);
    let mut previous_limits = vec![0; sequences.len()];

    for block in aligned_blocks {
        check_aligned_block(sequences, &block, &previous_limits)?;

        push_gap(
            &mut blocks,
            previous_limits
                .iter()
                .zip(block.ranges())
                .map(|(&limit, range)| SequenceRange::new_offset_limit(limit, range.offset()))
                .collect(),
        );
        previous_limits = block.ranges().iter().map(SequenceRange::limit).collect();
        blocks.push(Block::Aligned(block));
    }

    push_gap(
        &mut blocks,
        previous_limits
            .iter()
            .zip(sequences)
            .map(|(&limit, sequence)| SequenceRange::new_offset_limit(limit, sequence.len()))
            .collect(),
    );

    trace!(
        "Finalised block list with {} blocks for {} rows",
        blocks.len(),
        sequences.len()
    );
    Ok(blocks)
}

fn check_aligned_block(
    sequences: &[Arc<Sequence>],
    block: &AlignedBlock,
    previous_limits: &[usize],
) -> Result<()> {
    if block.row_count() != sequences.len() {
        return Err(Error::WrongRowCount {
            expected: sequences.len(),
            actual: block.row_count(),
        });
    }
    if block.width() == 0 {
        return Err(Error::ZeroWidthAlignedBlock { block: block.id() });
    }

    for (row, (range, sequence)) in block.ranges().iter().zip(sequences).enumerate() {
        if range.len() != block.width() {
            return Err(Error::AlignedBlockWidthMismatch {
                block: block.id(),
                row,
                length: range.len(),
                width: block.width(),
            });
        }
        if range.limit() > sequence.len() {
            return Err(Error::AlignedBlockOutOfBounds {
                block: block.id(),
                row,
                limit: range.limit(),
                length: sequence.len(),
            });
        }
        if range.offset() < previous_limits[row] {
            return Err(Error::AlignedBlocksOverlap {
                block: block.id(),
                row,
            });
        }
    }

    Ok(())
}

fn push_gap(blocks: &mut Vec<Block>, ranges: Vec<SequenceRange>) {
    if ranges.iter().any(|range| !range.is_empty()) {
        blocks.push(Block::Unaligned(UnalignedBlock::new(ranges)));
    }
}

/// Checks that the blocks tile every row without gaps or overlaps.
pub(super) fn check_tiling(sequences: &[Arc<Sequence>], blocks: &[Block]) -> Result<()> {
    for (row, sequence) in sequences.iter().enumerate() {
        let mut covered = 0;
        for (block_index, block) in blocks.iter().enumerate() {
            if block.row_count() != sequences.len() {
                return Err(Error::WrongRowCount {
                    expected: sequences.len(),
                    actual: block.row_count(),
                });
            }
            let range = block.ranges()[row];
            if range.offset() != covered || range.len() > block.width() {
                return Err(Error::RowNotContiguous { row, block_index });
            }
            if let Some(aligned) = block.as_aligned() {
                if aligned.width() == 0 {
                    return Err(Error::ZeroWidthAlignedBlock { block: aligned.id() });
                }
                if range.len() != aligned.width() {
                    return Err(Error::AlignedBlockWidthMismatch {
                        block: aligned.id(),
                        row,
                        length: range.len(),
                        width: aligned.width(),
                    });
                }
            }
            covered = range.limit();
        }

        if covered != sequence.len() {
            return Err(Error::RowNotCovered {
                row,
                covered,
                length: sequence.len(),
            });
        }
    }

    Ok(())
}
