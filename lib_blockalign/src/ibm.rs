//! Pairwise alignments and their combination into a multiple alignment.
//!
//! The multiple alignment built from a set of pairwise alignments over the same master
//! aligns a master residue only if every pairwise alignment aligns it ("identical blocks for master").
//! Aligned blocks are split wherever any pairwise alignment has a dependent insertion or a block boundary.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    block::{AlignedBlock, BlockIdGenerator, SequenceRange},
    error::{Error, Result},
    multiple_alignment::BlockMultipleAlignment,
    sequence::{Sequence, same_sequence},
};

#[cfg(test)]
mod tests;

/// A gap-free stretch of a pairwise alignment.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignedSegment {
    pub master_offset: usize,
    pub dependent_offset: usize,
    pub length: usize,
}

/// Per master residue lookups of a two-row alignment.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PairwiseView {
    /// The dependent residue aligned to each master residue.
    master_to_dependent: Vec<Option<usize>>,
    /// The number of the aligned block containing each master residue.
    block_structure: Vec<Option<usize>>,
}

impl AlignedSegment {
    pub fn new(master_offset: usize, dependent_offset: usize, length: usize) -> Self {
        Self {
            master_offset,
            dependent_offset,
            length,
        }
    }
}

impl PairwiseView {
    pub fn master_to_dependent(&self) -> &[Option<usize>] {
        &self.master_to_dependent
    }

    pub fn block_structure(&self) -> &[Option<usize>] {
        &self.block_structure
    }
}

impl BlockMultipleAlignment {
    /// Creates a pairwise alignment where each segment becomes one aligned block.
    pub fn new_pairwise(
        master: Arc<Sequence>,
        dependent: Arc<Sequence>,
        segments: &[AlignedSegment],
    ) -> Result<Self> {
        let mut master_limit = 0;
        let mut dependent_limit = 0;
        for (index, segment) in segments.iter().enumerate() {
            if segment.length == 0 {
                return Err(Error::EmptySegment { index });
            }
            if segment.master_offset + segment.length > master.len()
                || segment.dependent_offset + segment.length > dependent.len()
            {
                return Err(Error::SegmentOutOfBounds { index });
            }
            if segment.master_offset < master_limit || segment.dependent_offset < dependent_limit {
                return Err(Error::SegmentsNotIncreasing { index });
            }
            master_limit = segment.master_offset + segment.length;
            dependent_limit = segment.dependent_offset + segment.length;
        }

        Self::from_aligned_ranges(
            vec![master, dependent],
            segments.iter().map(|segment| {
                vec![
                    SequenceRange::new_offset_length(segment.master_offset, segment.length),
                    SequenceRange::new_offset_length(segment.dependent_offset, segment.length),
                ]
            }),
        )
    }

    /// Lookup tables of a pairwise alignment.
    pub fn pairwise_view(&self) -> Result<PairwiseView> {
        if self.row_count() != 2 {
            return Err(Error::NotPairwise {
                index: 0,
                rows: self.row_count(),
            });
        }

        let mut master_to_dependent = vec![None; self.master().len()];
        let mut block_structure = vec![None; self.master().len()];
        for (number, block) in self.aligned_blocks().enumerate() {
            let (master, dependent) = (block.ranges()[0], block.ranges()[1]);
            for (master_index, dependent_index) in master.as_range().zip(dependent.as_range()) {
                master_to_dependent[master_index] = Some(dependent_index);
                block_structure[master_index] = Some(number);
            }
        }

        Ok(PairwiseView {
            master_to_dependent,
            block_structure,
        })
    }
}

/// Builds a multiple alignment from pairwise alignments that share their master.
///
/// Row `i + 1` of the result is the dependent of `pairwise[i]`, and carries its row annotations.
pub fn create_multiple_from_pairwise(
    pairwise: &[BlockMultipleAlignment],
) -> Result<BlockMultipleAlignment> {
    let Some(first) = pairwise.first() else {
        return Err(Error::NoPairwiseAlignments);
    };
    let master = first.master().clone();

    let mut views = Vec::with_capacity(pairwise.len());
    let mut sequences = vec![master.clone()];
    for (index, alignment) in pairwise.iter().enumerate() {
        if alignment.row_count() != 2 {
            return Err(Error::NotPairwise {
                index,
                rows: alignment.row_count(),
            });
        }
        if !same_sequence(alignment.master(), &master) {
            return Err(Error::MasterMismatch {
                index,
                expected: master.identifier().to_string(),
            });
        }
        views.push(alignment.pairwise_view()?);
        sequences.push(alignment.sequences()[1].clone());
    }

    let aligned_in_all = |position: usize| {
        views
            .iter()
            .all(|view| view.master_to_dependent[position].is_some())
    };
    let extends_in_all = |position: usize| {
        views.iter().all(|view| {
            let previous = view.master_to_dependent[position - 1];
            view.master_to_dependent[position].is_some()
                && view.master_to_dependent[position] == previous.map(|index| index + 1)
                && view.block_structure[position] == view.block_structure[position - 1]
        })
    };

    let mut block_ids = BlockIdGenerator::default();
    let mut aligned_blocks = Vec::new();
    let mut offset = 0;
    while offset < master.len() {
        if !aligned_in_all(offset) {
            offset += 1;
            continue;
        }

        let mut limit = offset + 1;
        while limit < master.len() && extends_in_all(limit) {
            limit += 1;
        }

        let length = limit - offset;
        let mut ranges = vec![SequenceRange::new_offset_length(offset, length)];
        ranges.extend(views.iter().map(|view| {
            // aligned_in_all guarantees the entry
            let dependent_offset = view.master_to_dependent[offset].unwrap_or_default();
            SequenceRange::new_offset_length(dependent_offset, length)
        }));
        debug!("Identical block for master at {offset}..{limit}");
        aligned_blocks.push(AlignedBlock::new(block_ids.next(), ranges));

        offset = limit;
    }

    let block_count = aligned_blocks.len();
    let mut multiple =
        BlockMultipleAlignment::from_aligned_blocks(sequences, aligned_blocks, block_ids)?;
    for (index, alignment) in pairwise.iter().enumerate() {
        if let Some(info) = alignment.row_info(1) {
            multiple.set_row_score(index + 1, info.score);
            multiple.set_row_status(index + 1, info.status.clone());
        }
    }

    info!(
        "Built a multiple alignment of {} rows with {block_count} aligned blocks",
        multiple.row_count()
    );
    Ok(multiple)
}
