use std::sync::Arc;

use super::{BlockCursor, BlockMapEntry, BlockMultipleAlignment};
use crate::{
    block::{AlignedBlock, Block, SequenceRange, UnalignedJustification},
    sequence::{Sequence, same_sequence},
};

/// The residue shown in one cell of the alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueAt<'alignment> {
    pub sequence: &'alignment Arc<Sequence>,
    /// `None` if the cell is padding of an unaligned block.
    pub index: Option<usize>,
    pub is_aligned: bool,
}

impl BlockMultipleAlignment {
    /// Finds the block covering a residue of a row.
    ///
    /// The search starts at the block the cursor points to and wraps around the block list.
    pub fn block_for_residue(
        &self,
        row: usize,
        index: usize,
        cursor: &mut BlockCursor,
    ) -> Option<usize> {
        if index >= self.sequences.get(row)?.len() {
            return None;
        }

        let block_count = self.blocks.len();
        let start = cursor.start(block_count);
        let block_index = (0..block_count)
            .map(|offset| (start + offset) % block_count)
            .find(|&block_index| self.blocks[block_index].ranges()[row].contains(index))?;
        cursor.set(block_index);
        Some(block_index)
    }

    /// The justification that applies to a block.
    ///
    /// Ragged sequence ends always hug the aligned core,
    /// so the trailing block is left-justified and the leading block right-justified.
    pub(super) fn effective_justification(
        &self,
        block_index: usize,
        justification: UnalignedJustification,
    ) -> UnalignedJustification {
        if self.blocks[block_index].is_aligned() {
            justification
        } else if block_index + 1 == self.blocks.len() {
            UnalignedJustification::Left
        } else if block_index == 0 {
            UnalignedJustification::Right
        } else {
            justification
        }
    }

    pub(super) fn block_at(&self, column: usize) -> Option<(&BlockMapEntry, &Block)> {
        let entry = self.block_map.get(column)?;
        Some((entry, &self.blocks[entry.block_index]))
    }

    pub fn sequence_and_index_at(
        &self,
        column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<ResidueAt<'_>> {
        let sequence = self.sequences.get(row)?;
        let (entry, block) = self.block_at(column)?;
        let justification = self.effective_justification(entry.block_index, justification);

        Some(ResidueAt {
            sequence,
            index: block.index_at(entry.block_column, row, justification),
            is_aligned: block.is_aligned(),
        })
    }

    /// The column where a residue is shown.
    ///
    /// This scans the columns of the covering block and is not meant for bulk use.
    pub fn alignment_index(
        &self,
        row: usize,
        index: usize,
        justification: UnalignedJustification,
    ) -> Option<usize> {
        let block_index = self.block_for_residue(row, index, &mut BlockCursor::default())?;
        let block = &self.blocks[block_index];
        let justification = self.effective_justification(block_index, justification);
        let first_column = self.block_map.first_column(block_index)?;

        (0..block.width())
            .find(|&block_column| block.index_at(block_column, row, justification) == Some(index))
            .map(|block_column| first_column + block_column)
    }

    /// The residue of `row` aligned to a master residue.
    pub fn aligned_dependent_index(&self, master_index: usize, row: usize) -> Option<usize> {
        if row >= self.row_count() {
            return None;
        }
        let block_index = self.block_for_residue(0, master_index, &mut BlockCursor::default())?;
        let block = self.blocks[block_index].as_aligned()?;
        Some(block.ranges()[row].offset() + master_index - block.ranges()[0].offset())
    }

    /// The number of residues of `row` in the unaligned block at `column`.
    pub fn loop_length(&self, row: usize, column: usize) -> Option<usize> {
        let (_, block) = self.block_at(column)?;
        let block = block.as_unaligned()?;
        block.range(row).map(SequenceRange::len)
    }

    /// The fraction of aligned columns left of `column`, from zero at the first to one at the last aligned column.
    pub fn relative_alignment_fraction(&self, column: usize) -> Option<f64> {
        let (entry, _) = self.block_at(column)?;
        entry.aligned_block_number?;

        let total_aligned = self.aligned_blocks().map(AlignedBlock::width).sum::<usize>();
        let aligned_before = self.block_map.entries()[..column]
            .iter()
            .filter(|entry| entry.aligned_block_number.is_some())
            .count();

        if total_aligned == 1 {
            Some(0.0)
        } else {
            Some(aligned_before as f64 / (total_aligned - 1) as f64)
        }
    }

    /// The column of the first aligned block, if the alignment starts with at most one unaligned block.
    pub fn first_aligned_block_position(&self) -> Option<usize> {
        match self.blocks.as_slice() {
            [Block::Aligned(_), ..] => Some(0),
            [first, Block::Aligned(_), ..] => Some(first.width()),
            _ => None,
        }
    }

    pub fn row_for_sequence(&self, sequence: &Arc<Sequence>) -> Option<usize> {
        self.sequences
            .iter()
            .position(|candidate| same_sequence(candidate, sequence))
    }

    pub fn is_residue_aligned(&self, row: usize, index: usize) -> bool {
        self.block_for_residue(row, index, &mut BlockCursor::default())
            .is_some_and(|block_index| self.blocks[block_index].is_aligned())
    }

    /// The zero-based number of the aligned block at `column`.
    pub fn aligned_block_number(&self, column: usize) -> Option<usize> {
        self.block_map.get(column)?.aligned_block_number
    }

    pub fn aligned_blocks(&self) -> impl Iterator<Item = &AlignedBlock> {
        self.blocks.iter().filter_map(Block::as_aligned)
    }

    pub fn aligned_block_at(&self, column: usize) -> Option<&AlignedBlock> {
        self.block_at(column)?.1.as_aligned()
    }

    pub fn is_block_marked(&self, column: usize) -> bool {
        self.aligned_block_at(column)
            .is_some_and(|block| self.marked_blocks.contains(&block.id()))
    }

    pub fn marked_block_count(&self) -> usize {
        self.marked_blocks.len()
    }

    /// The residues of `row` that are aligned to any residue in the given master range.
    pub fn residues_aligned_to_master_range(
        &self,
        row: usize,
        master_range: SequenceRange,
    ) -> Vec<usize> {
        if row >= self.row_count() {
            return Vec::new();
        }

        self.aligned_blocks()
            .flat_map(|block| {
                let master = block.ranges()[0];
                let offset = master.offset().max(master_range.offset());
                let limit = master.limit().min(master_range.limit());
                let dependent_offset = block.ranges()[row].offset();
                (offset..limit.max(offset))
                    .map(move |master_index| dependent_offset + master_index - master.offset())
            })
            .collect()
    }
}
