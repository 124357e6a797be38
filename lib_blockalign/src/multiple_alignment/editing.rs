//! Interactive edits of the block structure.
//!
//! Every edit works on a copy of the aligned blocks and is committed only if the result is valid.
//! Edits that do not apply return `false` and leave the alignment unchanged.

use log::{debug, trace};

use super::{BlockMapEntry, BlockMultipleAlignment};
use crate::{
    block::{AlignedBlock, Block, SequenceRange, UnalignedJustification},
    config::AlignmentOptions,
    conservation::{column_profile, information_content},
};

impl BlockMultipleAlignment {
    /// Drags the first or last column of an aligned block from `column_from` to `column_to`.
    ///
    /// Growing is limited by the residues that all rows have in the adjacent unaligned block,
    /// shrinking keeps at least one column.
    pub fn move_block_boundary(&mut self, column_from: usize, column_to: usize) -> bool {
        let Some(&entry) = self.block_map.get(column_from) else {
            debug!("Column {column_from} is out of range");
            return false;
        };
        if column_to >= self.width() {
            debug!("Column {column_to} is out of range");
            return false;
        }
        let Some(ordinal) = entry.aligned_block_number else {
            debug!("Column {column_from} is not aligned, no boundary to move");
            return false;
        };

        let requested_shift = column_to as isize - column_from as isize;
        let width = self.blocks[entry.block_index].width();
        let mut aligned_blocks = self.scratch_aligned_blocks();
        let block = &mut aligned_blocks[ordinal];

        let ranges: Vec<_> = if entry.block_column == 0 && requested_shift < 0 {
            let available = self.minimum_loop_length(entry.block_index.checked_sub(1));
            let shift = requested_shift.unsigned_abs().min(available);
            if shift == 0 {
                debug!("No residues available to grow the block to the left");
                return false;
            }
            block
                .ranges()
                .iter()
                .map(|range| SequenceRange::new_offset_limit(range.offset() - shift, range.limit()))
                .collect()
        } else if entry.block_column + 1 == width && requested_shift > 0 {
            let available = self.minimum_loop_length(Some(entry.block_index + 1));
            let shift = requested_shift.unsigned_abs().min(available);
            if shift == 0 {
                debug!("No residues available to grow the block to the right");
                return false;
            }
            block
                .ranges()
                .iter()
                .map(|range| SequenceRange::new_offset_limit(range.offset(), range.limit() + shift))
                .collect()
        } else if entry.block_column == 0 && requested_shift > 0 {
            let shift = requested_shift.unsigned_abs().min(width - 1);
            if shift == 0 {
                return false;
            }
            block
                .ranges()
                .iter()
                .map(|range| SequenceRange::new_offset_limit(range.offset() + shift, range.limit()))
                .collect()
        } else if entry.block_column + 1 == width && requested_shift < 0 {
            let shift = requested_shift.unsigned_abs().min(width - 1);
            if shift == 0 {
                return false;
            }
            block
                .ranges()
                .iter()
                .map(|range| SequenceRange::new_offset_limit(range.offset(), range.limit() - shift))
                .collect()
        } else {
            debug!(
                "Column {column_from} is not a draggable edge of its block, or the shift is zero"
            );
            return false;
        };

        block.set_ranges(ranges);
        trace!("Moving block boundary from column {column_from} to {column_to}");
        self.commit_aligned_blocks(aligned_blocks)
    }

    /// The number of residues every row has in the given block, zero if it is aligned or missing.
    fn minimum_loop_length(&self, block_index: Option<usize>) -> usize {
        block_index
            .and_then(|block_index| self.blocks.get(block_index))
            .and_then(Block::as_unaligned)
            .and_then(|block| block.ranges().iter().map(SequenceRange::len).min())
            .unwrap_or(0)
    }

    /// Splits an aligned block so that `column` becomes the first column of the second half.
    pub fn split_block(&mut self, column: usize) -> bool {
        let Some(&entry) = self.block_map.get(column) else {
            return false;
        };
        let Some(ordinal) = entry.aligned_block_number else {
            debug!("Cannot split unaligned column {column}");
            return false;
        };
        if self.blocks[entry.block_index].width() < 2 || entry.block_column == 0 {
            debug!("Column {column} is not inside an aligned block");
            return false;
        }

        let mut aligned_blocks = self.scratch_aligned_blocks();
        let block = &mut aligned_blocks[ordinal];
        let (left, right): (Vec<_>, Vec<_>) = block
            .ranges()
            .iter()
            .map(|range| {
                let split = range.offset() + entry.block_column;
                (
                    SequenceRange::new_offset_limit(range.offset(), split),
                    SequenceRange::new_offset_limit(split, range.limit()),
                )
            })
            .unzip();

        let was_marked = self.marked_blocks.contains(&block.id());
        block.set_ranges(left);
        let right = AlignedBlock::new(self.block_ids.next(), right);
        let right_id = right.id();
        aligned_blocks.insert(ordinal + 1, right);

        if !self.commit_aligned_blocks(aligned_blocks) {
            return false;
        }
        if was_marked {
            self.marked_blocks.insert(right_id);
        }
        true
    }

    /// Merges all aligned blocks between the two columns into one.
    ///
    /// Fails if any column in between is unaligned.
    pub fn merge_blocks(&mut self, from_column: usize, to_column: usize) -> bool {
        let (from_column, to_column) = (from_column.min(to_column), from_column.max(to_column));
        let (Some(&from), Some(&to)) = (
            self.block_map.get(from_column),
            self.block_map.get(to_column),
        ) else {
            return false;
        };
        let (Some(first), Some(last)) = (from.aligned_block_number, to.aligned_block_number) else {
            debug!("Cannot merge from or to unaligned columns");
            return false;
        };
        if first == last {
            debug!("Columns {from_column} and {to_column} are in the same block");
            return false;
        }
        if self.block_map.entries()[from_column..=to_column]
            .iter()
            .any(|entry| entry.aligned_block_number.is_none())
        {
            debug!("Columns {from_column} to {to_column} include unaligned columns");
            return false;
        }

        let mut aligned_blocks = self.scratch_aligned_blocks();
        let ranges = aligned_blocks[first]
            .ranges()
            .iter()
            .zip(aligned_blocks[last].ranges())
            .map(|(first, last)| SequenceRange::new_offset_limit(first.offset(), last.limit()))
            .collect();
        aligned_blocks[first].set_ranges(ranges);
        aligned_blocks.drain(first + 1..=last);

        self.commit_aligned_blocks(aligned_blocks)
    }

    /// Turns the columns between `from_column` and `to_column` of an unaligned block into a new aligned block.
    ///
    /// Every row must show a residue in both end columns, and the residues in between must exactly span the new block.
    pub fn create_block(
        &mut self,
        from_column: usize,
        to_column: usize,
        justification: UnalignedJustification,
    ) -> bool {
        let (from_column, to_column) = (from_column.min(to_column), from_column.max(to_column));
        let (Some(&from), Some(&to)) = (
            self.block_map.get(from_column),
            self.block_map.get(to_column),
        ) else {
            return false;
        };
        if from.block_index != to.block_index || from.aligned_block_number.is_some() {
            debug!("Columns {from_column} to {to_column} are not within one unaligned block");
            return false;
        }

        let block = &self.blocks[from.block_index];
        let justification = self.effective_justification(from.block_index, justification);
        let width = to_column - from_column + 1;
        let mut ranges = Vec::with_capacity(self.row_count());
        for row in 0..self.row_count() {
            let (Some(offset), Some(last)) = (
                block.index_at(from.block_column, row, justification),
                block.index_at(to.block_column, row, justification),
            ) else {
                debug!("Row {row} has no residue at the ends of the new block");
                return false;
            };
            if last + 1 < offset || last + 1 - offset != width {
                debug!("Row {row} does not cover {width} residues in the new block");
                return false;
            }
            ranges.push(SequenceRange::new_offset_limit(offset, last + 1));
        }

        let ordinal = self.aligned_blocks_before(from.block_index);
        let mut aligned_blocks = self.scratch_aligned_blocks();
        aligned_blocks.insert(ordinal, AlignedBlock::new(self.block_ids.next(), ranges));
        self.commit_aligned_blocks(aligned_blocks)
    }

    fn aligned_blocks_before(&self, block_index: usize) -> usize {
        self.blocks[..block_index]
            .iter()
            .filter(|block| block.is_aligned())
            .count()
    }

    /// Removes the aligned block at `column`, its residues become unaligned.
    pub fn delete_block(&mut self, column: usize) -> bool {
        let Some(ordinal) = self.aligned_block_number(column) else {
            debug!("Column {column} is not aligned");
            return false;
        };

        let mut aligned_blocks = self.scratch_aligned_blocks();
        aligned_blocks.remove(ordinal);
        self.commit_aligned_blocks(aligned_blocks)
    }

    /// Removes all aligned blocks, leaving a single unaligned block.
    pub fn delete_all_blocks(&mut self) -> bool {
        self.commit_aligned_blocks(Vec::new())
    }

    /// Shifts one row of an aligned block by dragging a residue from `from_column` to `to_column`.
    ///
    /// One end of the drag must be in the aligned block,
    /// the other end in the same block or in an unaligned block directly next to it.
    /// The residues are taken from the unaligned block on the side the row moves away from.
    pub fn shift_row(
        &mut self,
        row: usize,
        from_column: usize,
        to_column: usize,
        justification: UnalignedJustification,
    ) -> bool {
        if from_column == to_column || row >= self.row_count() {
            return false;
        }
        let (Some(&from), Some(&to)) = (
            self.block_map.get(from_column),
            self.block_map.get(to_column),
        ) else {
            return false;
        };

        let (aligned, other) = if from.aligned_block_number.is_some() {
            (from, to)
        } else {
            (to, from)
        };
        let Some(ordinal) = aligned.aligned_block_number else {
            debug!("Neither column {from_column} nor {to_column} is aligned");
            return false;
        };
        let adjacent_unaligned = other.aligned_block_number.is_none()
            && (other.block_index + 1 == aligned.block_index
                || other.block_index == aligned.block_index + 1);
        if other.block_index != aligned.block_index && !adjacent_unaligned {
            debug!("Column {from_column} and {to_column} are not in the same or adjacent blocks");
            return false;
        }

        let requested_shift = if from.aligned_block_number.is_some() {
            to_column as isize - from_column as isize
        } else {
            let from_index = self
                .sequence_and_index_at(from_column, row, justification)
                .and_then(|residue| residue.index);
            let to_index = self
                .sequence_and_index_at(to_column, row, justification)
                .and_then(|residue| residue.index);
            let (Some(from_index), Some(to_index)) = (from_index, to_index) else {
                debug!("No residue to drag at column {from_column}");
                return false;
            };
            to_index as isize - from_index as isize
        };

        self.shift_aligned_row(row, &aligned, ordinal, requested_shift)
    }

    /// Moves the range of one row of an aligned block by `-requested_shift` residues,
    /// limited by the residues of the unaligned block on the donor side.
    fn shift_aligned_row(
        &mut self,
        row: usize,
        aligned: &BlockMapEntry,
        ordinal: usize,
        requested_shift: isize,
    ) -> bool {
        let actual_shift = if requested_shift > 0 {
            let available = self.row_loop_length(row, aligned.block_index.checked_sub(1));
            requested_shift.min(available as isize)
        } else {
            let available = self.row_loop_length(row, Some(aligned.block_index + 1));
            requested_shift.max(-(available as isize))
        };
        if actual_shift == 0 {
            debug!("No residues available to shift row {row}");
            return false;
        }

        let mut aligned_blocks = self.scratch_aligned_blocks();
        let block = &mut aligned_blocks[ordinal];
        let Some(range) = block.ranges()[row].shifted(-actual_shift) else {
            return false;
        };
        block.set_range(row, range);

        trace!("Shifting row {row} of aligned block {ordinal} by {actual_shift}");
        self.commit_aligned_blocks(aligned_blocks)
    }

    fn row_loop_length(&self, row: usize, block_index: Option<usize>) -> usize {
        block_index
            .and_then(|block_index| self.blocks.get(block_index))
            .and_then(Block::as_unaligned)
            .and_then(|block| block.range(row))
            .map(SequenceRange::len)
            .unwrap_or(0)
    }

    /// Pulls the residue at an unaligned `column` into the next (or previous) aligned block.
    pub fn zip_align_residue(
        &mut self,
        row: usize,
        column: usize,
        move_right: bool,
        justification: UnalignedJustification,
    ) -> bool {
        let Some(&entry) = self.block_map.get(column) else {
            return false;
        };
        if entry.aligned_block_number.is_some() {
            debug!("Column {column} is already aligned");
            return false;
        }

        let neighbour = if move_right {
            Some(entry.block_index + 1)
        } else {
            entry.block_index.checked_sub(1)
        };
        let Some(block) = neighbour
            .and_then(|block_index| self.blocks.get(block_index))
            .and_then(Block::as_aligned)
        else {
            debug!("No aligned block to zip column {column} into");
            return false;
        };
        let Some(range) = block.range(row) else {
            return false;
        };
        let target_index = if move_right {
            Some(range.offset())
        } else {
            range.last()
        };

        let Some(target_column) = target_index
            .and_then(|index| self.alignment_index(row, index, justification))
        else {
            return false;
        };
        self.shift_row(row, column, target_column, justification)
    }

    /// Moves one row of the aligned block at `column` to the position where the block has the highest information content.
    ///
    /// All shifts that stay within the flanking unaligned residues are tried,
    /// for the first and last aligned block additionally limited by the footprint excess.
    /// Ties are won by the shift tried first, starting from the largest shift to the left.
    pub fn optimize_block(
        &mut self,
        row: usize,
        column: usize,
        options: &AlignmentOptions,
    ) -> bool {
        if row >= self.row_count() {
            return false;
        }
        let Some(&entry) = self.block_map.get(column) else {
            return false;
        };
        let Some(ordinal) = entry.aligned_block_number else {
            debug!("Column {column} is not aligned");
            return false;
        };

        let mut max_shift_right = self.row_loop_length(row, entry.block_index.checked_sub(1));
        let mut max_shift_left = self.row_loop_length(row, Some(entry.block_index + 1));
        if ordinal == 0 {
            max_shift_right = max_shift_right.min(options.footprint_excess_residues);
        }
        if ordinal + 1 == self.block_map.aligned_block_count() {
            max_shift_left = max_shift_left.min(options.footprint_excess_residues);
        }

        let Some(block) = self.blocks[entry.block_index].as_aligned() else {
            return false;
        };
        let offset = block.ranges()[row].offset();
        let sequence = &self.sequences[row];

        let mut best: Option<(isize, f64)> = None;
        for shift in -(max_shift_left as isize)..=max_shift_right as isize {
            let score: f64 = (0..block.width())
                .map(|block_column| {
                    let residues = self.sequences.iter().enumerate().map(|(other_row, other)| {
                        let index = if other_row == row {
                            offset.checked_add_signed(block_column as isize - shift)
                        } else {
                            block.index_at(block_column, other_row)
                        };
                        index.and_then(|index| other.residue(index)).unwrap_or(b'X')
                    });
                    information_content(&column_profile(residues), self.row_count())
                })
                .sum();

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((shift, score));
            }
        }

        let Some((best_shift, best_score)) = best else {
            return false;
        };
        trace!(
            "Best shift for row {row} of aligned block {ordinal} of sequence {} is {best_shift} with score {best_score}",
            sequence.identifier()
        );
        if best_shift == 0 {
            return false;
        }

        self.shift_aligned_row(row, &entry, ordinal, best_shift)
    }

    /// Flags the aligned block at `column` for realignment.
    pub fn mark_block(&mut self, column: usize) -> bool {
        let Some(block) = self.aligned_block_at(column) else {
            debug!("Column {column} is not aligned and cannot be marked");
            return false;
        };
        let id = block.id();
        self.marked_blocks.insert(id);
        true
    }

    pub fn clear_marks(&mut self) {
        self.marked_blocks.clear();
    }
}
