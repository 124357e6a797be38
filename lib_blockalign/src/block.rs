use std::{fmt::Display, ops::Range};

use strong_type::StrongType;

#[cfg(test)]
mod tests;

/// A stable handle of an aligned block.
///
/// Handles survive edits that insert or remove other blocks,
/// so auxiliary data such as marks can be keyed by them.
#[derive(StrongType)]
#[strong_type(conversion)]
pub struct BlockId(usize);

#[derive(Debug, Default, Clone)]
pub(crate) struct BlockIdGenerator {
    next: usize,
}

impl BlockIdGenerator {
    pub fn next(&mut self) -> BlockId {
        let result = BlockId(self.next);
        self.next += 1;
        result
    }
}

/// A range of residues of one row.
///
/// The range is half-open, an empty range still carries the offset where it would start.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceRange {
    offset: usize,
    limit: usize,
}

/// How the residues of a row are placed into the columns of an unaligned block that is wider than the row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum UnalignedJustification {
    #[default]
    Left,
    Right,
    Center,
    /// The first half of the residues is left-packed, the second half right-packed.
    Split,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Block {
    Aligned(AlignedBlock),
    Unaligned(UnalignedBlock),
}

/// A gap-free block: every row covers exactly `width` residues.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AlignedBlock {
    id: BlockId,
    width: usize,
    ranges: Vec<SequenceRange>,
}

/// A loop region between aligned blocks, rows may cover different amounts of residues.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnalignedBlock {
    width: usize,
    ranges: Vec<SequenceRange>,
}

impl SequenceRange {
    pub fn new_offset_limit(offset: usize, limit: usize) -> Self {
        debug_assert!(offset <= limit);
        Self { offset, limit }
    }

    pub fn new_offset_length(offset: usize, length: usize) -> Self {
        Self::new_offset_limit(offset, offset + length)
    }

    pub fn new_empty(offset: usize) -> Self {
        Self::new_offset_limit(offset, offset)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The index of the last residue, if the range is not empty.
    pub fn last(&self) -> Option<usize> {
        self.limit.checked_sub(1).filter(|_| !self.is_empty())
    }

    pub fn len(&self) -> usize {
        self.limit - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset == self.limit
    }

    pub fn contains(&self, index: usize) -> bool {
        self.offset <= index && index < self.limit
    }

    pub fn as_range(&self) -> Range<usize> {
        self.offset..self.limit
    }

    /// Moves both ends of the range by `shift` residues.
    ///
    /// Returns `None` if the range would start before the first residue.
    pub fn shifted(&self, shift: isize) -> Option<Self> {
        let offset = self.offset.checked_add_signed(shift)?;
        let limit = self.limit.checked_add_signed(shift)?;
        Some(Self::new_offset_limit(offset, limit))
    }
}

impl Display for SequenceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.offset, self.limit)
    }
}

impl From<Range<usize>> for SequenceRange {
    fn from(value: Range<usize>) -> Self {
        Self::new_offset_limit(value.start, value.end)
    }
}

impl AlignedBlock {
    /// Creates an aligned block whose width is taken from the first row.
    ///
    /// The block is not validated here, see [`crate::multiple_alignment`] for the invariant checks.
    pub(crate) fn new(id: BlockId, ranges: Vec<SequenceRange>) -> Self {
        let width = ranges.first().map(SequenceRange::len).unwrap_or(0);
        Self { id, width, ranges }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ranges(&self) -> &[SequenceRange] {
        &self.ranges
    }

    pub fn range(&self, row: usize) -> Option<&SequenceRange> {
        self.ranges.get(row)
    }

    pub fn row_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn index_at(&self, block_column: usize, row: usize) -> Option<usize> {
        if block_column >= self.width {
            return None;
        }
        self.ranges.get(row).map(|range| range.offset + block_column)
    }

    /// Replaces the range of one row, keeping the width.
    pub(crate) fn set_range(&mut self, row: usize, range: SequenceRange) {
        self.ranges[row] = range;
    }

    /// Replaces all ranges and recomputes the width from the first row.
    pub(crate) fn set_ranges(&mut self, ranges: Vec<SequenceRange>) {
        self.width = ranges.first().map(SequenceRange::len).unwrap_or(0);
        self.ranges = ranges;
    }

    pub(crate) fn push_range(&mut self, range: SequenceRange) {
        self.ranges.push(range);
    }

    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        let mut keep = keep.iter();
        self.ranges.retain(|_| *keep.next().unwrap_or(&true));
    }
}

impl UnalignedBlock {
    /// Creates an unaligned block as wide as its longest row.
    pub(crate) fn new(ranges: Vec<SequenceRange>) -> Self {
        let width = ranges.iter().map(SequenceRange::len).max().unwrap_or(0);
        Self { width, ranges }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ranges(&self) -> &[SequenceRange] {
        &self.ranges
    }

    pub fn range(&self, row: usize) -> Option<&SequenceRange> {
        self.ranges.get(row)
    }

    /// Maps a column of this block to a residue of the given row.
    ///
    /// Returns `None` if the column is padding for this row.
    pub fn index_at(
        &self,
        block_column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<usize> {
        if block_column >= self.width {
            return None;
        }

        let range = self.ranges.get(row)?;
        let row_width = range.len();
        let padding = self.width - row_width;

        match justification {
            UnalignedJustification::Left => {
                (block_column < row_width).then(|| range.offset + block_column)
            }
            UnalignedJustification::Right => {
                (block_column >= padding).then(|| range.offset + block_column - padding)
            }
            UnalignedJustification::Center => {
                let row_column = block_column.checked_sub(padding / 2)?;
                (row_column < row_width).then(|| range.offset + row_column)
            }
            UnalignedJustification::Split => {
                let left_count = row_width.div_ceil(2);
                let right_count = row_width - left_count;

                if block_column < left_count {
                    Some(range.offset + block_column)
                } else if block_column >= self.width - right_count {
                    Some(range.limit - (self.width - block_column))
                } else {
                    None
                }
            }
        }
    }
}

impl Block {
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Aligned(block) => block.width,
            Self::Unaligned(block) => block.width,
        }
    }

    pub fn ranges(&self) -> &[SequenceRange] {
        match self {
            Self::Aligned(block) => &block.ranges,
            Self::Unaligned(block) => &block.ranges,
        }
    }

    pub fn range(&self, row: usize) -> Option<&SequenceRange> {
        self.ranges().get(row)
    }

    pub fn row_count(&self) -> usize {
        self.ranges().len()
    }

    /// The handle of this block, if it is aligned.
    pub fn id(&self) -> Option<BlockId> {
        self.as_aligned().map(AlignedBlock::id)
    }

    pub fn as_aligned(&self) -> Option<&AlignedBlock> {
        match self {
            Self::Aligned(block) => Some(block),
            Self::Unaligned(_) => None,
        }
    }

    pub fn as_aligned_mut(&mut self) -> Option<&mut AlignedBlock> {
        match self {
            Self::Aligned(block) => Some(block),
            Self::Unaligned(_) => None,
        }
    }

    pub fn as_unaligned(&self) -> Option<&UnalignedBlock> {
        match self {
            Self::Aligned(_) => None,
            Self::Unaligned(block) => Some(block),
        }
    }

    /// Maps a column of this block to a residue of the given row.
    ///
    /// The justification only matters for unaligned blocks.
    pub fn index_at(
        &self,
        block_column: usize,
        row: usize,
        justification: UnalignedJustification,
    ) -> Option<usize> {
        match self {
            Self::Aligned(block) => block.index_at(block_column, row),
            Self::Unaligned(block) => block.index_at(block_column, row, justification),
        }
    }
}
