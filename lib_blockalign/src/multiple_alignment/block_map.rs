use crate::block::Block;

/// Where a global alignment column lies in the block list.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BlockMapEntry {
    /// Index of the owning block in the block list.
    pub block_index: usize,
    /// Column relative to the start of the owning block.
    pub block_column: usize,
    /// Zero-based number of the owning block among the aligned blocks, `None` for unaligned blocks.
    pub aligned_block_number: Option<usize>,
}

/// Maps every global column to its block.
///
/// This is derived from the block list and rebuilt after every structural edit.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BlockMap {
    entries: Vec<BlockMapEntry>,
    block_offsets: Vec<usize>,
    aligned_block_count: usize,
}

/// Remembers the last block found by a residue lookup.
///
/// Sequential lookups then resolve in constant time.
/// A cursor is only a hint, a stale cursor never produces a wrong result.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockCursor {
    last: Option<usize>,
}

impl BlockMap {
    pub fn new(blocks: &[Block]) -> Self {
        let mut entries = Vec::with_capacity(blocks.iter().map(Block::width).sum());
        let mut block_offsets = Vec::with_capacity(blocks.len());
        let mut aligned_block_count = 0;

        for (block_index, block) in blocks.iter().enumerate() {
            block_offsets.push(entries.len());
            let aligned_block_number = block.is_aligned().then(|| {
                aligned_block_count += 1;
                aligned_block_count - 1
            });
            entries.extend((0..block.width()).map(|block_column| BlockMapEntry {
                block_index,
                block_column,
                aligned_block_number,
            }));
        }

        Self {
            entries,
            block_offsets,
            aligned_block_count,
        }
    }

    pub fn get(&self, column: usize) -> Option<&BlockMapEntry> {
        self.entries.get(column)
    }

    pub fn entries(&self) -> &[BlockMapEntry] {
        &self.entries
    }

    /// The total alignment width.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The global column where the given block starts.
    pub fn first_column(&self, block_index: usize) -> Option<usize> {
        self.block_offsets.get(block_index).copied()
    }

    pub fn aligned_block_count(&self) -> usize {
        self.aligned_block_count
    }
}

impl BlockCursor {
    pub(super) fn start(&self, block_count: usize) -> usize {
        self.last.filter(|&last| last < block_count).unwrap_or(0)
    }

    pub(super) fn set(&mut self, block_index: usize) {
        self.last = Some(block_index);
    }
}
