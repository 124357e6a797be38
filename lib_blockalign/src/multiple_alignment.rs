//! The block-based multiple alignment.
//!
//! Row 0 is the master, all other rows are dependents.
//! The alignment is stored as an ordered list of blocks that tiles every row from its first to its last residue.
//! Aligned blocks are gap-free and have the same width in every row,
//! unaligned blocks fill the loops between them and are only ever created by the finalisation step
//! that runs after every structural edit.

use std::{cell::OnceCell, collections::HashSet, sync::Arc};

use log::{error, trace};

use crate::{
    block::{AlignedBlock, Block, BlockId, BlockIdGenerator, SequenceRange},
    conservation::{ConservationProfile, FitScores},
    error::{Error, Result},
    pssm::{Pssm, PssmBuilder},
    sequence::Sequence,
};

pub use block_map::{BlockCursor, BlockMap, BlockMapEntry};
pub use character_traits::{
    CharacterTraits, CharacterTraitsContext, ResidueColoring, ResidueHighlights,
};
pub use queries::ResidueAt;
pub use rows::{ExtractedPairwise, Footprint};

mod block_map;
mod character_traits;
mod editing;
mod finalize;
mod queries;
mod rows;


/// A score and a free-text status line attached to a row by external scoring collaborators.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowInfo {
    pub score: Option<f64>,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct BlockMultipleAlignment {
    sequences: Vec<Arc<Sequence>>,
    blocks: Vec<Block>,
    block_map: BlockMap,
    block_ids: BlockIdGenerator,
    marked_blocks: HashSet<BlockId>,
    row_info: Vec<RowInfo>,
    /// One flag per residue, empty if the row has no violations.
    geometry_violations: Vec<Vec<bool>>,
    show_geometry_violations: bool,

    conservation: OnceCell<ConservationProfile>,
    pssm: OnceCell<Pssm>,
    fit_scores: OnceCell<FitScores>,
}

impl BlockMultipleAlignment {
    /// Creates an alignment from the per-row ranges of its aligned blocks.
    ///
    /// Each entry of `aligned_blocks` holds one range per row.
    /// The blocks must be ordered and must not overlap in any row.
    pub fn from_aligned_ranges(
        sequences: Vec<Arc<Sequence>>,
        aligned_blocks: impl IntoIterator<Item = Vec<SequenceRange>>,
    ) -> Result<Self> {
        let mut block_ids = BlockIdGenerator::default();
        let aligned_blocks = aligned_blocks
            .into_iter()
            .map(|ranges| AlignedBlock::new(block_ids.next(), ranges))
            .collect();
        Self::from_aligned_blocks(sequences, aligned_blocks, block_ids)
    }

    pub(crate) fn from_aligned_blocks(
        sequences: Vec<Arc<Sequence>>,
        aligned_blocks: Vec<AlignedBlock>,
        block_ids: BlockIdGenerator,
    ) -> Result<Self> {
        let blocks = finalize::build_block_list(&sequences, aligned_blocks)?;
        let block_map = BlockMap::new(&blocks);
        let row_count = sequences.len();

        Ok(Self {
            sequences,
            blocks,
            block_map,
            block_ids,
            marked_blocks: Default::default(),
            row_info: vec![Default::default(); row_count],
            geometry_violations: vec![Vec::new(); row_count],
            show_geometry_violations: false,
            conservation: OnceCell::new(),
            pssm: OnceCell::new(),
            fit_scores: OnceCell::new(),
        })
    }

    pub fn master(&self) -> &Arc<Sequence> {
        &self.sequences[0]
    }

    pub fn sequence(&self, row: usize) -> Option<&Arc<Sequence>> {
        self.sequences.get(row)
    }

    pub fn sequences(&self) -> &[Arc<Sequence>] {
        &self.sequences
    }

    pub fn row_count(&self) -> usize {
        self.sequences.len()
    }

    /// The number of columns.
    pub fn width(&self) -> usize {
        self.block_map.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_map(&self) -> &BlockMap {
        &self.block_map
    }

    pub fn row_info(&self, row: usize) -> Option<&RowInfo> {
        self.row_info.get(row)
    }

    pub fn set_row_score(&mut self, row: usize, score: Option<f64>) -> bool {
        match self.row_info.get_mut(row) {
            Some(info) => {
                info.score = score;
                true
            }
            None => {
                error!(
                    "Cannot set the score of row {row}, the alignment has {} rows",
                    self.row_count()
                );
                false
            }
        }
    }

    pub fn set_row_status(&mut self, row: usize, status: impl Into<String>) -> bool {
        match self.row_info.get_mut(row) {
            Some(info) => {
                info.status = status.into();
                true
            }
            None => {
                error!(
                    "Cannot set the status of row {row}, the alignment has {} rows",
                    self.row_count()
                );
                false
            }
        }
    }

    /// Sets the residues of a row that violate the geometry of its structure.
    ///
    /// An empty list clears the violations of the row.
    pub fn set_geometry_violations(&mut self, row: usize, violations: Vec<bool>) -> bool {
        let Some(sequence) = self.sequences.get(row) else {
            error!(
                "Cannot set geometry violations of row {row}, the alignment has {} rows",
                self.row_count()
            );
            return false;
        };
        if !violations.is_empty() && violations.len() != sequence.len() {
            error!(
                "Got {} geometry violation flags for row {row}, but its sequence has {} residues",
                violations.len(),
                sequence.len()
            );
            return false;
        }

        self.geometry_violations[row] = violations;
        true
    }

    pub fn set_show_geometry_violations(&mut self, show: bool) {
        self.show_geometry_violations = show;
    }

    pub fn shows_geometry_violations(&self) -> bool {
        self.show_geometry_violations
    }

    pub fn has_geometry_violation(&self, row: usize, index: usize) -> bool {
        self.geometry_violations
            .get(row)
            .and_then(|violations| violations.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// The conservation profile of the aligned blocks, computed on first use.
    pub fn conservation(&self) -> &ConservationProfile {
        self.conservation
            .get_or_init(|| ConservationProfile::new(&self.sequences, &self.blocks))
    }

    /// Replaces the cached PSSM.
    ///
    /// The PSSM is dropped by the next structural edit.
    pub fn install_pssm(&mut self, pssm: Pssm) {
        self.pssm = OnceCell::from(pssm);
        self.fit_scores = OnceCell::new();
    }

    pub fn pssm(&self) -> Option<&Pssm> {
        self.pssm.get()
    }

    /// Returns the cached PSSM, building it with the given builder if there is none.
    pub fn pssm_with(&self, builder: &dyn PssmBuilder) -> Result<&Pssm> {
        if let Some(pssm) = self.pssm.get() {
            return Ok(pssm);
        }

        let pssm = builder.build_pssm(self)?;
        Ok(self.pssm.get_or_init(|| pssm))
    }

    /// Fit scores against the cached PSSM, if there is one.
    pub fn fit_scores(&self) -> Option<&FitScores> {
        let pssm = self.pssm.get()?;
        Some(self.fit_scores.get_or_init(|| {
            FitScores::new(self.conservation(), &self.sequences, &self.blocks, pssm)
        }))
    }

    /// Sums the PSSM scores of the aligned residues of a row.
    pub fn score_row_against_pssm(&self, row: usize) -> Option<i32> {
        let pssm = self.pssm.get()?;
        let sequence = self.sequences.get(row)?;

        let mut score = 0;
        for block in self.aligned_blocks() {
            let master_offset = block.ranges()[0].offset();
            for (block_column, index) in block.ranges()[row].as_range().enumerate() {
                let residue = sequence.residue(index)?;
                score += pssm.score(master_offset + block_column, residue)?;
            }
        }
        Some(score)
    }

    /// Checks all structural invariants.
    pub fn validate(&self) -> Result<()> {
        finalize::check_tiling(&self.sequences, &self.blocks)?;
        if self.block_map != BlockMap::new(&self.blocks) {
            return Err(Error::StaleBlockMap);
        }
        if self.row_info.len() != self.row_count() {
            return Err(Error::WrongRowCount {
                expected: self.row_count(),
                actual: self.row_info.len(),
            });
        }
        Ok(())
    }

    /// A copy of the aligned blocks to apply an edit to.
    fn scratch_aligned_blocks(&self) -> Vec<AlignedBlock> {
        self.aligned_blocks().cloned().collect()
    }

    /// Replaces the block list with the finalised aligned blocks.
    ///
    /// If finalisation fails, the alignment is left untouched and `false` is returned.
    /// The caller must run [`Self::on_structural_edit`] after a successful commit.
    fn commit(&mut self, sequences: Vec<Arc<Sequence>>, aligned_blocks: Vec<AlignedBlock>) -> bool {
        match finalize::build_block_list(&sequences, aligned_blocks) {
            Ok(blocks) => {
                self.block_map = BlockMap::new(&blocks);
                self.blocks = blocks;
                self.sequences = sequences;

                let block_ids: HashSet<_> = self.blocks.iter().filter_map(Block::id).collect();
                self.marked_blocks.retain(|id| block_ids.contains(id));
                true
            }
            Err(error) => {
                error!("Discarding invalid edit: {error}");
                false
            }
        }
    }

    /// Commits an edit of the aligned blocks that keeps the rows.
    fn commit_aligned_blocks(&mut self, aligned_blocks: Vec<AlignedBlock>) -> bool {
        if self.commit(self.sequences.clone(), aligned_blocks) {
            self.on_structural_edit(true);
            true
        } else {
            false
        }
    }

    /// Invalidates everything derived from the block list.
    fn on_structural_edit(&mut self, clear_row_info: bool) {
        self.conservation = OnceCell::new();
        self.pssm = OnceCell::new();
        self.fit_scores = OnceCell::new();

        let row_count = self.row_count();
        if clear_row_info {
            self.row_info.clear();
        }
        self.row_info.resize_with(row_count, Default::default);
        self.geometry_violations.resize_with(row_count, Default::default);

        trace!(
            "Structural edit: {} blocks, width {}",
            self.blocks.len(),
            self.width()
        );
    }
}
