use std::collections::HashSet;

use log::{debug, error, info};

use super::BlockMultipleAlignment;
use crate::{
    block::{AlignedBlock, SequenceRange},
    config::AlignmentOptions,
    error::Result,
    sequence::same_sequence,
};

/// The residues of a pairwise alignment that a realignment should consider.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub master: SequenceRange,
    pub dependent: SequenceRange,
}

/// A row removed from a multiple alignment, as a pairwise alignment with the master.
#[derive(Debug, Clone)]
pub struct ExtractedPairwise {
    pub alignment: BlockMultipleAlignment,
    /// `None` if the multiple alignment had no aligned blocks.
    pub footprint: Option<Footprint>,
}

impl BlockMultipleAlignment {
    /// Removes the given dependent rows.
    pub fn extract_rows(&mut self, rows: &[usize]) -> bool {
        self.check_extracted_rows(rows) && self.remove_rows(rows)
    }

    /// Removes the given dependent rows and returns them as pairwise alignments with the master.
    ///
    /// The pairwise alignments contain only the aligned blocks that are not marked.
    pub fn extract_rows_to_pairwise(
        &mut self,
        rows: &[usize],
        options: &AlignmentOptions,
    ) -> Option<Vec<ExtractedPairwise>> {
        if !self.check_extracted_rows(rows) {
            return None;
        }

        let unmarked: Vec<_> = self
            .aligned_blocks()
            .filter(|block| !self.marked_blocks.contains(&block.id()))
            .collect();
        let first = self.aligned_blocks().next();
        let last = self.aligned_blocks().last();

        let mut result = Vec::with_capacity(rows.len());
        for &row in rows {
            let sequences = vec![self.sequences[0].clone(), self.sequences[row].clone()];
            let ranges = unmarked
                .iter()
                .map(|block| vec![block.ranges()[0], block.ranges()[row]]);
            let mut alignment = match Self::from_aligned_ranges(sequences, ranges) {
                Ok(alignment) => alignment,
                Err(error) => {
                    error!("Cannot extract row {row} as a pairwise alignment: {error}");
                    return None;
                }
            };
            alignment.row_info[1] = self.row_info[row].clone();

            let footprint = first.zip(last).map(|(first, last)| {
                let footprint_row = |row: usize| {
                    let length = self.sequences[row].len();
                    SequenceRange::new_offset_limit(
                        first.ranges()[row]
                            .offset()
                            .saturating_sub(options.footprint_excess_residues),
                        (last.ranges()[row].limit() + options.footprint_excess_residues)
                            .min(length),
                    )
                };
                Footprint {
                    master: footprint_row(0),
                    dependent: footprint_row(row),
                }
            });

            result.push(ExtractedPairwise {
                alignment,
                footprint,
            });
        }

        if self.remove_rows(rows) {
            Some(result)
        } else {
            None
        }
    }

    /// Removes one dependent row.
    pub fn delete_row(&mut self, row: usize) -> bool {
        self.extract_rows(&[row])
    }

    fn check_extracted_rows(&self, rows: &[usize]) -> bool {
        if rows.is_empty() {
            debug!("No rows to extract");
            return false;
        }

        let mut seen = HashSet::new();
        for &row in rows {
            if row == 0 || row >= self.row_count() {
                error!(
                    "Cannot extract row {row} from an alignment with {} rows",
                    self.row_count()
                );
                return false;
            }
            if !seen.insert(row) {
                error!("Row {row} is listed twice for extraction");
                return false;
            }
        }
        true
    }

    fn remove_rows(&mut self, rows: &[usize]) -> bool {
        let mut keep = vec![true; self.row_count()];
        for &row in rows {
            keep[row] = false;
        }

        let sequences = self
            .sequences
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|(sequence, _)| sequence.clone())
            .collect();
        let mut aligned_blocks = self.scratch_aligned_blocks();
        for block in &mut aligned_blocks {
            block.retain_rows(&keep);
        }
        let geometry_violations = self
            .geometry_violations
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|(violations, _)| violations.clone())
            .collect();

        if !self.commit(sequences, aligned_blocks) {
            return false;
        }
        self.geometry_violations = geometry_violations;
        self.on_structural_edit(true);
        info!("Removed {} rows, {} remain", rows.len(), self.row_count());
        true
    }

    /// Appends the dependent rows of `other` to this alignment.
    ///
    /// Both alignments must share the master,
    /// and every aligned block of this alignment must lie within an aligned block of `other`.
    /// The row annotations of the existing rows are kept.
    pub fn merge_alignment(&mut self, other: &BlockMultipleAlignment) -> bool {
        if !same_sequence(self.master(), other.master()) {
            debug!("Cannot merge alignments with different masters");
            return false;
        }

        let mut aligned_blocks = self.scratch_aligned_blocks();
        for block in &mut aligned_blocks {
            let master = block.ranges()[0];
            let Some(containing) = other.aligned_blocks().find(|candidate| {
                let candidate = candidate.ranges()[0];
                candidate.offset() <= master.offset() && master.limit() <= candidate.limit()
            }) else {
                debug!("Aligned block at master {master} is not contained in the merged alignment");
                return false;
            };

            let shift = master.offset() - containing.ranges()[0].offset();
            for range in &containing.ranges()[1..] {
                block.push_range(SequenceRange::new_offset_length(
                    range.offset() + shift,
                    block.width(),
                ));
            }
        }

        let mut sequences = self.sequences.clone();
        sequences.extend(other.sequences[1..].iter().cloned());
        if !self.commit(sequences, aligned_blocks) {
            return false;
        }

        self.row_info.extend(other.row_info[1..].iter().cloned());
        self.geometry_violations
            .extend(other.geometry_violations[1..].iter().cloned());
        self.on_structural_edit(false);
        info!(
            "Merged {} rows, the alignment has now {} rows",
            other.row_count() - 1,
            self.row_count()
        );
        true
    }

    /// Every dependent row as a pairwise alignment with the master, containing all aligned blocks.
    pub fn pairwise_alignments(&self) -> Result<Vec<BlockMultipleAlignment>> {
        (1..self.row_count())
            .map(|row| {
                let mut pairwise = Self::from_aligned_ranges(
                    vec![self.sequences[0].clone(), self.sequences[row].clone()],
                    self.aligned_blocks()
                        .map(|block: &AlignedBlock| vec![block.ranges()[0], block.ranges()[row]]),
                )?;
                pairwise.row_info[1] = self.row_info[row].clone();
                Ok(pairwise)
            })
            .collect()
    }
}
