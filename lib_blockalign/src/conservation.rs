//! Per-column amino acid profiles of the aligned blocks and the scores derived from them.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use itertools::Itertools;
use log::trace;
use ndarray::Array2;
use strong_type::StrongType;
use tagged_vec::TaggedVec;

use crate::{
    block::{AlignedBlock, Block, BlockId},
    pssm::Pssm,
    residue::{blosum62_score, screen_residue, standard_frequency},
    sequence::Sequence,
};

#[cfg(test)]
mod tests;

/// Background frequencies below this are ignored when computing information content.
const MINIMUM_EXPECTED_FREQUENCY: f64 = 1e-4;

/// Index into the flat list of profile columns of an alignment.
#[derive(StrongType)]
#[strong_type(conversion)]
pub struct ProfileColumn(usize);

/// Screened residue counts of one alignment column.
pub type ColumnProfile = BTreeMap<u8, usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConservation {
    profile: ColumnProfile,
    identity: bool,
    variety: usize,
    weighted_variety: i64,
    information_content: f64,
}

/// Conservation of every column of every aligned block.
#[derive(Debug, Clone)]
pub struct ConservationProfile {
    row_count: usize,
    block_columns: HashMap<BlockId, Vec<ProfileColumn>>,
    block_ordinals: HashMap<BlockId, usize>,
    columns: TaggedVec<ProfileColumn, ColumnConservation>,
    min_variety: usize,
    max_variety: usize,
    min_weighted_variety: i64,
    max_weighted_variety: i64,
    max_information_content: f64,
}

/// How well the rows fit a PSSM.
///
/// Residue fits are indexed by profile column and row,
/// everything else by aligned block ordinal and row.
#[derive(Debug, Clone)]
pub struct FitScores {
    residue_fits: Array2<i32>,
    block_fits: Array2<f64>,
    block_z_scores: Array2<Option<f64>>,
    row_z_scores: Array2<Option<f64>>,
    residue_fit_range: (i32, i32),
    block_fit_range: (f64, f64),
    block_z_range: Option<(f64, f64)>,
    row_z_range: Option<(f64, f64)>,
}

/// Counts the screened residues of a column.
pub fn column_profile(residues: impl IntoIterator<Item = u8>) -> ColumnProfile {
    let mut profile = ColumnProfile::new();
    for residue in residues {
        *profile.entry(screen_residue(residue)).or_default() += 1;
    }
    profile
}

/// Shannon information of a column in bits, relative to the standard background frequencies.
pub fn information_content(profile: &ColumnProfile, row_count: usize) -> f64 {
    if row_count == 0 {
        return 0.0;
    }

    profile
        .iter()
        .filter_map(|(&residue, &count)| {
            let expected = standard_frequency(residue);
            (expected > MINIMUM_EXPECTED_FREQUENCY).then(|| {
                let observed = count as f64 / row_count as f64;
                observed * (observed / expected).log2()
            })
        })
        .sum()
}

impl ColumnConservation {
    pub fn new(residues: impl IntoIterator<Item = u8>) -> Self {
        let mut row_count = 0;
        let profile = column_profile(residues.into_iter().inspect(|_| row_count += 1));

        let identity = profile.keys().filter(|&&residue| residue != b'X').count() == 1;
        // every X counts as a distinct residue
        let variety = profile
            .iter()
            .map(|(&residue, &count)| if residue == b'X' { count } else { 1 })
            .sum();

        let mut weighted_variety = 0;
        for (index, (&a, &count_a)) in profile.iter().enumerate() {
            let count_a = count_a as i64;
            weighted_variety += count_a * (count_a - 1) / 2 * i64::from(blosum62_score(a, a));
            for (&b, &count_b) in profile.iter().skip(index + 1) {
                weighted_variety += count_a * count_b as i64 * i64::from(blosum62_score(a, b));
            }
        }

        let information_content = information_content(&profile, row_count);

        Self {
            profile,
            identity,
            variety,
            weighted_variety,
            information_content,
        }
    }

    pub fn profile(&self) -> &ColumnProfile {
        &self.profile
    }

    /// True if the column contains exactly one residue type apart from `X`.
    pub fn identity(&self) -> bool {
        self.identity
    }

    pub fn variety(&self) -> usize {
        self.variety
    }

    pub fn weighted_variety(&self) -> i64 {
        self.weighted_variety
    }

    pub fn information_content(&self) -> f64 {
        self.information_content
    }
}

impl ConservationProfile {
    pub fn new(sequences: &[Arc<Sequence>], blocks: &[Block]) -> Self {
        let mut block_columns = HashMap::new();
        let mut block_ordinals = HashMap::new();
        let mut columns = TaggedVec::<ProfileColumn, ColumnConservation>::default();

        for (ordinal, block) in blocks.iter().filter_map(Block::as_aligned).enumerate() {
            let profile_columns = (0..block.width())
                .map(|block_column| {
                    columns.push(ColumnConservation::new(column_residues(
                        sequences,
                        block,
                        block_column,
                    )))
                })
                .collect();
            block_columns.insert(block.id(), profile_columns);
            block_ordinals.insert(block.id(), ordinal);
        }

        let (min_variety, max_variety) = columns
            .iter_values()
            .map(ColumnConservation::variety)
            .minmax()
            .into_option()
            .unwrap_or((0, 0));
        let (min_weighted_variety, max_weighted_variety) = columns
            .iter_values()
            .map(ColumnConservation::weighted_variety)
            .minmax()
            .into_option()
            .unwrap_or((0, 0));
        let max_information_content = columns
            .iter_values()
            .map(ColumnConservation::information_content)
            .fold(0.0, f64::max);

        trace!(
            "Built conservation profile with {} columns over {} aligned blocks",
            columns.len(),
            block_ordinals.len()
        );

        Self {
            row_count: sequences.len(),
            block_columns,
            block_ordinals,
            columns,
            min_variety,
            max_variety,
            min_weighted_variety,
            max_weighted_variety,
            max_information_content,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &TaggedVec<ProfileColumn, ColumnConservation> {
        &self.columns
    }

    pub fn profile_column(&self, block: BlockId, block_column: usize) -> Option<ProfileColumn> {
        self.block_columns
            .get(&block)
            .and_then(|columns| columns.get(block_column))
            .copied()
    }

    /// The position of an aligned block among all aligned blocks.
    pub fn block_ordinal(&self, block: BlockId) -> Option<usize> {
        self.block_ordinals.get(&block).copied()
    }

    pub fn column(&self, column: ProfileColumn) -> &ColumnConservation {
        &self.columns[column]
    }

    pub fn identity_scale(&self, column: ProfileColumn) -> f64 {
        if self.columns[column].identity {
            1.0
        } else {
            0.0
        }
    }

    /// One for the least varied columns, zero for the most varied.
    pub fn variety_scale(&self, column: ProfileColumn) -> f64 {
        if self.max_variety == self.min_variety {
            return 1.0;
        }
        1.0 - (self.columns[column].variety - self.min_variety) as f64
            / (self.max_variety - self.min_variety) as f64
    }

    pub fn weighted_variety_scale(&self, column: ProfileColumn) -> f64 {
        if self.max_weighted_variety == self.min_weighted_variety {
            return 1.0;
        }
        (self.columns[column].weighted_variety - self.min_weighted_variety) as f64
            / (self.max_weighted_variety - self.min_weighted_variety) as f64
    }

    pub fn information_content_scale(&self, column: ProfileColumn) -> f64 {
        if self.max_information_content <= 0.0 {
            return 1.0;
        }
        (self.columns[column].information_content / self.max_information_content).clamp(0.0, 1.0)
    }
}

fn column_residues<'a>(
    sequences: &'a [Arc<Sequence>],
    block: &'a AlignedBlock,
    block_column: usize,
) -> impl Iterator<Item = u8> + 'a {
    sequences.iter().enumerate().map(move |(row, sequence)| {
        block
            .index_at(block_column, row)
            .and_then(|index| sequence.residue(index))
            .unwrap_or(b'X')
    })
}

impl FitScores {
    pub fn new(
        profile: &ConservationProfile,
        sequences: &[Arc<Sequence>],
        blocks: &[Block],
        pssm: &Pssm,
    ) -> Self {
        let row_count = sequences.len();
        let aligned_blocks: Vec<_> = blocks.iter().filter_map(Block::as_aligned).collect();

        let mut residue_fits = Array2::zeros((profile.columns.len(), row_count));
        let mut block_fits = Array2::zeros((aligned_blocks.len(), row_count));

        for (ordinal, block) in aligned_blocks.iter().enumerate() {
            let master_offset = block.ranges()[0].offset();
            for (row, sequence) in sequences.iter().enumerate() {
                let mut sum = 0;
                for block_column in 0..block.width() {
                    let fit = block
                        .index_at(block_column, row)
                        .and_then(|index| sequence.residue(index))
                        .and_then(|residue| pssm.score(master_offset + block_column, residue))
                        .unwrap_or(0);
                    if let Some(column) = profile.profile_column(block.id(), block_column) {
                        residue_fits[(usize::from(column), row)] = fit;
                    }
                    sum += fit;
                }
                block_fits[(ordinal, row)] = f64::from(sum) / block.width() as f64;
            }
        }

        let mut block_z_scores = Array2::from_elem(block_fits.dim(), None);
        for (ordinal, fits) in block_fits.rows().into_iter().enumerate() {
            for (row, z) in z_scores(fits.iter().copied()).into_iter().enumerate() {
                block_z_scores[(ordinal, row)] = z;
            }
        }

        let mut row_z_scores = Array2::from_elem(block_fits.dim(), None);
        for (row, fits) in block_fits.columns().into_iter().enumerate() {
            for (ordinal, z) in z_scores(fits.iter().copied()).into_iter().enumerate() {
                row_z_scores[(ordinal, row)] = z;
            }
        }

        let residue_fit_range = residue_fits
            .iter()
            .copied()
            .minmax()
            .into_option()
            .unwrap_or((0, 0));
        let block_fit_range = float_range(block_fits.iter().copied()).unwrap_or((0.0, 0.0));
        let block_z_range = float_range(block_z_scores.iter().flatten().copied());
        let row_z_range = float_range(row_z_scores.iter().flatten().copied());

        Self {
            residue_fits,
            block_fits,
            block_z_scores,
            row_z_scores,
            residue_fit_range,
            block_fit_range,
            block_z_range,
            row_z_range,
        }
    }

    pub fn residue_fit(&self, column: ProfileColumn, row: usize) -> Option<i32> {
        self.residue_fits.get((usize::from(column), row)).copied()
    }

    /// The average residue fit of a row inside an aligned block.
    pub fn block_fit(&self, block_ordinal: usize, row: usize) -> Option<f64> {
        self.block_fits.get((block_ordinal, row)).copied()
    }

    pub fn block_z_score(&self, block_ordinal: usize, row: usize) -> Option<f64> {
        self.block_z_scores.get((block_ordinal, row)).copied().flatten()
    }

    pub fn row_z_score(&self, block_ordinal: usize, row: usize) -> Option<f64> {
        self.row_z_scores.get((block_ordinal, row)).copied().flatten()
    }

    pub fn residue_fit_scale(&self, column: ProfileColumn, row: usize) -> f64 {
        let (min, max) = self.residue_fit_range;
        self.residue_fit(column, row)
            .map(|fit| normalize(f64::from(fit), f64::from(min), f64::from(max)))
            .unwrap_or(1.0)
    }

    pub fn block_fit_scale(&self, block_ordinal: usize, row: usize) -> f64 {
        let (min, max) = self.block_fit_range;
        self.block_fit(block_ordinal, row)
            .map(|fit| normalize(fit, min, max))
            .unwrap_or(1.0)
    }

    /// Scores without variance are pinned to one.
    pub fn block_z_scale(&self, block_ordinal: usize, row: usize) -> f64 {
        match (self.block_z_score(block_ordinal, row), self.block_z_range) {
            (Some(z), Some((min, max))) => normalize(z, min, max),
            _ => 1.0,
        }
    }

    pub fn row_z_scale(&self, block_ordinal: usize, row: usize) -> f64 {
        match (self.row_z_score(block_ordinal, row), self.row_z_range) {
            (Some(z), Some((min, max))) => normalize(z, min, max),
            _ => 1.0,
        }
    }
}

/// Z-scores of all values, or `None` everywhere if they have no variance.
fn z_scores(values: impl ExactSizeIterator<Item = f64> + Clone) -> Vec<Option<f64>> {
    let count = values.len() as f64;
    if values.len() == 0 {
        return Vec::new();
    }

    let mean = values.clone().sum::<f64>() / count;
    let variance = values.clone().map(|value| (value - mean).powi(2)).sum::<f64>() / count;
    let deviation = variance.sqrt();

    if deviation <= f64::EPSILON {
        values.map(|_| None).collect()
    } else {
        values.map(|value| Some((value - mean) / deviation)).collect()
    }
}

fn float_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |range, value| match range {
        None => Some((value, value)),
        Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
    })
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max - min <= f64::EPSILON {
        1.0
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}
