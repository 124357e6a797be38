//! Position-specific scoring matrices indexed by master position.
//!
//! Construction of a real PSSM is left to an external [`PssmBuilder`],
//! the alignment only consumes the finished score table.

use ndarray::Array2;

use crate::{
    error::{Error, Result},
    multiple_alignment::BlockMultipleAlignment,
    residue::{NCBISTDAA_CHARACTERS, NCBISTDAA_SIZE, blosum62_score, ncbistdaa_code},
};

pub mod io;

#[cfg(test)]
mod tests;

/// A score per master position and NCBIstdaa residue.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Pssm {
    name: String,
    /// Rows are master positions, columns are NCBIstdaa codes.
    scores: Array2<i32>,
}

/// Builds a PSSM from the aligned blocks of an alignment.
pub trait PssmBuilder {
    fn build_pssm(&self, alignment: &BlockMultipleAlignment) -> Result<Pssm>;
}

/// Scores every master position with the BLOSUM62 row of its residue.
///
/// This ignores the dependent rows entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct MasterBlosumPssmBuilder;

impl Pssm {
    pub fn new(name: impl Into<String>, scores: Array2<i32>) -> Result<Self> {
        if scores.ncols() != NCBISTDAA_SIZE {
            return Err(Error::PssmColumnCount {
                expected: NCBISTDAA_SIZE,
                actual: scores.ncols(),
            });
        }

        Ok(Self {
            name: name.into(),
            scores,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position_count(&self) -> usize {
        self.scores.nrows()
    }

    /// The score of a residue character at a master position.
    pub fn score(&self, position: usize, residue: u8) -> Option<i32> {
        self.scores.get((position, ncbistdaa_code(residue))).copied()
    }

    pub fn scores(&self) -> &Array2<i32> {
        &self.scores
    }
}

impl PssmBuilder for MasterBlosumPssmBuilder {
    fn build_pssm(&self, alignment: &BlockMultipleAlignment) -> Result<Pssm> {
        let master = alignment.master();
        let scores = Array2::from_shape_fn((master.len(), NCBISTDAA_SIZE), |(position, code)| {
            blosum62_score(master.residues()[position], NCBISTDAA_CHARACTERS[code])
        });
        Pssm::new(format!("BLOSUM62 of {}", master.identifier()), scores)
    }
}
