use std::sync::Arc;

/// An immutable residue string with an identifier.
///
/// Alignments never mutate sequences.
/// Rows reference them through an [`Arc`], so several rows and several alignments may share one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    identifier: String,
    residues: Vec<u8>,
    has_structure: bool,
}

impl Sequence {
    pub fn new(identifier: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            identifier: identifier.into(),
            residues: residues.into(),
            has_structure: false,
        }
    }

    /// Marks this sequence as having associated 3-D coordinates.
    pub fn with_structure(mut self, has_structure: bool) -> Self {
        self.has_structure = has_structure;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<u8> {
        self.residues.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn has_structure(&self) -> bool {
        self.has_structure
    }
}

/// Returns true if both handles refer to the same sequence instance.
///
/// Equal residues are not enough, rows have to share the instance.
pub fn same_sequence(a: &Arc<Sequence>, b: &Arc<Sequence>) -> bool {
    Arc::ptr_eq(a, b)
}
