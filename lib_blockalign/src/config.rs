/// Options consumed by the editing and extraction algorithms.
///
/// These are passed explicitly into every operation that needs them.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct AlignmentOptions {
    /// How many residues beyond the aligned span count into the footprint of a row.
    ///
    /// This limits how far [`optimize_block`](crate::BlockMultipleAlignment::optimize_block)
    /// may pull the first and last aligned block outwards,
    /// and widens the footprints reported by
    /// [`extract_rows_to_pairwise`](crate::BlockMultipleAlignment::extract_rows_to_pairwise).
    pub footprint_excess_residues: usize,
}

impl Default for AlignmentOptions {
    fn default() -> Self {
        Self {
            footprint_excess_residues: 15,
        }
    }
}
