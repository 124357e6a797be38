use std::sync::Arc;

use ndarray::Array2;

use super::{
    ColumnConservation, ConservationProfile, FitScores, column_profile, information_content,
};
use crate::{
    block::{AlignedBlock, Block, BlockIdGenerator, SequenceRange},
    pssm::Pssm,
    residue::NCBISTDAA_SIZE,
    sequence::Sequence,
};

#[test]
fn test_uniform_column_is_identical() {
    let column = ColumnConservation::new(*b"AAA");
    assert!(column.identity());
    assert_eq!(column.variety(), 1);
}

#[test]
fn test_x_does_not_break_identity() {
    let column = ColumnConservation::new(*b"AAX");
    assert!(column.identity());
    assert_eq!(column.variety(), 2);
}

#[test]
fn test_every_x_counts_into_variety() {
    let column = ColumnConservation::new(*b"XXXA");
    assert_eq!(column.variety(), 4);

    let column = ColumnConservation::new(*b"XX");
    assert!(!column.identity());
    assert_eq!(column.variety(), 2);
}

#[test]
fn test_residues_are_screened() {
    let profile = column_profile(*b"aAbJ*");
    assert_eq!(profile.get(&b'A'), Some(&2));
    assert_eq!(profile.get(&b'B'), Some(&1));
    assert_eq!(profile.get(&b'X'), Some(&2));
    assert!(!ColumnConservation::new(*b"AK").identity());
}

#[test]
fn test_weighted_variety_of_pairs() {
    // C(3, 2) * BLOSUM62(A, A) = 3 * 4
    assert_eq!(ColumnConservation::new(*b"AAA").weighted_variety(), 12);
    // BLOSUM62(A, A) + 2 * BLOSUM62(A, W) = 4 + 2 * -3
    assert_eq!(ColumnConservation::new(*b"AAW").weighted_variety(), -2);
}

#[test]
fn test_information_content_of_conserved_column() {
    let profile = column_profile(*b"WWWW");
    let expected = -crate::residue::standard_frequency(b'W').log2();
    assert!((information_content(&profile, 4) - expected).abs() < 1e-9);

    // X has no background frequency and is ignored
    let profile = column_profile(*b"XXXX");
    assert_eq!(information_content(&profile, 4), 0.0);
    assert_eq!(information_content(&profile, 0), 0.0);
}

fn two_block_alignment() -> (Vec<Arc<Sequence>>, Vec<Block>) {
    let sequences = vec![
        Arc::new(Sequence::new("master", "AKWAC")),
        Arc::new(Sequence::new("dependent", "ARWGC")),
    ];
    let mut ids = BlockIdGenerator::default();
    let blocks = vec![
        Block::Aligned(AlignedBlock::new(
            ids.next(),
            vec![SequenceRange::from(0..2), SequenceRange::from(0..2)],
        )),
        Block::Aligned(AlignedBlock::new(
            ids.next(),
            vec![SequenceRange::from(2..5), SequenceRange::from(2..5)],
        )),
    ];
    (sequences, blocks)
}

#[test]
fn test_profile_columns_follow_blocks() {
    let (sequences, blocks) = two_block_alignment();
    let profile = ConservationProfile::new(&sequences, &blocks);

    assert_eq!(profile.columns().len(), 5);
    let second = blocks[1].id().unwrap();
    assert_eq!(profile.block_ordinal(second), Some(1));
    let column = profile.profile_column(second, 2).unwrap();
    assert_eq!(usize::from(column), 4);
    assert!(profile.column(column).identity());
    assert!(profile.profile_column(second, 3).is_none());

    // A/A, W/W, C/C are identical, K/R and A/G are not
    let identity: Vec<_> = profile
        .columns()
        .iter_indices()
        .map(|column| profile.identity_scale(column))
        .collect();
    assert_eq!(identity, vec![1.0, 0.0, 1.0, 0.0, 1.0]);
    assert!(
        profile
            .columns()
            .iter_indices()
            .all(|column| (0.0..=1.0).contains(&profile.information_content_scale(column)))
    );
}

#[test]
fn test_fit_scores_without_variance_are_pinned() {
    let (sequences, blocks) = two_block_alignment();
    let profile = ConservationProfile::new(&sequences, &blocks);
    let pssm = Pssm::new("flat", Array2::from_elem((5, NCBISTDAA_SIZE), 3)).unwrap();
    let fit = FitScores::new(&profile, &sequences, &blocks, &pssm);

    assert_eq!(fit.block_fit(0, 1), Some(3.0));
    assert_eq!(fit.block_z_score(0, 0), None);
    assert_eq!(fit.block_z_scale(0, 0), 1.0);
    assert_eq!(fit.row_z_scale(1, 1), 1.0);
    let first_column = profile.profile_column(blocks[0].id().unwrap(), 0).unwrap();
    assert_eq!(fit.residue_fit_scale(first_column, 0), 1.0);
}

#[test]
fn test_fit_scores_rank_rows() {
    let (sequences, blocks) = two_block_alignment();
    let profile = ConservationProfile::new(&sequences, &blocks);
    let mut scores = Array2::zeros((5, NCBISTDAA_SIZE));
    // master residue K at position 1 fits well, the dependent R does not
    scores[(1, crate::residue::ncbistdaa_code(b'K'))] = 10;
    let pssm = Pssm::new("k", scores).unwrap();
    let fit = FitScores::new(&profile, &sequences, &blocks, &pssm);

    assert_eq!(fit.block_fit(0, 0), Some(5.0));
    assert_eq!(fit.block_fit(0, 1), Some(0.0));
    assert_eq!(fit.block_fit_scale(0, 0), 1.0);
    assert_eq!(fit.block_fit_scale(0, 1), 0.0);

    let master_z = fit.block_z_score(0, 0).unwrap();
    let dependent_z = fit.block_z_score(0, 1).unwrap();
    assert!((master_z - 1.0).abs() < 1e-9);
    assert!((dependent_z + 1.0).abs() < 1e-9);
    assert_eq!(fit.block_z_scale(0, 0), 1.0);
    assert_eq!(fit.block_z_scale(0, 1), 0.0);

    // the dependent fits zero everywhere
    assert_eq!(fit.row_z_score(0, 1), None);
    assert!(fit.row_z_score(0, 0).unwrap() > 0.0);
}
