use std::sync::Arc;

use super::{AlignedSegment, create_multiple_from_pairwise};
use crate::{
    block::SequenceRange, error::Error, multiple_alignment::BlockMultipleAlignment,
    sequence::Sequence,
};

fn master() -> Arc<Sequence> {
    Arc::new(Sequence::new("master", "ACDEFGHIKLMN"))
}

fn dependent(identifier: &str, residues: &str) -> Arc<Sequence> {
    Arc::new(Sequence::new(identifier, residues))
}

fn master_ranges(alignment: &BlockMultipleAlignment) -> Vec<SequenceRange> {
    alignment
        .aligned_blocks()
        .map(|block| block.ranges()[0])
        .collect()
}

fn row_ranges(alignment: &BlockMultipleAlignment, row: usize) -> Vec<SequenceRange> {
    alignment
        .aligned_blocks()
        .map(|block| block.ranges()[row])
        .collect()
}

#[test]
fn test_new_pairwise() {
    let alignment = BlockMultipleAlignment::new_pairwise(
        master(),
        dependent("d", "CDEFGH"),
        &[AlignedSegment::new(1, 0, 3), AlignedSegment::new(5, 3, 2)],
    )
    .unwrap();
    alignment.validate().unwrap();
    assert_eq!(master_ranges(&alignment), vec![(1..4).into(), (5..7).into()]);
    assert_eq!(row_ranges(&alignment, 1), vec![(0..3).into(), (3..5).into()]);
}

#[test]
fn test_new_pairwise_rejects_bad_segments() {
    let new = |segments: &[AlignedSegment]| {
        BlockMultipleAlignment::new_pairwise(master(), dependent("d", "CDEFGH"), segments)
    };

    assert!(matches!(
        new(&[AlignedSegment::new(0, 0, 2), AlignedSegment::new(4, 3, 0)]),
        Err(Error::EmptySegment { index: 1 })
    ));
    assert!(matches!(
        new(&[AlignedSegment::new(8, 4, 3)]),
        Err(Error::SegmentOutOfBounds { index: 0 })
    ));
    assert!(matches!(
        new(&[AlignedSegment::new(0, 2, 2), AlignedSegment::new(4, 1, 2)]),
        Err(Error::SegmentsNotIncreasing { index: 1 })
    ));
}

#[test]
fn test_pairwise_view() {
    let alignment = BlockMultipleAlignment::new_pairwise(
        master(),
        dependent("d", "CDEFGH"),
        &[AlignedSegment::new(1, 0, 2), AlignedSegment::new(3, 3, 1)],
    )
    .unwrap();
    let view = alignment.pairwise_view().unwrap();

    assert_eq!(
        &view.master_to_dependent()[..5],
        &[None, Some(0), Some(1), Some(3), None]
    );
    assert_eq!(
        &view.block_structure()[..5],
        &[None, Some(0), Some(0), Some(1), None]
    );
    assert_eq!(view.master_to_dependent().len(), 12);
}

#[test]
fn test_pairwise_view_of_multiple_alignment() {
    let master = master();
    let alignment = BlockMultipleAlignment::from_aligned_ranges(
        vec![master.clone(), master.clone(), master],
        [vec![(0..2).into(), (0..2).into(), (0..2).into()]],
    )
    .unwrap();
    assert!(matches!(
        alignment.pairwise_view(),
        Err(Error::NotPairwise { rows: 3, .. })
    ));
}

#[test]
fn test_identical_blocks_for_master() {
    let master = master();
    let first = BlockMultipleAlignment::new_pairwise(
        master.clone(),
        dependent("d1", "ACDEFGHIKL"),
        &[AlignedSegment::new(0, 0, 10)],
    )
    .unwrap();
    let second = BlockMultipleAlignment::new_pairwise(
        master,
        dependent("d2", "DEWGHKL"),
        &[AlignedSegment::new(2, 0, 2), AlignedSegment::new(5, 3, 2)],
    )
    .unwrap();

    let multiple = create_multiple_from_pairwise(&[first, second]).unwrap();
    multiple.validate().unwrap();
    assert_eq!(multiple.row_count(), 3);
    assert_eq!(master_ranges(&multiple), vec![(2..4).into(), (5..7).into()]);
    assert_eq!(row_ranges(&multiple, 1), vec![(2..4).into(), (5..7).into()]);
    assert_eq!(row_ranges(&multiple, 2), vec![(0..2).into(), (3..5).into()]);
}

#[test]
fn test_dependent_insertion_splits_block() {
    let master = master();
    let first = BlockMultipleAlignment::new_pairwise(
        master.clone(),
        dependent("d1", "ACDEFGHIKL"),
        &[AlignedSegment::new(0, 0, 10)],
    )
    .unwrap();
    // one extra residue in the dependent between master residues 3 and 4
    let second = BlockMultipleAlignment::new_pairwise(
        master,
        dependent("d2", "DEWFGH"),
        &[AlignedSegment::new(2, 0, 2), AlignedSegment::new(4, 3, 3)],
    )
    .unwrap();

    let multiple = create_multiple_from_pairwise(&[first, second]).unwrap();
    multiple.validate().unwrap();
    assert_eq!(master_ranges(&multiple), vec![(2..4).into(), (4..7).into()]);
    assert_eq!(row_ranges(&multiple, 2), vec![(0..2).into(), (3..6).into()]);
    // the inserted dependent residue forms a loop of width one between the blocks
    assert!(multiple.blocks()[1].is_aligned());
    assert!(!multiple.blocks()[2].is_aligned());
    assert_eq!(multiple.blocks()[2].width(), 1);
    assert_eq!(multiple.blocks()[2].ranges()[2], (2..3).into());
    assert!(multiple.blocks()[3].is_aligned());
}

#[test]
fn test_block_boundaries_are_kept() {
    let master = master();
    let first = BlockMultipleAlignment::new_pairwise(
        master.clone(),
        dependent("d1", "ACDEFGHIKL"),
        &[AlignedSegment::new(0, 0, 10)],
    )
    .unwrap();
    // contiguous in both sequences, but two separate blocks
    let second = BlockMultipleAlignment::new_pairwise(
        master,
        dependent("d2", "DEFGH"),
        &[AlignedSegment::new(2, 0, 2), AlignedSegment::new(4, 2, 3)],
    )
    .unwrap();

    let multiple = create_multiple_from_pairwise(&[first, second]).unwrap();
    assert_eq!(master_ranges(&multiple), vec![(2..4).into(), (4..7).into()]);
    assert_eq!(row_ranges(&multiple, 2), vec![(0..2).into(), (2..5).into()]);
}

#[test]
fn test_row_info_is_copied() {
    let master = master();
    let mut first = BlockMultipleAlignment::new_pairwise(
        master.clone(),
        dependent("d1", "ACDEF"),
        &[AlignedSegment::new(0, 0, 5)],
    )
    .unwrap();
    let mut second = BlockMultipleAlignment::new_pairwise(
        master,
        dependent("d2", "ACDEF"),
        &[AlignedSegment::new(0, 0, 5)],
    )
    .unwrap();
    assert!(first.set_row_status(1, "threaded"));
    assert!(second.set_row_score(1, Some(-3.5)));

    let multiple = create_multiple_from_pairwise(&[first, second]).unwrap();
    assert_eq!(multiple.row_info(1).unwrap().status, "threaded");
    assert_eq!(multiple.row_info(1).unwrap().score, None);
    assert_eq!(multiple.row_info(2).unwrap().score, Some(-3.5));
    assert_eq!(multiple.row_info(0).unwrap().score, None);
}

#[test]
fn test_no_common_residues() {
    let master = master();
    let first = BlockMultipleAlignment::new_pairwise(
        master.clone(),
        dependent("d1", "ACD"),
        &[AlignedSegment::new(0, 0, 3)],
    )
    .unwrap();
    let second = BlockMultipleAlignment::new_pairwise(
        master,
        dependent("d2", "KLM"),
        &[AlignedSegment::new(8, 0, 3)],
    )
    .unwrap();

    let multiple = create_multiple_from_pairwise(&[first, second]).unwrap();
    multiple.validate().unwrap();
    assert_eq!(multiple.aligned_blocks().count(), 0);
    assert_eq!(multiple.blocks().len(), 1);
}

#[test]
fn test_create_multiple_errors() {
    assert!(matches!(
        create_multiple_from_pairwise(&[]),
        Err(Error::NoPairwiseAlignments)
    ));

    let master = master();
    let pairwise = BlockMultipleAlignment::new_pairwise(
        master.clone(),
        dependent("d1", "ACD"),
        &[AlignedSegment::new(0, 0, 3)],
    )
    .unwrap();
    let other_master = BlockMultipleAlignment::new_pairwise(
        Arc::new(Sequence::new("master", "ACDEFGHIKLMN")),
        dependent("d2", "ACD"),
        &[AlignedSegment::new(0, 0, 3)],
    )
    .unwrap();
    assert!(matches!(
        create_multiple_from_pairwise(&[pairwise.clone(), other_master]),
        Err(Error::MasterMismatch { index: 1, .. })
    ));

    let three_rows = BlockMultipleAlignment::from_aligned_ranges(
        vec![master.clone(), master.clone(), master],
        Vec::new(),
    )
    .unwrap();
    assert!(matches!(
        create_multiple_from_pairwise(&[pairwise, three_rows]),
        Err(Error::NotPairwise { index: 1, rows: 3 })
    ));
}
