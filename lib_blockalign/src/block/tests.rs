use super::{BlockIdGenerator, SequenceRange, UnalignedBlock, UnalignedJustification};

fn loop_block() -> UnalignedBlock {
    // Row 0 fills the block, row 1 has three residues, row 2 none.
    UnalignedBlock::new(vec![
        SequenceRange::new_offset_limit(10, 16),
        SequenceRange::new_offset_limit(4, 7),
        SequenceRange::new_empty(2),
    ])
}

fn row_indices(
    block: &UnalignedBlock,
    row: usize,
    justification: UnalignedJustification,
) -> Vec<Option<usize>> {
    (0..block.width())
        .map(|column| block.index_at(column, row, justification))
        .collect()
}

#[test]
fn test_unaligned_width_is_longest_row() {
    assert_eq!(loop_block().width(), 6);
}

#[test]
fn test_left_justification() {
    assert_eq!(
        row_indices(&loop_block(), 1, UnalignedJustification::Left),
        vec![Some(4), Some(5), Some(6), None, None, None]
    );
}

#[test]
fn test_right_justification() {
    assert_eq!(
        row_indices(&loop_block(), 1, UnalignedJustification::Right),
        vec![None, None, None, Some(4), Some(5), Some(6)]
    );
}

#[test]
fn test_center_justification() {
    assert_eq!(
        row_indices(&loop_block(), 1, UnalignedJustification::Center),
        vec![None, Some(4), Some(5), Some(6), None, None]
    );
}

#[test]
fn test_split_justification() {
    assert_eq!(
        row_indices(&loop_block(), 1, UnalignedJustification::Split),
        vec![Some(4), Some(5), None, None, None, Some(6)]
    );
}

#[test]
fn test_full_row_ignores_justification() {
    let block = loop_block();
    for justification in [
        UnalignedJustification::Left,
        UnalignedJustification::Right,
        UnalignedJustification::Center,
        UnalignedJustification::Split,
    ] {
        assert_eq!(
            row_indices(&block, 0, justification),
            (10..16).map(Some).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_empty_row_has_no_residues() {
    let block = loop_block();
    assert!(
        row_indices(&block, 2, UnalignedJustification::Split)
            .iter()
            .all(Option::is_none)
    );
}

#[test]
fn test_range_helpers() {
    let range = SequenceRange::new_offset_length(3, 4);
    assert_eq!(range.limit(), 7);
    assert_eq!(range.last(), Some(6));
    assert!(range.contains(3) && range.contains(6) && !range.contains(7));
    assert_eq!(range.shifted(-3), Some(SequenceRange::new_offset_limit(0, 4)));
    assert_eq!(range.shifted(-4), None);
    assert_eq!(SequenceRange::new_empty(0).last(), None);
}

#[test]
fn test_block_ids_are_unique() {
    let mut generator = BlockIdGenerator::default();
    let first = generator.next();
    let second = generator.next();
    assert_ne!(first, second);
}
