use std::sync::Arc;

use ndarray::Array2;

use super::{MasterBlosumPssmBuilder, Pssm, PssmBuilder};
use crate::{
    error::Error,
    multiple_alignment::BlockMultipleAlignment,
    residue::{NCBISTDAA_CHARACTERS, NCBISTDAA_SIZE},
    sequence::Sequence,
};

fn plain_pssm() -> String {
    let mut input = String::from("# example\n |");
    // header in reverse order to check that columns are mapped by symbol
    for residue in NCBISTDAA_CHARACTERS.iter().rev() {
        input.push(' ');
        input.push(char::from(*residue));
    }
    input.push('\n');
    for position in 0..3 {
        input.push_str(&format!("{position} |"));
        for column in 0..NCBISTDAA_SIZE {
            input.push_str(&format!(" {}", position as i32 * 100 + column as i32 - 5));
        }
        input.push('\n');
    }
    input
}

#[test]
fn test_read_plain() {
    let pssm = Pssm::read_plain(plain_pssm().as_bytes()).unwrap();
    assert_eq!(pssm.name(), "example");
    assert_eq!(pssm.position_count(), 3);

    // J is the last NCBIstdaa symbol and thus the first header column
    assert_eq!(pssm.score(0, b'J'), Some(-5));
    assert_eq!(pssm.score(2, b'-'), Some(200 + 27 - 5));
    assert_eq!(pssm.score(1, b'a'), pssm.score(1, b'A'));
    assert_eq!(pssm.score(3, b'A'), None);
}

#[test]
fn test_plain_round_trip() {
    let pssm = Pssm::read_plain(plain_pssm().as_bytes()).unwrap();
    let mut output = Vec::new();
    pssm.write_plain(&mut output).unwrap();
    assert_eq!(Pssm::read_plain(output.as_slice()).unwrap(), pssm);
}

#[test]
fn test_read_plain_rejects_bad_positions() {
    let input = plain_pssm().replace("\n1 |", "\n7 |");
    assert!(matches!(
        Pssm::read_plain(input.as_bytes()),
        Err(Error::Parser { .. })
    ));
}

#[test]
fn test_read_plain_rejects_duplicate_header() {
    // J is replaced by a second A, so A is the first symbol that is not listed exactly once
    let input = plain_pssm().replacen(" J", " A", 1);
    assert!(matches!(
        Pssm::read_plain(input.as_bytes()),
        Err(Error::PssmHeader('A'))
    ));
}

#[test]
fn test_wrong_column_count() {
    assert!(matches!(
        Pssm::new("", Array2::zeros((2, 20))),
        Err(Error::PssmColumnCount {
            expected: 28,
            actual: 20
        })
    ));
}

#[test]
fn test_master_blosum_builder() {
    let master = Arc::new(Sequence::new("master", "WAK"));
    let alignment =
        BlockMultipleAlignment::from_aligned_ranges(vec![master], [vec![(0..3).into()]]).unwrap();
    let pssm = MasterBlosumPssmBuilder.build_pssm(&alignment).unwrap();

    assert_eq!(pssm.position_count(), 3);
    assert_eq!(pssm.score(0, b'W'), Some(11));
    assert_eq!(pssm.score(1, b'A'), Some(4));
    assert_eq!(pssm.score(2, b'R'), Some(2));
    assert_eq!(pssm.score(1, b'W'), Some(-3));
}
