use super::{
    NCBISTDAA_CHARACTERS, blosum62_score, ncbistdaa_code, screen_residue, standard_frequency,
};

#[test]
fn test_blosum62_is_symmetric() {
    let alphabet = b"ARNDCQEGHILKMFPSTWYVBZX*";
    for &a in alphabet {
        for &b in alphabet {
            assert_eq!(blosum62_score(a, b), blosum62_score(b, a));
        }
    }
}

#[test]
fn test_blosum62_known_values() {
    assert_eq!(blosum62_score(b'A', b'A'), 4);
    assert_eq!(blosum62_score(b'w', b'W'), 11);
    assert_eq!(blosum62_score(b'X', b'X'), -1);
    assert_eq!(blosum62_score(b'L', b'I'), 2);
    // Unknown characters score like X.
    assert_eq!(blosum62_score(b'U', b'A'), blosum62_score(b'X', b'A'));
}

#[test]
fn test_screening() {
    assert_eq!(screen_residue(b'a'), b'A');
    assert_eq!(screen_residue(b'B'), b'B');
    assert_eq!(screen_residue(b'U'), b'X');
    assert_eq!(screen_residue(b'-'), b'X');
}

#[test]
fn test_ncbistdaa_codes() {
    for (code, &character) in NCBISTDAA_CHARACTERS.iter().enumerate() {
        assert_eq!(ncbistdaa_code(character), code);
    }
    assert_eq!(ncbistdaa_code(b'k'), 10);
    assert_eq!(ncbistdaa_code(b'#'), 21);
}

#[test]
fn test_background_frequencies_sum_to_one() {
    let total: f64 = b"ARNDCQEGHILKMFPSTWYV"
        .iter()
        .map(|&residue| standard_frequency(residue))
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(standard_frequency(b'X'), 0.0);
}

#[test]
fn test_robinson_background_frequencies() {
    assert_eq!(standard_frequency(b'L'), 0.09019);
    assert_eq!(standard_frequency(b'r'), 0.05129);
    assert_eq!(standard_frequency(b'C'), 0.01925);
    assert_eq!(standard_frequency(b'W'), 0.01330);
    assert_eq!(standard_frequency(b'B'), 0.0);
}
