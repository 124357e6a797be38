//! Amino acid alphabets, substitution scores and background frequencies.

#[cfg(test)]
mod tests;

/// Size of the NCBIstdaa alphabet used by PSSM tables.
pub const NCBISTDAA_SIZE: usize = 28;

/// NCBIstdaa characters, indexed by their code.
pub const NCBISTDAA_CHARACTERS: [u8; NCBISTDAA_SIZE] = *b"-ABCDEFGHIKLMNPQRSTVWXYZU*OJ";

const NCBISTDAA_X: usize = 21;

/// Order of the rows and columns of [`BLOSUM62`].
const BLOSUM62_ORDER: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

#[rustfmt::skip]
const BLOSUM62: [[i8; 24]; 24] = [
    //A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4], // A
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4], // R
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4], // N
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4], // D
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4], // C
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4], // Q
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4], // E
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4], // G
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4], // H
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4], // I
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4], // L
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4], // K
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4], // M
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4], // F
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4], // P
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4], // S
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4], // T
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4], // W
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4], // Y
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4], // V
    [-2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4], // B
    [-1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4], // Z
    [ 0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4], // X
    [-4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1], // *
];

/// Order of [`STANDARD_FREQUENCIES`].
const STANDARD_ORDER: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

/// Robinson & Robinson background frequencies of the 20 standard amino acids.
const STANDARD_FREQUENCIES: [f64; 20] = [
    0.07805, // A
    0.05129, // R
    0.04487, // N
    0.05364, // D
    0.01925, // C
    0.04264, // Q
    0.06295, // E
    0.07377, // G
    0.02199, // H
    0.05142, // I
    0.09019, // L
    0.05744, // K
    0.02243, // M
    0.03856, // F
    0.05203, // P
    0.07120, // S
    0.05841, // T
    0.01330, // W
    0.03216, // Y
    0.06441, // V
];

/// Normalises a residue character for profile building.
///
/// The 20 standard amino acids and the ambiguity codes `B` and `Z` are kept (upper case),
/// everything else becomes `X`.
pub fn screen_residue(residue: u8) -> u8 {
    let residue = residue.to_ascii_uppercase();
    if BLOSUM62_ORDER[..22].contains(&residue) {
        residue
    } else {
        b'X'
    }
}

/// The NCBIstdaa code of a residue character.
///
/// Unknown characters map to the code of `X`.
pub fn ncbistdaa_code(residue: u8) -> usize {
    let residue = residue.to_ascii_uppercase();
    NCBISTDAA_CHARACTERS
        .iter()
        .position(|&character| character == residue)
        .unwrap_or(NCBISTDAA_X)
}

/// The BLOSUM62 score of two residue characters.
///
/// Characters outside of the matrix alphabet score like `X`.
pub fn blosum62_score(a: u8, b: u8) -> i32 {
    BLOSUM62[blosum62_index(a)][blosum62_index(b)].into()
}

fn blosum62_index(residue: u8) -> usize {
    let residue = residue.to_ascii_uppercase();
    BLOSUM62_ORDER
        .iter()
        .position(|&character| character == residue)
        .unwrap_or(22)
}

/// The background frequency of a residue character.
///
/// Zero for anything but the 20 standard amino acids.
pub fn standard_frequency(residue: u8) -> f64 {
    let residue = residue.to_ascii_uppercase();
    STANDARD_ORDER
        .iter()
        .position(|&character| character == residue)
        .map(|index| STANDARD_FREQUENCIES[index])
        .unwrap_or(0.0)
}
