use std::io::{Read, Write};

use itertools::Itertools;
use ndarray::Array2;
use nom::{
    IResult,
    bytes::complete::tag,
    character::complete::satisfy,
    combinator::opt,
    multi::{count, many0},
    sequence::preceded,
};

use super::Pssm;
use crate::{
    error::{Error, Result},
    io::{
        parse_title, parse_whitespace, skip_any_whitespace, skip_whitespace, translate_nom_error,
    },
    residue::{NCBISTDAA_CHARACTERS, NCBISTDAA_SIZE},
};

impl Pssm {
    /// Reads a PSSM in plain text format.
    ///
    /// The format is an optional `# name` line, a header row `| - A B ...` naming the 28 NCBIstdaa residues in any order,
    /// and then one row `position | score score ...` per master position, starting at zero.
    pub fn read_plain(mut reader: impl Read) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;

        let (_, (name, header, rows)) = parse_plain(&input).map_err(translate_nom_error)?;

        let mut column_of_code = [0; NCBISTDAA_SIZE];
        for (code, residue) in NCBISTDAA_CHARACTERS.iter().enumerate() {
            let mut columns = header
                .iter()
                .positions(|character| *character == char::from(*residue));
            match (columns.next(), columns.next()) {
                (Some(column), None) => column_of_code[code] = column,
                _ => return Err(Error::PssmHeader(char::from(*residue))),
            }
        }

        let mut scores = Array2::zeros((rows.len(), NCBISTDAA_SIZE));
        for (position, row) in rows.iter().enumerate() {
            for (code, column) in column_of_code.iter().enumerate() {
                scores[(position, code)] = row[*column];
            }
        }

        Pssm::new(name.unwrap_or_default(), scores)
    }

    pub fn write_plain(&self, mut writer: impl Write) -> Result<()> {
        if !self.name.is_empty() {
            writeln!(writer, "# {}", self.name)?;
        }

        write!(writer, "    |")?;
        for residue in NCBISTDAA_CHARACTERS {
            write!(writer, " {:>3}", char::from(residue))?;
        }
        writeln!(writer)?;

        for (position, row) in self.scores.rows().into_iter().enumerate() {
            write!(writer, "{position:>3} |")?;
            for score in row {
                write!(writer, " {score:>3}")?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

type PlainPssm = (Option<String>, Vec<char>, Vec<Vec<i32>>);

fn parse_plain(input: &str) -> IResult<&str, PlainPssm> {
    let (input, name) = opt(parse_title)(input)?;
    let (input, header) = parse_header(input)?;
    let (input, rows) = many0(parse_row)(input)?;

    for (expected, (position, _)) in rows.iter().enumerate() {
        if *position != expected {
            return Err(nom::Err::Failure(nom::error::Error {
                input,
                code: nom::error::ErrorKind::Verify,
            }));
        }
    }

    let input = skip_any_whitespace(input)?;
    if !input.is_empty() {
        return Err(nom::Err::Failure(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Eof,
        }));
    }

    Ok((
        input,
        (
            name.map(str::to_string),
            header,
            rows.into_iter().map(|(_, row)| row).collect(),
        ),
    ))
}

fn parse_header(input: &str) -> IResult<&str, Vec<char>> {
    let input = skip_any_whitespace(input)?;
    let input = tag("|")(input)?.0;
    count(
        preceded(parse_whitespace, satisfy(|c| !c.is_whitespace())),
        NCBISTDAA_SIZE,
    )(input)
}

fn parse_row(input: &str) -> IResult<&str, (usize, Vec<i32>)> {
    let input = skip_any_whitespace(input)?;
    let (input, position) = nom::character::complete::u64(input)?;
    let input = skip_whitespace(input)?;
    let input = tag("|")(input)?.0;
    let (input, scores) = count(
        preceded(parse_whitespace, nom::character::complete::i32),
        NCBISTDAA_SIZE,
    )(input)?;
    Ok((input, (position as usize, scores)))
}
