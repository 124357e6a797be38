//! nom helpers of the plain-text PSSM format.

use nom::{
    IResult,
    bytes::complete::take_till1,
    character::complete::{char, satisfy},
    multi::many0,
};

use crate::error::Error;

type SkipResult<'input> =
    std::result::Result<&'input str, nom::Err<nom::error::Error<&'input str>>>;

/// Parses a `# title` line and returns the trimmed title.
pub fn parse_title(input: &str) -> IResult<&str, &str> {
    let input = skip_any_whitespace(input)?;
    let input = char('#')(input)?.0;
    let input = skip_whitespace(input)?;
    let (input, title) = take_till1(is_line_break)(input)?;
    Ok((input, title.trim()))
}

pub fn parse_whitespace(input: &str) -> IResult<&str, ()> {
    skip_whitespace(input).map(|input| (input, ()))
}

/// Skips whitespace within the current line.
pub fn skip_whitespace(input: &str) -> SkipResult<'_> {
    many0(satisfy(|c: char| c.is_whitespace() && !is_line_break(c)))(input)
        .map(|(input, _)| input)
}

/// Skips whitespace and line breaks.
pub fn skip_any_whitespace(input: &str) -> SkipResult<'_> {
    many0(satisfy(|c: char| c.is_whitespace()))(input).map(|(input, _)| input)
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub fn translate_nom_error(error: nom::Err<nom::error::Error<&str>>) -> Error {
    match error {
        nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
        nom::Err::Error(error) | nom::Err::Failure(error) => Error::Parser {
            input: error.input.to_string(),
            kind: error.code,
        },
    }
}
