//! Parsers for integer values typed at the console or passed as scripted input.

use std::fmt;

use nom::{
    IResult,
    bytes::complete::{take_while, take_while1},
    character::complete::{digit1, one_of},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list,
    sequence::{delimited, pair},
};

use crate::machine::Word;

/// The input could not be read as a list of integers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueListError {
    /// Character offset of the first character that could not be parsed.
    pub offset: usize,
}

impl fmt::Display for ValueListError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected an integer at position {}", self.offset)
    }
}

impl std::error::Error for ValueListError {}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// Takes an optionally signed decimal number.
pub fn take_word(input: &str) -> IResult<&str, Word> {
    map_res(
        recognize(pair(opt(one_of("+-")), digit1)),
        |n: &str| n.parse::<Word>(),
    )(input)
}

fn value_list(input: &str) -> IResult<&str, Vec<Word>> {
    all_consuming(delimited(
        take_while(is_separator),
        separated_list(take_while1(is_separator), take_word),
        take_while(is_separator),
    ))(input)
}

fn offset_of(input: &str, err: nom::Err<(&str, nom::error::ErrorKind)>) -> ValueListError {
    let offset = match err {
        nom::Err::Error((rest, _)) | nom::Err::Failure((rest, _)) => input.len() - rest.len(),
        nom::Err::Incomplete(_) => input.len(),
    };

    ValueListError { offset }
}

/// Parses a list of integers separated by commas and/or whitespace, such as `"1, 2 -3"`.
pub fn parse_value_list(input: &str) -> Result<Vec<Word>, ValueListError> {
    value_list(input)
        .map(|(_, values)| values)
        .map_err(|err| offset_of(input, err))
}

/// Parses a single integer surrounded by optional whitespace, such as a line read from the
/// console.
pub fn parse_value(input: &str) -> Result<Word, ValueListError> {
    let result = all_consuming(delimited(
        take_while(char::is_whitespace),
        take_word,
        take_while(char::is_whitespace),
    ))(input);

    result
        .map(|(_, value)| value)
        .map_err(|err| offset_of(input, err))
}

#[test]
fn test_parse_value() {
    assert_eq!(parse_value("42\n"), Ok(42));
    assert_eq!(parse_value("  -7 "), Ok(-7));
    assert_eq!(parse_value("+999"), Ok(999));
    assert!(parse_value("").is_err());
    assert!(parse_value("4 2").is_err());
    assert!(parse_value("forty").is_err());
}

#[test]
fn test_parse_value_list() {
    assert_eq!(parse_value_list("1,2,3"), Ok(vec![1, 2, 3]));
    assert_eq!(parse_value_list(" 10, -20  30 ,"), Ok(vec![10, -20, 30]));
    assert_eq!(parse_value_list(""), Ok(vec![]));
    assert_eq!(parse_value_list("1, x"), Err(ValueListError { offset: 3 }));
}
