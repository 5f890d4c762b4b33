//! Tokens and a tokenizer for program lines.

use logos::{Lexer, Logos};

use std::fmt;

use super::ast::Mnemonic;
use crate::machine::Word;

/// Enumeration of all tokens that can appear on a program line.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// Errorneous token that could not be interpreted as any of the other variants.
    #[error]
    #[regex(r"[ \t\r\f\n]+", logos::skip)]
    Error,

    /// One of the eleven mnemonics, in any letter case.
    #[regex("(?i)hlt|inp|out|add|sub|sta|lda|bra|brz|brp|dat", |lex| lex.slice().parse())]
    Mnemonic(Mnemonic),

    /// A signed decimal number literal.
    #[regex("[+-]?[0-9]+", literal_callback)]
    Literal(Word),

    /// Any other word. Not valid in any position, but lexed as a whole so that error messages
    /// can quote it.
    #[regex("[A-Za-z_][A-Za-z0-9_]*", Lexer::slice)]
    Symbol(&'a str),
}

/// Literals too large for a [Word] saturate, so that they are reported as out of range rather
/// than as malformed.
fn literal_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> Word {
    let text = lex.slice();

    // Only digits and a sign get here, so parsing can fail only on overflow.
    text.parse().unwrap_or(if text.starts_with('-') { Word::MIN } else { Word::MAX })
}

impl<'t> fmt::Display for Token<'t> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Error => write!(f, "<error>"),
            Token::Mnemonic(mnemonic) => write!(f, "{}", mnemonic),
            Token::Literal(num) => write!(f, "{}", num),
            Token::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

#[test]
fn test_tokenize_line() {
    let tokens: Vec<_> = Token::lexer("  lda  -42 foo").collect();

    assert_eq!(tokens, vec![
        Token::Mnemonic("LDA".parse().unwrap()),
        Token::Literal(-42),
        Token::Symbol("foo"),
    ]);
}

#[test]
fn test_tokenize_prefers_longer_symbol() {
    let tokens: Vec<_> = Token::lexer("ADDX HLT").collect();

    assert_eq!(tokens, vec![
        Token::Symbol("ADDX"),
        Token::Mnemonic("HLT".parse().unwrap()),
    ]);
}

#[test]
fn test_tokenize_overlong_literal_saturates() {
    let tokens: Vec<_> = Token::lexer("99999999999999999999999 -99999999999999999999999").collect();

    assert_eq!(tokens, vec![
        Token::Literal(Word::MAX),
        Token::Literal(Word::MIN),
    ]);
}
