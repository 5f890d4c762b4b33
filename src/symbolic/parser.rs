//! Translation of single program lines.

use edit_distance::edit_distance;
use logos::Logos;

use super::ast::{Mnemonic, Statement};
use super::token::Token;
use crate::error::LineError;
use crate::machine::Word;

/// Characters that turn a line into a comment when they start it.
const COMMENT_CHARACTERS: &str = "#/";

/// True if the line carries no statement: it is blank or its first non-blank character starts a
/// comment.
pub fn is_ignored(line: &str) -> bool {
    match line.trim_start().chars().next() {
        None => true,
        Some(c) => COMMENT_CHARACTERS.contains(c),
    }
}

/// Finds the mnemonic that is spelled closest to `input`, if it is a single edit away.
fn suggest_mnemonic(input: &str) -> Option<Mnemonic> {
    let input = input.to_uppercase();

    Mnemonic::ALL
        .iter()
        .copied()
        .map(|m| (edit_distance(&input, m.as_str()), m))
        .filter(|(distance, _)| *distance <= 1)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, m)| m)
}

/// Parses a single line of a program.
///
/// # Returns
/// `None` for blank lines and comments. Text following the operand is ignored, as is everything
/// after `HLT`, `INP` and `OUT`.
///
/// # Errors
/// [LineError::UnrecognizedMnemonic] if the first token is not a mnemonic,
/// [LineError::MissingOperand] if a mnemonic other than `DAT` lacks its operand and
/// [LineError::MalformedOperand] if the operand is not a decimal number.
pub fn parse_line(line: &str) -> Result<Option<Statement>, LineError> {
    if is_ignored(line) {
        return Ok(None);
    }

    let mut lexer = Token::lexer(line);

    let mnemonic = match lexer.next() {
        Some(Token::Mnemonic(mnemonic)) => mnemonic,
        Some(_) => {
            let text = lexer.slice();

            return Err(LineError::UnrecognizedMnemonic {
                mnemonic: text.to_string(),
                suggestion: suggest_mnemonic(text),
            });
        }
        None => return Ok(None),
    };

    if let Mnemonic::Real(opcode) = mnemonic {
        if !opcode.has_address() {
            return Ok(Some(Statement { mnemonic, operand: None }));
        }
    }

    let operand = match lexer.next() {
        Some(Token::Literal(value)) => Some(value),
        Some(_) => {
            return Err(LineError::MalformedOperand {
                operand: lexer.slice().to_string(),
            });
        }
        None if mnemonic.requires_operand() => {
            return Err(LineError::MissingOperand { mnemonic });
        }
        None => None,
    };

    Ok(Some(Statement { mnemonic, operand }))
}

/// Parses a single line of a program and translates it into a word.
///
/// # Returns
/// `None` for blank lines and comments.
pub fn assemble_line(line: &str) -> Result<Option<Word>, LineError> {
    match parse_line(line)? {
        Some(statement) => statement.word().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::OpCode;

    #[test]
    fn test_fixed_words_ignore_trailing_text() {
        assert_eq!(assemble_line("HLT"), Ok(Some(0)));
        assert_eq!(assemble_line("HLT 45"), Ok(Some(0)));
        assert_eq!(assemble_line("INP whatever follows"), Ok(Some(901)));
        assert_eq!(assemble_line("OUT 7 ?!"), Ok(Some(902)));
    }

    #[test]
    fn test_addressed_words() {
        let cases: [(&str, Word); 7] = [
            ("ADD", 100),
            ("SUB", 200),
            ("STA", 300),
            ("LDA", 500),
            ("BRA", 600),
            ("BRZ", 700),
            ("BRP", 800),
        ];

        for (mnemonic, base) in cases.iter() {
            for operand in &[0, 1, 42, 99, 199] {
                let operand: Word = *operand;
                let line = format!("{} {}", mnemonic, operand);
                let expected = *base + operand;

                if expected <= 999 {
                    assert_eq!(assemble_line(&line), Ok(Some(expected)), "{}", line);
                } else {
                    assert_eq!(
                        assemble_line(&line),
                        Err(LineError::OperandOutOfRange { word: expected }),
                        "{}", line,
                    );
                }
            }
        }
    }

    #[test]
    fn test_operand_range() {
        assert_eq!(
            assemble_line("ADD 999"),
            Err(LineError::OperandOutOfRange { word: 1099 }),
        );
        assert_eq!(
            assemble_line("LDA -501"),
            Err(LineError::OperandOutOfRange { word: -1 }),
        );
        assert_eq!(assemble_line("LDA -500"), Ok(Some(0)));
        assert_eq!(assemble_line("DAT +12"), Ok(Some(12)));
    }

    #[test]
    fn test_overlong_operand_is_out_of_range() {
        assert_eq!(
            assemble_line("ADD 99999999999999999999"),
            Err(LineError::OperandOutOfRange { word: Word::MAX }),
        );
        assert_eq!(
            assemble_line("DAT -99999999999999999999"),
            Err(LineError::OperandOutOfRange { word: Word::MIN }),
        );
    }

    #[test]
    fn test_data() {
        assert_eq!(assemble_line("DAT"), Ok(Some(0)));
        assert_eq!(assemble_line("DAT 5"), Ok(Some(5)));
        assert_eq!(assemble_line("dat 999 the answer"), Ok(Some(999)));
        assert_eq!(
            assemble_line("DAT 1000"),
            Err(LineError::OperandOutOfRange { word: 1000 }),
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \t"), Ok(None));
        assert_eq!(parse_line("# LDA 5"), Ok(None));
        assert_eq!(parse_line("// a comment"), Ok(None));
        assert_eq!(parse_line("   / indented comment"), Ok(None));
    }

    #[test]
    fn test_unrecognized_mnemonic() {
        assert_eq!(
            parse_line("FOO 1"),
            Err(LineError::UnrecognizedMnemonic {
                mnemonic: "FOO".to_string(),
                suggestion: None,
            }),
        );

        assert_eq!(
            parse_line("LDX 5"),
            Err(LineError::UnrecognizedMnemonic {
                mnemonic: "LDX".to_string(),
                suggestion: Some(Mnemonic::Real(OpCode::Load)),
            }),
        );

        assert!(matches!(
            parse_line("12 HLT"),
            Err(LineError::UnrecognizedMnemonic { .. })
        ));
    }

    #[test]
    fn test_operand_errors() {
        assert_eq!(
            parse_line("STA"),
            Err(LineError::MissingOperand { mnemonic: Mnemonic::Real(OpCode::Store) }),
        );
        assert_eq!(
            parse_line("BRA loop"),
            Err(LineError::MalformedOperand { operand: "loop".to_string() }),
        );
    }

    #[test]
    fn test_operand_followed_by_text() {
        assert_eq!(
            parse_line("brp 12 back to the start"),
            Ok(Some(Statement {
                mnemonic: Mnemonic::Real(OpCode::BranchPositive),
                operand: Some(12),
            })),
        );
    }
}
