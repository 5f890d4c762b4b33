//! Parsing and translating symbolic assembly programs.
//!
//! A program is a list of lines of the form `MNEMONIC [OPERAND]`. Each line that is not blank
//! or a comment translates into exactly one word of memory.

pub mod ast;
pub mod parser;
pub mod token;

pub use self::ast::{Mnemonic, Statement};
pub use self::parser::{assemble_line, parse_line};
