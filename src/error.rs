//! Errors returned while loading and while executing programs.

use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

use crate::machine::{Word, MAX_WORD};
use crate::symbolic::Mnemonic;

/// Reason a single source line could not be translated into a word.
///
/// Does not know where the line came from. The [Loader](crate::loader::Loader) attaches the line
/// number with [LineError::at].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineError {
    /// The first token of the line is not a mnemonic.
    UnrecognizedMnemonic {
        /// The offending token.
        mnemonic: String,
        /// A mnemonic that is spelled almost the same, if any.
        suggestion: Option<Mnemonic>,
    },

    /// The mnemonic requires an operand, but the line ends after it.
    MissingOperand {
        mnemonic: Mnemonic,
    },

    /// The operand is not a decimal integer.
    MalformedOperand {
        operand: String,
    },

    /// The operand added to the base of the mnemonic falls outside `0..=999`.
    OperandOutOfRange {
        /// The word the line would have produced.
        word: Word,
    },
}

impl LineError {
    /// Converts the error into a [LoadError] located at the 1-based source line `line`.
    pub fn at(self, line: usize) -> LoadError {
        match self {
            LineError::UnrecognizedMnemonic { mnemonic, suggestion } =>
                LoadError::UnrecognizedMnemonic { line, mnemonic, suggestion },
            LineError::MissingOperand { mnemonic } =>
                LoadError::MissingOperand { line, mnemonic },
            LineError::MalformedOperand { operand } =>
                LoadError::MalformedOperand { line, operand },
            LineError::OperandOutOfRange { word } =>
                LoadError::OperandOutOfRange { line, word },
        }
    }
}

fn fmt_out_of_range(f: &mut fmt::Formatter, word: Word) -> fmt::Result {
    if word > MAX_WORD {
        write!(f, "overflow error: word {} is larger than {}", word, MAX_WORD)
    } else {
        write!(f, "underflow error: word {} is negative", word)
    }
}

impl Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LineError::UnrecognizedMnemonic { mnemonic, suggestion: None } =>
                write!(f, "invalid instruction '{}'", mnemonic),
            LineError::UnrecognizedMnemonic { mnemonic, suggestion: Some(suggestion) } =>
                write!(f, "invalid instruction '{}', did you mean '{}'?", mnemonic, suggestion),
            LineError::MissingOperand { mnemonic } =>
                write!(f, "value expected after {} but not found", mnemonic),
            LineError::MalformedOperand { operand } =>
                write!(f, "'{}' is not a decimal number", operand),
            LineError::OperandOutOfRange { word } => fmt_out_of_range(f, *word),
        }
    }
}

/// Fatal error that aborts the loading of a program.
///
/// Memory cells written before the failing line keep their new values.
#[derive(Debug)]
pub enum LoadError {
    UnrecognizedMnemonic {
        line: usize,
        mnemonic: String,
        suggestion: Option<Mnemonic>,
    },
    MissingOperand {
        line: usize,
        mnemonic: Mnemonic,
    },
    MalformedOperand {
        line: usize,
        operand: String,
    },
    OperandOutOfRange {
        line: usize,
        word: Word,
    },

    /// The program has more statements than the memory has cells.
    MemoryCapacityExceeded {
        line: usize,
    },

    /// The program file could not be read.
    SourceUnreadable {
        path: PathBuf,
        source: io::Error,
    },
}

impl LoadError {
    /// The 1-based source line of the error, if the error is tied to a line.
    pub fn line(&self) -> Option<usize> {
        match *self {
            LoadError::UnrecognizedMnemonic { line, .. }
            | LoadError::MissingOperand { line, .. }
            | LoadError::MalformedOperand { line, .. }
            | LoadError::OperandOutOfRange { line, .. }
            | LoadError::MemoryCapacityExceeded { line } => Some(line),
            LoadError::SourceUnreadable { .. } => None,
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(line) = self.line() {
            write!(f, "at line {}: ", line)?;
        }

        match self {
            LoadError::UnrecognizedMnemonic { mnemonic, suggestion, .. } =>
                LineError::UnrecognizedMnemonic {
                    mnemonic: mnemonic.clone(),
                    suggestion: *suggestion,
                }.fmt(f),
            LoadError::MissingOperand { mnemonic, .. } =>
                LineError::MissingOperand { mnemonic: *mnemonic }.fmt(f),
            LoadError::MalformedOperand { operand, .. } =>
                write!(f, "'{}' is not a decimal number", operand),
            LoadError::OperandOutOfRange { word, .. } => fmt_out_of_range(f, *word),
            LoadError::MemoryCapacityExceeded { .. } =>
                write!(f, "memory out of bounds, the program does not fit in memory"),
            LoadError::SourceUnreadable { path, source } =>
                write!(f, "file {} failed to load: {}", path.display(), source),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::SourceUnreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fatal error that stops the execution of a program.
///
/// `pc` is always the address of the instruction that failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// The word at the program counter is not an instruction.
    UnidentifiedInstruction {
        pc: usize,
        word: Word,
    },

    /// `ADD` or `SUB` produced a value above 999 under the strict overflow policy.
    AccumulatorOverflow {
        pc: usize,
        value: Word,
    },

    /// `ADD` or `SUB` produced a negative value under the strict overflow policy.
    AccumulatorUnderflow {
        pc: usize,
        value: Word,
    },

    /// The instruction in the last memory cell did not jump or halt, and the emulator is
    /// configured to treat that as an error.
    RanOffEnd {
        pc: usize,
    },

    /// An `INP` instruction was executed after the input ran out.
    InputExhausted {
        pc: usize,
    },

    /// The program counter or an address points outside the memory.
    AddressOutOfRange {
        pc: usize,
        address: usize,
    },
}

impl RuntimeError {
    /// Address of the instruction that caused the error.
    pub fn pc(&self) -> usize {
        match *self {
            RuntimeError::UnidentifiedInstruction { pc, .. }
            | RuntimeError::AccumulatorOverflow { pc, .. }
            | RuntimeError::AccumulatorUnderflow { pc, .. }
            | RuntimeError::RanOffEnd { pc }
            | RuntimeError::InputExhausted { pc }
            | RuntimeError::AddressOutOfRange { pc, .. } => pc,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::UnidentifiedInstruction { pc, word } =>
                write!(f, "unidentified instruction {} at address {}", word, pc),
            RuntimeError::AccumulatorOverflow { pc, value } =>
                write!(f, "accumulator overflow ({}) at address {}", value, pc),
            RuntimeError::AccumulatorUnderflow { pc, value } =>
                write!(f, "accumulator underflow ({}) at address {}", value, pc),
            RuntimeError::RanOffEnd { pc } =>
                write!(f, "execution ran past the end of memory at address {}", pc),
            RuntimeError::InputExhausted { pc } =>
                write!(f, "no input left for the instruction at address {}", pc),
            RuntimeError::AddressOutOfRange { pc, address } =>
                write!(f, "address {} is outside memory at address {}", address, pc),
        }
    }
}

impl std::error::Error for RuntimeError {}

#[test]
fn test_line_error_at() {
    let err = LineError::OperandOutOfRange { word: 1099 }.at(7);

    assert_eq!(err.line(), Some(7));
    assert_eq!(err.to_string(), "at line 7: overflow error: word 1099 is larger than 999");

    let err = LineError::OperandOutOfRange { word: -1 }.at(2);
    assert_eq!(err.to_string(), "at line 2: underflow error: word -1 is negative");
}

#[test]
fn test_runtime_error_pc() {
    let err = RuntimeError::UnidentifiedInstruction { pc: 12, word: 405 };

    assert_eq!(err.pc(), 12);
    assert_eq!(err.to_string(), "unidentified instruction 405 at address 12");
}
