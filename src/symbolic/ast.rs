use std::fmt;
use std::str::FromStr;

use crate::error::LineError;
use crate::instruction::OpCode;
use crate::machine::{Word, MAX_WORD};

/// The first token of a program line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mnemonic {
    /// A mnemonic that has a bytecode representation.
    Real(OpCode),

    /// `DAT`, which stores its operand as is.
    Data,
}

impl Mnemonic {
    /// Every mnemonic known to the assembler.
    pub const ALL: [Mnemonic; 11] = [
        Mnemonic::Real(OpCode::Halt),
        Mnemonic::Real(OpCode::Input),
        Mnemonic::Real(OpCode::Output),
        Mnemonic::Real(OpCode::Add),
        Mnemonic::Real(OpCode::Subtract),
        Mnemonic::Real(OpCode::Store),
        Mnemonic::Real(OpCode::Load),
        Mnemonic::Real(OpCode::Branch),
        Mnemonic::Real(OpCode::BranchZero),
        Mnemonic::Real(OpCode::BranchPositive),
        Mnemonic::Data,
    ];

    /// The mnemonic as it is written in the source, in upper case.
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Real(opcode) => opcode.mnemonic(),
            Mnemonic::Data => "DAT",
        }
    }

    /// True if a line with this mnemonic must have an operand.
    pub fn requires_operand(self) -> bool {
        match self {
            Mnemonic::Real(opcode) => opcode.has_address(),
            Mnemonic::Data => false,
        }
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    fn from_str(input: &str) -> Result<Mnemonic, ()> {
        Mnemonic::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(input))
            .ok_or(())
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single parsed program line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub mnemonic: Mnemonic,

    /// The signed operand, if the line had one. Always `None` for `HLT`, `INP` and `OUT`.
    pub operand: Option<Word>,
}

impl Statement {
    /// Translates the statement into a memory word.
    ///
    /// Addressed mnemonics add the operand to their base value, `DAT` stores the operand itself
    /// (`0` if omitted) and `HLT`, `INP` and `OUT` produce their fixed word.
    ///
    /// # Errors
    /// [LineError::MissingOperand] if an addressed mnemonic has no operand and
    /// [LineError::OperandOutOfRange] if the resulting word is outside `0..=999`.
    pub fn word(&self) -> Result<Word, LineError> {
        let word = match self.mnemonic {
            Mnemonic::Data => self.operand.unwrap_or(0),
            Mnemonic::Real(opcode) if !opcode.has_address() => return Ok(opcode.base()),
            Mnemonic::Real(opcode) => {
                let operand = self.operand.ok_or(LineError::MissingOperand {
                    mnemonic: self.mnemonic,
                })?;

                opcode.base().saturating_add(operand)
            }
        };

        if word < 0 || word > MAX_WORD {
            return Err(LineError::OperandOutOfRange { word });
        }

        Ok(word)
    }
}

#[test]
fn test_mnemonic_from_str() {
    assert_eq!("BRZ".parse(), Ok(Mnemonic::Real(OpCode::BranchZero)));
    assert_eq!("dat".parse(), Ok(Mnemonic::Data));
    assert_eq!("Sta".parse(), Ok(Mnemonic::Real(OpCode::Store)));
    assert_eq!("STORE".parse::<Mnemonic>(), Err(()));
}

#[test]
fn test_statement_word() {
    let stmt = |mnemonic, operand| Statement { mnemonic, operand };

    assert_eq!(stmt(Mnemonic::Real(OpCode::Load), Some(99)).word(), Ok(599));
    assert_eq!(stmt(Mnemonic::Real(OpCode::Add), Some(-1)).word(), Ok(99));
    assert_eq!(stmt(Mnemonic::Data, None).word(), Ok(0));
    assert_eq!(stmt(Mnemonic::Data, Some(999)).word(), Ok(999));
    assert_eq!(stmt(Mnemonic::Real(OpCode::Output), None).word(), Ok(902));

    assert_eq!(
        stmt(Mnemonic::Real(OpCode::Branch), None).word(),
        Err(LineError::MissingOperand { mnemonic: Mnemonic::Real(OpCode::Branch) }),
    );
    assert_eq!(
        stmt(Mnemonic::Real(OpCode::BranchPositive), Some(200)).word(),
        Err(LineError::OperandOutOfRange { word: 1000 }),
    );
    assert_eq!(
        stmt(Mnemonic::Data, Some(-3)).word(),
        Err(LineError::OperandOutOfRange { word: -3 }),
    );
}
