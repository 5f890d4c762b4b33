//! Types for representing instructions and their encoding as words.

use std::convert::TryFrom;
use std::fmt;

use crate::machine::{Word, MAX_WORD};

/// Instructions of the Little Man Computer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpCode {
    /// Stops the execution. Encoded as the word `0`.
    Halt,

    /// Reads a value from the input into the accumulator. Encoded as the word `901`.
    Input,

    /// Writes the value of the accumulator to the output. Encoded as the word `902`.
    Output,

    /// Adds the value of a memory cell to the accumulator.
    Add,

    /// Subtracts the value of a memory cell from the accumulator.
    Subtract,

    /// Copies the accumulator into a memory cell.
    Store,

    /// Copies a memory cell into the accumulator.
    Load,

    /// Jumps to an address.
    Branch,

    /// Jumps to an address if the accumulator is zero.
    BranchZero,

    /// Jumps to an address if the accumulator is zero or positive.
    BranchPositive,
}

impl OpCode {
    /// Every opcode, in encoding order.
    pub const ALL: [OpCode; 10] = [
        OpCode::Halt,
        OpCode::Add,
        OpCode::Subtract,
        OpCode::Store,
        OpCode::Load,
        OpCode::Branch,
        OpCode::BranchZero,
        OpCode::BranchPositive,
        OpCode::Input,
        OpCode::Output,
    ];

    /// The value the address part is added to when encoding an instruction.
    /// For opcodes without an address this is the whole word.
    pub fn base(self) -> Word {
        match self {
            OpCode::Halt => 0,
            OpCode::Add => 100,
            OpCode::Subtract => 200,
            OpCode::Store => 300,
            OpCode::Load => 500,
            OpCode::Branch => 600,
            OpCode::BranchZero => 700,
            OpCode::BranchPositive => 800,
            OpCode::Input => 901,
            OpCode::Output => 902,
        }
    }

    /// True if the instruction uses the address part of the word.
    pub fn has_address(self) -> bool {
        !matches!(self, OpCode::Halt | OpCode::Input | OpCode::Output)
    }

    /// Maps the hundreds digit of a word to an addressed opcode.
    fn from_digit(digit: Word) -> Option<OpCode> {
        match digit {
            1 => Some(OpCode::Add),
            2 => Some(OpCode::Subtract),
            3 => Some(OpCode::Store),
            5 => Some(OpCode::Load),
            6 => Some(OpCode::Branch),
            7 => Some(OpCode::BranchZero),
            8 => Some(OpCode::BranchPositive),
            _ => None,
        }
    }

    /// The assembly mnemonic of the opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Halt => "HLT",
            OpCode::Input => "INP",
            OpCode::Output => "OUT",
            OpCode::Add => "ADD",
            OpCode::Subtract => "SUB",
            OpCode::Store => "STA",
            OpCode::Load => "LDA",
            OpCode::Branch => "BRA",
            OpCode::BranchZero => "BRZ",
            OpCode::BranchPositive => "BRP",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A decoded instruction word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: OpCode,

    /// The memory address the instruction refers to. Always `0` for opcodes without an address.
    pub address: u8,
}

/// The word could not be decoded into an instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidInstruction(pub Word);

impl fmt::Display for InvalidInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "word {} is not an instruction", self.0)
    }
}

impl Instruction {
    /// Decodes a word.
    ///
    /// The words `0`, `901` and `902` are matched before the generic `opcode * 100 + address`
    /// split, since `901` and `902` would otherwise read as opcode `9` with an address.
    ///
    /// Note that `0` always decodes as a halt, so a `DAT 0` cell reached by the program counter
    /// stops the machine. The word format has no way of telling the two apart.
    ///
    /// # Returns
    /// `None` for the unused opcodes `0xx` (other than `0`), `4xx` and `9xx` (other than `901`
    /// and `902`), and for words outside of `0..=999`.
    pub fn decode(word: Word) -> Option<Instruction> {
        let opcode = match word {
            0 => OpCode::Halt,
            901 => OpCode::Input,
            902 => OpCode::Output,
            w if w < 0 || w > MAX_WORD => return None,
            w => OpCode::from_digit(w / 100)?,
        };

        let address = if opcode.has_address() { (word % 100) as u8 } else { 0 };

        Some(Instruction { opcode, address })
    }

    /// Encodes the instruction as a word.
    pub fn word(&self) -> Word {
        if self.opcode.has_address() {
            self.opcode.base() + Word::from(self.address)
        } else {
            self.opcode.base()
        }
    }
}

impl TryFrom<Word> for Instruction {
    type Error = InvalidInstruction;

    fn try_from(word: Word) -> Result<Instruction, InvalidInstruction> {
        Instruction::decode(word).ok_or(InvalidInstruction(word))
    }
}

impl From<Instruction> for Word {
    fn from(instruction: Instruction) -> Word {
        instruction.word()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.opcode.has_address() {
            write!(f, "{} {:02}", self.opcode, self.address)
        } else {
            write!(f, "{}", self.opcode)
        }
    }
}

#[test]
fn test_decode_special_words() {
    assert_eq!(Instruction::decode(0).map(|i| i.opcode), Some(OpCode::Halt));
    assert_eq!(Instruction::decode(901).map(|i| i.opcode), Some(OpCode::Input));
    assert_eq!(Instruction::decode(902).map(|i| i.opcode), Some(OpCode::Output));
}

#[test]
fn test_decode_addressed() {
    let ins = Instruction::decode(742).unwrap();
    assert_eq!(ins.opcode, OpCode::BranchZero);
    assert_eq!(ins.address, 42);
    assert_eq!(ins.word(), 742);
    assert_eq!(ins.to_string(), "BRZ 42");

    let ins = Instruction::decode(305).unwrap();
    assert_eq!(ins.to_string(), "STA 05");
}

#[test]
fn test_decode_unused_words() {
    for word in &[1, 42, 99, 400, 450, 499, 900, 903, 999, 1000, -1, -500] {
        assert_eq!(Instruction::decode(*word), None, "word {}", word);
    }

    assert_eq!(Instruction::try_from(450), Err(InvalidInstruction(450)));
}

#[test]
fn test_every_opcode_encodes_to_its_base() {
    for opcode in OpCode::ALL.iter().copied() {
        let ins = Instruction { opcode, address: 0 };
        assert_eq!(Word::from(ins), opcode.base());
        assert_eq!(Instruction::decode(opcode.base()), Some(ins));
    }
}
