//! The state of a Little Man Computer: the accumulator, the program counter and the memory.

use std::fmt;

use itertools::Itertools;

/// Number of cells in the memory of the machine.
pub const MEMORY_SIZE: usize = 100;

/// Largest value a memory cell can hold after loading.
pub const MAX_WORD: Word = 999;

/// Value of a single memory cell or of the accumulator.
///
/// Loaded cells are always in the range `0..=MAX_WORD`, but the accumulator can leave that range
/// after an `ADD` or a `SUB` and a following `STA` copies the raw value into memory.
pub type Word = i64;

/// The memory of the machine. Holds both the instructions and the data of a program.
///
/// Cells carry no type information. A cell is an instruction if the program counter happens to
/// point at it and data if an instruction addresses it.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    cells: [Word; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Memory {
        Memory {
            cells: [0; MEMORY_SIZE],
        }
    }
}

impl Memory {
    /// Returns the value stored at `address` or `None` if the address is outside the memory.
    pub fn get(&self, address: usize) -> Option<Word> {
        self.cells.get(address).copied()
    }

    /// Overwrites the value stored at `address`.
    ///
    /// # Returns
    /// `None` if the address is outside the memory, in which case nothing is written.
    pub fn set(&mut self, address: usize, value: Word) -> Option<()> {
        let cell = self.cells.get_mut(address)?;
        *cell = value;
        Some(())
    }

    /// All cells in address order.
    pub fn words(&self) -> &[Word] {
        &self.cells[..]
    }

    /// Sets every cell to zero.
    pub fn clear(&mut self) {
        self.cells = [0; MEMORY_SIZE];
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.cells.iter()).finish()
    }
}

/// Ten rows of ten cells, each row prefixed with the address of its first cell.
impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(10).enumerate() {
            let cells = chunk.iter().map(|word| format!("{:>3}", word)).join(" ");
            writeln!(f, "{:02}: {}", row * 10, cells)?;
        }

        Ok(())
    }
}

/// The complete mutable context of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Machine {
    /// The only general purpose register. Source and destination of arithmetic.
    pub accumulator: Word,

    /// Address of the next word to fetch.
    pub pc: usize,

    /// Instructions and data of the program.
    pub memory: Memory,
}

impl Machine {
    /// Creates a machine with every register and memory cell set to zero.
    pub fn new() -> Machine {
        Machine::default()
    }

    /// Returns the machine to the state created by [Machine::new].
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.pc = 0;
        self.memory.clear();
    }
}

#[test]
fn test_new_machine_is_zeroed() {
    let machine = Machine::new();

    assert_eq!(machine.accumulator, 0);
    assert_eq!(machine.pc, 0);
    assert_eq!(machine.memory.words().len(), MEMORY_SIZE);
    assert!(machine.memory.words().iter().all(|w| *w == 0));
}

#[test]
fn test_memory_bounds() {
    let mut memory = Memory::default();

    assert_eq!(memory.set(99, 901), Some(()));
    assert_eq!(memory.get(99), Some(901));
    assert_eq!(memory.set(MEMORY_SIZE, 1), None);
    assert_eq!(memory.get(MEMORY_SIZE), None);
}

#[test]
fn test_reset() {
    let mut machine = Machine::new();
    machine.accumulator = -12;
    machine.pc = 42;
    machine.memory.set(3, 705);

    machine.reset();

    assert_eq!(machine, Machine::new());
}

#[test]
fn test_memory_display() {
    let mut memory = Memory::default();
    memory.set(0, 901);
    memory.set(11, 5);

    let dump = memory.to_string();
    let lines: Vec<_> = dump.lines().collect();

    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("00: 901   0"));
    assert!(lines[1].starts_with("10:   0   5"));
}
