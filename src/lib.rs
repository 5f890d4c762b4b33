//! A crate for loading and running programs for the Little Man Computer, the imaginary
//! decimal machine used for teaching how a stored-program computer works.
//!
//! The machine has a hundred memory cells holding three digit words, an accumulator and a
//! program counter. Instructions and data share the memory: a word is an instruction only if the
//! program counter reaches it.
//!
//! Currently this crate provides the functionality to:
//! - Translate `.lmc` symbolic assembly lines into words ([symbolic], [loader]).
//! - Load programs into the memory of a [Machine](machine::Machine).
//! - Execute the loaded words one instruction at a time ([emulator]).
//! - Observe the execution through [events](event) and [slog] logging.
//!
//! # Instruction set
//!
//! | Mnemonic | Word  | Effect                                   |
//! |----------|-------|------------------------------------------|
//! | `HLT`    | `000` | stop                                     |
//! | `ADD a`  | `1aa` | `accumulator += memory[a]`               |
//! | `SUB a`  | `2aa` | `accumulator -= memory[a]`               |
//! | `STA a`  | `3aa` | `memory[a] = accumulator`                |
//! | `LDA a`  | `5aa` | `accumulator = memory[a]`                |
//! | `BRA a`  | `6aa` | jump to `a`                              |
//! | `BRZ a`  | `7aa` | jump to `a` if `accumulator == 0`        |
//! | `BRP a`  | `8aa` | jump to `a` if `accumulator >= 0`        |
//! | `INP`    | `901` | read a value between 0 and 999           |
//! | `OUT`    | `902` | write the accumulator                    |
//! | `DAT v`  | `v`   | data word `v`, `0` if omitted            |
//!
//! Lines starting with `#` or `/` are comments.
//!
//! # Known limitations
//!
//! - `HLT` and `DAT 0` produce the same word. A program counter that reaches a zero data cell
//!   halts the machine.
//! - By default `ADD` and `SUB` do not check their result. See
//!   [OverflowPolicy](emulator::OverflowPolicy).
//!
//! # Example
//! ```
//! use lmc::{
//!     loader::Loader,
//!     machine::Machine,
//!     emulator::{Emulator, TestIo},
//! };
//!
//! // Simple program that adds 10 to the input and outputs the answer.
//! let source = [
//!     "INP",
//!     "ADD 4",
//!     "OUT",
//!     "HLT",
//!     "DAT 10",
//! ];
//!
//! let mut machine = Machine::new();
//!
//! // Translate the program and write it into memory.
//! Loader::new().load(&mut machine, &source)
//!     .expect("could not load the program");
//!
//! // Execute the program with a pre-determined input.
//! let mut io = TestIo::with_input(vec![5]);
//!
//! Emulator::new(&mut machine, &mut io)
//!     .run()
//!     .expect("an error occured while emulating the program");
//!
//! assert_eq!(io.into_output(), vec![15]);
//! ```
//!
//! # Executables
//!
//! ## `lmcrun`
//!
//! Built with the `lmcrun` feature. Loads a program file (`program.lmc` by default), runs it on
//! the terminal and reports whether the execution succeeded.
//!
//! ```text
//! $ lmcrun add.lmc
//! Please provide input: 5
//! Output: 15.
//! Execution Successful.
//! ```
pub mod parsing;
pub mod machine;
pub mod emulator;
pub mod instruction;
pub mod loader;
pub mod symbolic;
pub mod source_map;
pub mod error;
pub mod event;
