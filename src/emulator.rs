//! [Emulator] for executing programs loaded into a [Machine].

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use slog::{debug, o, trace, warn, Discard, Logger};

use crate::error::RuntimeError;
use crate::event::{Event, EventDispatcher, EventListener};
use crate::instruction::{Instruction, OpCode};
use crate::machine::{Machine, Word, MAX_WORD, MEMORY_SIZE};
use crate::parsing::parse_value;

/// Why the emulator is asking for a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// First request of an `INP` instruction.
    Value,

    /// The previous value was outside of `0..=999` and has been discarded.
    OutOfRange,
}

impl Prompt {
    /// Text shown to a user before reading the value.
    pub fn message(self) -> &'static str {
        match self {
            Prompt::Value => "Please provide input: ",
            Prompt::OutOfRange => "Please provide input between 0 and 999: ",
        }
    }
}

/// Interface to the input and output devices.
pub trait InputOutput {
    /// Called when an `INP` instruction is executed, and again for as long as the returned value
    /// is outside of `0..=999`.
    ///
    /// # Returns
    /// A value received from the user, or `None` if no more input can be received.
    fn input(&mut self, prompt: Prompt) -> Option<Word>;

    /// Called when an `OUT` instruction is executed.
    ///
    /// # Parameters
    /// - `value`: The value of the accumulator.
    fn output(&mut self, value: Word);
}

impl<T> InputOutput for &mut T where T: InputOutput + ?Sized {
    fn input(&mut self, prompt: Prompt) -> Option<Word> {
        (**self).input(prompt)
    }

    fn output(&mut self, value: Word) {
        (**self).output(value)
    }
}

/// What `ADD` and `SUB` do with results outside of `0..=999`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Keep the result as is. A following `STA` stores the raw value.
    Unchecked,

    /// Fail with [RuntimeError::AccumulatorOverflow] or [RuntimeError::AccumulatorUnderflow].
    ///
    /// Negative results count as underflow, so under this policy `BRP` always jumps.
    Strict,
}

impl Default for OverflowPolicy {
    fn default() -> OverflowPolicy {
        OverflowPolicy::Unchecked
    }
}

/// What happens when the instruction in the last memory cell neither jumps nor halts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndOfMemory {
    /// Stop normally with [Termination::Exhausted].
    Halt,

    /// Fail with [RuntimeError::RanOffEnd].
    Fault,
}

impl Default for EndOfMemory {
    fn default() -> EndOfMemory {
        EndOfMemory::Halt
    }
}

/// Behaviour of the emulator in the corner cases of the instruction set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub overflow: OverflowPolicy,
    pub end_of_memory: EndOfMemory,
}

/// Execution state of an [Emulator].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,

    /// A halt instruction was executed.
    Halted,

    /// Execution advanced past the last memory cell.
    Exhausted,

    /// An instruction failed. The emulator stays in this state until it is reset.
    Faulted(RuntimeError),
}

/// How a successful run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// A halt instruction at address `pc` stopped the run.
    Halted {
        pc: usize,
    },

    /// Execution advanced past the last memory cell.
    Exhausted,
}

/// The emulator executes the program stored in the memory of a [Machine] and interfaces with
/// the input and output devices.
///
/// The machine stays owned by the caller. The emulator only borrows it for the duration of the
/// run, so the final state can be inspected once the emulator is dropped.
pub struct Emulator<'m, IO> {
    /// The machine whose program is being executed.
    pub machine: &'m mut Machine,

    /// Interface for doing IO operations.
    pub io: IO,

    state: State,
    config: Config,
    logger: Logger,
    dispatcher: EventDispatcher,
}

impl<'m, IO> Emulator<'m, IO> where IO: InputOutput {
    /// Create a new emulator and set the program counter to zero.
    ///
    /// # Parameters
    /// - `machine`: A [Machine] which has the program loaded.
    /// - `io`: An [IO handler](InputOutput).
    pub fn new(machine: &'m mut Machine, io: IO) -> Emulator<'m, IO> {
        Emulator::with_logger(machine, io, None)
    }

    /// Create a new emulator that traces every executed instruction to `logger`.
    pub fn with_logger<L>(machine: &'m mut Machine, io: IO, logger: L) -> Emulator<'m, IO>
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "emulation"));

        machine.pc = 0;

        Emulator {
            machine,
            io,
            state: State::Running,
            config: Config::default(),
            logger,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Replaces the configuration of the emulator.
    pub fn with_config(mut self, config: Config) -> Emulator<'m, IO> {
        self.config = config;
        self
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Registers a listener that is notified of every state change of the machine.
    pub fn add_listener<L: EventListener + 'static>(&mut self, listener: L) {
        self.dispatcher.add_listener(listener);
    }

    /// Sets the program counter to zero and returns to the running state. Memory and the
    /// accumulator are left as they are.
    pub fn reset(&mut self) {
        self.machine.pc = 0;
        self.state = State::Running;
    }

    /// Decodes the word at the address pointed by the program counter.
    pub fn get_current_instruction(&self) -> Result<Instruction, RuntimeError> {
        let pc = self.machine.pc;
        let word = self.read(pc, pc)?;

        Instruction::decode(word).ok_or(RuntimeError::UnidentifiedInstruction { pc, word })
    }

    /// Fetches, decodes and executes a single instruction.
    ///
    /// Does nothing once the emulator has halted, and keeps returning the same error once it has
    /// faulted.
    ///
    /// # Returns
    /// The state of the emulator after the instruction.
    ///
    /// # Errors
    /// The error that moved the emulator into the [State::Faulted] state.
    pub fn step(&mut self) -> Result<State, RuntimeError> {
        match &self.state {
            State::Running => {}
            State::Faulted(err) => return Err(err.clone()),
            state => return Ok(state.clone()),
        }

        if let Err(err) = self.execute() {
            warn!(self.logger, "execution faulted"; "pc" => err.pc(), "error" => %err);
            self.state = State::Faulted(err.clone());
            return Err(err);
        }

        Ok(self.state.clone())
    }

    /// Executes the program from address zero until it halts, runs off the end of the memory or
    /// fails.
    ///
    /// # Errors
    /// Returns the first error produced by an instruction. The machine is left as it was at the
    /// time of the error.
    pub fn run(&mut self) -> Result<Termination, RuntimeError> {
        self.reset();

        loop {
            match self.step()? {
                State::Running => {}
                State::Halted => return Ok(Termination::Halted { pc: self.machine.pc }),
                State::Exhausted => return Ok(Termination::Exhausted),
                State::Faulted(err) => return Err(err),
            }
        }
    }

    fn execute(&mut self) -> Result<(), RuntimeError> {
        let pc = self.machine.pc;
        let word = self.read(pc, pc)?;

        let instruction = Instruction::decode(word)
            .ok_or(RuntimeError::UnidentifiedInstruction { pc, word })?;

        trace!(self.logger, "execute instruction";
            "pc" => pc,
            "word" => word,
            "instruction" => %instruction,
            "accumulator" => self.machine.accumulator);

        let address = usize::from(instruction.address);

        match instruction.opcode {
            OpCode::Halt => {
                self.state = State::Halted;
                self.dispatcher.dispatch(Event::Halt { pc });
                return Ok(());
            }
            OpCode::Input => {
                let value = self.read_input(pc)?;
                self.dispatcher.dispatch(Event::Input { value });
                self.set_accumulator(value);
            }
            OpCode::Output => {
                let value = self.machine.accumulator;
                self.io.output(value);
                self.dispatcher.dispatch(Event::Output { value });
            }
            OpCode::Add => {
                let operand = self.read(pc, address)?;
                let value = self.check_domain(pc, self.machine.accumulator.wrapping_add(operand))?;
                self.set_accumulator(value);
            }
            OpCode::Subtract => {
                let operand = self.read(pc, address)?;
                let value = self.check_domain(pc, self.machine.accumulator.wrapping_sub(operand))?;
                self.set_accumulator(value);
            }
            OpCode::Store => {
                let value = self.machine.accumulator;
                self.write(pc, address, value)?;
            }
            OpCode::Load => {
                let value = self.read(pc, address)?;
                self.set_accumulator(value);
            }
            OpCode::Branch => return self.jump(pc, address),
            OpCode::BranchZero if self.machine.accumulator == 0 => return self.jump(pc, address),
            OpCode::BranchPositive if self.machine.accumulator >= 0 => return self.jump(pc, address),
            OpCode::BranchZero | OpCode::BranchPositive => {}
        }

        self.advance(pc)
    }

    fn read(&self, pc: usize, address: usize) -> Result<Word, RuntimeError> {
        self.machine
            .memory
            .get(address)
            .ok_or(RuntimeError::AddressOutOfRange { pc, address })
    }

    fn write(&mut self, pc: usize, address: usize, data: Word) -> Result<(), RuntimeError> {
        self.machine
            .memory
            .set(address, data)
            .ok_or(RuntimeError::AddressOutOfRange { pc, address })?;

        self.dispatcher.dispatch(Event::MemoryChange { address, data });

        Ok(())
    }

    fn set_accumulator(&mut self, data: Word) {
        self.machine.accumulator = data;
        self.dispatcher.dispatch(Event::AccumulatorChange { data });
    }

    /// Applies the overflow policy to the result of an `ADD` or a `SUB`.
    fn check_domain(&self, pc: usize, value: Word) -> Result<Word, RuntimeError> {
        match self.config.overflow {
            OverflowPolicy::Strict if value > MAX_WORD =>
                Err(RuntimeError::AccumulatorOverflow { pc, value }),
            OverflowPolicy::Strict if value < 0 =>
                Err(RuntimeError::AccumulatorUnderflow { pc, value }),
            _ => Ok(value),
        }
    }

    fn read_input(&mut self, pc: usize) -> Result<Word, RuntimeError> {
        let mut prompt = Prompt::Value;

        loop {
            let value = self.io.input(prompt)
                .ok_or(RuntimeError::InputExhausted { pc })?;

            if value >= 0 && value <= MAX_WORD {
                return Ok(value);
            }

            debug!(self.logger, "input out of range, asking again"; "value" => value);
            prompt = Prompt::OutOfRange;
        }
    }

    fn jump(&mut self, pc: usize, target: usize) -> Result<(), RuntimeError> {
        trace!(self.logger, "jump"; "from" => pc, "to" => target);

        self.machine.pc = target;
        self.dispatcher.dispatch(Event::Jump { from: pc, to: target });

        Ok(())
    }

    fn advance(&mut self, pc: usize) -> Result<(), RuntimeError> {
        let next = pc + 1;

        if next < MEMORY_SIZE {
            self.machine.pc = next;
            return Ok(());
        }

        match self.config.end_of_memory {
            EndOfMemory::Halt => {
                debug!(self.logger, "ran past the end of memory"; "pc" => pc);
                self.state = State::Exhausted;
                self.dispatcher.dispatch(Event::Exhausted { pc });
                Ok(())
            }
            EndOfMemory::Fault => Err(RuntimeError::RanOffEnd { pc }),
        }
    }
}

/// An IO handler for testing purposes.
///
/// Reads input values from a pre-determined input buffer and
/// appends printed values to an output buffer.
#[derive(Clone, Debug, Default)]
pub struct TestIo {
    input_buffer: VecDeque<Word>,
    output_buffer: Vec<Word>,
    prompts: Vec<Prompt>,
}

impl TestIo {
    pub fn new() -> TestIo {
        TestIo::default()
    }

    pub fn with_input<I: IntoIterator<Item=Word>>(input: I) -> TestIo {
        TestIo {
            input_buffer: input.into_iter().collect(),
            ..TestIo::default()
        }
    }

    pub fn push_input(&mut self, value: Word) {
        self.input_buffer.push_back(value);
    }

    pub fn output(&self) -> &[Word] {
        &self.output_buffer[..]
    }

    /// Every prompt the emulator has issued, in order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts[..]
    }

    pub fn into_output(self) -> Vec<Word> {
        self.output_buffer
    }
}

impl InputOutput for TestIo {
    fn input(&mut self, prompt: Prompt) -> Option<Word> {
        self.prompts.push(prompt);
        self.input_buffer.pop_front()
    }

    fn output(&mut self, value: Word) {
        self.output_buffer.push(value);
    }
}

/// An IO handler that prompts on the terminal and reads one integer per line from the standard
/// input. Lines that are not integers are asked again. Outputs are printed as `Output: <value>.`
///
/// Values given with [StdIo::with_input] are used before anything is read from the terminal.
#[derive(Clone, Debug, Default)]
pub struct StdIo {
    scripted: VecDeque<Word>,
}

impl StdIo {
    pub fn new() -> StdIo {
        StdIo::default()
    }

    pub fn with_input<I: IntoIterator<Item=Word>>(input: I) -> StdIo {
        StdIo {
            scripted: input.into_iter().collect(),
        }
    }
}

impl InputOutput for StdIo {
    fn input(&mut self, prompt: Prompt) -> Option<Word> {
        if let Some(value) = self.scripted.pop_front() {
            println!("{}{}", prompt.message(), value);
            return Some(value);
        }

        let stdin = std::io::stdin();
        let mut reader = stdin.lock();

        read_number(&mut reader, prompt.message())
    }

    fn output(&mut self, value: Word) {
        println!("Output: {}.", value);
    }
}

/// Prompts with `message` and reads lines from `reader` until one holds an integer.
///
/// # Returns
/// The integer, or `None` at the end of the input or on a read error.
fn read_number<R: BufRead>(reader: &mut R, message: &'static str) -> Option<Word> {
    let mut message = message;

    loop {
        print!("{}", message);
        std::io::stdout().flush().ok();

        let mut line = String::new();

        match reader.read_line(&mut line) {
            Ok(0) => {
                println!();
                return None;
            }
            Ok(_) => {}
            // The offending line has been consumed, so the next one can be read.
            Err(ref err) if err.kind() == std::io::ErrorKind::InvalidData => {
                message = "Please provide a number: ";
                continue;
            }
            Err(_) => {
                println!();
                return None;
            }
        }

        match parse_value(&line) {
            Ok(value) => return Some(value),
            Err(_) => message = "Please provide a number: ",
        }
    }
}
