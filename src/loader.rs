//! Loading symbolic programs into the memory of a [Machine].

use std::path::Path;

use slog::{debug, o, trace, Discard, Logger};

use crate::error::LoadError;
use crate::machine::Machine;
use crate::source_map::SourceMap;
use crate::symbolic::parser::assemble_line;

/// Translates program lines and writes the resulting words into memory, starting at address 0.
///
/// The loader only ever touches the memory of the machine. The accumulator and the program
/// counter keep whatever values they had.
#[derive(Clone, Debug)]
pub struct Loader {
    logger: Logger,
}

impl Default for Loader {
    fn default() -> Loader {
        Loader::new()
    }
}

impl Loader {
    /// Create a loader that does not log anything.
    pub fn new() -> Loader {
        Loader::with_logger(None)
    }

    /// Create a loader that logs every loaded word at the trace level.
    pub fn with_logger<L>(logger: L) -> Loader
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "load"));

        Loader { logger }
    }

    /// Loads a program into the memory of `machine`.
    ///
    /// # Returns
    /// The number of words written.
    ///
    /// # Errors
    /// Stops at the first line that cannot be translated. Words written before that line stay in
    /// memory. See [LoadError] for the possible causes.
    pub fn load<I, S>(&self, machine: &mut Machine, lines: I) -> Result<usize, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.load_mapped(machine, lines).map(|map| map.len())
    }

    /// Loads a program into the memory of `machine` and records the source line of every word.
    ///
    /// # Errors
    /// Same as [Loader::load].
    pub fn load_mapped<I, S>(&self, machine: &mut Machine, lines: I) -> Result<SourceMap, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source_map = SourceMap::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;

            let word = match assemble_line(line.as_ref()).map_err(|e| e.at(line_number))? {
                Some(word) => word,
                None => continue,
            };

            let address = source_map.len();

            machine
                .memory
                .set(address, word)
                .ok_or(LoadError::MemoryCapacityExceeded { line: line_number })?;

            trace!(self.logger, "load word"; "address" => address, "word" => word, "line" => line_number);

            source_map.push(line_number);
        }

        debug!(self.logger, "program loaded"; "words" => source_map.len());

        Ok(source_map)
    }

    /// Reads the program from the file at `path` and loads it into the memory of `machine`.
    ///
    /// # Errors
    /// [LoadError::SourceUnreadable] if the file cannot be read, otherwise same as
    /// [Loader::load].
    pub fn load_file<P>(&self, machine: &mut Machine, path: P) -> Result<SourceMap, LoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        debug!(self.logger, "reading program"; "path" => %path.display());

        let source = std::fs::read_to_string(path)
            .map_err(|source| LoadError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        self.load_mapped(machine, source.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MEMORY_SIZE;
    use crate::symbolic::parser::assemble_line;

    /// Translates a whole program without a machine.
    fn assemble<I, S>(lines: I) -> Result<Vec<crate::machine::Word>, crate::error::LineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = Vec::new();

        for line in lines {
            if let Some(word) = assemble_line(line.as_ref())? {
                words.push(word);
            }
        }

        Ok(words)
    }

    #[test]
    fn test_load_sequentially() {
        let program = [
            "# adds two numbers",
            "LDA 4",
            "",
            "ADD 5",
            "/ print",
            "OUT",
            "HLT",
            "DAT 5",
            "DAT 7",
        ];

        let mut machine = Machine::new();
        let map = Loader::new().load_mapped(&mut machine, &program).unwrap();

        assert_eq!(map.len(), 6);
        assert_eq!(&machine.memory.words()[..6], &[504, 105, 902, 0, 5, 7]);
        assert!(machine.memory.words()[6..].iter().all(|w| *w == 0));

        assert_eq!(map.get_source_line(0), Some(2));
        assert_eq!(map.get_source_line(1), Some(4));
        assert_eq!(map.get_source_line(5), Some(9));
    }

    #[test]
    fn test_load_round_trip() {
        let program = ["INP", "STA 10", "INP", "SUB 10", "BRZ 7", "BRP 8", "BRA 0", "HLT", "OUT"];
        let expected = assemble(&program).unwrap();

        let mut machine = Machine::new();
        let count = Loader::new().load(&mut machine, &program).unwrap();

        assert_eq!(count, expected.len());
        assert_eq!(&machine.memory.words()[..count], &expected[..]);
    }

    #[test]
    fn test_load_leaves_registers_alone() {
        let mut machine = Machine::new();
        machine.accumulator = 17;
        machine.pc = 3;

        Loader::new().load(&mut machine, &["DAT 1"]).unwrap();

        assert_eq!(machine.accumulator, 17);
        assert_eq!(machine.pc, 3);
    }

    #[test]
    fn test_load_unrecognized_mnemonic_keeps_earlier_words() {
        let mut machine = Machine::new();
        let result = Loader::new().load(&mut machine, &["LDA 99", "OUT", "FOO 1", "HLT"]);

        match result {
            Err(LoadError::UnrecognizedMnemonic { line, mnemonic, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(mnemonic, "FOO");
            }
            other => panic!("unexpected result {:?}", other),
        }

        assert_eq!(&machine.memory.words()[..3], &[599, 902, 0]);
    }

    #[test]
    fn test_load_operand_out_of_range() {
        let mut machine = Machine::new();
        let result = Loader::new().load(&mut machine, &["ADD 999"]);

        assert!(matches!(result, Err(LoadError::OperandOutOfRange { line: 1, word: 1099 })));
    }

    #[test]
    fn test_load_missing_operand() {
        let mut machine = Machine::new();
        let result = Loader::new().load(&mut machine, &["HLT", "BRA"]);

        assert!(matches!(result, Err(LoadError::MissingOperand { line: 2, .. })));
    }

    #[test]
    fn test_load_capacity() {
        let full: Vec<_> = (0..MEMORY_SIZE).map(|i| format!("DAT {}", i)).collect();

        let mut machine = Machine::new();
        assert_eq!(Loader::new().load(&mut machine, &full).unwrap(), MEMORY_SIZE);
        assert_eq!(machine.memory.get(99), Some(99));

        // Comments past the end of memory are fine.
        let mut with_comment = full.clone();
        with_comment.push("# done".to_string());
        let mut machine = Machine::new();
        assert_eq!(Loader::new().load(&mut machine, &with_comment).unwrap(), MEMORY_SIZE);

        let mut overfull = full;
        overfull.push("HLT".to_string());
        let mut machine = Machine::new();
        let result = Loader::new().load(&mut machine, &overfull);

        assert!(matches!(
            result,
            Err(LoadError::MemoryCapacityExceeded { line }) if line == MEMORY_SIZE + 1
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let mut machine = Machine::new();
        let result = Loader::new().load_file(&mut machine, "/nonexistent/program.lmc");

        match result {
            Err(err @ LoadError::SourceUnreadable { .. }) => {
                assert_eq!(err.line(), None);
                assert!(err.to_string().starts_with("file /nonexistent/program.lmc failed to load"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
