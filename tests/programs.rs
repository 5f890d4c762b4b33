use lmc::{
    emulator::{Emulator, Termination, TestIo},
    error::LoadError,
    event::Event,
    loader::Loader,
    machine::{Machine, Word, MEMORY_SIZE},
};

use slog::{Drain, Logger, o};
use slog_term::{TermDecorator, FullFormat};

use std::cell::RefCell;
use std::rc::Rc;

fn load_program(source: &str) -> Machine {
    let mut machine = Machine::new();

    Loader::new()
        .load(&mut machine, source.lines())
        .expect("could not load the program");

    machine
}

fn run_with_input(machine: &mut Machine, input: Vec<Word>) -> Vec<Word> {
    let mut io = TestIo::with_input(input);

    let mut e = Emulator::new(machine, &mut io);

    while e.state() == &lmc::emulator::State::Running {
        println!("{:?}", e.get_current_instruction());
        e.step().unwrap();
        println!("acc = {} pc = {}", e.machine.accumulator, e.machine.pc);
    }

    drop(e);

    io.into_output()
}

#[test]
fn test_add_program() {
    let source = include_str!("add.lmc");

    let cases = vec![
        (vec![1, 2], vec![3]),
        (vec![0, 0], vec![0]),
        (vec![500, 499], vec![999]),
        (vec![999, 999], vec![1998]),
    ];

    for (input, output) in cases {
        let mut machine = load_program(source);
        assert_eq!(run_with_input(&mut machine, input), output);
    }
}

#[test]
fn test_max_program() {
    let source = include_str!("max.lmc");

    let cases = vec![
        (vec![3, 7], vec![7]),
        (vec![9, 2], vec![9]),
        (vec![5, 5], vec![5]),
    ];

    for (input, output) in cases {
        let mut machine = load_program(source);
        assert_eq!(run_with_input(&mut machine, input), output);
    }
}

#[test]
fn test_multiply_program() {
    let source = include_str!("multiply.lmc");

    let cases = vec![
        (vec![3, 4], vec![12]),
        (vec![7, 0], vec![0]),
        (vec![0, 9], vec![0]),
        (vec![31, 32], vec![992]),
    ];

    for (input, output) in cases {
        let mut machine = load_program(source);
        assert_eq!(run_with_input(&mut machine, input), output);
    }
}

#[test]
fn test_load_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/multiply.lmc");

    let mut machine = Machine::new();
    let source_map = Loader::new()
        .load_file(&mut machine, path)
        .expect("could not load multiply.lmc");

    assert_eq!(source_map.len(), 24);
    assert_eq!(source_map.get_source_line(0), Some(2));
    // Comment lines are skipped, so the loop starts at line 7.
    assert_eq!(source_map.get_source_line(4), Some(7));
    assert_eq!(machine.memory.get(23), Some(1));
}

#[test]
fn test_scenario_preloaded_data() {
    let mut machine = Machine::new();
    Loader::new().load(&mut machine, &["LDA 99", "ADD 98", "OUT", "HLT"]).unwrap();
    machine.memory.set(99, 5);
    machine.memory.set(98, 7);

    let mut io = TestIo::new();
    let result = Emulator::new(&mut machine, &mut io).run();

    assert_eq!(result, Ok(Termination::Halted { pc: 3 }));
    assert_eq!(machine.accumulator, 12);
    assert_eq!(io.into_output(), vec![12]);
}

#[test]
fn test_scenario_echo() {
    let mut machine = load_program("INP\nOUT\nHLT\n");
    assert_eq!(run_with_input(&mut machine, vec![42]), vec![42]);
}

#[test]
fn test_scenario_branch_zero() {
    let mut machine = load_program("BRZ 3\nOUT\nHLT\nHLT\n");
    let mut io = TestIo::new();

    let result = Emulator::new(&mut machine, &mut io).run();

    assert_eq!(result, Ok(Termination::Halted { pc: 3 }));
    assert!(io.output().is_empty());
}

#[test]
fn test_scenario_unrecognized_mnemonic() {
    let mut machine = Machine::new();
    let result = Loader::new().load(&mut machine, "LDA 5\nADD 6\nFOO 1\nOUT\n".lines());

    match result {
        Err(LoadError::UnrecognizedMnemonic { line: 3, ref mnemonic, .. }) => {
            assert_eq!(mnemonic, "FOO");
        }
        other => panic!("unexpected result {:?}", other),
    }

    assert_eq!(&machine.memory.words()[..3], &[505, 106, 0]);
}

#[test]
fn test_scenario_operand_out_of_range() {
    let mut machine = Machine::new();
    let result = Loader::new().load(&mut machine, &["ADD 999"]);

    assert!(matches!(result, Err(LoadError::OperandOutOfRange { line: 1, word: 1099 })));
}

#[test]
fn test_memory_capacity_boundary() {
    let exact = "HLT\n".repeat(MEMORY_SIZE);
    let mut machine = Machine::new();
    assert_eq!(Loader::new().load(&mut machine, exact.lines()).unwrap(), MEMORY_SIZE);

    let over = "HLT\n".repeat(MEMORY_SIZE + 1);
    let mut machine = Machine::new();
    let result = Loader::new().load(&mut machine, over.lines());

    assert!(matches!(result, Err(LoadError::MemoryCapacityExceeded { line: 101 })));
}

fn record_run(source: &str, input: Vec<Word>) -> (Vec<Word>, Vec<Word>) {
    let mut machine = load_program(source);
    let trajectory = Rc::new(RefCell::new(Vec::new()));

    let mut io = TestIo::with_input(input);
    let mut emulator = Emulator::new(&mut machine, &mut io);

    let sink = trajectory.clone();
    emulator.add_listener(move |event: &Event| {
        if let Event::AccumulatorChange { data } = event {
            sink.borrow_mut().push(*data);
        }
    });

    emulator.run().expect("error while executing the program");
    drop(emulator);

    let trajectory = trajectory.borrow().clone();
    (trajectory, io.into_output())
}

#[test]
fn test_runs_are_repeatable() {
    let source = include_str!("multiply.lmc");

    let first = record_run(source, vec![6, 7]);
    let second = record_run(source, vec![6, 7]);

    assert_eq!(first, second);
    assert_eq!(first.1, vec![42]);
    assert!(!first.0.is_empty());
}

#[test]
fn test_traced_run() {
    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let logger = Logger::root(drain, o!());

    let mut machine = Machine::new();
    Loader::with_logger(logger.clone())
        .load(&mut machine, include_str!("max.lmc").lines())
        .expect("could not load max.lmc");

    let mut io = TestIo::with_input(vec![400, 401]);
    let result = Emulator::with_logger(&mut machine, &mut io, logger).run();

    assert_eq!(result, Ok(Termination::Halted { pc: 10 }));
    assert_eq!(io.output(), &[401]);
}
