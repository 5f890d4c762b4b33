use lmc::{
    emulator::{Config, EndOfMemory, Emulator, OverflowPolicy, StdIo, Termination},
    error::{LoadError, RuntimeError},
    loader::Loader,
    machine::Machine,
    parsing::{parse_value_list, ValueListError},
    source_map::SourceMap,
};

use clap::{App, Arg, ArgMatches};
use slog::{o, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

enum Error {
    Input(ValueListError),
    Load(LoadError),
    Execution {
        error: RuntimeError,
        line: Option<usize>,
    },
}

impl From<ValueListError> for Error {
    fn from(e: ValueListError) -> Error {
        Error::Input(e)
    }
}

impl From<LoadError> for Error {
    fn from(e: LoadError) -> Error {
        Error::Load(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Input(err) => write!(f, "invalid --input: {}", err),
            Error::Load(err) => write!(f, "load error {}", err),
            Error::Execution { error, line: Some(line) } =>
                write!(f, "execution error: {} (source line {})", error, line),
            Error::Execution { error, line: None } =>
                write!(f, "execution error: {}", error),
        }
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("lmcrun")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Mitja Karhusaari <mitja@karhusaari.me>")
        .about("Utility for loading and executing Little Man Computer programs")
        .arg(Arg::with_name("source")
             .help("File containing the assembly source")
             .value_name("SOURCE")
             .default_value("program.lmc")
             .index(1))
        .arg(Arg::with_name("input")
             .help("Values for INP instructions, separated by commas or spaces, used before the terminal is asked")
             .value_name("VALUES")
             .long("input")
             .short("i")
             .takes_value(true))
        .arg(Arg::with_name("strict-overflow")
             .help("Fail when ADD or SUB leaves the range 0-999")
             .long("strict-overflow"))
        .arg(Arg::with_name("strict-end")
             .help("Fail when execution runs past the last memory cell")
             .long("strict-end"))
        .arg(Arg::with_name("dump")
             .help("Print the registers and the memory after the execution")
             .long("dump"))
        .arg(Arg::with_name("verbose")
             .help("Enables verbose logging")
             .long("verbose")
             .short("v"))
        .get_matches()
}

fn main() {
    let args = parse_arguments();

    let logger = if args.is_present("verbose") {
        let decorator = TermDecorator::new().build();
        let drain = FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Logger::root(drain, o!())
    } else {
        Logger::root(Discard, o!())
    };

    let mut machine = Machine::new();

    let result = run(&args, &mut machine, logger);

    if args.is_present("dump") {
        println!("Accumulator: {}", machine.accumulator);
        println!("Program counter: {}", machine.pc);
        print!("{}", machine.memory);
    }

    match result {
        Ok(_) => println!("Execution Successful."),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

fn run(args: &ArgMatches, machine: &mut Machine, logger: Logger) -> Result<Termination, Error> {
    // SOURCE has a default value.
    let file_path = args.value_of("source").unwrap_or("program.lmc");

    let input = match args.value_of("input") {
        Some(values) => parse_value_list(values)?,
        None => Vec::new(),
    };

    let config = Config {
        overflow: if args.is_present("strict-overflow") {
            OverflowPolicy::Strict
        } else {
            OverflowPolicy::Unchecked
        },
        end_of_memory: if args.is_present("strict-end") {
            EndOfMemory::Fault
        } else {
            EndOfMemory::Halt
        },
    };

    let source_map: SourceMap = Loader::with_logger(logger.clone())
        .load_file(machine, file_path)?;

    let mut emulator = Emulator::with_logger(machine, StdIo::with_input(input), logger)
        .with_config(config);

    emulator.run()
        .map_err(|error| Error::Execution {
            line: source_map.get_source_line(error.pc()),
            error,
        })
}
