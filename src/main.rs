//! CLI front-end: `run`, `benchmark`, and `generate-c` over a tape-machine
//! program file. Replaces the original's hand-rolled `parse_args`/`usage`
//! pair (`original_source/day25/main.cpp`) with a `clap`-derived parser.

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use turingc::executor::{Executor, Machine, EXECUTOR_NAMES};
use turingc::{codegen_c, parser, program::Program};

#[derive(Parser)]
#[command(name = "turingc", about = "Run, benchmark, or transpile tape-machine programs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a program, run it for its full checksum delay, print the
    /// duration and diagnostic checksum.
    Run {
        /// Path to the program source file.
        program: PathBuf,
        /// Executor to run it on (ast, bytecode, or jit).
        executor: String,
    },
    /// Benchmark one executor (or every registered one) in 100,000-step
    /// blocks for roughly 20 seconds, reporting steps/ms and us/step.
    Benchmark {
        /// Path to the program source file.
        program: PathBuf,
        /// Executor to benchmark. Omit to benchmark every registered
        /// executor in turn.
        executor: Option<String>,
    },
    /// Emit an equivalent standalone C source file to
    /// `generated-program.c`.
    GenerateC {
        /// Path to the program source file.
        program: PathBuf,
    },
}

fn load_program(path: &PathBuf) -> Result<Program, Box<dyn Error + Send + Sync + 'static>> {
    let file = File::open(path)?;
    let program = parser::parse(BufReader::new(file))?;
    Ok(program)
}

fn run(program: Program, executor_name: &str) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let steps = program.checksum_delay;
    let mut machine = Machine::build(executor_name, program)?;
    println!("Executing program.");
    let start = Instant::now();
    for _ in 0..steps {
        machine.step();
    }
    let duration = start.elapsed();
    println!("Finished after {:.3}ms", duration.as_secs_f64() * 1000.0);
    println!("Diagnostic checksum: {}", machine.diagnostic_checksum());
    Ok(())
}

const TARGET_SECONDS: u64 = 20;
const ITERATIONS_PER_BLOCK: u64 = 100_000;

fn benchmark_one(
    program: &Program,
    executor_name: &str,
    indent: &str,
) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    println!(
        "{indent}Benchmarking with executor {executor_name} for {TARGET_SECONDS} seconds."
    );
    let mut machine = Machine::build(executor_name, program.clone())?;

    let start = Instant::now();
    let target = std::time::Duration::from_secs(TARGET_SECONDS);
    let mut blocks_executed: u64 = 0;
    loop {
        if start.elapsed() > target {
            break;
        }
        for _ in 0..ITERATIONS_PER_BLOCK {
            machine.step();
        }
        blocks_executed += 1;
    }
    let duration = start.elapsed();
    let step_count = blocks_executed * ITERATIONS_PER_BLOCK;
    let millis = duration.as_secs_f64() * 1000.0;
    println!("{indent}Took {millis:.3}ms for {step_count} steps.");
    println!("{indent}  {:.3} steps/ms", step_count as f64 / millis);
    println!("{indent}  {:.3} us/step", 1000.0 * millis / step_count as f64);
    Ok(())
}

fn benchmark(
    program: Program,
    executor_name: Option<&str>,
) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    match executor_name {
        Some(name) => benchmark_one(&program, name, ""),
        None => {
            println!("Benchmarking program with all executors...");
            for name in EXECUTOR_NAMES {
                benchmark_one(&program, name, "    ")?;
                println!();
            }
            Ok(())
        }
    }
}

fn generate_c(program: Program) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let out_name = "generated-program.c";
    println!("Writing program to file {out_name}");
    let source = codegen_c::generate_c(&program);
    let mut out_file = File::create(out_name)?;
    out_file.write_all(source.as_bytes())?;
    Ok(())
}

fn try_main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { program, executor } => {
            let program = load_program(&program)?;
            run(program, &executor)
        }
        Command::Benchmark { program, executor } => {
            let program = load_program(&program)?;
            benchmark(program, executor.as_deref())
        }
        Command::GenerateC { program } => {
            let program = load_program(&program)?;
            generate_c(program)
        }
    }
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
