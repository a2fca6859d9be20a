//! The polymorphic executor interface and its registry.
//!
//! Mirrors `src/regex.rs`'s `RegexEngine`/`RegexImpl` split: one trait
//! describing the operations every implementation supports, one enum doing
//! the dispatch, and a name-based registry standing in for the original's
//! `factories` map (`original_source/day25/include/executor.hpp`).

use std::error::Error;
use std::fmt;

use crate::executors::ast::AstExecutor;
use crate::executors::bytecode::{BytecodeError, BytecodeExecutor};
use crate::jit::{AssemblerError, JitExecutor};
use crate::program::Program;

/// The operations every tape-machine implementation provides.
pub trait Executor {
    /// Executes exactly one transition: read the current cell, write,
    /// move, and switch state.
    fn step(&mut self);

    /// Returns the tape and state to what they were right after
    /// construction.
    fn reset(&mut self);

    /// Sum of every cell on the tape.
    fn diagnostic_checksum(&self) -> u64;
}

/// Names of every executor this crate knows how to build, in the order
/// they should be tried by "run all executors" style commands.
pub const EXECUTOR_NAMES: [&str; 3] = ["ast", "bytecode", "jit"];

/// Failure to build a named executor for a program.
#[derive(Debug)]
pub enum BuildError {
    UnknownExecutor(String),
    Bytecode(BytecodeError),
    Jit(AssemblerError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnknownExecutor(name) => write!(
                f,
                "Unknown executor '{name}'. Available: {}",
                EXECUTOR_NAMES.join(", ")
            ),
            BuildError::Bytecode(err) => write!(f, "{err}"),
            BuildError::Jit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BuildError {}

impl From<BytecodeError> for BuildError {
    fn from(err: BytecodeError) -> Self {
        BuildError::Bytecode(err)
    }
}

impl From<AssemblerError> for BuildError {
    fn from(err: AssemblerError) -> Self {
        BuildError::Jit(err)
    }
}

/// One of the three interchangeable executor implementations.
pub enum Machine {
    Ast(AstExecutor),
    Bytecode(BytecodeExecutor),
    Jit(JitExecutor),
}

impl Machine {
    /// Builds the executor named `name` for `program`. `name` must be one
    /// of [`EXECUTOR_NAMES`].
    pub fn build(name: &str, program: Program) -> Result<Self, BuildError> {
        match name {
            "ast" => Ok(Machine::Ast(AstExecutor::new(program))),
            "bytecode" => Ok(Machine::Bytecode(BytecodeExecutor::new(program)?)),
            "jit" => Ok(Machine::Jit(JitExecutor::new(program)?)),
            other => Err(BuildError::UnknownExecutor(other.to_string())),
        }
    }

    /// Starts a fluent [`Builder`] for the named executor kind, deferring
    /// the program until [`Builder::build`] is called.
    pub fn builder(name: impl Into<String>) -> Builder {
        Builder { name: name.into() }
    }
}

/// Defers the choice of program until after the executor kind is picked,
/// mirroring the teacher's `Builder::new(pattern).pike_jit_array()` style.
pub struct Builder {
    name: String,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        Builder { name: name.into() }
    }

    pub fn build(self, program: Program) -> Result<Machine, BuildError> {
        Machine::build(&self.name, program)
    }
}

impl Executor for Machine {
    fn step(&mut self) {
        match self {
            Machine::Ast(executor) => executor.step(),
            Machine::Bytecode(executor) => executor.step(),
            Machine::Jit(executor) => executor.step(),
        }
    }

    fn reset(&mut self) {
        match self {
            Machine::Ast(executor) => executor.reset(),
            Machine::Bytecode(executor) => executor.reset(),
            Machine::Jit(executor) => executor.reset(),
        }
    }

    fn diagnostic_checksum(&self) -> u64 {
        match self {
            Machine::Ast(executor) => executor.diagnostic_checksum(),
            Machine::Bytecode(executor) => executor.diagnostic_checksum(),
            Machine::Jit(executor) => executor.diagnostic_checksum(),
        }
    }
}

/// Runs `program` to completion (`program.checksum_delay` steps) on the
/// named executor and returns its checksum.
pub fn run_to_checksum(name: &str, program: Program) -> Result<u64, BuildError> {
    let steps = program.checksum_delay;
    let mut machine = Machine::build(name, program)?;
    for _ in 0..steps {
        machine.step();
    }
    Ok(machine.diagnostic_checksum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_program() -> Program {
        crate::parser::parse(
            "Begin in state A.\n\
             Perform a diagnostic checksum after 6 steps.\n\
             \n\
             In state A:\n\
             \x20 If the current value is 0:\n\
             \x20\x20- Write the value 1.\n\
             \x20\x20- Move one slot to the right.\n\
             \x20\x20- Continue with state B.\n\
             \x20 If the current value is 1:\n\
             \x20\x20- Write the value 0.\n\
             \x20\x20- Move one slot to the left.\n\
             \x20\x20- Continue with state B.\n\
             \n\
             In state B:\n\
             \x20 If the current value is 0:\n\
             \x20\x20- Write the value 1.\n\
             \x20\x20- Move one slot to the left.\n\
             \x20\x20- Continue with state A.\n\
             \x20 If the current value is 1:\n\
             \x20\x20- Write the value 1.\n\
             \x20\x20- Move one slot to the right.\n\
             \x20\x20- Continue with state A.\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn unknown_executor_name_is_rejected() {
        let err = Machine::build("nonsense", sample_program()).unwrap_err();
        assert!(matches!(err, BuildError::UnknownExecutor(name) if name == "nonsense"));
    }

    #[test]
    fn every_registered_executor_agrees_on_the_sample_program() {
        for name in EXECUTOR_NAMES {
            let checksum = run_to_checksum(name, sample_program()).unwrap();
            assert_eq!(checksum, 3, "executor {name} disagreed with the AoC sample checksum");
        }
    }

    #[test]
    fn builder_defers_the_program_until_build() {
        let builder = Machine::builder("ast");
        let mut machine = builder.build(sample_program()).unwrap();
        for _ in 0..6 {
            machine.step();
        }
        assert_eq!(machine.diagnostic_checksum(), 3);
    }

    #[test]
    fn reset_restores_a_fresh_checksum() {
        for name in EXECUTOR_NAMES {
            let mut machine = Machine::build(name, sample_program()).unwrap();
            for _ in 0..6 {
                machine.step();
            }
            assert_eq!(machine.diagnostic_checksum(), 3);
            machine.reset();
            assert_eq!(machine.diagnostic_checksum(), 0);
            for _ in 0..6 {
                machine.step();
            }
            assert_eq!(machine.diagnostic_checksum(), 3);
        }
    }
}
