//! # turingc
//!
//! **turingc** is a small exploratory execution environment for the
//! AoC-2017-day-25-style tape-machine puzzle: a tiny declarative language
//! describes a finite-state tape machine, and this crate runs it to produce
//! a diagnostic checksum under three interchangeable execution strategies.
//!
//! ## Engines
//!
//! - [`executors::ast`] — direct AST interpreter; the behavioral oracle.
//! - [`executors::bytecode`] — compiles each state to a 16-bit word.
//! - [`jit::executor`] — assembles each state into native x86-64 machine
//!   code and calls through it directly.
//!
//! All three implement the same [`executor::Executor`] trait and are
//! expected to produce bit-identical tapes for any valid program.
//!
//! ## Usage
//!
//! ```rust
//! use turingc::{parser, executor::Machine, executor::Executor};
//!
//! let program = parser::parse(
//!     "Begin in state A.\n\
//!      Perform a diagnostic checksum after 6 steps.\n\
//!      In state A:\n\
//!      \x20 If the current value is 0:\n\
//!      \x20\x20- Write the value 1.\n\
//!      \x20\x20- Move one slot to the right.\n\
//!      \x20\x20- Continue with state B.\n\
//!      \x20 If the current value is 1:\n\
//!      \x20\x20- Write the value 0.\n\
//!      \x20\x20- Move one slot to the left.\n\
//!      \x20\x20- Continue with state B.\n\
//!      In state B:\n\
//!      \x20 If the current value is 0:\n\
//!      \x20\x20- Write the value 1.\n\
//!      \x20\x20- Move one slot to the left.\n\
//!      \x20\x20- Continue with state A.\n\
//!      \x20 If the current value is 1:\n\
//!      \x20\x20- Write the value 1.\n\
//!      \x20\x20- Move one slot to the right.\n\
//!      \x20\x20- Continue with state A.\n"
//!         .as_bytes(),
//! )
//! .unwrap();
//! let mut machine = Machine::build("ast", program).unwrap();
//! for _ in 0..6 {
//!     machine.step();
//! }
//! assert_eq!(machine.diagnostic_checksum(), 3);
//! ```
//!
//! ## Crate organization
//!
//! - `tokenizer` / `parser` / `program`: load a program off disk.
//! - `executor`: the shared `Executor` trait, the `Machine` dispatch enum,
//!   and the name-based registry.
//! - `executors`: the AST and bytecode engines.
//! - `jit`: the hand-rolled x86-64 assembler and the state-to-native-code
//!   compiler built on top of it.
//! - `codegen_c`: emits an equivalent standalone C program.
//!
//! ## License
//!
//! Licensed under MIT or Apache-2.0.

pub mod codegen_c;
pub mod executor;
pub mod executors;
pub mod jit;
pub mod parser;
pub mod program;
pub mod tokenizer;

pub use executor::{Builder, Executor, Machine};
pub use program::Program;
