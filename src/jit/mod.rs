//! The hand-rolled x86-64 JIT: a raw encoder ([`assembler`]) and the
//! tape-machine compiler built on top of it ([`executor`]).

pub mod assembler;
pub mod executor;

pub use assembler::{AssemblerError, Condition, Indirect, Jit, Register, SymbolLocation};
pub use executor::JitExecutor;
