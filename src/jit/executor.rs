//! Compiles a [`Program`] into native code, one function per state.
//!
//! Ported from `original_source/day25/include/jit_executor.hpp` +
//! `src/lib/jit_executor.cpp`. Each compiled `state_<name>` function reads
//! the tape cell at the current offset, writes, adjusts the offset (with
//! wraparound), and stores the address of the *next* state's function into
//! a shared `state_func` cell before returning. [`JitExecutor::step`] then
//! just calls through whatever address that cell currently holds — the
//! generated code chains itself without the host ever inspecting state
//! names.

use std::ffi::CStr;

use crate::executor::Executor;
use crate::jit::assembler::{AssemblerError, Condition, Indirect, Jit, Register};
use crate::program::{Program, State, StateAction};

/// `mov al, [r10+r11]` — a byte-register addressing mode the high-level
/// builder doesn't expose, emitted as raw bytes like the original.
const READ_CELL: [u8; 4] = [0x43, 0x8a, 0x04, 0x1a];
/// `mov [r10+r11], al`.
const WRITE_CELL: [u8; 4] = [0x43, 0x88, 0x04, 0x1a];

fn emit_mov_al_imm8(jit: &mut Jit, value: u8) -> Result<(), AssemblerError> {
    jit.emit(&[0xb0, value])
}

/// Emits the tail of one action branch: write the cell, fix up the
/// offset, persist it, and hand off to the next state.
fn emit_action(
    jit: &mut Jit,
    action: &StateAction,
    state_name: &str,
    slot: u8,
    after_label: &str,
) -> Result<(), AssemblerError> {
    emit_mov_al_imm8(jit, action.write_value)?;
    jit.emit(&WRITE_CELL)?;

    let skip_fix = format!("_state_{state_name}_{slot}_offset_fixed");
    if action.move_direction > 0 {
        jit.emit_inc(Register::R10)?;
        jit.emit_cmp_reg(Register::R10, Register::R15)?;
        jit.emit_jcc_symbol(Condition::Less, &skip_fix)?;
        jit.emit_sub_reg(Register::R10, Register::R15)?;
    } else {
        jit.emit_dec(Register::R10)?;
        jit.emit_cmp_imm(Register::R10, 0)?;
        jit.emit_jcc_symbol(Condition::GreaterEqual, &skip_fix)?;
        jit.emit_add_reg(Register::R10, Register::R15)?;
    }
    jit.emit_symbol(&skip_fix)?;

    jit.emit_mov_store(Indirect::base(Register::R9), Register::R10)?;

    jit.emit_mov_symbol_addr(Register::Rax, &format!("name_{}", action.next_state))?;
    jit.emit_mov_store(Indirect::base(Register::R12), Register::Rax)?;

    jit.emit_mov_symbol_addr(Register::Rax, &format!("state_{}", action.next_state))?;
    jit.emit_mov_store(Indirect::base(Register::R14), Register::Rax)?;

    jit.emit_jmp_symbol(after_label)
}

/// Register roles held for the whole lifetime of a compiled state
/// function: R9 = &tape_offset, R10 = tape_offset, R11 = &tape,
/// R12 = &state_name, R13 unused, R14 = &state_func, R15 = tape_size.
fn compile_state(jit: &mut Jit, name: &str, state: &State) -> Result<(), AssemblerError> {
    jit.emit_function(&format!("state_{name}"), 3, |jit, _name, _end_label| {
        jit.emit_mov_symbol_addr(Register::R9, "tape_offset")?;
        jit.emit_mov_load(Register::R10, Indirect::base(Register::R9))?;
        jit.emit_mov_symbol_addr(Register::R11, "tape")?;
        jit.emit_mov_symbol_addr(Register::R15, "tape_size")?;
        jit.emit_mov_load(Register::R15, Indirect::base(Register::R15))?;
        jit.emit_mov_symbol_addr(Register::R12, "state_name")?;
        jit.emit_mov_symbol_addr(Register::R14, "state_func")?;

        // Byte loads don't clear the upper 32 bits of RAX.
        jit.emit_mov_imm64(Register::Rax, 0)?;
        jit.emit(&READ_CELL)?;
        jit.emit_cmp_imm(Register::Rax, 0)?;

        let if1_label = format!("_state_{name}_if1");
        let after_label = format!("_state_{name}_after");
        jit.emit_jcc_symbol(Condition::NotEqual, &if1_label)?;

        emit_action(jit, state.action_for(0), name, 0, &after_label)?;

        jit.emit_symbol(&if1_label)?;
        emit_action(jit, state.action_for(1), name, 1, &after_label)?;

        jit.emit_symbol(&after_label)?;
        jit.emit_mov_imm64(Register::Rax, 0)
    })
}

/// Runs a compiled program by calling through a native function pointer
/// each step.
pub struct JitExecutor {
    jit: Jit,
    tape: Box<[u8]>,
    tape_size_cell: Box<u64>,
    tape_offset_cell: Box<u64>,
    state_name_cell: Box<u64>,
    state_func_cell: Box<u64>,
    initial_func_address: u64,
    initial_name_address: u64,
}

impl JitExecutor {
    pub fn new(program: Program) -> Result<Self, AssemblerError> {
        let mut jit = Jit::new()?;
        let tape = vec![0u8; program.checksum_delay as usize].into_boxed_slice();
        let tape_size_cell = Box::new(u64::from(program.checksum_delay));
        let tape_offset_cell = Box::new(0u64);
        let state_name_cell = Box::new(0u64);
        let state_func_cell = Box::new(0u64);

        // Safety: each boxed cell and the tape buffer outlive `jit` (they
        // are fields of the struct returned below, dropped only after
        // `jit` itself) and are never reallocated or moved out of their
        // box after this point.
        unsafe {
            jit.emit_symbol_external("tape", tape.as_ptr())?;
            jit.emit_symbol_external("tape_size", &*tape_size_cell as *const u64 as *const u8)?;
            jit.emit_symbol_external(
                "tape_offset",
                &*tape_offset_cell as *const u64 as *const u8,
            )?;
            jit.emit_symbol_external("state_name", &*state_name_cell as *const u64 as *const u8)?;
            jit.emit_symbol_external("state_func", &*state_func_cell as *const u64 as *const u8)?;
        }

        for name in program.state_order() {
            jit.add_constant(&format!("name_{name}"), name)?;
        }
        for name in program.state_order() {
            let state = &program.states[name];
            compile_state(&mut jit, name, state)?;
        }

        jit.finalize_code()?;

        let initial_func_symbol = format!("state_{}", program.initial_state);
        let initial_name_symbol = format!("name_{}", program.initial_state);
        let initial_func_address = jit
            .symbol_address(&initial_func_symbol)
            .expect("initial state was just compiled") as u64;
        let initial_name_address = jit
            .symbol_address(&initial_name_symbol)
            .expect("initial state constant was just registered") as u64;

        let mut executor = JitExecutor {
            jit,
            tape,
            tape_size_cell,
            tape_offset_cell,
            state_name_cell,
            state_func_cell,
            initial_func_address,
            initial_name_address,
        };
        executor.reset_registers();
        Ok(executor)
    }

    fn reset_registers(&mut self) {
        *self.tape_offset_cell = 0;
        *self.state_name_cell = self.initial_name_address;
        *self.state_func_cell = self.initial_func_address;
    }

    /// The name of the state about to execute, read back through the
    /// `state_name` cell — for debugging, not used by any checksum.
    pub fn current_state_name(&self) -> String {
        let ptr = *self.state_name_cell as *const i8;
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    /// Exposes the underlying assembler, e.g. to dump emitted bytes.
    pub fn jit(&self) -> &Jit {
        &self.jit
    }
}

impl Executor for JitExecutor {
    fn step(&mut self) {
        let target = *self.state_func_cell as *const u8;
        // Safety: `target` always points at the entry of a `state_<name>`
        // function compiled and finalized by `new`; every such function
        // takes no arguments and returns nothing.
        unsafe {
            let call: extern "sysv64" fn() = std::mem::transmute(target);
            call();
        }
    }

    fn reset(&mut self) {
        self.tape.iter_mut().for_each(|cell| *cell = 0);
        self.reset_registers();
    }

    fn diagnostic_checksum(&self) -> u64 {
        self.tape.iter().map(|&cell| u64::from(cell)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn sample_program() -> Program {
        parse(
            "Begin in state A.\n\
             Perform a diagnostic checksum after 6 steps.\n\
             In state A:\n\
             \x20 If the current value is 0:\n\
             \x20\x20- Write the value 1.\n\
             \x20\x20- Move one slot to the right.\n\
             \x20\x20- Continue with state B.\n\
             \x20 If the current value is 1:\n\
             \x20\x20- Write the value 0.\n\
             \x20\x20- Move one slot to the left.\n\
             \x20\x20- Continue with state B.\n\
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
    fn matches_the_sample_checksum() {
        let mut executor = JitExecutor::new(sample_program()).unwrap();
        for _ in 0..6 {
            executor.step();
        }
        assert_eq!(executor.diagnostic_checksum(), 3);
    }

    #[test]
    fn reset_restores_the_initial_state_name() {
        let mut executor = JitExecutor::new(sample_program()).unwrap();
        for _ in 0..6 {
            executor.step();
        }
        executor.reset();
        assert_eq!(executor.diagnostic_checksum(), 0);
        assert_eq!(executor.current_state_name(), "A");
    }

    #[test]
    fn erase_after_write_zeroes_the_checksum() {
        let program = parse(
            "Begin in state A.\n\
             Perform a diagnostic checksum after 3 steps.\n\
             In state A:\n\
             \x20 If the current value is 0:\n\
             \x20\x20- Write the value 0.\n\
             \x20\x20- Move one slot to the right.\n\
             \x20\x20- Continue with state A.\n\
             \x20 If the current value is 1:\n\
             \x20\x20- Write the value 0.\n\
             \x20\x20- Move one slot to the right.\n\
             \x20\x20- Continue with state A.\n"
                .as_bytes(),
        )
        .unwrap();
        let mut executor = JitExecutor::new(program).unwrap();
        for _ in 0..3 {
            executor.step();
        }
        assert_eq!(executor.diagnostic_checksum(), 0);
    }
}
