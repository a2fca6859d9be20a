//! A 16-bit-per-state bytecode executor.
//!
//! Each state compiles to one `u16`: the low byte encodes the action for
//! cell value 0, the high byte encodes the action for cell value 1. Each
//! action byte packs `write_value` (bit 0), `move_direction` (bit 1, 1 =
//! right) and the next state's index (bits 2-6, five bits, so at most 32
//! states). Ported from
//! `original_source/day25/include/bytecode_executor.hpp` +
//! `src/lib/bytecode_executor.cpp`, including its encode/decode
//! round-trip self-check.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::executor::Executor;
use crate::program::{Program, StateAction};

const MAX_STATES: usize = 32;

#[derive(Debug)]
pub enum BytecodeError {
    TooManyStates(usize),
    EncodingRoundTripMismatch { state: String, slot: u8 },
}

impl fmt::Display for BytecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BytecodeError::TooManyStates(count) => write!(
                f,
                "Program has {count} states; the bytecode executor supports at most {MAX_STATES}."
            ),
            BytecodeError::EncodingRoundTripMismatch { state, slot } => write!(
                f,
                "Bug: decoding the bytecode instruction for state {state} slot {slot} did not yield the original encoder input."
            ),
        }
    }
}

impl Error for BytecodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DecodedAction {
    write_value: u8,
    move_direction: i8,
    next_state_index: u8,
}

fn encode_action(action: &StateAction, index_of: &HashMap<String, u8>) -> u8 {
    let write_bit = action.write_value & 1;
    let move_bit = u8::from(action.move_direction > 0);
    let index = index_of[&action.next_state];
    write_bit | (move_bit << 1) | (index << 2)
}

fn decode_action(byte: u8) -> DecodedAction {
    DecodedAction {
        write_value: byte & 1,
        move_direction: if (byte >> 1) & 1 == 1 { 1 } else { -1 },
        next_state_index: byte >> 2,
    }
}

/// Runs a compiled program one transition at a time, reading a single
/// 16-bit word per step.
pub struct BytecodeExecutor {
    words: Vec<u16>,
    initial_state: u8,
    checksum_delay: u32,
    memory: Vec<u8>,
    offset: usize,
    state: u8,
}

impl BytecodeExecutor {
    pub fn new(program: Program) -> Result<Self, BytecodeError> {
        let names: Vec<String> = program.state_order().cloned().collect();
        if names.len() > MAX_STATES {
            return Err(BytecodeError::TooManyStates(names.len()));
        }
        let index_of: HashMap<String, u8> = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index as u8))
            .collect();

        let mut words = Vec::with_capacity(names.len());
        for name in &names {
            let state = &program.states[name];
            let mut word = 0u16;
            for (slot, shift) in [(0u8, 0u16), (1u8, 8u16)] {
                let action = state.action_for(slot);
                let byte = encode_action(action, &index_of);
                let decoded = decode_action(byte);
                let expected = DecodedAction {
                    write_value: action.write_value,
                    move_direction: action.move_direction,
                    next_state_index: index_of[&action.next_state],
                };
                if decoded != expected {
                    return Err(BytecodeError::EncodingRoundTripMismatch {
                        state: name.clone(),
                        slot,
                    });
                }
                word |= u16::from(byte) << shift;
            }
            words.push(word);
        }

        let initial_state = index_of[&program.initial_state];
        let checksum_delay = program.checksum_delay;
        let memory = vec![0u8; checksum_delay as usize];
        Ok(BytecodeExecutor {
            words,
            initial_state,
            checksum_delay,
            memory,
            offset: 0,
            state: initial_state,
        })
    }
}

impl Executor for BytecodeExecutor {
    fn step(&mut self) {
        let cell = self.memory[self.offset];
        let word = self.words[self.state as usize];
        let byte = if cell == 0 {
            (word & 0xff) as u8
        } else {
            (word >> 8) as u8
        };
        let decoded = decode_action(byte);
        self.memory[self.offset] = decoded.write_value;

        let delay = i64::from(self.checksum_delay);
        let next = self.offset as i64 + i64::from(decoded.move_direction);
        self.offset = (((next % delay) + delay) % delay) as usize;
        self.state = decoded.next_state_index;
    }

    fn reset(&mut self) {
        self.memory.iter_mut().for_each(|cell| *cell = 0);
        self.offset = 0;
        self.state = self.initial_state;
    }

    fn diagnostic_checksum(&self) -> u64 {
        self.memory.iter().map(|&cell| u64::from(cell)).sum()
    }
}
