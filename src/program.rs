//! The parsed representation of a tape-machine program.
//!
//! Mirrors the C++ `day25::Program` / `State` / `StateAction` triad, but
//! keeps states in a [`BTreeMap`] so enumeration order is pinned to lexical
//! order of state names (see `SPEC_FULL.md`, "Decided open question").

use std::collections::BTreeMap;
use std::fmt;

/// A state name. The grammar restricts these to `[A-Za-z0-9]+`.
pub type Name = String;

/// One branch of a [`State`]: what to do when the current cell holds
/// `slot_condition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateAction {
    pub slot_condition: u8,
    pub write_value: u8,
    pub move_direction: i8,
    pub next_state: Name,
}

/// A named state, with one action per possible cell value (0 and 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub name: Name,
    pub actions: BTreeMap<u8, StateAction>,
}

impl State {
    pub fn action_for(&self, cell: u8) -> &StateAction {
        self.actions
            .get(&cell)
            .expect("parser guarantees both slot 0 and 1 are present")
    }
}

/// A fully parsed, validated tape-machine program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub initial_state: Name,
    pub checksum_delay: u32,
    pub states: BTreeMap<Name, State>,
}

impl Program {
    /// Enumeration order of state names, stable across runs. Every executor
    /// that needs to assign numeric indices to states (the bytecode
    /// executor, the C emitter) derives them from this order.
    pub fn state_order(&self) -> impl Iterator<Item = &Name> {
        self.states.keys()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program:")?;
        writeln!(f, "  Initial state: {}", self.initial_state)?;
        writeln!(f, "  Checksum after {} steps", self.checksum_delay)?;
        writeln!(f, "  States:")?;
        for (name, state) in &self.states {
            writeln!(f, "    {name}:")?;
            for (slot, action) in &state.actions {
                writeln!(f, "      If slot = {slot}:")?;
                writeln!(f, "        Write {}", action.write_value)?;
                writeln!(f, "        Move {}", action.move_direction)?;
                writeln!(f, "        Next state: {}", action.next_state)?;
            }
        }
        Ok(())
    }
}
