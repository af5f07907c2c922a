//! Debugger for the Neo Virtual Machine.
//!
//! This module provides debugging functionality for the Neo VM.

use crate::execution_engine::ExecutionEngine;
use crate::vm_state::VMState;
use neo_cryptography::HASH160_SIZE;
use std::collections::{HashMap, HashSet};

/// Represents a breakpoint in the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    /// The hash160 of the script.
    script_hash: [u8; HASH160_SIZE],

    /// The instruction pointer.
    instruction_pointer: usize,
}

impl Breakpoint {
    /// Creates a new breakpoint.
    pub fn new(script_hash: [u8; HASH160_SIZE], instruction_pointer: usize) -> Self {
        Self {
            script_hash,
            instruction_pointer,
        }
    }

    /// Gets the script hash.
    pub fn script_hash(&self) -> &[u8; HASH160_SIZE] {
        &self.script_hash
    }

    /// Gets the instruction pointer.
    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }
}

/// Why [`Debugger::execute`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugStop {
    /// The next instruction sits on a breakpoint.
    Breakpoint(Breakpoint),

    /// The engine reached a terminal state.
    Finished(VMState),
}

/// Represents a debugger for the VM.
pub struct Debugger {
    /// The execution engine.
    engine: ExecutionEngine,

    /// Breakpoints per script hash.
    breakpoints: HashMap<[u8; HASH160_SIZE], HashSet<usize>>,
}

impl Debugger {
    /// Creates a new debugger with the specified execution engine.
    pub fn new(engine: ExecutionEngine) -> Self {
        Self {
            engine,
            breakpoints: HashMap::new(),
        }
    }

    /// Gets the execution engine.
    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    /// Gets a mutable reference to the execution engine.
    pub fn engine_mut(&mut self) -> &mut ExecutionEngine {
        &mut self.engine
    }

    /// Returns the engine, dropping the breakpoints.
    pub fn into_engine(self) -> ExecutionEngine {
        self.engine
    }

    /// Adds a breakpoint.
    pub fn add_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoints
            .entry(breakpoint.script_hash)
            .or_default()
            .insert(breakpoint.instruction_pointer);
    }

    /// Removes a breakpoint. Returns true if it was set.
    pub fn remove_breakpoint(&mut self, breakpoint: &Breakpoint) -> bool {
        let Some(positions) = self.breakpoints.get_mut(&breakpoint.script_hash) else {
            return false;
        };
        let removed = positions.remove(&breakpoint.instruction_pointer);
        if positions.is_empty() {
            self.breakpoints.remove(&breakpoint.script_hash);
        }
        removed
    }

    /// Clears all breakpoints.
    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// Gets all breakpoints.
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        self.breakpoints
            .iter()
            .flat_map(|(hash, positions)| {
                positions
                    .iter()
                    .map(move |&position| Breakpoint::new(*hash, position))
            })
            .collect()
    }

    /// Checks if a breakpoint exists at the specified location.
    pub fn has_breakpoint(&self, script_hash: &[u8; HASH160_SIZE], instruction_pointer: usize) -> bool {
        self.breakpoints
            .get(script_hash)
            .map_or(false, |positions| positions.contains(&instruction_pointer))
    }

    fn breakpoint_at_current(&self) -> Option<Breakpoint> {
        let context = self.engine.current_context()?;
        let breakpoint = Breakpoint::new(context.script_hash(), context.instruction_pointer());
        self.has_breakpoint(&breakpoint.script_hash, breakpoint.instruction_pointer)
            .then_some(breakpoint)
    }

    /// Executes until a breakpoint is reached or the engine terminates.
    ///
    /// The first instruction always runs, so calling this again after a
    /// breakpoint stop moves past it.
    pub fn execute(&mut self) -> DebugStop {
        if self.engine.state().is_terminal() {
            return DebugStop::Finished(self.engine.state());
        }

        self.engine.step_into();
        while self.engine.state().is_none() {
            if let Some(breakpoint) = self.breakpoint_at_current() {
                log::debug!("breakpoint at {}", breakpoint.instruction_pointer);
                return DebugStop::Breakpoint(breakpoint);
            }
            self.engine.step_into();
        }
        DebugStop::Finished(self.engine.state())
    }

    /// Executes a single instruction.
    pub fn step_into(&mut self) -> VMState {
        self.engine.step_into()
    }

    /// Executes a single instruction, running through any call it makes.
    pub fn step_over(&mut self) -> VMState {
        self.engine.step_over()
    }

    /// Executes until the current context returns.
    pub fn step_out(&mut self) -> VMState {
        self.engine.step_out()
    }
}
