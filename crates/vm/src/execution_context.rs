//! Execution context module for the Neo Virtual Machine.
//!
//! A context is one frame of the invocation stack: a script and the position
//! of the next instruction in it.

use crate::error::VmResult;
use crate::instruction::Instruction;
use neo_cryptography::{hash160, HASH160_SIZE};
use once_cell::unsync::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Represents an execution context in the Neo Virtual Machine.
#[derive(Clone)]
pub struct ExecutionContext {
    /// The script, shared with every CALL frame created from it
    script: Rc<[u8]>,

    /// The position of the next instruction
    instruction_pointer: usize,

    /// Set for contexts that may only push data
    push_only: bool,

    /// `RIPEMD160(SHA256(script))`, computed on first use
    script_hash: OnceCell<[u8; HASH160_SIZE]>,
}

impl ExecutionContext {
    /// Creates a context positioned at the start of `script`.
    pub fn new(script: Rc<[u8]>, push_only: bool) -> Self {
        Self {
            script,
            instruction_pointer: 0,
            push_only,
            script_hash: OnceCell::new(),
        }
    }

    /// Creates a frame over the same script starting at `position`. The
    /// script hash is carried over.
    pub fn clone_at(&self, position: usize) -> Self {
        Self {
            script: Rc::clone(&self.script),
            instruction_pointer: position,
            push_only: self.push_only,
            script_hash: self.script_hash.clone(),
        }
    }

    /// Returns the script bytes.
    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Returns a shared handle to the script.
    pub fn script_rc(&self) -> Rc<[u8]> {
        Rc::clone(&self.script)
    }

    /// Returns the length of the script.
    pub fn script_len(&self) -> usize {
        self.script.len()
    }

    /// Returns the current instruction pointer.
    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    /// Sets the instruction pointer.
    pub fn set_instruction_pointer(&mut self, position: usize) {
        self.instruction_pointer = position;
    }

    /// Returns true if this context only accepts push instructions.
    pub fn is_push_only(&self) -> bool {
        self.push_only
    }

    /// Returns the script hash.
    pub fn script_hash(&self) -> [u8; HASH160_SIZE] {
        *self.script_hash.get_or_init(|| hash160(&self.script))
    }

    /// Returns true once the instruction pointer has reached the end of the
    /// script.
    pub fn at_end(&self) -> bool {
        self.instruction_pointer == self.script.len()
    }

    /// Decodes the instruction at the instruction pointer.
    pub fn current_instruction(&self) -> VmResult<Instruction> {
        Instruction::parse(&self.script, self.instruction_pointer)
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("script_len", &self.script.len())
            .field("instruction_pointer", &self.instruction_pointer)
            .field("push_only", &self.push_only)
            .finish()
    }
}
