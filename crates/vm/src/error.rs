//! Error types for the Neo Virtual Machine.
//!
//! Every instruction handler returns [`VmResult`]. The execution engine turns
//! any `Err` into the terminal FAULT state and keeps the error as the fault
//! reason.

use crate::op_code::OpCode;
use thiserror::Error;

/// Result type used by the VM.
pub type VmResult<T> = std::result::Result<T, VmError>;

/// Errors raised while decoding or executing a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// The byte at the instruction pointer is not a defined opcode.
    #[error("Invalid opcode 0x{opcode:02X} at position {position}")]
    InvalidOpcode { opcode: u8, position: usize },

    /// The script ends before the operand of an instruction.
    #[error("Truncated operand for {opcode:?} at position {position}")]
    TruncatedOperand { opcode: OpCode, position: usize },

    /// A jump or call target lies outside the script.
    #[error("Invalid jump target {target} (script length {length})")]
    InvalidJump { target: isize, length: usize },

    /// The instruction pointer moved past the end of the script.
    #[error("Instruction pointer {position} is beyond the script (length {length})")]
    InstructionPointerOutOfRange { position: usize, length: usize },

    /// An operation needed more items than the stack holds.
    #[error("Stack underflow: required {required}, available {available}")]
    StackUnderflow { required: usize, available: usize },

    /// An index operand addressed a position outside a stack or container.
    #[error("Index {index} out of range (count {count})")]
    IndexOutOfRange { index: i64, count: usize },

    /// An index or count operand was negative where it must not be.
    #[error("Negative operand: {0}")]
    NegativeOperand(String),

    /// An item could not be converted to the type an operation requires.
    #[error("Invalid type: expected {expected}, found {found}")]
    InvalidType { expected: String, found: String },

    /// An integer operand does not fit the native range an operation needs.
    #[error("Integer operand out of range: {0}")]
    InvalidOperand(String),

    /// DIV or MOD with a zero divisor.
    #[error("Division by zero")]
    DivisionByZero,

    /// SHL or SHR with a shift outside the permitted range.
    #[error("Invalid shift {shift} (allowed 0..={max})")]
    InvalidShift { shift: String, max: usize },

    /// An arithmetic result exceeds the integer size limit.
    #[error("Integer of {size} bytes exceeds limit {limit}")]
    IntegerTooLarge { size: usize, limit: usize },

    /// The evaluation and alt stacks together exceed the stack size limit.
    #[error("Stack size {size} exceeds limit {limit}")]
    StackOverflow { size: usize, limit: usize },

    /// A byte array exceeds the item size limit.
    #[error("Item of {size} bytes exceeds limit {limit}")]
    ItemTooLarge { size: usize, limit: usize },

    /// A container exceeds the array size limit.
    #[error("Container of {size} elements exceeds limit {limit}")]
    ArrayTooLarge { size: usize, limit: usize },

    /// The invocation stack exceeds its depth limit.
    #[error("Invocation depth {depth} exceeds limit {limit}")]
    InvocationStackOverflow { depth: usize, limit: usize },

    /// APPCALL or TAILCALL without a script table.
    #[error("No script table is available")]
    MissingScriptTable,

    /// APPCALL or TAILCALL with a hash the script table does not resolve.
    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    /// SYSCALL names are 1..=252 ASCII bytes.
    #[error("Invalid syscall name: {0}")]
    InvalidSyscallName(String),

    /// SYSCALL of a name missing from the interop registry.
    #[error("Unknown syscall: {0}")]
    UnknownSyscall(String),

    /// An interop handler reported failure.
    #[error("Interop method {0} failed")]
    InteropFailed(String),

    /// A push-only context met a non-push instruction.
    #[error("{opcode:?} is not allowed in a push-only script")]
    PushOnlyViolation { opcode: OpCode },

    /// THROW or a failed THROWIFNOT.
    #[error("Script raised an exception via {0:?}")]
    Throw(OpCode),

    /// A map key of a type that cannot be used as a key.
    #[error("Invalid map key: {0}")]
    InvalidKey(String),

    /// A map lookup for a key that is not present.
    #[error("Key not found")]
    KeyNotFound,

    /// An operation that is not valid in the current engine state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Stack item serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The engine configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VmError {
    /// Creates a stack underflow error.
    pub fn stack_underflow(required: usize, available: usize) -> Self {
        Self::StackUnderflow {
            required,
            available,
        }
    }

    /// Creates an invalid type error.
    pub fn invalid_type(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidType {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation_msg(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Creates a serialization error.
    pub fn serialization_msg(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
