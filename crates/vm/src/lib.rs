//! # Neo Legacy Virtual Machine
//!
//! A deterministic implementation of the Neo 2.x stack virtual machine.
//!
//! Scripts are byte strings of one-byte opcodes with inline operands. The
//! engine executes them against a shared evaluation stack and alt stack,
//! and ends in exactly one of two terminal states: HALT on success or FAULT
//! on any error. Every fault carries a [`VmError`] describing its cause.
//!
//! ## Features
//!
//! - **Complete Neo 2 opcode table**: constants, flow control, stack,
//!   splice, bitwise, arithmetic, crypto and compound-type operations
//! - **Resource limits**: stack, item, array, integer and invocation depth
//!   bounds, loadable from TOML
//! - **Host hooks**: script container, script table and a SYSCALL registry
//! - **Debugging**: breakpoints and step execution
//! - **Script building**: programmatic bytecode generation
//!
//! ## Architecture
//!
//! - **ExecutionEngine**: fetch-decode-execute loop and state management
//! - **ExecutionContext**: one frame on the invocation stack
//! - **EvaluationStack**: random-access stack shared by all frames
//! - **JumpTable**: opcode dispatch and handlers
//! - **StackItem**: polymorphic VM values
//! - **InteropService**: host methods reachable through SYSCALL
//!
//! ## Example
//!
//! ```rust
//! use neo_legacy_vm::{ExecutionEngine, OpCode, ScriptBuilder, StackItem, VMState};
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(2).emit_push_int(3).emit(OpCode::ADD);
//!
//! let mut engine = ExecutionEngine::default();
//! engine.load_script(builder.to_vec()).unwrap();
//!
//! assert_eq!(engine.execute(), VMState::HALT);
//! assert_eq!(engine.evaluation_stack().peek(0).unwrap(), &StackItem::from_int(5));
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

/// Integer codec shared by stack items and handlers
pub mod big_integer;
/// Debugging support with breakpoints and step execution
pub mod debugger;
/// VM error types and result handling
pub mod error;
/// Random-access stacks used for evaluation and invocation
pub mod evaluation_stack;
/// Script execution frames
pub mod execution_context;
/// The VM execution engine
pub mod execution_engine;
/// Generation-checked handles for embedders
pub mod handle_arena;
/// VM instruction decoding
pub mod instruction;
/// Interop service registry
pub mod interop_service;
/// OpCode handlers and instruction dispatch
pub mod jump_table;
/// Execution limits
pub mod limits;
/// VM opcode definitions and utilities
pub mod op_code;
/// Script container and script table providers
pub mod providers;
/// Utility for constructing VM bytecode
pub mod script_builder;
/// Polymorphic data types for VM values
pub mod stack_item;
/// VM execution states
pub mod vm_state;

pub use debugger::{Breakpoint, DebugStop, Debugger};
pub use error::{VmError, VmResult};
pub use evaluation_stack::{EvaluationStack, InvocationStack, RandomAccessStack};
pub use execution_context::ExecutionContext;
pub use execution_engine::ExecutionEngine;
pub use handle_arena::{Handle, HandleArena, HandleError};
pub use instruction::Instruction;
pub use interop_service::{InteropMethod, InteropService};
pub use jump_table::InstructionHandler;
pub use limits::ExecutionEngineLimits;
pub use op_code::OpCode;
pub use providers::{MemoryScriptTable, MessageContainer, ScriptContainer, ScriptContainerInterop, ScriptTable};
pub use script_builder::ScriptBuilder;
pub use stack_item::{Array, InteropInterface, Map, StackItem, StackItemType};
pub use vm_state::VMState;
