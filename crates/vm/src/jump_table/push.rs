//! Push operations for the Neo Virtual Machine.
//!
//! This module provides the push operation handlers for the Neo VM.

use crate::error::VmResult;
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use crate::stack_item::StackItem;
use num_bigint::BigInt;

/// Implements the PUSH0 operation.
pub fn push0(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.push(StackItem::from_bytes(Vec::new()))
}

/// Implements the PUSHBYTES1..PUSHBYTES75 and PUSHDATA1/2/4 operations.
pub fn push_data(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    engine.push(StackItem::from_bytes(instruction.operand().to_vec()))
}

/// Implements the PUSHM1 and PUSH1..PUSH16 operations.
pub fn push_int(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    // PUSH1 is 0x51, so the value is the distance from 0x50.
    let value = i32::from(instruction.opcode().as_u8()) - 0x50;
    engine.push(StackItem::Integer(BigInt::from(value)))
}
