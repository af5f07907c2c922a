//! Bitwise logic operations for the Neo Virtual Machine.

use crate::execution_engine::ExecutionEngine;
use crate::error::VmResult;
use crate::instruction::Instruction;
use num_bigint::BigInt;

fn binary(engine: &mut ExecutionEngine, op: impl Fn(BigInt, BigInt) -> BigInt) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.peek_int(0)?;
    let x1 = engine.peek_int(1)?;
    engine.evaluation_stack_mut().drop(2)?;
    engine.push_int(op(x1, x2))
}

/// Implements the INVERT operation.
pub fn invert(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let x = engine.pop_int()?;
    engine.push_int(!x)
}

/// Implements the AND operation.
pub fn and(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| a & b)
}

/// Implements the OR operation.
pub fn or(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| a | b)
}

/// Implements the XOR operation.
pub fn xor(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| a ^ b)
}

/// Implements the EQUAL operation.
pub fn equal(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.pop()?;
    let x1 = engine.pop()?;
    engine.push_bool(x1.equals(&x2))
}
