//! Splice operations for the Neo Virtual Machine.
//!
//! Operands are converted before anything is popped, so a failing splice
//! leaves the evaluation stack as it was.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use crate::stack_item::StackItem;
use num_bigint::BigInt;

fn peek_length(engine: &ExecutionEngine, depth: usize) -> VmResult<usize> {
    let value = big_integer::to_i64(&engine.peek_int(depth)?)?;
    usize::try_from(value).map_err(|_| VmError::NegativeOperand(value.to_string()))
}

/// Implements the CAT operation.
pub fn cat(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.peek_bytes(0)?;
    let mut x1 = engine.peek_bytes(1)?;
    engine.limits().check_item_size(x1.len() + x2.len())?;

    engine.evaluation_stack_mut().drop(2)?;
    x1.extend_from_slice(&x2);
    engine.push(StackItem::from_bytes(x1))
}

/// Implements the SUBSTR operation.
///
/// A count running past the end is cut at the end of the string.
pub fn substr(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(3)?;
    let count = peek_length(engine, 0)?;
    let index = peek_length(engine, 1)?;
    let x = engine.peek_bytes(2)?;
    if index > x.len() {
        return Err(VmError::IndexOutOfRange {
            index: index as i64,
            count: x.len(),
        });
    }
    let end = index + count.min(x.len() - index);

    engine.evaluation_stack_mut().drop(3)?;
    engine.push(StackItem::from_bytes(x[index..end].to_vec()))
}

/// Implements the LEFT operation.
pub fn left(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let count = peek_length(engine, 0)?;
    let x = engine.peek_bytes(1)?;
    let end = count.min(x.len());

    engine.evaluation_stack_mut().drop(2)?;
    engine.push(StackItem::from_bytes(x[..end].to_vec()))
}

/// Implements the RIGHT operation.
pub fn right(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let count = peek_length(engine, 0)?;
    let x = engine.peek_bytes(1)?;
    if count > x.len() {
        return Err(VmError::IndexOutOfRange {
            index: count as i64,
            count: x.len(),
        });
    }

    engine.evaluation_stack_mut().drop(2)?;
    engine.push(StackItem::from_bytes(x[x.len() - count..].to_vec()))
}

/// Implements the SIZE operation.
pub fn size(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let len = engine.pop_bytes()?.len();
    engine.push_int(BigInt::from(len))
}
