//! Stack operations for the Neo Virtual Machine.
//!
//! Index operands are popped before the operation runs, so a failing index
//! still leaves the operand consumed.

use super::pop_index;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use num_bigint::BigInt;

/// Implements the DUPFROMALTSTACK operation.
pub fn dup_from_alt_stack(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.alt_stack().peek(0)?.clone();
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the TOALTSTACK operation.
pub fn to_alt_stack(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.pop()?;
    engine.alt_stack_mut().push(item);
    Ok(())
}

/// Implements the FROMALTSTACK operation.
pub fn from_alt_stack(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.alt_stack_mut().pop()?;
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the XDROP operation.
pub fn xdrop(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let n = pop_index(engine)?;
    engine.evaluation_stack_mut().remove(n)?;
    Ok(())
}

/// Implements the XSWAP operation.
pub fn xswap(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let n = pop_index(engine)?;
    if n == 0 {
        return Ok(());
    }
    engine.evaluation_stack_mut().swap(0, n)
}

/// Implements the XTUCK operation.
pub fn xtuck(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let n = pop_index(engine)?;
    if n == 0 {
        return Err(VmError::IndexOutOfRange {
            index: 0,
            count: engine.evaluation_stack().count(),
        });
    }
    let item = engine.peek(0)?.clone();
    engine.evaluation_stack_mut().insert(n, item)
}

/// Implements the DEPTH operation.
pub fn depth(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let count = engine.evaluation_stack().count();
    engine.push_int(BigInt::from(count))
}

/// Implements the DROP operation.
pub fn drop(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.pop()?;
    Ok(())
}

/// Implements the DUP operation.
pub fn dup(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.peek(0)?.clone();
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the NIP operation.
pub fn nip(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack_mut().remove(1)?;
    Ok(())
}

/// Implements the OVER operation.
pub fn over(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.peek(1)?.clone();
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the PICK operation.
pub fn pick(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let n = pop_index(engine)?;
    let item = engine.peek(n)?.clone();
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the ROLL operation.
pub fn roll(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let n = pop_index(engine)?;
    if n == 0 {
        return Ok(());
    }
    let item = engine.evaluation_stack_mut().remove(n)?;
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the ROT operation.
pub fn rot(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let stack = engine.evaluation_stack_mut();
    let item = stack.remove(2)?;
    stack.push(item);
    Ok(())
}

/// Implements the SWAP operation.
pub fn swap(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack_mut().swap(0, 1)
}

/// Implements the TUCK operation.
pub fn tuck(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let stack = engine.evaluation_stack_mut();
    stack.require(2)?;
    let item = stack.peek(0)?.clone();
    stack.insert(2, item)
}
