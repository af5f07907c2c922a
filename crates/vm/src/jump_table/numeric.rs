//! Numeric operations for the Neo Virtual Machine.
//!
//! Operands and results are bounded by the integer size limit. Binary
//! operations convert both operands before either is popped.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, Zero};

fn unary(engine: &mut ExecutionEngine, op: impl FnOnce(BigInt) -> BigInt) -> VmResult<()> {
    let x = engine.pop_int()?;
    engine.push_int(op(x))
}

fn binary(
    engine: &mut ExecutionEngine,
    op: impl FnOnce(BigInt, BigInt) -> VmResult<BigInt>,
) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.peek_int(0)?;
    let x1 = engine.peek_int(1)?;
    let result = op(x1, x2)?;
    engine.evaluation_stack_mut().drop(2)?;
    engine.push_int(result)
}

fn compare(engine: &mut ExecutionEngine, op: impl FnOnce(&BigInt, &BigInt) -> bool) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.peek_int(0)?;
    let x1 = engine.peek_int(1)?;
    engine.evaluation_stack_mut().drop(2)?;
    engine.push_bool(op(&x1, &x2))
}

/// Implements the INC operation.
pub fn inc(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    unary(engine, |x| x + 1)
}

/// Implements the DEC operation.
pub fn dec(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    unary(engine, |x| x - 1)
}

/// Implements the SIGN operation.
pub fn sign(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    unary(engine, |x| match x.sign() {
        Sign::Minus => -BigInt::one(),
        Sign::NoSign => BigInt::zero(),
        Sign::Plus => BigInt::one(),
    })
}

/// Implements the NEGATE operation.
pub fn negate(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    unary(engine, |x| -x)
}

/// Implements the ABS operation.
pub fn abs(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    unary(engine, |x| x.abs())
}

/// Implements the NOT operation.
pub fn not(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let x = engine.pop_bool()?;
    engine.push_bool(!x)
}

/// Implements the NZ operation.
pub fn nz(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let x = engine.pop_int()?;
    engine.push_bool(!x.is_zero())
}

/// Implements the ADD operation.
pub fn add(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| Ok(a + b))
}

/// Implements the SUB operation.
pub fn sub(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| Ok(a - b))
}

/// Implements the MUL operation.
pub fn mul(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| Ok(a * b))
}

/// Implements the DIV operation. The quotient truncates toward zero.
pub fn div(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| {
        if b.is_zero() {
            return Err(VmError::DivisionByZero);
        }
        Ok(a / b)
    })
}

/// Implements the MOD operation. The remainder takes the sign of the dividend.
pub fn modulo(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| {
        if b.is_zero() {
            return Err(VmError::DivisionByZero);
        }
        Ok(a % b)
    })
}

fn pop_shift(engine: &mut ExecutionEngine) -> VmResult<usize> {
    let shift = engine.pop_int()?;
    big_integer::to_shift(&shift, engine.limits().max_shift)
}

/// Implements the SHL operation.
pub fn shl(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let shift = pop_shift(engine)?;
    if shift == 0 {
        return Ok(());
    }
    let x = engine.pop_int()?;
    engine.push_int(x << shift)
}

/// Implements the SHR operation. Negative values round toward negative
/// infinity.
pub fn shr(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let shift = pop_shift(engine)?;
    if shift == 0 {
        return Ok(());
    }
    let x = engine.pop_int()?;
    engine.push_int(x >> shift)
}

/// Implements the BOOLAND operation.
pub fn booland(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.pop_bool()?;
    let x1 = engine.pop_bool()?;
    engine.push_bool(x1 && x2)
}

/// Implements the BOOLOR operation.
pub fn boolor(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(2)?;
    let x2 = engine.pop_bool()?;
    let x1 = engine.pop_bool()?;
    engine.push_bool(x1 || x2)
}

/// Implements the NUMEQUAL operation.
pub fn numequal(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    compare(engine, |a, b| a == b)
}

/// Implements the NUMNOTEQUAL operation.
pub fn numnotequal(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    compare(engine, |a, b| a != b)
}

/// Implements the LT operation.
pub fn lt(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    compare(engine, |a, b| a < b)
}

/// Implements the GT operation.
pub fn gt(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    compare(engine, |a, b| a > b)
}

/// Implements the LTE operation.
pub fn lte(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    compare(engine, |a, b| a <= b)
}

/// Implements the GTE operation.
pub fn gte(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    compare(engine, |a, b| a >= b)
}

/// Implements the MIN operation.
pub fn min(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| Ok(a.min(b)))
}

/// Implements the MAX operation.
pub fn max(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    binary(engine, |a, b| Ok(a.max(b)))
}

/// Implements the WITHIN operation: `a <= x < b` for the stack `x a b`.
pub fn within(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.evaluation_stack().require(3)?;
    let b = engine.peek_int(0)?;
    let a = engine.peek_int(1)?;
    let x = engine.peek_int(2)?;
    engine.evaluation_stack_mut().drop(3)?;
    engine.push_bool(a <= x && x < b)
}

#[cfg(test)]
mod tests {
    use crate::error::VmError;
    use crate::execution_engine::ExecutionEngine;
    use crate::stack_item::StackItem;
    use crate::vm_state::VMState;
    use num_bigint::BigInt;

    fn run(script: Vec<u8>) -> ExecutionEngine {
        let mut engine = ExecutionEngine::default();
        engine.load_script(script).unwrap();
        engine.execute();
        engine
    }

    fn top(script: Vec<u8>) -> StackItem {
        let engine = run(script);
        assert_eq!(engine.state(), VMState::HALT, "fault: {:?}", engine.fault_reason());
        engine.peek(0).unwrap().clone()
    }

    #[test]
    fn test_unary_ops() {
        assert_eq!(top(vec![0x55, 0x8B]), StackItem::from_int(6));
        assert_eq!(top(vec![0x55, 0x8C]), StackItem::from_int(4));
        assert_eq!(top(vec![0x4F, 0x8D]), StackItem::from_int(-1));
        assert_eq!(top(vec![0x00, 0x8D]), StackItem::from_int(0));
        assert_eq!(top(vec![0x55, 0x8F]), StackItem::from_int(-5));
        assert_eq!(top(vec![0x4F, 0x90]), StackItem::from_int(1));
        assert_eq!(top(vec![0x00, 0x91]), StackItem::from_bool(true));
        assert_eq!(top(vec![0x55, 0x92]), StackItem::from_bool(true));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(top(vec![0x52, 0x53, 0x93]), StackItem::from_int(5));
        assert_eq!(top(vec![0x52, 0x53, 0x94]), StackItem::from_int(-1));
        assert_eq!(top(vec![0x52, 0x53, 0x95]), StackItem::from_int(6));
        assert_eq!(top(vec![0x57, 0x52, 0x96]), StackItem::from_int(3));
        assert_eq!(top(vec![0x57, 0x52, 0x97]), StackItem::from_int(1));
    }

    #[test]
    fn test_signed_division() {
        // -7 / 2 = -3, -7 % 2 = -1
        let minus_seven = vec![0x01, 0xF9];
        let mut script = minus_seven.clone();
        script.extend_from_slice(&[0x52, 0x96]);
        assert_eq!(top(script), StackItem::from_int(-3));

        let mut script = minus_seven;
        script.extend_from_slice(&[0x52, 0x97]);
        assert_eq!(top(script), StackItem::from_int(-1));
    }

    #[test]
    fn test_division_by_zero() {
        let engine = run(vec![0x51, 0x00, 0x96]);
        assert_eq!(engine.fault_reason(), Some(&VmError::DivisionByZero));
        assert_eq!(engine.evaluation_stack().count(), 2);

        let engine = run(vec![0x51, 0x00, 0x97]);
        assert_eq!(engine.fault_reason(), Some(&VmError::DivisionByZero));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(top(vec![0x51, 0x54, 0x98]), StackItem::from_int(16));
        assert_eq!(top(vec![0x60, 0x52, 0x99]), StackItem::from_int(4));
        assert_eq!(top(vec![0x4F, 0x51, 0x99]), StackItem::from_int(-1));

        // zero shift leaves a non-integer untouched
        let engine = run(vec![0xC7, 0x00, 0x98]);
        assert_eq!(engine.state(), VMState::HALT);
        assert!(matches!(engine.peek(0).unwrap(), StackItem::Map(_)));

        let engine = run(vec![0x51, 0x4F, 0x98]);
        assert!(matches!(engine.fault_reason(), Some(VmError::InvalidShift { .. })));
    }

    #[test]
    fn test_integer_size_limit() {
        // 1 << 255 needs 33 bytes
        let engine = run(vec![0x51, 0x02, 0xFF, 0x00, 0x98]);
        assert!(matches!(
            engine.fault_reason(),
            Some(VmError::IntegerTooLarge { size: 33, limit: 32 })
        ));

        let engine = run(vec![0x51, 0x02, 0xFE, 0x00, 0x98]);
        assert_eq!(engine.state(), VMState::HALT);
        assert_eq!(engine.peek(0).unwrap().as_int().unwrap(), BigInt::from(1) << 254);
    }

    #[test]
    fn test_boolean_logic() {
        assert_eq!(top(vec![0x51, 0x00, 0x9A]), StackItem::from_bool(false));
        assert_eq!(top(vec![0x51, 0x00, 0x9B]), StackItem::from_bool(true));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(top(vec![0x52, 0x52, 0x9C]), StackItem::from_bool(true));
        assert_eq!(top(vec![0x52, 0x53, 0x9E]), StackItem::from_bool(true));
        assert_eq!(top(vec![0x52, 0x53, 0x9F]), StackItem::from_bool(true));
        assert_eq!(top(vec![0x52, 0x53, 0xA0]), StackItem::from_bool(false));
        assert_eq!(top(vec![0x53, 0x53, 0xA1]), StackItem::from_bool(true));
        assert_eq!(top(vec![0x52, 0x53, 0xA2]), StackItem::from_bool(false));
        assert_eq!(top(vec![0x52, 0x53, 0xA3]), StackItem::from_int(2));
        assert_eq!(top(vec![0x52, 0x53, 0xA4]), StackItem::from_int(3));
    }

    #[test]
    fn test_within() {
        // x a b
        assert_eq!(top(vec![0x52, 0x52, 0x55, 0xA5]), StackItem::from_bool(true));
        assert_eq!(top(vec![0x55, 0x52, 0x55, 0xA5]), StackItem::from_bool(false));
        assert_eq!(top(vec![0x51, 0x52, 0x55, 0xA5]), StackItem::from_bool(false));
        assert_eq!(run(vec![0x52, 0x55, 0xA5]).state(), VMState::FAULT);
    }
}
