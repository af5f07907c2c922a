//! Compound-type operations for the Neo Virtual Machine.
//!
//! Arrays and structs share the [`Array`] representation. Structs placed into
//! a container are copied first, so every container holds its own structs.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::instruction::Instruction;
use crate::op_code::OpCode;
use crate::stack_item::{Array, Map, StackItem};
use num_bigint::BigInt;

/// Pops a key for PICKITEM, SETITEM, REMOVE and HASKEY.
fn pop_key(engine: &mut ExecutionEngine) -> VmResult<StackItem> {
    let key = engine.pop()?;
    if key.is_container() {
        return Err(VmError::InvalidKey(key.type_name().to_string()));
    }
    Ok(key)
}

/// Resolves `key` to an index into `array`.
fn array_index(array: &Array, key: &StackItem) -> VmResult<usize> {
    let index = big_integer::to_i64(&key.as_int()?)?;
    match usize::try_from(index) {
        Ok(i) if i < array.len() => Ok(i),
        _ => Err(VmError::IndexOutOfRange {
            index,
            count: array.len(),
        }),
    }
}

/// Rejects storing `value` into `container` when `container` is reachable
/// from `value`; reference-counted containers cannot be cyclic.
fn check_acyclic(container: &StackItem, value: &StackItem) -> VmResult<()> {
    if value.reaches(container) {
        return Err(VmError::invalid_operation_msg(format!(
            "{} cannot contain itself",
            container.type_name()
        )));
    }
    Ok(())
}

/// Implements the ARRAYSIZE operation.
pub fn array_size(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.pop()?;
    let size = match &item {
        StackItem::Array(array) => array.len(),
        StackItem::Map(map) => map.len(),
        other => other.as_bytes()?.len(),
    };
    engine.push_int(BigInt::from(size))
}

/// Implements the PACK operation. The first item popped becomes index 0.
pub fn pack(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let size = super::pop_index(engine)?;
    engine.limits().check_array_size(size)?;
    engine.evaluation_stack().require(size)?;

    let items = (0..size)
        .map(|_| engine.pop())
        .collect::<VmResult<Vec<_>>>()?;
    engine.push(StackItem::from_array(items))
}

/// Implements the UNPACK operation.
pub fn unpack(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.pop()?;
    let array = item.as_array()?;
    let items = array.to_vec();
    let count = items.len();
    for item in items.into_iter().rev() {
        engine.evaluation_stack_mut().push(item);
    }
    engine.push_int(BigInt::from(count))
}

/// Implements the PICKITEM operation.
pub fn pick_item(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let key = pop_key(engine)?;
    let collection = engine.pop()?;
    let item = match &collection {
        StackItem::Array(array) => {
            let index = array_index(array, &key)?;
            array.get(index).ok_or(VmError::IndexOutOfRange {
                index: index as i64,
                count: array.len(),
            })?
        }
        StackItem::Map(map) => map.get(&key)?.ok_or(VmError::KeyNotFound)?,
        other => return Err(VmError::invalid_type("Array or Map", other.type_name())),
    };
    engine.evaluation_stack_mut().push(item);
    Ok(())
}

/// Implements the SETITEM operation.
pub fn set_item(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let value = engine.pop()?.for_storage();
    let key = pop_key(engine)?;
    let collection = engine.pop()?;
    check_acyclic(&collection, &value)?;
    match &collection {
        StackItem::Array(array) => {
            let index = array_index(array, &key)?;
            array.set(index, value);
            Ok(())
        }
        StackItem::Map(map) => {
            if !map.contains_key(&key)? {
                engine.limits().check_array_size(map.len() + 1)?;
            }
            map.insert(key, value)
        }
        other => Err(VmError::invalid_type("Array or Map", other.type_name())),
    }
}

/// Implements the NEWARRAY and NEWSTRUCT operations.
///
/// An array operand is converted to the requested kind, sharing its items;
/// a count operand creates that many `false` items.
pub fn new_array(engine: &mut ExecutionEngine, instruction: &Instruction) -> VmResult<()> {
    let is_struct = instruction.opcode() == OpCode::NEWSTRUCT;
    engine.evaluation_stack().require(1)?;

    if let StackItem::Array(array) = engine.peek(0)? {
        let converted = array.to_kind(is_struct);
        engine.evaluation_stack_mut().drop(1)?;
        return engine.push(StackItem::Array(converted));
    }

    let count = super::pop_index(engine)?;
    engine.limits().check_array_size(count)?;
    let items = vec![StackItem::false_value(); count];
    engine.push(StackItem::Array(Array::new(items, is_struct)))
}

/// Implements the NEWMAP operation.
pub fn new_map(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    engine.push(StackItem::Map(Map::new()))
}

/// Implements the APPEND operation.
pub fn append(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.pop()?.for_storage();
    let target = engine.pop()?;
    let array = target.as_array()?;
    engine.limits().check_array_size(array.len() + 1)?;
    check_acyclic(&target, &item)?;
    array.push(item);
    Ok(())
}

/// Implements the REVERSE operation.
pub fn reverse(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let target = engine.pop()?;
    target.as_array()?.reverse();
    Ok(())
}

/// Implements the REMOVE operation. Removing a missing map key is not an
/// error.
pub fn remove(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let key = pop_key(engine)?;
    let collection = engine.pop()?;
    match &collection {
        StackItem::Array(array) => {
            let index = array_index(array, &key)?;
            array.remove(index);
            Ok(())
        }
        StackItem::Map(map) => {
            map.remove(&key)?;
            Ok(())
        }
        other => Err(VmError::invalid_type("Array or Map", other.type_name())),
    }
}

/// Implements the HASKEY operation.
pub fn has_key(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let key = pop_key(engine)?;
    let collection = engine.pop()?;
    let found = match &collection {
        StackItem::Array(array) => {
            let index = big_integer::to_i64(&key.as_int()?)?;
            if index < 0 {
                return Err(VmError::NegativeOperand(index.to_string()));
            }
            (index as u64) < array.len() as u64
        }
        StackItem::Map(map) => map.contains_key(&key)?,
        other => return Err(VmError::invalid_type("Array or Map", other.type_name())),
    };
    engine.push_bool(found)
}

/// Implements the KEYS operation.
pub fn keys(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.pop()?;
    let keys = item.as_map()?.keys();
    engine.push(StackItem::from_array(keys))
}

/// Implements the VALUES operation.
pub fn values(engine: &mut ExecutionEngine, _instruction: &Instruction) -> VmResult<()> {
    let item = engine.pop()?;
    let values = match &item {
        StackItem::Array(array) => array.to_vec(),
        StackItem::Map(map) => map.values(),
        other => return Err(VmError::invalid_type("Array or Map", other.type_name())),
    };
    let values = values.iter().map(StackItem::for_storage).collect::<Vec<_>>();
    engine.push(StackItem::from_array(values))
}
