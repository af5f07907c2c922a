//! Binary serialization of stack items.
//!
//! Layout: one type byte, then
//! - ByteArray / Integer: var-bytes payload
//! - Boolean: one byte, 0 or 1
//! - Array / Struct: var-int count, then the elements
//! - Map: var-int count, then key and value per entry
//!
//! Interop handles and containers that appear more than once (including
//! cycles) cannot be serialized.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::limits::ExecutionEngineLimits;
use crate::stack_item::{Array, Map, StackItem, StackItemType};
use std::collections::HashSet;

/// Serializes `item`. The output may not exceed `limits.max_item_size`.
pub fn serialize(item: &StackItem, limits: &ExecutionEngineLimits) -> VmResult<Vec<u8>> {
    let mut writer = Vec::new();
    let mut seen: HashSet<*const ()> = HashSet::new();
    let mut pending = vec![item.clone()];

    while let Some(item) = pending.pop() {
        writer.push(item.stack_item_type() as u8);
        match &item {
            StackItem::ByteArray(bytes) => write_var_bytes(&mut writer, bytes),
            StackItem::Integer(value) => write_var_bytes(&mut writer, &big_integer::encode(value)),
            StackItem::Boolean(value) => writer.push(u8::from(*value)),
            StackItem::Array(array) => {
                if !seen.insert(array.as_ptr()) {
                    return Err(VmError::serialization_msg("container referenced more than once"));
                }
                let items = array.to_vec();
                write_var_int(&mut writer, items.len() as u64);
                pending.extend(items.into_iter().rev());
            }
            StackItem::Map(map) => {
                if !seen.insert(map.as_ptr()) {
                    return Err(VmError::serialization_msg("container referenced more than once"));
                }
                let entries = map.entries();
                write_var_int(&mut writer, entries.len() as u64);
                for (key, value) in entries.into_iter().rev() {
                    pending.push(value);
                    pending.push(key);
                }
            }
            StackItem::Interop(_) => {
                return Err(VmError::serialization_msg("interop items are not serializable"));
            }
        }

        if writer.len() > limits.max_item_size {
            return Err(VmError::ItemTooLarge {
                size: writer.len(),
                limit: limits.max_item_size,
            });
        }
    }

    Ok(writer)
}

enum Pending {
    Item(StackItem),
    Container { kind: StackItemType, count: usize },
}

/// Deserializes one item occupying all of `data`.
pub fn deserialize(data: &[u8], limits: &ExecutionEngineLimits) -> VmResult<StackItem> {
    if data.len() > limits.max_item_size {
        return Err(VmError::ItemTooLarge {
            size: data.len(),
            limit: limits.max_item_size,
        });
    }

    let mut reader = Reader { data, position: 0 };
    let mut pending = Vec::new();
    let mut remaining = 1usize;

    while remaining > 0 {
        remaining -= 1;
        let tag = reader.read_u8()?;
        let kind = StackItemType::try_from(tag)
            .map_err(|_| VmError::serialization_msg(format!("unknown type byte 0x{tag:02X}")))?;

        match kind {
            StackItemType::ByteArray => {
                pending.push(Pending::Item(StackItem::ByteArray(reader.read_var_bytes(limits)?)))
            }
            StackItemType::Integer => {
                let bytes = reader.read_var_bytes(limits)?;
                if bytes.len() > limits.max_integer_size {
                    return Err(VmError::IntegerTooLarge {
                        size: bytes.len(),
                        limit: limits.max_integer_size,
                    });
                }
                pending.push(Pending::Item(StackItem::Integer(big_integer::decode(&bytes))))
            }
            StackItemType::Boolean => {
                let value = match reader.read_u8()? {
                    0 => false,
                    1 => true,
                    other => {
                        return Err(VmError::serialization_msg(format!(
                            "invalid boolean byte 0x{other:02X}"
                        )))
                    }
                };
                pending.push(Pending::Item(StackItem::Boolean(value)))
            }
            StackItemType::Array | StackItemType::Struct | StackItemType::Map => {
                let count = reader.read_var_int(limits.max_array_size as u64)? as usize;
                limits.check_array_size(count)?;
                remaining += if kind == StackItemType::Map { count * 2 } else { count };
                pending.push(Pending::Container { kind, count });
            }
            StackItemType::InteropInterface => {
                return Err(VmError::serialization_msg("interop items are not serializable"))
            }
        }
    }

    if reader.position != data.len() {
        return Err(VmError::serialization_msg(format!(
            "{} trailing bytes",
            data.len() - reader.position
        )));
    }

    // Rebuild bottom-up: walking the pre-order list backwards, every
    // container finds its children on top of the stack.
    let mut built: Vec<StackItem> = Vec::new();
    for entry in pending.into_iter().rev() {
        match entry {
            Pending::Item(item) => built.push(item),
            Pending::Container { kind, count } => {
                let item = if kind == StackItemType::Map {
                    let map = Map::new();
                    for _ in 0..count {
                        let key = pop_built(&mut built)?;
                        let value = pop_built(&mut built)?;
                        map.insert(key, value)?;
                    }
                    StackItem::Map(map)
                } else {
                    let mut items = Vec::with_capacity(count);
                    for _ in 0..count {
                        items.push(pop_built(&mut built)?);
                    }
                    StackItem::Array(Array::new(items, kind == StackItemType::Struct))
                };
                built.push(item);
            }
        }
    }

    match (built.pop(), built.is_empty()) {
        (Some(item), true) => Ok(item),
        _ => Err(VmError::serialization_msg("malformed item tree")),
    }
}

fn pop_built(built: &mut Vec<StackItem>) -> VmResult<StackItem> {
    built
        .pop()
        .ok_or_else(|| VmError::serialization_msg("malformed item tree"))
}

fn write_var_int(writer: &mut Vec<u8>, value: u64) {
    if value < 0xFD {
        writer.push(value as u8);
    } else if value <= 0xFFFF {
        writer.push(0xFD);
        writer.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xFFFF_FFFF {
        writer.push(0xFE);
        writer.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        writer.push(0xFF);
        writer.extend_from_slice(&value.to_le_bytes());
    }
}

fn write_var_bytes(writer: &mut Vec<u8>, bytes: &[u8]) {
    write_var_int(writer, bytes.len() as u64);
    writer.extend_from_slice(bytes);
}

struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn read_bytes(&mut self, count: usize) -> VmResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| VmError::serialization_msg("unexpected end of data"))?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> VmResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_var_int(&mut self, max: u64) -> VmResult<u64> {
        let value = match self.read_u8()? {
            0xFD => u16::from_le_bytes([self.read_u8()?, self.read_u8()?]) as u64,
            0xFE => {
                let mut buffer = [0u8; 4];
                buffer.copy_from_slice(self.read_bytes(4)?);
                u32::from_le_bytes(buffer) as u64
            }
            0xFF => {
                let mut buffer = [0u8; 8];
                buffer.copy_from_slice(self.read_bytes(8)?);
                u64::from_le_bytes(buffer)
            }
            small => small as u64,
        };
        if value > max {
            return Err(VmError::serialization_msg(format!(
                "length {value} exceeds {max}"
            )));
        }
        Ok(value)
    }

    fn read_var_bytes(&mut self, limits: &ExecutionEngineLimits) -> VmResult<Vec<u8>> {
        let length = self.read_var_int(limits.max_item_size as u64)? as usize;
        Ok(self.read_bytes(length)?.to_vec())
    }
}
