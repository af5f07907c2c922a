//! Stack item implementation for the Neo Virtual Machine.
//!
//! This module provides the value type carried by the evaluation stack.

use crate::big_integer;
use crate::error::{VmError, VmResult};
use crate::stack_item::array::Array;
use crate::stack_item::interop_interface::InteropInterface;
use crate::stack_item::map::Map;
use crate::stack_item::stack_item_type::StackItemType;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Represents a value in the Neo VM.
///
/// Cloning is cheap: containers and interop handles are reference counted and
/// a clone refers to the same storage.
#[derive(Clone)]
pub enum StackItem {
    /// Represents a boolean value.
    Boolean(bool),

    /// Represents an integer value.
    Integer(BigInt),

    /// Represents a byte array.
    ByteArray(Vec<u8>),

    /// Represents an array or struct of stack items.
    Array(Array),

    /// Represents a map of stack items.
    Map(Map),

    /// Represents an opaque host object.
    Interop(Rc<dyn InteropInterface>),
}

impl StackItem {
    /// The singleton True value.
    pub fn true_value() -> Self {
        StackItem::Boolean(true)
    }

    /// The singleton False value.
    pub fn false_value() -> Self {
        StackItem::Boolean(false)
    }

    /// Creates a boolean stack item.
    pub fn from_bool(value: bool) -> Self {
        StackItem::Boolean(value)
    }

    /// Creates an integer stack item.
    pub fn from_int<T: Into<BigInt>>(value: T) -> Self {
        StackItem::Integer(value.into())
    }

    /// Creates a byte array stack item.
    pub fn from_bytes<T: Into<Vec<u8>>>(value: T) -> Self {
        StackItem::ByteArray(value.into())
    }

    /// Creates a new array stack item.
    pub fn from_array<T: Into<Vec<StackItem>>>(value: T) -> Self {
        StackItem::Array(Array::new_array(value.into()))
    }

    /// Creates a new struct stack item.
    pub fn from_struct<T: Into<Vec<StackItem>>>(value: T) -> Self {
        StackItem::Array(Array::new_struct(value.into()))
    }

    /// Creates a new empty map stack item.
    pub fn new_map() -> Self {
        StackItem::Map(Map::new())
    }

    /// Creates an interop interface stack item.
    pub fn from_interface<T: InteropInterface + 'static>(value: T) -> Self {
        StackItem::Interop(Rc::new(value))
    }

    /// Returns the type of the stack item.
    pub fn stack_item_type(&self) -> StackItemType {
        match self {
            StackItem::Boolean(_) => StackItemType::Boolean,
            StackItem::Integer(_) => StackItemType::Integer,
            StackItem::ByteArray(_) => StackItemType::ByteArray,
            StackItem::Array(a) if a.is_struct() => StackItemType::Struct,
            StackItem::Array(_) => StackItemType::Array,
            StackItem::Map(_) => StackItemType::Map,
            StackItem::Interop(_) => StackItemType::InteropInterface,
        }
    }

    /// Returns a short name of the item type for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self.stack_item_type() {
            StackItemType::ByteArray => "ByteArray",
            StackItemType::Boolean => "Boolean",
            StackItemType::Integer => "Integer",
            StackItemType::InteropInterface => "InteropInterface",
            StackItemType::Array => "Array",
            StackItemType::Struct => "Struct",
            StackItemType::Map => "Map",
        }
    }

    /// Converts the stack item to a boolean.
    ///
    /// A byte array is true when any byte is nonzero; containers and interop
    /// handles are always true.
    pub fn as_bool(&self) -> bool {
        match self {
            StackItem::Boolean(b) => *b,
            StackItem::Integer(i) => !i.is_zero(),
            StackItem::ByteArray(bytes) => bytes.iter().any(|&byte| byte != 0),
            StackItem::Array(_) | StackItem::Map(_) | StackItem::Interop(_) => true,
        }
    }

    /// Converts the stack item to an integer.
    pub fn as_int(&self) -> VmResult<BigInt> {
        match self {
            StackItem::Boolean(true) => Ok(BigInt::one()),
            StackItem::Boolean(false) => Ok(BigInt::zero()),
            StackItem::Integer(i) => Ok(i.clone()),
            StackItem::ByteArray(bytes) => Ok(big_integer::decode(bytes)),
            other => Err(VmError::invalid_type("Integer", other.type_name())),
        }
    }

    /// Converts the stack item to a byte array.
    pub fn as_bytes(&self) -> VmResult<Vec<u8>> {
        match self {
            StackItem::Boolean(true) => Ok(vec![1]),
            StackItem::Boolean(false) => Ok(Vec::new()),
            StackItem::Integer(i) => Ok(big_integer::encode(i)),
            StackItem::ByteArray(bytes) => Ok(bytes.clone()),
            other => Err(VmError::invalid_type("ByteArray", other.type_name())),
        }
    }

    /// Returns the array or struct behind this item.
    pub fn as_array(&self) -> VmResult<&Array> {
        match self {
            StackItem::Array(array) => Ok(array),
            other => Err(VmError::invalid_type("Array", other.type_name())),
        }
    }

    /// Returns the map behind this item.
    pub fn as_map(&self) -> VmResult<&Map> {
        match self {
            StackItem::Map(map) => Ok(map),
            other => Err(VmError::invalid_type("Map", other.type_name())),
        }
    }

    /// Downcasts an interop item to a concrete host type.
    pub fn as_interface<T: InteropInterface + 'static>(&self) -> Option<&T> {
        match self {
            StackItem::Interop(interface) => interface.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns true for Array, Struct and Map items.
    pub fn is_container(&self) -> bool {
        matches!(self, StackItem::Array(_) | StackItem::Map(_))
    }

    /// Returns the item to store when placing `self` into a container. Structs
    /// are copied; everything else is stored by reference.
    pub fn for_storage(&self) -> StackItem {
        match self {
            StackItem::Array(array) if array.is_struct() => StackItem::Array(array.clone_struct()),
            other => other.clone(),
        }
    }

    /// Checks if two stack items are equal.
    ///
    /// Primitives compare by byte form, structs structurally, arrays and maps
    /// by reference and interop handles through the host type.
    pub fn equals(&self, other: &StackItem) -> bool {
        match (self, other) {
            (StackItem::Array(a), StackItem::Array(b)) => {
                if a.is_struct() && b.is_struct() {
                    a.struct_equals(b)
                } else {
                    a.ptr_eq(b)
                }
            }
            (StackItem::Map(a), StackItem::Map(b)) => a.ptr_eq(b),
            (StackItem::Interop(a), StackItem::Interop(b)) => a.equals(b.as_ref()),
            (a, b) if a.stack_item_type().is_primitive() && b.stack_item_type().is_primitive() => {
                match (a, b) {
                    (StackItem::Integer(x), StackItem::Integer(y)) => x == y,
                    (StackItem::Boolean(x), StackItem::Boolean(y)) => x == y,
                    _ => a.as_bytes().ok() == b.as_bytes().ok(),
                }
            }
            _ => false,
        }
    }

    fn container_ptr(&self) -> Option<*const ()> {
        match self {
            StackItem::Array(array) => Some(array.as_ptr()),
            StackItem::Map(map) => Some(map.as_ptr()),
            _ => None,
        }
    }

    /// Returns true if `target` is `self` or is reachable through the
    /// containers nested in `self`.
    pub fn reaches(&self, target: &StackItem) -> bool {
        let Some(target) = target.container_ptr() else {
            return false;
        };
        let mut seen = HashSet::new();
        let mut pending = vec![self.clone()];
        while let Some(item) = pending.pop() {
            let Some(ptr) = item.container_ptr() else {
                continue;
            };
            if ptr == target {
                return true;
            }
            if seen.insert(ptr) {
                push_child_containers(&item, &mut pending);
            }
        }
        false
    }
}

fn push_child_containers(item: &StackItem, out: &mut Vec<StackItem>) {
    match item {
        StackItem::Array(array) => out.extend(
            array
                .items()
                .iter()
                .filter(|child| child.is_container())
                .cloned(),
        ),
        StackItem::Map(map) => out.extend(
            map.values()
                .into_iter()
                .filter(StackItem::is_container),
        ),
        _ => {}
    }
}

/// Counts `roots` plus every element of the containers reachable from them.
/// A container shared by several parents contributes its elements once.
///
/// Counting stops as soon as the total exceeds `limit`.
pub fn count_items<'a>(roots: impl IntoIterator<Item = &'a StackItem>, limit: usize) -> usize {
    let mut count = 0;
    let mut seen = HashSet::new();
    let mut pending = Vec::new();

    for root in roots {
        count += 1;
        if root.is_container() {
            pending.push(root.clone());
        }
    }

    while let Some(item) = pending.pop() {
        if count > limit {
            break;
        }
        let Some(ptr) = item.container_ptr() else {
            continue;
        };
        if !seen.insert(ptr) {
            continue;
        }
        count += match &item {
            StackItem::Array(array) => array.len(),
            StackItem::Map(map) => map.len(),
            _ => 0,
        };
        push_child_containers(&item, &mut pending);
    }
    count
}

/// Drops `pending` and every container only it keeps alive without
/// recursing through nested destructors.
pub(crate) fn release(mut pending: Vec<StackItem>) {
    while let Some(item) = pending.pop() {
        match &item {
            StackItem::Array(array) => array.take_unique_items(&mut pending),
            StackItem::Map(map) => map.take_unique_values(&mut pending),
            _ => {}
        }
    }
}

impl PartialEq for StackItem {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            StackItem::Integer(i) => write!(f, "Integer({i})"),
            StackItem::ByteArray(bytes) => {
                write!(f, "ByteArray(")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                write!(f, ")")
            }
            StackItem::Array(array) => fmt::Debug::fmt(array, f),
            StackItem::Map(map) => fmt::Debug::fmt(map, f),
            StackItem::Interop(interface) => {
                write!(f, "Interop({})", interface.interface_type())
            }
        }
    }
}

impl From<bool> for StackItem {
    fn from(value: bool) -> Self {
        StackItem::Boolean(value)
    }
}

impl From<BigInt> for StackItem {
    fn from(value: BigInt) -> Self {
        StackItem::Integer(value)
    }
}

impl From<i64> for StackItem {
    fn from(value: i64) -> Self {
        StackItem::Integer(BigInt::from(value))
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(value: Vec<u8>) -> Self {
        StackItem::ByteArray(value)
    }
}

impl From<Array> for StackItem {
    fn from(value: Array) -> Self {
        StackItem::Array(value)
    }
}

impl From<Map> for StackItem {
    fn from(value: Map) -> Self {
        StackItem::Map(value)
    }
}
