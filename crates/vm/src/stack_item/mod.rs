//! Stack item module for the Neo Virtual Machine.
//!
//! This module provides the stack item types used in the Neo VM.

pub mod array;
pub mod interop_interface;
pub mod map;
pub mod serialization;
#[allow(clippy::module_inception)]
pub mod stack_item;
pub mod stack_item_type;

pub use array::Array;
pub use interop_interface::InteropInterface;
pub use map::Map;
pub use stack_item::{count_items, StackItem};
pub use stack_item_type::StackItemType;
