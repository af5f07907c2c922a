//! Host objects carried on the stack.

use std::any::Any;
use std::fmt;

/// A trait for interop interfaces that can be wrapped by a stack item.
///
/// The engine never inspects the payload; it only keeps it alive while some
/// stack or container references it.
pub trait InteropInterface: fmt::Debug {
    /// Gets the type name of the interop interface.
    fn interface_type(&self) -> &str;

    /// Allows downcasting to concrete types.
    fn as_any(&self) -> &dyn Any;

    /// Equality used by EQUAL and map lookups. Defaults to identity.
    fn equals(&self, other: &dyn InteropInterface) -> bool {
        std::ptr::eq(
            self.as_any() as *const dyn Any as *const (),
            other.as_any() as *const dyn Any as *const (),
        )
    }
}
