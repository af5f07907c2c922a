//! Stack item type tags.

use num_enum::TryFromPrimitive;

/// The type tag of a stack item. The byte values are the serialization tags.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum StackItemType {
    ByteArray = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    InteropInterface = 0x40,
    Array = 0x80,
    Struct = 0x81,
    Map = 0x82,
}

impl StackItemType {
    /// Returns true for the types that carry a byte-array form.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            StackItemType::ByteArray | StackItemType::Boolean | StackItemType::Integer
        )
    }

    /// Returns true for Array, Struct and Map.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            StackItemType::Array | StackItemType::Struct | StackItemType::Map
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(StackItemType::try_from(0x81u8), Ok(StackItemType::Struct));
        assert!(StackItemType::try_from(0x03u8).is_err());
        assert!(StackItemType::Integer.is_primitive());
        assert!(StackItemType::Map.is_container());
        assert!(!StackItemType::InteropInterface.is_primitive());
        assert!(!StackItemType::InteropInterface.is_container());
    }
}
