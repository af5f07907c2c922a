//! Execution limits for the Neo Virtual Machine.

use crate::error::{VmError, VmResult};

/// Restrictions on the VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct ExecutionEngineLimits {
    /// The maximum number of items on the evaluation and alt stacks combined.
    pub max_stack_size: usize,

    /// The maximum size of a byte array item in bytes.
    pub max_item_size: usize,

    /// The maximum number of frames allowed on the invocation stack.
    pub max_invocation_stack_size: usize,

    /// The maximum number of elements in an array, struct or map.
    pub max_array_size: usize,

    /// The maximum size of an integer result in bytes.
    pub max_integer_size: usize,

    /// The maximum shift count for SHL and SHR.
    pub max_shift: usize,
}

impl ExecutionEngineLimits {
    /// The default execution engine limits.
    pub const DEFAULT: Self = Self {
        max_stack_size: 2048,
        max_item_size: 1024 * 1024,
        max_invocation_stack_size: 1024,
        max_array_size: 1024,
        max_integer_size: 32,
        max_shift: 256,
    };

    /// Loads limits from a TOML document. Missing keys keep their defaults.
    #[cfg(feature = "serde-types")]
    pub fn from_toml_str(source: &str) -> VmResult<Self> {
        toml::from_str(source).map_err(|e| VmError::InvalidConfig(e.to_string()))
    }

    /// Fails when a byte array of `size` bytes is over the item size limit.
    pub fn check_item_size(&self, size: usize) -> VmResult<()> {
        if size > self.max_item_size {
            return Err(VmError::ItemTooLarge {
                size,
                limit: self.max_item_size,
            });
        }
        Ok(())
    }

    /// Fails when a container of `size` elements is over the array size limit.
    pub fn check_array_size(&self, size: usize) -> VmResult<()> {
        if size > self.max_array_size {
            return Err(VmError::ArrayTooLarge {
                size,
                limit: self.max_array_size,
            });
        }
        Ok(())
    }
}

impl Default for ExecutionEngineLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ExecutionEngineLimits::default();
        assert_eq!(limits.max_stack_size, 2048);
        assert_eq!(limits.max_item_size, 1024 * 1024);
        assert_eq!(limits.max_invocation_stack_size, 1024);
        assert_eq!(limits.max_array_size, 1024);
        assert_eq!(limits.max_integer_size, 32);
        assert_eq!(limits.max_shift, 256);
    }

    #[test]
    fn test_size_checks() {
        let limits = ExecutionEngineLimits::DEFAULT;
        assert!(limits.check_item_size(1024 * 1024).is_ok());
        assert!(limits.check_item_size(1024 * 1024 + 1).is_err());
        assert!(limits.check_array_size(1024).is_ok());
        assert!(matches!(
            limits.check_array_size(1025),
            Err(VmError::ArrayTooLarge { size: 1025, limit: 1024 })
        ));
    }

    #[cfg(feature = "serde-types")]
    #[test]
    fn test_from_toml_partial() {
        let limits = ExecutionEngineLimits::from_toml_str(
            r#"
            max_stack_size = 16
            max_shift = 64
            "#,
        )
        .expect("valid toml");

        assert_eq!(limits.max_stack_size, 16);
        assert_eq!(limits.max_shift, 64);
        assert_eq!(limits.max_array_size, 1024);
    }

    #[cfg(feature = "serde-types")]
    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            ExecutionEngineLimits::from_toml_str("max_stack_size = \"big\""),
            Err(VmError::InvalidConfig(_))
        ));
    }
}
