//! VM state implementation.

/// Indicates the status of the VM.
///
/// NONE moves to HALT or FAULT exactly once; both are terminal.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VMState {
    /// Indicates that the execution is in progress or has not yet begun.
    #[default]
    NONE = 0,

    /// Indicates that the execution has been completed successfully.
    HALT = 1,

    /// Indicates that the execution has ended with an unrecoverable error.
    FAULT = 2,
}

impl VMState {
    #[inline]
    pub fn is_none(self) -> bool {
        self == VMState::NONE
    }

    #[inline]
    pub fn is_halt(self) -> bool {
        self == VMState::HALT
    }

    #[inline]
    pub fn is_fault(self) -> bool {
        self == VMState::FAULT
    }

    /// Returns true once the engine can no longer make progress.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_none()
    }
}
