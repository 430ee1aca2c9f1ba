//! Bus fault types.

use std::fmt;

use thiserror::Error;

/// Direction of a faulting access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// A memory access the machine cannot complete.
///
/// Reads never fabricate a value: if nothing answers at an address the
/// access fails and the caller decides whether the machine can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// No device decodes this address.
    #[error("unmapped {access} at ${addr:04X}")]
    Unmapped { addr: u16, access: Access },

    /// Offset past the end of a backing store.
    #[error("offset {offset:#06X} out of bounds for {len}-byte memory")]
    OutOfBounds { offset: usize, len: usize },
}
