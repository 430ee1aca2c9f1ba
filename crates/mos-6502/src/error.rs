//! CPU fault type.

use emu_core::BusError;
use thiserror::Error;

/// A fault that stops the CPU. The machine is not resumed after one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The byte at PC is not a documented opcode.
    #[error("illegal opcode ${opcode:02X} at PC=${pc:04X}")]
    IllegalOpcode { opcode: u8, pc: u16 },

    /// A memory access made by the instruction at `pc` failed.
    #[error("bus fault at PC=${pc:04X}: {source}")]
    Bus {
        pc: u16,
        #[source]
        source: BusError,
    },
}
