//! Core traits and types shared by the NES processing core.
//!
//! The CPU sees the machine as one flat 16-bit address space. Everything
//! behind an address (RAM, PPU ports, cartridge) is reached through
//! [`AddressSpace`], and every access can fail with a [`BusError`].

mod bus;
mod cpu;
mod error;
mod memory;
mod observable;

pub use bus::AddressSpace;
pub use cpu::Cpu;
pub use error::{Access, BusError};
pub use memory::Memory;
pub use observable::{Observable, Value};
