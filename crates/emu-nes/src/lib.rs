//! NES processing core.
//!
//! Wires the 2A03's 6502 core and the 2C02 PPU together through the CPU
//! address space. The PPU runs three dots per CPU cycle (crystal/4 against
//! crystal/12), so [`Nes::step`] runs one instruction and then
//! `3 * cycles` PPU dots.
//!
//! One frame = 341 PPU dots × 262 scanlines = 89,342 PPU cycles.

mod bus;
mod cartridge;
mod config;
mod error;
mod nes;

pub use bus::{DMA_STALL_CYCLES, NesBus, Route};
pub use cartridge::{Mapper, Nrom};
pub use config::{NesConfig, UnmappedWritePolicy};
pub use error::NesError;
pub use nes::Nes;
pub use ricoh_ppu_2c02::Mirroring;
