//! Instruction-stepped MOS 6502 CPU core.
//!
//! Each [`Mos6502::step`] runs one whole instruction against an
//! [`emu_core::AddressSpace`] and returns the instruction's base cycle
//! count from the opcode table. This is the 2A03 flavour found in the NES:
//! the D flag is stored but ADC/SBC are always binary.

mod cpu;
mod error;
mod execute;
pub mod flags;
pub mod instructions;
mod registers;
mod trace;

pub use cpu::Mos6502;
pub use error::CpuError;
pub use flags::{Flag, Status};
pub use instructions::{Instruction, Mnemonic, Mode};
pub use registers::{Registers, STACK_BASE};
