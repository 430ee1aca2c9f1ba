//! CPU core trait.

use crate::AddressSpace;

/// An instruction-stepped CPU core.
///
/// The address space is passed in, not owned, so the driver can share it
/// with other components (e.g., the video chip) between steps.
pub trait Cpu {
    /// Fault raised by a step that cannot complete.
    type Error: std::error::Error;

    /// One-time power-up sequence: load the reset vector and the initial
    /// register state.
    fn power_up<B: AddressSpace>(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Run one instruction (or pending interrupt) to completion.
    ///
    /// Returns the number of CPU cycles it took.
    fn step<B: AddressSpace>(&mut self, bus: &mut B) -> Result<u32, Self::Error>;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Request a non-maskable interrupt, serviced at the next step.
    fn nmi(&mut self);
}
