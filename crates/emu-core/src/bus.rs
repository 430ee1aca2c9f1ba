//! CPU-side address space interface.

use crate::BusError;

/// A 16-bit, byte-addressed address space.
///
/// Implementors decode addresses and route them to the backing device.
/// The 16-bit accessors are built from [`read8`](Self::read8) and
/// [`write8`](Self::write8) and are little-endian.
///
/// Reads take `&mut self` because some devices (PPU status, PPUDATA)
/// change state when read. [`peek8`](Self::peek8) is the side-effect-free
/// variant used by debuggers and tracers.
pub trait AddressSpace {
    /// Read a byte.
    fn read8(&mut self, addr: u16) -> Result<u8, BusError>;

    /// Write a byte.
    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError>;

    /// Read a byte without disturbing device state.
    ///
    /// Returns `None` where a read would have side effects or nothing is
    /// mapped.
    fn peek8(&self, addr: u16) -> Option<u8>;

    /// Read a little-endian word from `addr` and `addr + 1`.
    fn read16(&mut self, addr: u16) -> Result<u16, BusError> {
        let lo = self.read8(addr)?;
        let hi = self.read8(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Read a word the way the 6502 does for `JMP ($xxFF)` and the
    /// zero-page indirect modes: the high byte comes from the same page.
    fn read16_bug(&mut self, addr: u16) -> Result<u16, BusError> {
        let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let lo = self.read8(addr)?;
        let hi = self.read8(hi_addr)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a little-endian word, low byte first.
    fn write16(&mut self, addr: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo)?;
        self.write8(addr.wrapping_add(1), hi)
    }
}
