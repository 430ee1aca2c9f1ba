//! PPU-side address space: pattern tables on the cartridge, nametable RAM
//! and palette RAM inside the PPU.

/// Nametable mirroring mode, set by cartridge wiring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum Mirroring {
    #[default]
    Horizontal,
    Vertical,
    FourScreen,
    SingleScreenLower,
    SingleScreenUpper,
}

/// Cartridge CHR interface: pattern tables at PPU `$0000-$1FFF` plus the
/// nametable mirroring the cartridge selects.
///
/// `chr_read` takes `&mut self` because some mappers latch state on
/// pattern-table reads.
pub trait ChrBus {
    fn chr_read(&mut self, addr: u16) -> u8;
    fn chr_write(&mut self, addr: u16, value: u8);
    fn mirroring(&self) -> Mirroring;
}

/// Offset into the PPU's 2K (4K for four-screen) nametable RAM.
pub(crate) fn mirror_nametable_addr(addr: u16, mirroring: Mirroring) -> usize {
    let nt_addr = (addr - 0x2000) & 0x0FFF;
    let offset = match mirroring {
        // Nametables 0,1 -> page 0; 2,3 -> page 1
        Mirroring::Horizontal => ((nt_addr / 0x0800) * 0x0400) | (nt_addr & 0x03FF),
        // Nametables 0,2 -> page 0; 1,3 -> page 1
        Mirroring::Vertical => nt_addr & 0x07FF,
        Mirroring::FourScreen => nt_addr,
        Mirroring::SingleScreenLower => nt_addr & 0x03FF,
        Mirroring::SingleScreenUpper => 0x0400 | (nt_addr & 0x03FF),
    };
    usize::from(offset)
}

/// Offset into the 32-byte palette RAM. `$3F10/$3F14/$3F18/$3F1C` are
/// the backdrop entries of `$3F00/$3F04/$3F08/$3F0C`.
pub(crate) fn mirror_palette_addr(addr: u16) -> usize {
    let a = usize::from(addr & 0x1F);
    if a & 0x13 == 0x10 { a - 0x10 } else { a }
}
