//! NES bus: CPU address routing.
//!
//! Routes CPU addresses to internal RAM, PPU registers, the cartridge and
//! the (unimplemented) APU and controller ports. The NES is fully
//! memory-mapped; there is no separate I/O address space.

#![allow(clippy::cast_possible_truncation)]

use emu_core::{Access, AddressSpace, BusError, Memory};
use ricoh_ppu_2c02::{Port, Ppu};

use crate::cartridge::{Mapper, PRG_RAM_SIZE};
use crate::config::UnmappedWritePolicy;

/// 2K internal RAM, mirrored to `$1FFF`.
pub const RAM_SIZE: usize = 0x0800;
/// PRG ROM window; `$C000-$FFFF` mirrors `$8000-$BFFF`.
const PRG_ROM_WINDOW: usize = 0x4000;
/// CPU cycles lost to an OAM DMA transfer.
pub const DMA_STALL_CYCLES: u32 = 513;

/// Where a CPU address goes. Every address decodes to exactly one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Offset into internal RAM.
    Ram(usize),
    PpuPort(Port),
    Apu,
    /// `$4014`, write-only.
    OamDma,
    /// `$4016`.
    Controller1,
    /// Offset into cartridge PRG RAM.
    PrgRam(usize),
    /// Offset into the 16K PRG ROM window.
    PrgRom(usize),
    Unmapped,
}

impl Route {
    #[must_use]
    pub const fn decode(addr: u16) -> Self {
        match addr {
            0x0000..=0x1FFF => Self::Ram(addr as usize % RAM_SIZE),
            0x2000..=0x3FFF => Self::PpuPort(Port::from_addr(addr)),
            0x4014 => Self::OamDma,
            0x4016 => Self::Controller1,
            0x4000..=0x4013 | 0x4015 | 0x4017 => Self::Apu,
            0x6000..=0x7FFF => Self::PrgRam((addr - 0x6000) as usize % PRG_RAM_SIZE),
            0x8000..=0xFFFF => Self::PrgRom((addr - 0x8000) as usize % PRG_ROM_WINDOW),
            _ => Self::Unmapped,
        }
    }
}

/// The NES bus, implementing [`AddressSpace`] for the CPU.
pub struct NesBus {
    ram: Memory,
    ppu: Ppu,
    cartridge: Box<dyn Mapper>,
    unmapped_writes: UnmappedWritePolicy,
    /// CPU cycles owed to OAM DMA since the driver last asked.
    dma_stall: u32,
}

impl NesBus {
    #[must_use]
    pub fn new(cartridge: Box<dyn Mapper>, unmapped_writes: UnmappedWritePolicy) -> Self {
        Self {
            ram: Memory::new(RAM_SIZE),
            ppu: Ppu::new(),
            cartridge,
            unmapped_writes,
            dma_stall: 0,
        }
    }

    /// Advance the PPU one dot.
    pub fn tick_ppu(&mut self) {
        self.ppu.tick(self.cartridge.as_mut());
    }

    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    #[must_use]
    pub fn ram(&self) -> &[u8] {
        self.ram.as_slice()
    }

    /// Take the DMA stall accumulated by `$4014` writes.
    pub fn take_dma_stall(&mut self) -> u32 {
        std::mem::take(&mut self.dma_stall)
    }

    /// Copy page `page` into OAM through the normal read path.
    fn oam_dma(&mut self, page: u8) -> Result<(), BusError> {
        let base = u16::from(page) << 8;
        let mut data = [0u8; 256];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self.read8(base | i as u16)?;
        }
        self.ppu.oam_dma(&data);
        self.dma_stall += DMA_STALL_CYCLES;
        Ok(())
    }

    fn unmapped_write(&self, addr: u16, value: u8) -> Result<(), BusError> {
        match self.unmapped_writes {
            UnmappedWritePolicy::Ignore => {
                log::warn!("ignored write ${value:02X} to ${addr:04X}");
                Ok(())
            }
            UnmappedWritePolicy::Fatal => Err(BusError::Unmapped {
                addr,
                access: Access::Write,
            }),
        }
    }
}

impl AddressSpace for NesBus {
    fn read8(&mut self, addr: u16) -> Result<u8, BusError> {
        match Route::decode(addr) {
            Route::Ram(offset) => self.ram.read(offset),
            Route::PpuPort(port) => self
                .ppu
                .cpu_read(port, self.cartridge.as_mut())
                .ok_or(BusError::Unmapped {
                    addr,
                    access: Access::Read,
                }),
            Route::Apu | Route::Controller1 => {
                log::debug!("read from unimplemented ${addr:04X}");
                Ok(0)
            }
            Route::PrgRam(offset) => Ok(self.cartridge.prg_ram_read(offset)),
            Route::PrgRom(offset) => Ok(self.cartridge.prg_rom_read(offset)),
            Route::OamDma | Route::Unmapped => Err(BusError::Unmapped {
                addr,
                access: Access::Read,
            }),
        }
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match Route::decode(addr) {
            Route::Ram(offset) => self.ram.write(offset, value),
            Route::PpuPort(port) => {
                self.ppu.cpu_write(port, value, self.cartridge.as_mut());
                Ok(())
            }
            Route::OamDma => self.oam_dma(value),
            Route::Apu | Route::Controller1 => {
                log::debug!("write ${value:02X} to unimplemented ${addr:04X}");
                Ok(())
            }
            Route::PrgRam(offset) => {
                self.cartridge.prg_ram_write(offset, value);
                Ok(())
            }
            Route::PrgRom(_) | Route::Unmapped => self.unmapped_write(addr, value),
        }
    }

    /// PPU ports have read side effects, so they can't be peeked.
    fn peek8(&self, addr: u16) -> Option<u8> {
        match Route::decode(addr) {
            Route::Ram(offset) => self.ram.read(offset).ok(),
            Route::PrgRam(offset) => Some(self.cartridge.prg_ram_read(offset)),
            Route::PrgRom(offset) => Some(self.cartridge.prg_rom_read(offset)),
            Route::Apu | Route::Controller1 => Some(0),
            Route::PpuPort(_) | Route::OamDma | Route::Unmapped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Nrom;
    use ricoh_ppu_2c02::Mirroring;

    fn make_bus(policy: UnmappedWritePolicy) -> NesBus {
        let prg: Vec<u8> = (0..0x4000).map(|i| (i % 251) as u8).collect();
        let mapper = Box::new(Nrom::new(prg, vec![0; 8192], Mirroring::Horizontal));
        NesBus::new(mapper, policy)
    }

    #[test]
    fn decode_is_total() {
        for addr in 0..=u16::MAX {
            let route = Route::decode(addr);
            let expected_unmapped = (0x4018..=0x5FFF).contains(&addr);
            assert_eq!(route == Route::Unmapped, expected_unmapped, "${addr:04X}");
        }
    }

    #[test]
    fn decode_ranges() {
        assert_eq!(Route::decode(0x1801), Route::Ram(0x001));
        assert_eq!(Route::decode(0x3FFA), Route::PpuPort(Port::Addr));
        assert_eq!(Route::decode(0x2002), Route::PpuPort(Port::Status));
        assert_eq!(Route::decode(0x4000), Route::Apu);
        assert_eq!(Route::decode(0x4015), Route::Apu);
        assert_eq!(Route::decode(0x4017), Route::Apu);
        assert_eq!(Route::decode(0x4014), Route::OamDma);
        assert_eq!(Route::decode(0x4016), Route::Controller1);
        assert_eq!(Route::decode(0x7801), Route::PrgRam(0x001));
        assert_eq!(Route::decode(0xC123), Route::PrgRom(0x0123));
        assert_eq!(Route::decode(0xFFFC), Route::PrgRom(0x3FFC));
    }

    #[test]
    fn ram_mirrors() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x1800, 0xAB).unwrap();
        for mirror in [0x0000, 0x0800, 0x1000, 0x1800] {
            assert_eq!(bus.read8(mirror).unwrap(), 0xAB);
        }
        bus.write8(0x0005, 0xCD).unwrap();
        assert_eq!(bus.read8(0x0805).unwrap(), 0xCD);
    }

    #[test]
    fn prg_rom_mirrors() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        for addr in [0x8000u16, 0x9234, 0xBFFF, 0xC000, 0xE001, 0xFFFF] {
            let base = 0x8000 + (addr - 0x8000) % 0x4000;
            assert_eq!(bus.read8(addr).unwrap(), bus.read8(base).unwrap());
        }
    }

    #[test]
    fn prg_ram_mirrors() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x6010, 0x99).unwrap();
        assert_eq!(bus.read8(0x6810).unwrap(), 0x99);
        assert_eq!(bus.read8(0x7810).unwrap(), 0x99);
    }

    #[test]
    fn word_round_trip() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write16(0x0200, 0xBEEF).unwrap();
        assert_eq!(bus.read16(0x0200).unwrap(), 0xBEEF);
        bus.write16(0x6100, 0x1234).unwrap();
        assert_eq!(bus.read16(0x6100).unwrap(), 0x1234);
    }

    #[test]
    fn read16_bug_wraps_on_page_boundary() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x02FF, 0x34).unwrap();
        bus.write8(0x0300, 0x12).unwrap();
        bus.write8(0x0200, 0x56).unwrap();
        assert_eq!(bus.read16(0x02FF).unwrap(), 0x1234);
        assert_eq!(bus.read16_bug(0x02FF).unwrap(), 0x5634);
    }

    #[test]
    fn unmapped_read_is_an_error() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        assert_eq!(
            bus.read8(0x5000),
            Err(BusError::Unmapped {
                addr: 0x5000,
                access: Access::Read
            })
        );
        assert!(bus.read8(0x4014).is_err());
    }

    #[test]
    fn unmapped_write_follows_policy() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        assert!(bus.write8(0x4020, 0x01).is_ok());
        assert!(bus.write8(0x8000, 0x01).is_ok());
        assert_eq!(bus.read8(0x8000).unwrap(), 0x00, "PRG ROM unchanged");

        let mut bus = make_bus(UnmappedWritePolicy::Fatal);
        assert_eq!(
            bus.write8(0x4020, 0x01),
            Err(BusError::Unmapped {
                addr: 0x4020,
                access: Access::Write
            })
        );
        assert!(bus.write8(0xC000, 0x01).is_err());
    }

    #[test]
    fn peripherals_read_zero() {
        let mut bus = make_bus(UnmappedWritePolicy::Fatal);
        assert_eq!(bus.read8(0x4016).unwrap(), 0);
        assert_eq!(bus.read8(0x4015).unwrap(), 0);
        assert!(bus.write8(0x4016, 1).is_ok());
        assert!(bus.write8(0x4000, 0x3F).is_ok());
    }

    #[test]
    fn ppu_ports_mirror_every_eight_bytes() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        // $2006 via its mirror at $3FFE, then $2007 via $2F0F
        bus.write8(0x3FFE, 0x21).unwrap();
        bus.write8(0x3FFE, 0x00).unwrap();
        bus.write8(0x2F0F, 0x77).unwrap();

        bus.write8(0x2006, 0x21).unwrap();
        bus.write8(0x2006, 0x00).unwrap();
        bus.read8(0x2007).unwrap();
        assert_eq!(bus.read8(0x2007).unwrap(), 0x77);
    }

    #[test]
    fn status_low_bits_from_last_write() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x2003, 0x15).unwrap();
        assert_eq!(bus.read8(0x2002).unwrap() & 0x1F, 0x15);
    }

    #[test]
    fn write_only_ppu_ports_fail_reads() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x2001, 0x3C).unwrap();
        for addr in [0x2000, 0x2001, 0x2003, 0x2005, 0x2006, 0x3FF8] {
            assert_eq!(
                bus.read8(addr),
                Err(BusError::Unmapped {
                    addr,
                    access: Access::Read
                }),
                "${addr:04X}"
            );
        }
        assert!(bus.read8(0x2002).is_ok());
        assert!(bus.read8(0x2004).is_ok());
    }

    #[test]
    fn oam_dma_copies_page_and_stalls() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        for i in 0..=0xFFu16 {
            bus.write8(0x0200 + i, i as u8).unwrap();
        }
        bus.write8(0x2003, 0x00).unwrap();
        bus.write8(0x4014, 0x02).unwrap();

        let expected: Vec<u8> = (0..=0xFF).collect();
        assert_eq!(bus.ppu().oam().as_slice(), expected.as_slice());
        assert_eq!(bus.take_dma_stall(), DMA_STALL_CYCLES);
        assert_eq!(bus.take_dma_stall(), 0);
    }

    #[test]
    fn oam_dma_starts_at_oam_addr() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x0300, 0xAA).unwrap();
        bus.write8(0x2003, 0x10).unwrap();
        bus.write8(0x4014, 0x03).unwrap();
        assert_eq!(bus.ppu().oam()[0x10], 0xAA);
    }

    #[test]
    fn peek_has_no_side_effects() {
        let mut bus = make_bus(UnmappedWritePolicy::Ignore);
        bus.write8(0x0042, 0x99).unwrap();
        assert_eq!(bus.peek8(0x0842), Some(0x99));
        assert_eq!(bus.peek8(0x2002), None);
        assert_eq!(bus.peek8(0x5000), None);
        assert_eq!(bus.peek8(0x8001), Some(1));
    }
}
