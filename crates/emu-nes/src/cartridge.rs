//! Cartridge interface and the NROM (mapper 0) board.

use ricoh_ppu_2c02::{ChrBus, Mirroring};

/// PRG RAM on the board, mirrored across `$6000-$7FFF`.
pub const PRG_RAM_SIZE: usize = 0x0800;
/// CHR window size (and CHR RAM size when the image has none).
pub const CHR_SIZE: usize = 0x2000;

/// Mapper trait: the CPU side of a cartridge. The PPU side comes from
/// [`ChrBus`].
///
/// Offsets are already mirrored by the router: PRG ROM within its 16K
/// window, PRG RAM within [`PRG_RAM_SIZE`].
pub trait Mapper: ChrBus {
    fn prg_rom_read(&self, offset: usize) -> u8;
    fn prg_ram_read(&self, offset: usize) -> u8;
    fn prg_ram_write(&mut self, offset: usize, value: u8);
}

/// NROM (Mapper 0): no bank switching.
///
/// - PRG: the first 16K, mirrored at `$8000-$BFFF` and `$C000-$FFFF`
/// - CHR: 8K at PPU `$0000-$1FFF` (ROM, or RAM if the image is empty)
pub struct Nrom {
    prg_rom: Vec<u8>,
    prg_ram: [u8; PRG_RAM_SIZE],
    chr: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Nrom {
    /// The CHR image is cut or zero-padded to 8K.
    #[must_use]
    pub fn new(prg_rom: Vec<u8>, chr_data: Vec<u8>, mirroring: Mirroring) -> Self {
        let chr_is_ram = chr_data.is_empty();
        let mut chr = chr_data;
        chr.resize(CHR_SIZE, 0);
        Self {
            prg_rom,
            prg_ram: [0; PRG_RAM_SIZE],
            chr,
            chr_is_ram,
            mirroring,
        }
    }

    #[must_use]
    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }
}

impl Mapper for Nrom {
    fn prg_rom_read(&self, offset: usize) -> u8 {
        if self.prg_rom.is_empty() {
            return 0;
        }
        self.prg_rom[offset % self.prg_rom.len()]
    }

    fn prg_ram_read(&self, offset: usize) -> u8 {
        self.prg_ram[offset % PRG_RAM_SIZE]
    }

    fn prg_ram_write(&mut self, offset: usize, value: u8) {
        self.prg_ram[offset % PRG_RAM_SIZE] = value;
    }
}

impl ChrBus for Nrom {
    fn chr_read(&mut self, addr: u16) -> u8 {
        self.chr[usize::from(addr) & (CHR_SIZE - 1)]
    }

    fn chr_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            self.chr[usize::from(addr) & (CHR_SIZE - 1)] = value;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}
