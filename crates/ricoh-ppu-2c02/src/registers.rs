//! PPU register bank as seen from the CPU.

use bitflags::bitflags;

/// The eight CPU-visible PPU ports, mirrored every 8 bytes across
/// `$2000-$3FFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// `$2000` PPUCTRL (write).
    Ctrl,
    /// `$2001` PPUMASK (write).
    Mask,
    /// `$2002` PPUSTATUS (read).
    Status,
    /// `$2003` OAMADDR (write).
    OamAddr,
    /// `$2004` OAMDATA (read/write).
    OamData,
    /// `$2005` PPUSCROLL (write x2).
    Scroll,
    /// `$2006` PPUADDR (write x2).
    Addr,
    /// `$2007` PPUDATA (read/write).
    Data,
}

impl Port {
    /// Decode any address in the register window. Only the low 3 bits
    /// matter.
    #[must_use]
    pub const fn from_addr(addr: u16) -> Self {
        match addr & 0x07 {
            0 => Port::Ctrl,
            1 => Port::Mask,
            2 => Port::Status,
            3 => Port::OamAddr,
            4 => Port::OamData,
            5 => Port::Scroll,
            6 => Port::Addr,
            _ => Port::Data,
        }
    }
}

bitflags! {
    /// `$2000` PPUCTRL.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Ctrl: u8 {
        /// Base nametable: 0 = $2000, 1 = $2400, 2 = $2800, 3 = $2C00.
        const NAMETABLE = 0x03;
        /// PPUDATA increment: 0 = +1 (across), 1 = +32 (down).
        const VRAM_INCREMENT_32 = 0x04;
        /// 8x8 sprite pattern table: 0 = $0000, 1 = $1000.
        const SPRITE_TABLE = 0x08;
        /// Background pattern table: 0 = $0000, 1 = $1000.
        const BACKGROUND_TABLE = 0x10;
        /// 8x16 sprites.
        const SPRITE_8X16 = 0x20;
        const MASTER_SLAVE = 0x40;
        /// Generate an NMI at the start of vblank.
        const NMI_ENABLE = 0x80;
    }
}

impl Ctrl {
    #[must_use]
    pub const fn vram_increment(self) -> u16 {
        if self.contains(Ctrl::VRAM_INCREMENT_32) {
            32
        } else {
            1
        }
    }

    #[must_use]
    pub const fn background_table(self) -> u16 {
        if self.contains(Ctrl::BACKGROUND_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Pattern table for 8x8 sprites. 8x16 sprites pick theirs from bit 0
    /// of the tile number.
    #[must_use]
    pub const fn sprite_table(self) -> u16 {
        if self.contains(Ctrl::SPRITE_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    #[must_use]
    pub const fn sprite_height(self) -> u16 {
        if self.contains(Ctrl::SPRITE_8X16) {
            16
        } else {
            8
        }
    }
}

bitflags! {
    /// `$2001` PPUMASK.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Mask: u8 {
        const GREYSCALE = 0x01;
        const SHOW_BACKGROUND_LEFT = 0x02;
        const SHOW_SPRITES_LEFT = 0x04;
        const SHOW_BACKGROUND = 0x08;
        const SHOW_SPRITES = 0x10;
        const EMPHASIZE_RED = 0x20;
        const EMPHASIZE_GREEN = 0x40;
        const EMPHASIZE_BLUE = 0x80;
    }
}

impl Mask {
    /// Background or sprites enabled. With both off the PPU neither
    /// fetches nor draws.
    #[must_use]
    pub const fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND.union(Mask::SHOW_SPRITES))
    }
}

bitflags! {
    /// `$2002` PPUSTATUS. The low 5 bits are open bus and never stored.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Status: u8 {
        const SPRITE_OVERFLOW = 0x20;
        const SPRITE_ZERO_HIT = 0x40;
        const VBLANK = 0x80;
    }
}
