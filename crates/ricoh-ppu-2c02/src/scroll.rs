//! Loopy scroll registers: `v`, `t`, fine X and the shared write toggle.
//!
//! `v` and `t` are 15 bits wide:
//!
//! ```text
//! yyy NN YYYYY XXXXX
//! ||| || ||||| +++++-- coarse X
//! ||| || +++++-------- coarse Y
//! ||| ++-------------- nametable select
//! +++----------------- fine Y
//! ```

const COARSE_X: u16 = 0x001F;
const COARSE_Y: u16 = 0x03E0;
const NAMETABLE_X: u16 = 0x0400;
const NAMETABLE_Y: u16 = 0x0800;
const NAMETABLE: u16 = 0x0C00;
const FINE_Y: u16 = 0x7000;

/// Horizontal bits copied from `t` at dot 257.
const HORIZONTAL: u16 = NAMETABLE_X | COARSE_X;
/// Vertical bits copied from `t` during pre-render.
const VERTICAL: u16 = FINE_Y | NAMETABLE_Y | COARSE_Y;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollRegisters {
    v: u16,
    t: u16,
    fine_x: u8,
    w: bool,
}

impl ScrollRegisters {
    /// Current VRAM address.
    #[must_use]
    pub const fn v(&self) -> u16 {
        self.v
    }

    /// Temporary VRAM address.
    #[must_use]
    pub const fn t(&self) -> u16 {
        self.t
    }

    #[must_use]
    pub const fn fine_x(&self) -> u8 {
        self.fine_x
    }

    /// True after the first write of a PPUSCROLL/PPUADDR pair.
    #[must_use]
    pub const fn write_toggle(&self) -> bool {
        self.w
    }

    pub fn reset_toggle(&mut self) {
        self.w = false;
    }

    /// PPUCTRL write: nametable select into `t`; resets the toggle.
    pub fn write_ctrl(&mut self, value: u8) {
        self.t = (self.t & !NAMETABLE) | (u16::from(value & 0x03) << 10);
        self.w = false;
    }

    /// PPUSCROLL write. First X (coarse + fine), then Y.
    pub fn write_scroll(&mut self, value: u8) {
        if self.w {
            self.t = (self.t & !(FINE_Y | COARSE_Y))
                | (u16::from(value & 0x07) << 12)
                | (u16::from(value >> 3) << 5);
        } else {
            self.t = (self.t & !COARSE_X) | u16::from(value >> 3);
            self.fine_x = value & 0x07;
        }
        self.w = !self.w;
    }

    /// PPUADDR write. First the high 6 bits, then the low byte, which
    /// also copies `t` into `v`.
    pub fn write_addr(&mut self, value: u8) {
        if self.w {
            self.t = (self.t & 0xFF00) | u16::from(value);
            self.v = self.t;
        } else {
            self.t = (self.t & 0x00FF) | (u16::from(value & 0x3F) << 8);
        }
        self.w = !self.w;
    }

    /// PPUDATA auto-increment.
    pub fn increment(&mut self, step: u16) {
        self.v = self.v.wrapping_add(step) & 0x7FFF;
    }

    /// Next tile to the right, wrapping into the horizontally adjacent
    /// nametable.
    pub fn increment_coarse_x(&mut self) {
        if self.v & COARSE_X == 31 {
            self.v &= !COARSE_X;
            self.v ^= NAMETABLE_X;
        } else {
            self.v += 1;
        }
    }

    /// Next pixel row. Row 29 is the last tile row of a nametable and
    /// wraps into the vertically adjacent one; rows 30-31 (attribute
    /// memory) wrap without switching.
    pub fn increment_fine_y(&mut self) {
        if self.v & FINE_Y != FINE_Y {
            self.v += 0x1000;
            return;
        }
        self.v &= !FINE_Y;
        let mut coarse_y = (self.v & COARSE_Y) >> 5;
        match coarse_y {
            29 => {
                coarse_y = 0;
                self.v ^= NAMETABLE_Y;
            }
            31 => coarse_y = 0,
            _ => coarse_y += 1,
        }
        self.v = (self.v & !COARSE_Y) | (coarse_y << 5);
    }

    pub fn transfer_x(&mut self) {
        self.v = (self.v & !HORIZONTAL) | (self.t & HORIZONTAL);
    }

    pub fn transfer_y(&mut self) {
        self.v = (self.v & !VERTICAL) | (self.t & VERTICAL);
    }

    /// Address of the current tile's nametable byte.
    #[must_use]
    pub const fn nametable_addr(&self) -> u16 {
        0x2000 | (self.v & 0x0FFF)
    }

    /// Address of the attribute byte covering the current tile.
    #[must_use]
    pub const fn attribute_addr(&self) -> u16 {
        let v = self.v;
        0x23C0 | (v & 0x0C00) | ((v >> 4) & 0x38) | ((v >> 2) & 0x07)
    }

    /// Right shift selecting the current tile's 2-bit quadrant in the
    /// attribute byte.
    #[must_use]
    pub const fn attribute_shift(&self) -> u8 {
        (((self.v >> 4) & 4) | (self.v & 2)) as u8
    }

    #[must_use]
    pub const fn fine_y(&self) -> u16 {
        (self.v >> 12) & 0x07
    }

    /// `v` as a 14-bit PPU bus address.
    #[must_use]
    pub const fn vram_addr(&self) -> u16 {
        self.v & 0x3FFF
    }
}
