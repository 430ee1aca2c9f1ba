//! Ricoh 2C02 picture processing unit.
//!
//! Dot-based rendering. One [`Ppu::tick`] = one PPU dot; a frame is 341
//! dots x 262 scanlines (NTSC).
//!
//! ## Scanline layout
//! - 0-239: visible scanlines (render pixels)
//! - 240: post-render (frame hand-off at dot 0)
//! - 241-260: `VBlank` (flag and NMI at 241, dot 1)
//! - 261: pre-render
//!
//! The CPU reaches the PPU only through [`Ppu::cpu_read`] and
//! [`Ppu::cpu_write`] with a decoded [`Port`]; pattern tables live on the
//! cartridge and are reached through [`ChrBus`].

mod palette;
mod ppu;
mod registers;
mod scroll;
mod sprites;
mod vram;

pub use palette::{MASTER_PALETTE, argb};
pub use ppu::{
    DOTS_PER_LINE, FB_HEIGHT, FB_WIDTH, LINES_PER_FRAME, POST_RENDER_LINE, PRE_RENDER_LINE, Ppu,
    VBLANK_LINE,
};
pub use registers::{Ctrl, Mask, Port, Status};
pub use scroll::ScrollRegisters;
pub use sprites::SpriteSlot;
pub use vram::{ChrBus, Mirroring};
