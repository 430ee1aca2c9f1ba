//! The 2C02 dot engine.

use emu_core::{Observable, Value};

use crate::palette;
use crate::registers::{Ctrl, Mask, Port, Status};
use crate::scroll::ScrollRegisters;
use crate::sprites::{self, SPRITES_PER_LINE, SpriteSlot};
use crate::vram::{ChrBus, mirror_nametable_addr, mirror_palette_addr};

/// Framebuffer dimensions.
pub const FB_WIDTH: u32 = 256;
pub const FB_HEIGHT: u32 = 240;

pub const DOTS_PER_LINE: u16 = 341;
pub const LINES_PER_FRAME: u16 = 262;
pub const POST_RENDER_LINE: u16 = 240;
/// Vblank starts at dot 1 of this line.
pub const VBLANK_LINE: u16 = 241;
pub const PRE_RENDER_LINE: u16 = 261;

/// PPU 2C02.
pub struct Ppu {
    // VRAM (4K so four-screen cartridges fit)
    nametable_ram: [u8; 4096],
    palette_ram: [u8; 32],
    oam: [u8; 256],

    // Registers
    ctrl: Ctrl,
    mask: Mask,
    status: Status,
    oam_addr: u8,
    scroll: ScrollRegisters,

    /// Last byte written to any port; the low bits of PPUSTATUS.
    last_write: u8,
    /// PPUDATA read buffer.
    read_buffer: u8,

    // Rendering position
    scanline: u16,
    dot: u16,
    frame: u64,

    // Background pipeline
    bg_shift_lo: u16,
    bg_shift_hi: u16,
    attr_shift_lo: u8,
    attr_shift_hi: u8,
    attr_latch_lo: u8,
    attr_latch_hi: u8,
    nametable_latch: u8,
    attr_table_latch: u8,
    bg_latch_lo: u8,
    bg_latch_hi: u8,
    fetch_addr: u16,

    // Sprites for the next line
    sprites: [SpriteSlot; SPRITES_PER_LINE],
    sprite_count: usize,

    // Output
    framebuffer: Vec<u32>,
    frame_ready: bool,
    nmi_line: bool,
    nmi_pending: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Power-up state: every register clear, at scanline 0, dot 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nametable_ram: [0; 4096],
            palette_ram: [0; 32],
            oam: [0; 256],

            ctrl: Ctrl::empty(),
            mask: Mask::empty(),
            status: Status::empty(),
            oam_addr: 0,
            scroll: ScrollRegisters::default(),

            last_write: 0,
            read_buffer: 0,

            scanline: 0,
            dot: 0,
            frame: 0,

            bg_shift_lo: 0,
            bg_shift_hi: 0,
            attr_shift_lo: 0,
            attr_shift_hi: 0,
            attr_latch_lo: 0,
            attr_latch_hi: 0,
            nametable_latch: 0,
            attr_table_latch: 0,
            bg_latch_lo: 0,
            bg_latch_hi: 0,
            fetch_addr: 0,

            sprites: [SpriteSlot::default(); SPRITES_PER_LINE],
            sprite_count: 0,

            framebuffer: vec![0; (FB_WIDTH * FB_HEIGHT) as usize],
            frame_ready: false,
            nmi_line: false,
            nmi_pending: false,
        }
    }

    /// One PPU dot.
    pub fn tick<C: ChrBus + ?Sized>(&mut self, chr: &mut C) {
        match self.scanline {
            PRE_RENDER_LINE => self.tick_pre_render(chr),
            0..=239 => self.tick_visible(chr),
            POST_RENDER_LINE => {
                if self.dot == 0 {
                    self.frame += 1;
                    self.frame_ready = true;
                    log::trace!("frame {} complete", self.frame);
                }
            }
            VBLANK_LINE => {
                if self.dot == 1 {
                    self.status.insert(Status::VBLANK);
                    self.update_nmi();
                }
            }
            _ => {}
        }

        self.dot += 1;
        if self.dot == DOTS_PER_LINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == LINES_PER_FRAME {
                self.scanline = 0;
            }
        }
    }

    fn tick_pre_render<C: ChrBus + ?Sized>(&mut self, chr: &mut C) {
        let dot = self.dot;
        if dot == 1 {
            self.status.remove(Status::VBLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW);
            self.update_nmi();
        } else if (280..=304).contains(&dot) {
            if self.mask.rendering_enabled() {
                self.scroll.transfer_y();
            }
        } else if dot == 257 {
            self.sprite_count = 0;
        }

        // Same fetches as a visible line, priming the first two tiles
        self.tick_visible(chr);
    }

    fn tick_visible<C: ChrBus + ?Sized>(&mut self, chr: &mut C) {
        if !self.mask.rendering_enabled() {
            return;
        }

        let dot = self.dot;
        // The pre-render line fetches but has no row to draw
        if (1..=256).contains(&dot) && self.scanline < POST_RENDER_LINE {
            self.render_pixel();
        }

        if (1..=256).contains(&dot) || (321..=336).contains(&dot) {
            self.shift_background();
            self.fetch_background(chr);
        }

        if dot == 256 {
            self.scroll.increment_fine_y();
        }
        if dot == 257 {
            self.evaluate_sprites(chr);
            self.scroll.transfer_x();
        }
    }

    fn shift_background(&mut self) {
        self.bg_shift_lo <<= 1;
        self.bg_shift_hi <<= 1;
        self.attr_shift_lo = (self.attr_shift_lo << 1) | self.attr_latch_lo;
        self.attr_shift_hi = (self.attr_shift_hi << 1) | self.attr_latch_hi;
    }

    /// One step of the 8-dot tile fetch.
    fn fetch_background<C: ChrBus + ?Sized>(&mut self, chr: &mut C) {
        match self.dot % 8 {
            1 => {
                self.fetch_addr = self.scroll.nametable_addr();
                self.bg_shift_lo |= u16::from(self.bg_latch_lo);
                self.bg_shift_hi |= u16::from(self.bg_latch_hi);
                self.attr_latch_lo = self.attr_table_latch & 1;
                self.attr_latch_hi = (self.attr_table_latch >> 1) & 1;
            }
            2 => self.nametable_latch = self.vram_read(self.fetch_addr, chr),
            3 => self.fetch_addr = self.scroll.attribute_addr(),
            4 => {
                let shift = self.scroll.attribute_shift();
                self.attr_table_latch = self.vram_read(self.fetch_addr, chr) >> shift;
            }
            5 => self.fetch_addr = self.bg_pattern_addr(),
            6 => self.bg_latch_lo = self.vram_read(self.fetch_addr, chr),
            7 => self.fetch_addr = self.bg_pattern_addr() + 8,
            _ => {
                self.bg_latch_hi = self.vram_read(self.fetch_addr, chr);
                self.scroll.increment_coarse_x();
            }
        }
    }

    fn bg_pattern_addr(&self) -> u16 {
        self.ctrl.background_table() + u16::from(self.nametable_latch) * 16 + self.scroll.fine_y()
    }

    /// Composite the pixel at column `dot - 2`. Dot 1 has no column.
    fn render_pixel(&mut self) {
        let Some(x) = self.dot.checked_sub(2) else {
            return;
        };

        let background = self.background_pixel();
        let sprite = self.sprite_pixel(x);

        let colour = match (background, sprite) {
            (0, None) => 0,
            (0, Some((_, pixel))) => pixel | 0x10,
            (bg, None) => bg,
            (bg, Some((slot, pixel))) => {
                let sprite = self.sprites[slot];
                if sprite.oam_index == 0 && x < 255 {
                    self.status.insert(Status::SPRITE_ZERO_HIT);
                }
                if sprite.behind_background { bg } else { pixel | 0x10 }
            }
        };

        let index = self.palette_ram[mirror_palette_addr(0x3F00 | u16::from(colour))];
        let offset = usize::from(self.scanline) * FB_WIDTH as usize + usize::from(x);
        self.framebuffer[offset] = palette::argb(index);
    }

    /// `attr_hi attr_lo pat_hi pat_lo` at the fine-X tap, or 0 when the
    /// background is hidden or the colour bits are transparent.
    fn background_pixel(&self) -> u8 {
        if !self.mask.contains(Mask::SHOW_BACKGROUND) {
            return 0;
        }
        let fx = self.scroll.fine_x();
        let attr_hi = (self.attr_shift_hi >> (7 - fx)) & 1;
        let attr_lo = (self.attr_shift_lo >> (7 - fx)) & 1;
        let pat_hi = ((self.bg_shift_hi >> (15 - fx)) & 1) as u8;
        let pat_lo = ((self.bg_shift_lo >> (15 - fx)) & 1) as u8;

        let pixel = (attr_hi << 3) | (attr_lo << 2) | (pat_hi << 1) | pat_lo;
        if pixel & 0x03 == 0 { 0 } else { pixel }
    }

    /// First opaque sprite pixel at `column`, with its slot.
    fn sprite_pixel(&self, column: u16) -> Option<(usize, u8)> {
        if !self.mask.contains(Mask::SHOW_SPRITES) {
            return None;
        }
        self.sprites[..self.sprite_count]
            .iter()
            .enumerate()
            .find_map(|(slot, sprite)| {
                sprite
                    .pixel_at(column)
                    .filter(|pixel| pixel % 4 != 0)
                    .map(|pixel| (slot, pixel))
            })
    }

    /// Select the first 8 sprites in range of the current scanline and
    /// fetch their pattern rows. More than 8 sets the overflow flag.
    fn evaluate_sprites<C: ChrBus + ?Sized>(&mut self, chr: &mut C) {
        let height = self.ctrl.sprite_height();
        let mut count = 0;

        for index in 0..64 {
            let entry = &self.oam[index * 4..index * 4 + 4];
            let (y, tile, attributes, x) = (entry[0], entry[1], entry[2], entry[3]);

            let Some(row) = self.scanline.checked_sub(u16::from(y)) else {
                continue;
            };
            if row >= height {
                continue;
            }

            if count < SPRITES_PER_LINE {
                let addr =
                    sprites::row_addr(tile, attributes, row, height, self.ctrl.sprite_table());
                let lo = chr.chr_read(addr);
                let hi = chr.chr_read(addr + 8);
                self.sprites[count] = SpriteSlot {
                    pattern: sprites::pack_row(lo, hi, attributes),
                    x,
                    behind_background: attributes & sprites::ATTR_BEHIND_BACKGROUND != 0,
                    oam_index: index as u8,
                };
            }
            count += 1;
        }

        if count > SPRITES_PER_LINE {
            count = SPRITES_PER_LINE;
            self.status.insert(Status::SPRITE_OVERFLOW);
        }
        self.sprite_count = count;
    }

    // === CPU ports ===

    /// CPU read of a PPU port. `None` for the write-only ports, which
    /// have no value to give.
    pub fn cpu_read<C: ChrBus + ?Sized>(&mut self, port: Port, chr: &mut C) -> Option<u8> {
        let value = match port {
            Port::Status => {
                let result = (self.status.bits() & 0xE0) | (self.last_write & 0x1F);
                self.status.remove(Status::VBLANK);
                self.scroll.reset_toggle();
                self.update_nmi();
                result
            }
            Port::OamData => self.oam[usize::from(self.oam_addr)],
            Port::Data => {
                let addr = self.scroll.vram_addr();
                let result = if addr >= 0x3F00 {
                    // Palette reads are immediate; the buffer gets the
                    // nametable byte underneath
                    self.read_buffer = self.vram_read(addr & 0x2FFF, chr);
                    self.palette_ram[mirror_palette_addr(addr)]
                } else {
                    let buffered = self.read_buffer;
                    self.read_buffer = self.vram_read(addr, chr);
                    buffered
                };
                self.scroll.increment(self.ctrl.vram_increment());
                result
            }
            Port::Ctrl | Port::Mask | Port::OamAddr | Port::Scroll | Port::Addr => return None,
        };
        Some(value)
    }

    /// CPU write to a PPU port.
    pub fn cpu_write<C: ChrBus + ?Sized>(&mut self, port: Port, value: u8, chr: &mut C) {
        self.last_write = value;
        match port {
            Port::Ctrl => {
                self.ctrl = Ctrl::from_bits_retain(value);
                self.scroll.write_ctrl(value);
                self.update_nmi();
            }
            Port::Mask => self.mask = Mask::from_bits_retain(value),
            Port::Status => {}
            Port::OamAddr => self.oam_addr = value,
            Port::OamData => {
                self.oam[usize::from(self.oam_addr)] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            Port::Scroll => self.scroll.write_scroll(value),
            Port::Addr => self.scroll.write_addr(value),
            Port::Data => {
                self.vram_write(self.scroll.vram_addr(), value, chr);
                self.scroll.increment(self.ctrl.vram_increment());
            }
        }
    }

    /// OAM DMA: 256 bytes written through OAMDATA, starting at OAMADDR.
    pub fn oam_dma(&mut self, page: &[u8; 256]) {
        for &value in page {
            self.oam[usize::from(self.oam_addr)] = value;
            self.oam_addr = self.oam_addr.wrapping_add(1);
        }
    }

    // === PPU memory access ===

    fn vram_read<C: ChrBus + ?Sized>(&self, addr: u16, chr: &mut C) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => chr.chr_read(addr),
            0x2000..=0x3EFF => self.nametable_ram[mirror_nametable_addr(addr, chr.mirroring())],
            _ => self.palette_ram[mirror_palette_addr(addr)],
        }
    }

    fn vram_write<C: ChrBus + ?Sized>(&mut self, addr: u16, value: u8, chr: &mut C) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => chr.chr_write(addr, value),
            0x2000..=0x3EFF => {
                self.nametable_ram[mirror_nametable_addr(addr, chr.mirroring())] = value;
            }
            _ => self.palette_ram[mirror_palette_addr(addr)] = value,
        }
    }

    // === NMI and frame hand-off ===

    /// NMI fires on the rising edge of `VBLANK && NMI_ENABLE`.
    fn update_nmi(&mut self) {
        let line = self.status.contains(Status::VBLANK) && self.ctrl.contains(Ctrl::NMI_ENABLE);
        if line && !self.nmi_line {
            self.nmi_pending = true;
        }
        self.nmi_line = line;
    }

    /// Take the pending NMI edge. The driver polls this once per CPU step.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    /// Take the frame-complete flag raised at post-render dot 0.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    // === Inspection ===

    /// ARGB32, 256x240, row-major.
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    #[must_use]
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    #[must_use]
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Completed frames.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollRegisters {
        &self.scroll
    }

    /// Sprites selected for the next line.
    #[must_use]
    pub fn sprites(&self) -> &[SpriteSlot] {
        &self.sprites[..self.sprite_count]
    }
}

impl Observable for Ppu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "scanline" => Some(self.scanline.into()),
            "dot" => Some(self.dot.into()),
            "frame" => Some(self.frame.into()),
            "ctrl" => Some(self.ctrl.bits().into()),
            "mask" => Some(self.mask.bits().into()),
            "status" => Some(self.status.bits().into()),
            "status.vblank" => Some(self.status.contains(Status::VBLANK).into()),
            "status.sprite0_hit" => Some(self.status.contains(Status::SPRITE_ZERO_HIT).into()),
            "status.overflow" => Some(self.status.contains(Status::SPRITE_OVERFLOW).into()),
            "oam_addr" => Some(self.oam_addr.into()),
            "v" => Some(self.scroll.v().into()),
            "t" => Some(self.scroll.t().into()),
            "fine_x" => Some(self.scroll.fine_x().into()),
            "w" => Some(self.scroll.write_toggle().into()),
            "sprite_count" => Some((self.sprite_count as u8).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "scanline",
            "dot",
            "frame",
            "ctrl",
            "mask",
            "status",
            "status.vblank",
            "status.sprite0_hit",
            "status.overflow",
            "oam_addr",
            "v",
            "t",
            "fine_x",
            "w",
            "sprite_count",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vram::Mirroring;

    /// 8K CHR RAM with horizontal mirroring.
    struct TestChr(Vec<u8>);

    impl TestChr {
        fn new() -> Self {
            Self(vec![0; 0x2000])
        }
    }

    impl ChrBus for TestChr {
        fn chr_read(&mut self, addr: u16) -> u8 {
            self.0[usize::from(addr & 0x1FFF)]
        }

        fn chr_write(&mut self, addr: u16, value: u8) {
            self.0[usize::from(addr & 0x1FFF)] = value;
        }

        fn mirroring(&self) -> Mirroring {
            Mirroring::Horizontal
        }
    }

    /// Put `count` 8x8 sprites with Y=`y` at the front of OAM, the rest
    /// off-screen.
    fn fill_oam(ppu: &mut Ppu, count: usize, y: u8) {
        ppu.oam = [0xFF; 256];
        for i in 0..count {
            ppu.oam[i * 4] = y;
            ppu.oam[i * 4 + 1] = 0;
            ppu.oam[i * 4 + 2] = 0;
            ppu.oam[i * 4 + 3] = (i * 8) as u8;
        }
    }

    #[test]
    fn nine_sprites_set_overflow_and_keep_eight() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.scanline = 50;
        fill_oam(&mut ppu, 9, 50);

        ppu.evaluate_sprites(&mut chr);
        assert_eq!(ppu.sprite_count, 8);
        assert!(ppu.status.contains(Status::SPRITE_OVERFLOW));
        let kept: Vec<u8> = ppu.sprites().iter().map(|s| s.oam_index).collect();
        assert_eq!(kept, [0, 1, 2, 3, 4, 5, 6, 7], "first 8 in OAM order");
    }

    #[test]
    fn eight_sprites_no_overflow() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.scanline = 50;
        fill_oam(&mut ppu, 8, 43);

        ppu.evaluate_sprites(&mut chr);
        assert_eq!(ppu.sprite_count, 8);
        assert!(!ppu.status.contains(Status::SPRITE_OVERFLOW));
    }

    #[test]
    fn pre_render_line_evaluates_after_reset() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = PRE_RENDER_LINE;
        ppu.dot = 257;
        ppu.sprite_count = 3;
        // Row 261 - 255 = 6 of an 8x8 sprite
        fill_oam(&mut ppu, 9, 0xFF);

        ppu.tick(&mut chr);
        assert_eq!(ppu.sprite_count, 8);
        assert!(ppu.status.contains(Status::SPRITE_OVERFLOW));
    }

    #[test]
    fn write_only_ports_have_no_read_value() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.cpu_write(Port::Mask, 0x3C, &mut chr);
        for port in [Port::Ctrl, Port::Mask, Port::OamAddr, Port::Scroll, Port::Addr] {
            assert_eq!(ppu.cpu_read(port, &mut chr), None, "{port:?}");
        }
        assert_eq!(ppu.cpu_read(Port::OamData, &mut chr), Some(0));
    }

    #[test]
    fn sprite_range_uses_height() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.scanline = 50;
        fill_oam(&mut ppu, 1, 40);

        ppu.evaluate_sprites(&mut chr);
        assert_eq!(ppu.sprite_count, 0, "row 10 is outside an 8x8 sprite");

        ppu.ctrl = Ctrl::SPRITE_8X16;
        ppu.evaluate_sprites(&mut chr);
        assert_eq!(ppu.sprite_count, 1, "row 10 is inside an 8x16 sprite");
    }

    #[test]
    fn sprite_pattern_fetched_for_row() {
        let mut chr = TestChr::new();
        // Tile 2, row 3: low plane $F0, high plane $0F
        chr.0[0x20 + 3] = 0xF0;
        chr.0[0x20 + 3 + 8] = 0x0F;

        let mut ppu = Ppu::new();
        ppu.scanline = 13;
        fill_oam(&mut ppu, 1, 10);
        ppu.oam[1] = 2;
        ppu.oam[2] = 0x21; // palette 1, behind background
        ppu.oam[3] = 100;

        ppu.evaluate_sprites(&mut chr);
        let slot = ppu.sprites()[0];
        assert_eq!(slot.pattern, 0x5555_6666);
        assert_eq!(slot.x, 100);
        assert!(slot.behind_background);
        assert_eq!(slot.oam_index, 0);
    }

    /// Opaque background (colour 1, palette 0) at every fine-X tap.
    fn prime_opaque_background(ppu: &mut Ppu) {
        ppu.bg_shift_lo = 0xFFFF;
        ppu.bg_shift_hi = 0;
        ppu.attr_shift_lo = 0;
        ppu.attr_shift_hi = 0;
    }

    fn sprite(oam_index: u8, x: u8, pattern: u32, behind_background: bool) -> SpriteSlot {
        SpriteSlot {
            pattern,
            x,
            behind_background,
            oam_index,
        }
    }

    #[test]
    fn sprite_zero_hit_on_overlap() {
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = 20;
        ppu.dot = 12; // column 10
        prime_opaque_background(&mut ppu);
        ppu.sprites[0] = sprite(0, 10, 0x1111_1111, false);
        ppu.sprite_count = 1;

        ppu.render_pixel();
        assert!(ppu.status.contains(Status::SPRITE_ZERO_HIT));
    }

    #[test]
    fn no_sprite_zero_hit_for_other_sprites() {
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = 20;
        ppu.dot = 12;
        prime_opaque_background(&mut ppu);
        ppu.sprites[0] = sprite(5, 10, 0x1111_1111, false);
        ppu.sprite_count = 1;

        ppu.render_pixel();
        assert!(!ppu.status.contains(Status::SPRITE_ZERO_HIT));
    }

    #[test]
    fn no_sprite_zero_hit_over_transparent_background() {
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = 20;
        ppu.dot = 12;
        ppu.sprites[0] = sprite(0, 10, 0x1111_1111, false);
        ppu.sprite_count = 1;

        ppu.render_pixel();
        assert!(!ppu.status.contains(Status::SPRITE_ZERO_HIT));
    }

    #[test]
    fn no_sprite_zero_hit_with_transparent_sprite_pixel() {
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = 20;
        ppu.dot = 12;
        prime_opaque_background(&mut ppu);
        // Colour bits 0 in every nibble (palette bits only)
        ppu.sprites[0] = sprite(0, 10, 0x4444_4444, false);
        ppu.sprite_count = 1;

        ppu.render_pixel();
        assert!(!ppu.status.contains(Status::SPRITE_ZERO_HIT));
    }

    #[test]
    fn no_sprite_zero_hit_on_pre_render_line() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = PRE_RENDER_LINE;
        ppu.dot = 12;
        prime_opaque_background(&mut ppu);
        ppu.sprites[0] = sprite(0, 10, 0x1111_1111, false);
        ppu.sprite_count = 1;

        ppu.tick(&mut chr);
        assert!(!ppu.status.contains(Status::SPRITE_ZERO_HIT));
    }

    #[test]
    fn compositing_priority() {
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES;
        ppu.scanline = 0;
        // Distinct colours for backdrop, bg colour 1, sprite colour 2
        ppu.palette_ram[0x00] = 0x0F;
        ppu.palette_ram[0x01] = 0x16;
        ppu.palette_ram[0x12] = 0x2A;

        let render_at = |ppu: &mut Ppu, bg: bool, behind: bool, sprite_on: bool| {
            ppu.bg_shift_lo = if bg { 0xFFFF } else { 0 };
            ppu.sprites[0] = sprite(3, 0, 0x2222_2222, behind);
            ppu.sprite_count = usize::from(sprite_on);
            ppu.dot = 2;
            ppu.render_pixel();
            ppu.framebuffer[0]
        };

        assert_eq!(render_at(&mut ppu, false, false, false), palette::argb(0x0F));
        assert_eq!(render_at(&mut ppu, false, false, true), palette::argb(0x2A));
        assert_eq!(render_at(&mut ppu, true, false, false), palette::argb(0x16));
        assert_eq!(render_at(&mut ppu, true, false, true), palette::argb(0x2A));
        assert_eq!(render_at(&mut ppu, true, true, true), palette::argb(0x16));
    }

    #[test]
    fn pre_render_line_draws_nothing() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.mask = Mask::SHOW_BACKGROUND;
        ppu.scanline = PRE_RENDER_LINE;
        ppu.dot = 10;
        prime_opaque_background(&mut ppu);
        ppu.palette_ram[1] = 0x30;

        ppu.tick(&mut chr);
        assert!(ppu.framebuffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn status_read_returns_latch_low_bits_and_clears_vblank() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.status = Status::VBLANK | Status::SPRITE_ZERO_HIT;
        ppu.cpu_write(Port::Scroll, 0x1F, &mut chr);
        assert!(ppu.scroll.write_toggle());

        assert_eq!(ppu.cpu_read(Port::Status, &mut chr), Some(0xDF));
        assert!(!ppu.status.contains(Status::VBLANK));
        assert!(ppu.status.contains(Status::SPRITE_ZERO_HIT));
        assert!(!ppu.scroll.write_toggle());
        assert_eq!(ppu.cpu_read(Port::Status, &mut chr), Some(0x5F));
    }

    #[test]
    fn nmi_edge_on_enable_during_vblank() {
        let mut chr = TestChr::new();
        let mut ppu = Ppu::new();
        ppu.status = Status::VBLANK;
        ppu.update_nmi();
        assert!(!ppu.take_nmi(), "NMI disabled");

        ppu.cpu_write(Port::Ctrl, 0x80, &mut chr);
        assert!(ppu.take_nmi());
        assert!(!ppu.take_nmi(), "edge is consumed");

        // Re-writing CTRL with NMI still on is not a new edge
        ppu.cpu_write(Port::Ctrl, 0x80, &mut chr);
        assert!(!ppu.take_nmi());
    }
}
