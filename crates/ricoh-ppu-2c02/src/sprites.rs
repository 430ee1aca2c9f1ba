//! Sprite line buffer: the up-to-8 sprites selected for the next line.

/// OAM attribute byte bits.
pub(crate) const ATTR_PALETTE: u8 = 0x03;
pub(crate) const ATTR_BEHIND_BACKGROUND: u8 = 0x20;
pub(crate) const ATTR_FLIP_H: u8 = 0x40;
pub(crate) const ATTR_FLIP_V: u8 = 0x80;

/// Maximum sprites drawn on one scanline.
pub(crate) const SPRITES_PER_LINE: usize = 8;

/// A sprite selected during evaluation, with its row already fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteSlot {
    /// Eight 4-bit pixels, leftmost in the top nibble. Each nibble is
    /// `palette << 2 | colour`, horizontal flip already applied.
    pub pattern: u32,
    /// Left edge.
    pub x: u8,
    /// Priority bit: drawn behind opaque background.
    pub behind_background: bool,
    /// Index in primary OAM (0 for the sprite-0 hit check).
    pub oam_index: u8,
}

impl SpriteSlot {
    /// The nibble covering screen column `column`, if the sprite spans it.
    #[must_use]
    pub fn pixel_at(&self, column: u16) -> Option<u8> {
        let offset = column.checked_sub(u16::from(self.x))?;
        if offset > 7 {
            return None;
        }
        Some(((self.pattern >> ((7 - offset) * 4)) & 0x0F) as u8)
    }
}

/// Pack one pattern row (two bit planes) into eight 4-bit pixels carrying
/// the attribute palette.
pub(crate) fn pack_row(lo: u8, hi: u8, attributes: u8) -> u32 {
    let palette = (attributes & ATTR_PALETTE) << 2;
    let (lo, hi) = if attributes & ATTR_FLIP_H != 0 {
        (lo.reverse_bits(), hi.reverse_bits())
    } else {
        (lo, hi)
    };

    (0..8).rev().fold(0u32, |data, bit| {
        let colour = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
        (data << 4) | u32::from(palette | colour)
    })
}

/// Pattern-table address of row `row` of a sprite.
///
/// 8x16 sprites take their table from tile bit 0 and span tiles
/// `tile & 0xFE` (top) and `tile | 1` (bottom).
pub(crate) fn row_addr(tile: u8, attributes: u8, row: u16, height: u16, table_8x8: u16) -> u16 {
    let row = if attributes & ATTR_FLIP_V != 0 {
        height - 1 - row
    } else {
        row
    };

    if height == 8 {
        table_8x8 + u16::from(tile) * 16 + row
    } else {
        let table = if tile & 1 != 0 { 0x1000 } else { 0x0000 };
        let top = u16::from(tile & 0xFE);
        let (tile, row) = if row > 7 { (top + 1, row - 8) } else { (top, row) };
        table + tile * 16 + row
    }
}
