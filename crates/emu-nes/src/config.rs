//! NES configuration.

use ricoh_ppu_2c02::Mirroring;
use serde::Deserialize;

/// What the router does with a write that no device accepts: unmapped
/// addresses (`$4018-$5FFF`) and PRG-ROM (`$8000-$FFFF`).
///
/// Unmapped reads are always errors; there is no sensible value to invent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedWritePolicy {
    /// Drop the write and log it at `warn`.
    #[default]
    Ignore,
    /// Fail the instruction with `BusError::Unmapped`.
    Fatal,
}

/// NES configuration.
///
/// The cartridge is given as raw NROM parts; reading ROM files is up to
/// the host.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct NesConfig {
    pub unmapped_writes: UnmappedWritePolicy,
    /// Log a CPU trace line (at `trace` level) before every instruction.
    pub trace: bool,
    /// PRG ROM image, 16K or 32K.
    pub prg_rom: Vec<u8>,
    /// CHR ROM image (8K). Empty selects 8K of CHR RAM.
    pub chr: Vec<u8>,
    pub mirroring: Mirroring,
}
