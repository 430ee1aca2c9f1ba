use mos_6502::CpuError;
use thiserror::Error;

/// Errors surfaced by the [`Nes`](crate::Nes) driver.
#[derive(Debug, Error)]
pub enum NesError {
    #[error("CPU fault: {0}")]
    Cpu(#[from] CpuError),
    #[error("invalid configuration: {0}")]
    Config(String),
}
