//! Top-level NES system.
//!
//! The CPU runs one whole instruction per [`Nes::step`]; the PPU then
//! catches up three dots per CPU cycle. The PPU's NMI edge is delivered
//! to the CPU at the step boundary and serviced before the next
//! instruction.

use emu_core::{AddressSpace, Observable, Value};
use mos_6502::Mos6502;
use ricoh_ppu_2c02::{FB_HEIGHT, FB_WIDTH};

use crate::bus::NesBus;
use crate::cartridge::{CHR_SIZE, Nrom};
use crate::config::NesConfig;
use crate::error::NesError;

/// PPU dots per CPU cycle (crystal/4 against crystal/12).
const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;

/// NES system.
pub struct Nes {
    cpu: Mos6502,
    bus: NesBus,
    trace: bool,
    /// CPU cycles run, DMA stalls included.
    cycles: u64,
}

impl Nes {
    /// Build the machine from `config` and power it up.
    ///
    /// # Errors
    ///
    /// Returns [`NesError::Config`] if the cartridge image is unusable, or
    /// [`NesError::Cpu`] if the reset vector can't be read.
    pub fn new(config: &NesConfig) -> Result<Self, NesError> {
        if config.prg_rom.is_empty() {
            return Err(NesError::Config("PRG ROM is empty".into()));
        }
        if config.chr.len() > CHR_SIZE {
            return Err(NesError::Config(format!(
                "CHR image is {} bytes; NROM holds {CHR_SIZE}",
                config.chr.len()
            )));
        }

        let cartridge = Nrom::new(config.prg_rom.clone(), config.chr.clone(), config.mirroring);
        let mut bus = NesBus::new(Box::new(cartridge), config.unmapped_writes);

        let mut cpu = Mos6502::new();
        cpu.power_up(&mut bus)?;
        log::info!("power-up: reset vector ${:04X}", cpu.regs.pc);

        Ok(Self {
            cpu,
            bus,
            trace: config.trace,
            cycles: 0,
        })
    }

    /// Run one CPU instruction (or NMI entry) and the PPU dots it covers.
    ///
    /// Returns the CPU cycles consumed, including any OAM DMA stall.
    ///
    /// # Errors
    ///
    /// Returns [`NesError::Cpu`] on an illegal opcode or a fatal bus access.
    /// The machine should not be stepped again afterwards.
    pub fn step(&mut self) -> Result<u32, NesError> {
        if self.trace {
            log::trace!("{}", self.cpu.trace(&self.bus));
        }

        let cycles = self.cpu.step(&mut self.bus)? + self.bus.take_dma_stall();
        for _ in 0..cycles * PPU_DOTS_PER_CPU_CYCLE {
            self.bus.tick_ppu();
        }

        if self.bus.ppu_mut().take_nmi() {
            self.cpu.nmi();
        }

        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Step until the PPU reaches post-render (one frame's worth of
    /// output in the framebuffer).
    ///
    /// Returns the CPU cycles run.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Nes::step`] error.
    pub fn run_frame(&mut self) -> Result<u64, NesError> {
        let start = self.cycles;
        // A flag left over from manual stepping would end the frame early
        self.bus.ppu_mut().take_frame_ready();
        loop {
            self.step()?;
            if self.bus.ppu_mut().take_frame_ready() {
                return Ok(self.cycles - start);
            }
        }
    }

    /// Reference to the framebuffer (ARGB32, 256x240).
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        self.bus.ppu().framebuffer()
    }

    #[must_use]
    pub fn framebuffer_width(&self) -> u32 {
        FB_WIDTH
    }

    #[must_use]
    pub fn framebuffer_height(&self) -> u32 {
        FB_HEIGHT
    }

    /// One CPU trace line for the next instruction.
    #[must_use]
    pub fn trace_line(&self) -> String {
        self.cpu.trace(&self.bus)
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// CPU cycles run since power-up.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Completed frames.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu().frame()
    }
}

/// `0x1234`, `$1234` or decimal.
fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            self.bus.ppu().query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let addr = parse_address(rest)?;
            self.bus.peek8(addr).map(Value::U8)
        } else {
            match path {
                "cycles" => Some(self.cycles.into()),
                "frame_count" => Some(self.frame_count().into()),
                _ => self.cpu.query(path),
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "ppu.<2c02_paths>",
            "memory.<address>",
            "cycles",
            "frame_count",
        ]
    }
}
