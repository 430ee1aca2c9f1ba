//! 6502 CPU: register file, stack and the step loop.

use emu_core::{AddressSpace, BusError, Cpu, Observable, Value};

use crate::error::CpuError;
use crate::execute::Flow;
use crate::flags::Flag;
use crate::instructions;
use crate::Registers;

/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// Non-maskable interrupt vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// BRK/IRQ vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles taken to enter an interrupt handler.
const INTERRUPT_CYCLES: u32 = 7;

/// The MOS 6502 CPU.
///
/// Between calls to [`step`](Self::step) the CPU is always at an
/// instruction boundary; there is no partially executed instruction.
#[derive(Debug, Default)]
pub struct Mos6502 {
    /// CPU registers.
    pub regs: Registers,

    /// NMI requested, taken before the next opcode fetch.
    nmi_pending: bool,

    /// Total cycles executed.
    total_cycles: u64,
}

impl Mos6502 {
    /// Create a CPU in its power-up register state. Call
    /// [`power_up`](Self::power_up) before the first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load PC from the reset vector and P = $24.
    pub fn power_up<B: AddressSpace>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        self.regs = Registers::new();
        self.regs.pc = bus
            .read16(RESET_VECTOR)
            .map_err(|source| CpuError::Bus { pc: 0, source })?;
        self.nmi_pending = false;
        self.total_cycles = 0;
        Ok(())
    }

    /// Run one instruction, or enter the NMI handler if one is pending.
    ///
    /// Returns the base cycle count. PC advances by the instruction's size
    /// unless the instruction transferred control itself.
    pub fn step<B: AddressSpace>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        let pc = self.regs.pc;
        let fault = |source| CpuError::Bus { pc, source };

        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(bus, NMI_VECTOR, false).map_err(fault)?;
            self.total_cycles += u64::from(INTERRUPT_CYCLES);
            return Ok(INTERRUPT_CYCLES);
        }

        let opcode = bus.read8(pc).map_err(fault)?;
        let instr = instructions::decode(opcode).ok_or(CpuError::IllegalOpcode { opcode, pc })?;

        if self.execute(bus, instr).map_err(fault)? == Flow::Next {
            self.regs.pc = pc.wrapping_add(u16::from(instr.size()));
        }

        let cycles = u32::from(instr.cycles);
        self.total_cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Latch an NMI; it is serviced at the start of the next step.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    #[must_use]
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn push8<B: AddressSpace>(&mut self, bus: &mut B, value: u8) -> Result<(), BusError> {
        let addr = self.regs.push();
        bus.write8(addr, value)
    }

    pub fn pop8<B: AddressSpace>(&mut self, bus: &mut B) -> Result<u8, BusError> {
        let addr = self.regs.pop();
        bus.read8(addr)
    }

    /// Push high byte, then low byte.
    pub fn push16<B: AddressSpace>(&mut self, bus: &mut B, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.push8(bus, hi)?;
        self.push8(bus, lo)
    }

    /// Pop low byte, then high byte.
    pub fn pop16<B: AddressSpace>(&mut self, bus: &mut B) -> Result<u16, BusError> {
        let lo = self.pop8(bus)?;
        let hi = self.pop8(bus)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Push `return_pc` and P, set I, and jump through `vector`.
    pub(crate) fn interrupt<B: AddressSpace>(
        &mut self,
        bus: &mut B,
        vector: u16,
        brk: bool,
    ) -> Result<(), BusError> {
        self.push16(bus, self.regs.pc)?;
        self.push8(bus, self.regs.p.to_stack(brk))?;
        self.regs.p.set(Flag::I);
        self.regs.pc = bus.read16(vector)?;
        Ok(())
    }
}

impl Cpu for Mos6502 {
    type Error = CpuError;

    fn power_up<B: AddressSpace>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        Mos6502::power_up(self, bus)
    }

    fn step<B: AddressSpace>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        Mos6502::step(self, bus)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn nmi(&mut self) {
        Mos6502::nmi(self);
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        let p = self.regs.p;
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(p.0.into()),
            "flags.c" => Some(p.get(Flag::C).into()),
            "flags.z" => Some(p.get(Flag::Z).into()),
            "flags.i" => Some(p.get(Flag::I).into()),
            "flags.d" => Some(p.get(Flag::D).into()),
            "flags.v" => Some(p.get(Flag::V).into()),
            "flags.n" => Some(p.get(Flag::N).into()),
            "cycles" => Some(self.total_cycles.into()),
            "nmi_pending" => Some(self.nmi_pending.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.v",
            "flags.n",
            "cycles",
            "nmi_pending",
        ]
    }
}
