//! Instruction semantics.
//!
//! Operands are located from the bytes after the opcode at PC, the way the
//! instruction table's addressing mode says. Handlers report whether they
//! transferred control so the step loop knows whether to advance PC.

use emu_core::{AddressSpace, BusError};

use crate::cpu::IRQ_VECTOR;
use crate::flags::Flag;
use crate::instructions::{Instruction, Mnemonic, Mode};
use crate::{Mos6502, Status};

/// What the step loop does with PC after a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Fall through to the next instruction.
    Next,
    /// The handler loaded PC itself.
    Jump,
}

impl Mos6502 {
    /// Effective address of the operand, or `None` for implied and
    /// accumulator modes.
    fn operand_addr<B: AddressSpace>(
        &self,
        bus: &mut B,
        mode: Mode,
    ) -> Result<Option<u16>, BusError> {
        let pc = self.regs.pc;
        let arg = pc.wrapping_add(1);
        let addr = match mode {
            Mode::Implied | Mode::Accumulator => return Ok(None),
            Mode::Immediate => arg,
            Mode::ZeroPage => u16::from(bus.read8(arg)?),
            Mode::ZeroPageX => u16::from(bus.read8(arg)?.wrapping_add(self.regs.x)),
            Mode::ZeroPageY => u16::from(bus.read8(arg)?.wrapping_add(self.regs.y)),
            Mode::Relative => {
                let offset = bus.read8(arg)? as i8;
                pc.wrapping_add(2).wrapping_add_signed(i16::from(offset))
            }
            Mode::Absolute => bus.read16(arg)?,
            Mode::AbsoluteX => bus.read16(arg)?.wrapping_add(u16::from(self.regs.x)),
            Mode::AbsoluteY => bus.read16(arg)?.wrapping_add(u16::from(self.regs.y)),
            Mode::Indirect => {
                let ptr = bus.read16(arg)?;
                bus.read16_bug(ptr)?
            }
            Mode::IndexedIndirect => {
                let ptr = bus.read8(arg)?.wrapping_add(self.regs.x);
                bus.read16_bug(u16::from(ptr))?
            }
            Mode::IndirectIndexed => {
                let ptr = bus.read8(arg)?;
                bus.read16_bug(u16::from(ptr))?
                    .wrapping_add(u16::from(self.regs.y))
            }
        };
        Ok(Some(addr))
    }

    pub(crate) fn execute<B: AddressSpace>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
    ) -> Result<Flow, BusError> {
        let operand = self.operand_addr(bus, instr.mode)?;
        // Every mode that reads memory has an address; only implied and
        // accumulator forms leave it empty.
        let addr = operand.unwrap_or_default();
        let pc = self.regs.pc;

        match instr.mnemonic {
            Mnemonic::Lda => {
                self.regs.a = bus.read8(addr)?;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Ldx => {
                self.regs.x = bus.read8(addr)?;
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Ldy => {
                self.regs.y = bus.read8(addr)?;
                self.regs.p.update_nz(self.regs.y);
            }
            Mnemonic::Sta => bus.write8(addr, self.regs.a)?,
            Mnemonic::Stx => bus.write8(addr, self.regs.x)?,
            Mnemonic::Sty => bus.write8(addr, self.regs.y)?,

            Mnemonic::Adc => {
                let value = bus.read8(addr)?;
                self.adc(value);
            }
            Mnemonic::Sbc => {
                let value = bus.read8(addr)?;
                self.adc(!value);
            }
            Mnemonic::And => {
                self.regs.a &= bus.read8(addr)?;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Ora => {
                self.regs.a |= bus.read8(addr)?;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Eor => {
                self.regs.a ^= bus.read8(addr)?;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Cmp => {
                let value = bus.read8(addr)?;
                self.compare(self.regs.a, value);
            }
            Mnemonic::Cpx => {
                let value = bus.read8(addr)?;
                self.compare(self.regs.x, value);
            }
            Mnemonic::Cpy => {
                let value = bus.read8(addr)?;
                self.compare(self.regs.y, value);
            }
            Mnemonic::Bit => {
                let value = bus.read8(addr)?;
                self.regs.p.set_or_reset(Flag::Z, self.regs.a & value == 0);
                self.regs.p.set_or_reset(Flag::V, value & 0x40 != 0);
                self.regs.p.set_or_reset(Flag::N, value & 0x80 != 0);
            }

            Mnemonic::Asl => self.read_modify_write(bus, operand, Self::asl)?,
            Mnemonic::Lsr => self.read_modify_write(bus, operand, Self::lsr)?,
            Mnemonic::Rol => self.read_modify_write(bus, operand, Self::rol)?,
            Mnemonic::Ror => self.read_modify_write(bus, operand, Self::ror)?,
            Mnemonic::Inc => {
                let value = bus.read8(addr)?.wrapping_add(1);
                bus.write8(addr, value)?;
                self.regs.p.update_nz(value);
            }
            Mnemonic::Dec => {
                let value = bus.read8(addr)?.wrapping_sub(1);
                bus.write8(addr, value)?;
                self.regs.p.update_nz(value);
            }
            Mnemonic::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Mnemonic::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }

            Mnemonic::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Mnemonic::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
            }
            Mnemonic::Txs => self.regs.s = self.regs.x,

            Mnemonic::Pha => self.push8(bus, self.regs.a)?,
            Mnemonic::Php => self.push8(bus, self.regs.p.to_stack(true))?,
            Mnemonic::Pla => {
                self.regs.a = self.pop8(bus)?;
                self.regs.p.update_nz(self.regs.a);
            }
            Mnemonic::Plp => self.regs.p = Status::from_stack(self.pop8(bus)?),

            Mnemonic::Clc => self.regs.p.reset(Flag::C),
            Mnemonic::Cld => self.regs.p.reset(Flag::D),
            Mnemonic::Cli => self.regs.p.reset(Flag::I),
            Mnemonic::Clv => self.regs.p.reset(Flag::V),
            Mnemonic::Sec => self.regs.p.set(Flag::C),
            Mnemonic::Sed => self.regs.p.set(Flag::D),
            Mnemonic::Sei => self.regs.p.set(Flag::I),

            Mnemonic::Bcc => return Ok(self.branch(!self.regs.p.get(Flag::C), addr)),
            Mnemonic::Bcs => return Ok(self.branch(self.regs.p.get(Flag::C), addr)),
            Mnemonic::Bne => return Ok(self.branch(!self.regs.p.get(Flag::Z), addr)),
            Mnemonic::Beq => return Ok(self.branch(self.regs.p.get(Flag::Z), addr)),
            Mnemonic::Bpl => return Ok(self.branch(!self.regs.p.get(Flag::N), addr)),
            Mnemonic::Bmi => return Ok(self.branch(self.regs.p.get(Flag::N), addr)),
            Mnemonic::Bvc => return Ok(self.branch(!self.regs.p.get(Flag::V), addr)),
            Mnemonic::Bvs => return Ok(self.branch(self.regs.p.get(Flag::V), addr)),

            Mnemonic::Jmp => {
                self.regs.pc = addr;
                return Ok(Flow::Jump);
            }
            Mnemonic::Jsr => {
                // Return address is the last byte of the JSR
                self.push16(bus, pc.wrapping_add(2))?;
                self.regs.pc = addr;
                return Ok(Flow::Jump);
            }
            Mnemonic::Rts => {
                self.regs.pc = self.pop16(bus)?.wrapping_add(1);
                return Ok(Flow::Jump);
            }
            Mnemonic::Rti => {
                self.regs.p = Status::from_stack(self.pop8(bus)?);
                self.regs.pc = self.pop16(bus)?;
                return Ok(Flow::Jump);
            }
            Mnemonic::Brk => {
                // BRK skips a padding byte
                self.regs.pc = pc.wrapping_add(2);
                self.interrupt(bus, IRQ_VECTOR, true)?;
                return Ok(Flow::Jump);
            }

            Mnemonic::Nop => {}
        }

        Ok(Flow::Next)
    }

    fn branch(&mut self, taken: bool, target: u16) -> Flow {
        if taken {
            self.regs.pc = target;
            Flow::Jump
        } else {
            Flow::Next
        }
    }

    /// Shift/rotate on A (no operand address) or on memory.
    fn read_modify_write<B: AddressSpace>(
        &mut self,
        bus: &mut B,
        operand: Option<u16>,
        op: fn(&mut Self, u8) -> u8,
    ) -> Result<(), BusError> {
        match operand {
            None => {
                let value = self.regs.a;
                self.regs.a = op(self, value);
            }
            Some(addr) => {
                let value = bus.read8(addr)?;
                let result = op(self, value);
                bus.write8(addr, result)?;
            }
        }
        Ok(())
    }

    fn adc(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.get(Flag::C));
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;

        self.regs.p.set_or_reset(Flag::C, sum > 0xFF);
        self.regs
            .p
            .set_or_reset(Flag::V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.set_or_reset(Flag::C, register >= value);
        self.regs.p.update_nz(register.wrapping_sub(value));
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_or_reset(Flag::C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_or_reset(Flag::C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.get(Flag::C));
        self.regs.p.set_or_reset(Flag::C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.get(Flag::C)) << 7;
        self.regs.p.set_or_reset(Flag::C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }
}
