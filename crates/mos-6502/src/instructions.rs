//! Opcode table for the 151 documented NMOS 6502 instructions.

use std::fmt;

/// Addressing mode. Determines how the operand is located and how many
/// bytes the instruction occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    /// `(zp,X)`
    IndexedIndirect,
    /// `(zp),Y`
    IndirectIndexed,
}

impl Mode {
    /// Encoded size in bytes, opcode included.
    #[must_use]
    pub const fn size(self) -> u8 {
        match self {
            Mode::Implied | Mode::Accumulator => 1,
            Mode::Immediate
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::Relative
            | Mode::IndexedIndirect
            | Mode::IndirectIndexed => 2,
            Mode::Absolute | Mode::AbsoluteX | Mode::AbsoluteY | Mode::Indirect => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{self:?}").to_ascii_uppercase();
        f.pad(&name)
    }
}

/// One decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    /// Base cycle count, without page-cross or branch-taken penalties.
    pub cycles: u8,
}

impl Instruction {
    #[must_use]
    pub const fn size(&self) -> u8 {
        self.mode.size()
    }
}

/// Look up an opcode. `None` for the undocumented ones.
#[must_use]
pub fn decode(opcode: u8) -> Option<&'static Instruction> {
    TABLE[opcode as usize].as_ref()
}

use Mnemonic::{
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv, Cmp, Cpx,
    Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla,
    Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
};
use Mode::{
    Absolute as Abs, AbsoluteX as Abx, AbsoluteY as Aby, Accumulator as Acc, Immediate as Imm,
    Implied as Imp, IndexedIndirect as Izx, Indirect as Ind, IndirectIndexed as Izy,
    Relative as Rel, ZeroPage as Zp, ZeroPageX as Zpx, ZeroPageY as Zpy,
};

#[rustfmt::skip]
const OPCODES: [(u8, Mnemonic, Mode, u8); 151] = [
    (0x69, Adc, Imm, 2), (0x65, Adc, Zp, 3), (0x75, Adc, Zpx, 4), (0x6D, Adc, Abs, 4),
    (0x7D, Adc, Abx, 4), (0x79, Adc, Aby, 4), (0x61, Adc, Izx, 6), (0x71, Adc, Izy, 5),

    (0x29, And, Imm, 2), (0x25, And, Zp, 3), (0x35, And, Zpx, 4), (0x2D, And, Abs, 4),
    (0x3D, And, Abx, 4), (0x39, And, Aby, 4), (0x21, And, Izx, 6), (0x31, And, Izy, 5),

    (0x0A, Asl, Acc, 2), (0x06, Asl, Zp, 5), (0x16, Asl, Zpx, 6), (0x0E, Asl, Abs, 6),
    (0x1E, Asl, Abx, 7),

    (0x90, Bcc, Rel, 2), (0xB0, Bcs, Rel, 2), (0xF0, Beq, Rel, 2), (0x30, Bmi, Rel, 2),
    (0xD0, Bne, Rel, 2), (0x10, Bpl, Rel, 2), (0x50, Bvc, Rel, 2), (0x70, Bvs, Rel, 2),

    (0x24, Bit, Zp, 3), (0x2C, Bit, Abs, 4),

    (0x00, Brk, Imp, 7),

    (0x18, Clc, Imp, 2), (0xD8, Cld, Imp, 2), (0x58, Cli, Imp, 2), (0xB8, Clv, Imp, 2),

    (0xC9, Cmp, Imm, 2), (0xC5, Cmp, Zp, 3), (0xD5, Cmp, Zpx, 4), (0xCD, Cmp, Abs, 4),
    (0xDD, Cmp, Abx, 4), (0xD9, Cmp, Aby, 4), (0xC1, Cmp, Izx, 6), (0xD1, Cmp, Izy, 5),

    (0xE0, Cpx, Imm, 2), (0xE4, Cpx, Zp, 3), (0xEC, Cpx, Abs, 4),
    (0xC0, Cpy, Imm, 2), (0xC4, Cpy, Zp, 3), (0xCC, Cpy, Abs, 4),

    (0xC6, Dec, Zp, 5), (0xD6, Dec, Zpx, 6), (0xCE, Dec, Abs, 6), (0xDE, Dec, Abx, 7),
    (0xCA, Dex, Imp, 2), (0x88, Dey, Imp, 2),

    (0x49, Eor, Imm, 2), (0x45, Eor, Zp, 3), (0x55, Eor, Zpx, 4), (0x4D, Eor, Abs, 4),
    (0x5D, Eor, Abx, 4), (0x59, Eor, Aby, 4), (0x41, Eor, Izx, 6), (0x51, Eor, Izy, 5),

    (0xE6, Inc, Zp, 5), (0xF6, Inc, Zpx, 6), (0xEE, Inc, Abs, 6), (0xFE, Inc, Abx, 7),
    (0xE8, Inx, Imp, 2), (0xC8, Iny, Imp, 2),

    (0x4C, Jmp, Abs, 3), (0x6C, Jmp, Ind, 5), (0x20, Jsr, Abs, 6),

    (0xA9, Lda, Imm, 2), (0xA5, Lda, Zp, 3), (0xB5, Lda, Zpx, 4), (0xAD, Lda, Abs, 4),
    (0xBD, Lda, Abx, 4), (0xB9, Lda, Aby, 4), (0xA1, Lda, Izx, 6), (0xB1, Lda, Izy, 5),

    (0xA2, Ldx, Imm, 2), (0xA6, Ldx, Zp, 3), (0xB6, Ldx, Zpy, 4), (0xAE, Ldx, Abs, 4),
    (0xBE, Ldx, Aby, 4),

    (0xA0, Ldy, Imm, 2), (0xA4, Ldy, Zp, 3), (0xB4, Ldy, Zpx, 4), (0xAC, Ldy, Abs, 4),
    (0xBC, Ldy, Abx, 4),

    (0x4A, Lsr, Acc, 2), (0x46, Lsr, Zp, 5), (0x56, Lsr, Zpx, 6), (0x4E, Lsr, Abs, 6),
    (0x5E, Lsr, Abx, 7),

    (0xEA, Nop, Imp, 2),

    (0x09, Ora, Imm, 2), (0x05, Ora, Zp, 3), (0x15, Ora, Zpx, 4), (0x0D, Ora, Abs, 4),
    (0x1D, Ora, Abx, 4), (0x19, Ora, Aby, 4), (0x01, Ora, Izx, 6), (0x11, Ora, Izy, 5),

    (0x48, Pha, Imp, 3), (0x08, Php, Imp, 3), (0x68, Pla, Imp, 4), (0x28, Plp, Imp, 4),

    (0x2A, Rol, Acc, 2), (0x26, Rol, Zp, 5), (0x36, Rol, Zpx, 6), (0x2E, Rol, Abs, 6),
    (0x3E, Rol, Abx, 7),

    (0x6A, Ror, Acc, 2), (0x66, Ror, Zp, 5), (0x76, Ror, Zpx, 6), (0x6E, Ror, Abs, 6),
    (0x7E, Ror, Abx, 7),

    (0x40, Rti, Imp, 6), (0x60, Rts, Imp, 6),

    (0xE9, Sbc, Imm, 2), (0xE5, Sbc, Zp, 3), (0xF5, Sbc, Zpx, 4), (0xED, Sbc, Abs, 4),
    (0xFD, Sbc, Abx, 4), (0xF9, Sbc, Aby, 4), (0xE1, Sbc, Izx, 6), (0xF1, Sbc, Izy, 5),

    (0x38, Sec, Imp, 2), (0xF8, Sed, Imp, 2), (0x78, Sei, Imp, 2),

    (0x85, Sta, Zp, 3), (0x95, Sta, Zpx, 4), (0x8D, Sta, Abs, 4), (0x9D, Sta, Abx, 5),
    (0x99, Sta, Aby, 5), (0x81, Sta, Izx, 6), (0x91, Sta, Izy, 6),

    (0x86, Stx, Zp, 3), (0x96, Stx, Zpy, 4), (0x8E, Stx, Abs, 4),
    (0x84, Sty, Zp, 3), (0x94, Sty, Zpx, 4), (0x8C, Sty, Abs, 4),

    (0xAA, Tax, Imp, 2), (0xA8, Tay, Imp, 2), (0xBA, Tsx, Imp, 2), (0x8A, Txa, Imp, 2),
    (0x9A, Txs, Imp, 2), (0x98, Tya, Imp, 2),
];

static TABLE: [Option<Instruction>; 256] = build_table();

const fn build_table() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < OPCODES.len() {
        let (opcode, mnemonic, mode, cycles) = OPCODES[i];
        table[opcode as usize] = Some(Instruction {
            opcode,
            mnemonic,
            mode,
            cycles,
        });
        i += 1;
    }
    table
}
