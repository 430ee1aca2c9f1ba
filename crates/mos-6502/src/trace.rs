//! One-line execution trace in the nestest log layout.

use std::fmt::Write;

use emu_core::AddressSpace;

use crate::instructions;
use crate::Mos6502;

impl Mos6502 {
    /// Describe the instruction about to run:
    ///
    /// ```text
    /// C000  4C F5 C5  JMP                             A:00 X:00 Y:00 P:24 SP:FD CYC:0
    /// ```
    ///
    /// Only side-effect-free peeks are used, so tracing never disturbs PPU
    /// or other device state. Bytes that cannot be peeked show as `??`.
    #[must_use]
    pub fn trace<B: AddressSpace>(&self, bus: &B) -> String {
        let pc = self.regs.pc;
        let byte = |offset: u16| {
            bus.peek8(pc.wrapping_add(offset))
                .map_or_else(|| "??".to_string(), |b| format!("{b:02X}"))
        };

        let opcode = bus.peek8(pc);
        let instr = opcode.and_then(instructions::decode);
        let size = instr.map_or(1, instructions::Instruction::size);

        let mut line = format!("{pc:04X}  {}", byte(0));
        for offset in 1..3 {
            if offset < u16::from(size) {
                let _ = write!(line, " {}", byte(offset));
            } else {
                line.push_str("   ");
            }
        }

        let name = instr.map_or_else(|| "???".to_string(), |i| i.mnemonic.to_string());
        let r = &self.regs;
        let _ = write!(
            line,
            "  {name:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            r.a,
            r.x,
            r.y,
            r.p.0,
            r.s,
            self.total_cycles()
        );
        line
    }
}
