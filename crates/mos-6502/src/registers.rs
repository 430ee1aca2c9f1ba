//! 6502 CPU registers.

use crate::Status;

/// Base the stack address is counted down from: a push lands at
/// `STACK_BASE - S`.
///
/// This is not the conventional `$0100 | S` page. With the RAM mirror at
/// `$0800` the stack lives in the first RAM page and grows upward in
/// address as S decreases.
pub const STACK_BASE: u16 = 0x10FF;

/// 6502 CPU register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer.
    pub s: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Registers at power-up, before the reset vector is loaded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status::POWER_UP,
        }
    }

    /// Claim a stack slot for a push: returns the address to write, then
    /// decrements S.
    pub fn push(&mut self) -> u16 {
        let addr = self.stack_addr();
        self.s = self.s.wrapping_sub(1);
        addr
    }

    /// Release a stack slot for a pop: increments S, then returns the
    /// address to read.
    pub fn pop(&mut self) -> u16 {
        self.s = self.s.wrapping_add(1);
        self.stack_addr()
    }

    /// Address S currently points at.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        STACK_BASE - self.s as u16
    }
}
