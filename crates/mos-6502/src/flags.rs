//! 6502 processor status register (P).
//!
//! Flags are addressed by bit position. [`Status::get`], [`Status::set`],
//! [`Status::reset`] and [`Status::set_or_reset`] are the only ways the
//! core touches individual flags.

/// Status flag, valued by its bit position in P.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    /// Carry.
    C = 0,
    /// Zero.
    Z = 1,
    /// IRQ disable.
    I = 2,
    /// Decimal mode. Stored, but the 2A03 has no BCD adder.
    D = 3,
    /// Break. Only meaningful in the copy of P pushed to the stack.
    B = 4,
    /// Unused, reads as 1 when pushed.
    U = 5,
    /// Overflow.
    V = 6,
    /// Negative.
    N = 7,
}

impl Flag {
    #[must_use]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Value of P after power-up: I and U set.
    pub const POWER_UP: Self = Self(0x24);

    #[must_use]
    pub const fn get(self, flag: Flag) -> bool {
        self.0 & flag.mask() != 0
    }

    pub fn set(&mut self, flag: Flag) {
        self.0 |= flag.mask();
    }

    pub fn reset(&mut self, flag: Flag) {
        self.0 &= !flag.mask();
    }

    pub fn set_or_reset(&mut self, flag: Flag, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.reset(flag);
        }
    }

    /// Update N and Z from a result byte.
    pub fn update_nz(&mut self, value: u8) {
        self.set_or_reset(Flag::N, value & 0x80 != 0);
        self.set_or_reset(Flag::Z, value == 0);
    }

    /// Byte pushed by PHP/BRK (`brk = true`) or NMI/IRQ (`brk = false`).
    /// U is always set.
    #[must_use]
    pub const fn to_stack(self, brk: bool) -> u8 {
        let value = self.0 | Flag::U.mask();
        if brk {
            value | Flag::B.mask()
        } else {
            value & !Flag::B.mask()
        }
    }

    /// Status restored by PLP/RTI: B is dropped, U forced on.
    #[must_use]
    pub const fn from_stack(value: u8) -> Self {
        Self((value & !Flag::B.mask()) | Flag::U.mask())
    }
}
