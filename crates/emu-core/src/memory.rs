//! Flat, bounds-checked byte storage.

use crate::{AddressSpace, BusError};

/// A fixed-size block of bytes.
///
/// Used for work RAM, and as a plain 64K address space in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Zero-filled memory of `len` bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn read(&self, offset: usize) -> Result<u8, BusError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.out_of_bounds(offset))
    }

    pub fn write(&mut self, offset: usize, value: u8) -> Result<(), BusError> {
        let len = self.bytes.len();
        let slot = self
            .bytes
            .get_mut(offset)
            .ok_or(BusError::OutOfBounds { offset, len })?;
        *slot = value;
        Ok(())
    }

    /// Copy `data` in starting at `offset`.
    pub fn load(&mut self, offset: usize, data: &[u8]) -> Result<(), BusError> {
        let end = offset + data.len();
        if end > self.bytes.len() {
            return Err(self.out_of_bounds(end - 1));
        }
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn out_of_bounds(&self, offset: usize) -> BusError {
        BusError::OutOfBounds {
            offset,
            len: self.bytes.len(),
        }
    }
}

/// Identity mapping: address N is offset N.
impl AddressSpace for Memory {
    fn read8(&mut self, addr: u16) -> Result<u8, BusError> {
        self.read(usize::from(addr))
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        self.write(usize::from(addr), value)
    }

    fn peek8(&self, addr: u16) -> Option<u8> {
        self.bytes.get(usize::from(addr)).copied()
    }
}
