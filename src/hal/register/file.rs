use crate::hal::{map::RegisterAddress, register::RegisterBus};

/// First address covered by [`RegisterFile`].
pub const FILE_BASE: u16 = 0x0F80;
/// Number of registers covered by [`RegisterFile`] (`0x0F80..=0x0FFF`).
pub const FILE_SIZE: usize = 128;

/// RAM-backed shadow of the special function register window.
///
/// Every write through [`RegisterBus`] is recorded in a write map so tests can
/// check which registers an operation touched. [`RegisterFile::poke`] and
/// [`RegisterFile::peek`] bypass the write map and stand in for the hardware
/// side (a pin changing level, a peripheral raising its flag bit).
///
/// # Panics
/// Every access panics if the address lies outside `0x0F80..=0x0FFF`.
pub struct RegisterFile {
    bytes: [u8; FILE_SIZE],
    written: bitmaps::Bitmap<FILE_SIZE>,
}

impl core::fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterFile").finish_non_exhaustive()
    }
}

impl RegisterFile {
    /// Creates a register file with every register reading zero.
    pub fn new() -> Self {
        Self {
            bytes: [0; FILE_SIZE],
            written: bitmaps::Bitmap::new(),
        }
    }

    fn index(addr: RegisterAddress) -> usize {
        match addr.get().checked_sub(FILE_BASE) {
            Some(off) if (off as usize) < FILE_SIZE => off as usize,
            _ => panic!("register {:#06x} outside register file", addr.get()),
        }
    }

    /// Reads a register without going through the bus.
    pub fn peek(&self, addr: RegisterAddress) -> u8 {
        self.bytes[Self::index(addr)]
    }

    /// Sets a register without recording a write.
    pub fn poke(&mut self, addr: RegisterAddress, value: u8) {
        self.bytes[Self::index(addr)] = value;
    }

    /// Returns true if the register was written through the bus since the
    /// last [`RegisterFile::clear_written`].
    pub fn was_written(&self, addr: RegisterAddress) -> bool {
        self.written.get(Self::index(addr))
    }

    /// Returns true if any register was written through the bus.
    pub fn any_written(&self) -> bool {
        !self.written.is_empty()
    }

    /// Forgets all recorded writes.
    pub fn clear_written(&mut self) {
        self.written = bitmaps::Bitmap::new();
    }

    /// Calls `f` with the address and current value of every written register,
    /// in ascending address order.
    pub fn iter_written<F>(&self, mut f: F)
    where
        F: FnMut(RegisterAddress, u8),
    {
        let mut idx = self.written.first_index();
        while let Some(i) = idx {
            f(RegisterAddress::new(FILE_BASE + i as u16), self.bytes[i]);
            idx = self.written.next_index(i);
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for RegisterFile {
    fn read(&mut self, addr: RegisterAddress) -> u8 {
        self.peek(addr)
    }

    fn write(&mut self, addr: RegisterAddress, value: u8) {
        let i = Self::index(addr);
        self.bytes[i] = value;
        self.written.set(i, true);
    }
}
