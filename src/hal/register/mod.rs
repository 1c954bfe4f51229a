//! Byte-wide register access.
//!
//! [`RegisterBus`] is the only way the drivers touch hardware. [`Mmio`] talks to
//! the live address space; [`RegisterFile`] shadows it in RAM for host builds.

mod file;
mod mmio;

pub use file::{FILE_BASE, FILE_SIZE, RegisterFile};
pub use mmio::Mmio;

use crate::hal::map::RegisterAddress;

/// Read/write access to byte-wide special function registers.
///
/// Implementations operate directly on the backing storage: no caching, no
/// batching, no address validation. Passing an address that is not a real
/// register is a contract violation.
///
/// The provided bit helpers are plain read-modify-write sequences and are not
/// atomic with respect to an interrupt that touches the same register.
pub trait RegisterBus {
    /// Reads the current register value.
    fn read(&mut self, addr: RegisterAddress) -> u8;

    /// Overwrites the register with `value`.
    fn write(&mut self, addr: RegisterAddress, value: u8);

    /// Sets bit `bit` (0..=7), leaving the others untouched.
    #[inline]
    fn set_bit(&mut self, addr: RegisterAddress, bit: u8) {
        debug_assert!(bit < 8, "bit index {} out of range", bit);
        let value = self.read(addr);
        self.write(addr, value | (1 << bit));
    }

    /// Clears bit `bit` (0..=7), leaving the others untouched.
    #[inline]
    fn clear_bit(&mut self, addr: RegisterAddress, bit: u8) {
        debug_assert!(bit < 8, "bit index {} out of range", bit);
        let value = self.read(addr);
        self.write(addr, value & !(1 << bit));
    }

    /// Sets bit `bit` (0..=7) when `value` is true, clears it otherwise.
    #[inline]
    fn assign_bit(&mut self, addr: RegisterAddress, bit: u8, value: bool) {
        if value {
            self.set_bit(addr, bit);
        } else {
            self.clear_bit(addr, bit);
        }
    }

    /// Returns true if bit `bit` (0..=7) reads as 1.
    #[inline]
    fn test_bit(&mut self, addr: RegisterAddress, bit: u8) -> bool {
        debug_assert!(bit < 8, "bit index {} out of range", bit);
        self.read(addr) & (1 << bit) != 0
    }
}
