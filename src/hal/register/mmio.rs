#![allow(unsafe_code)]

use crate::hal::{map::RegisterAddress, register::RegisterBus};

/// Volatile access to the memory-mapped register space of the running part.
///
/// This is the only type in the crate that dereferences a raw hardware address.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    /// The program must be running on a PIC18 part whose special function
    /// registers live at the addresses in [`crate::hal::map`]. Several handles
    /// may coexist (for example one in the trap handler), but the caller is
    /// responsible for any read-modify-write races between them.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read(&mut self, addr: RegisterAddress) -> u8 {
        unsafe { core::ptr::read_volatile(addr.get() as usize as *const u8) }
    }

    #[inline]
    fn write(&mut self, addr: RegisterAddress, value: u8) {
        unsafe { core::ptr::write_volatile(addr.get() as usize as *mut u8, value) }
    }
}
