//! A `no_std`, no-alloc hardware abstraction layer for PIC18-class 8-bit microcontrollers.
//!
//! This crate wraps the memory-mapped special function registers of a PIC18F4620-style
//! part behind validated operations: digital I/O pins, the Timer0 counter/timer, the
//! 20-source interrupt controller, and a debounced matrix-keypad scanner built on the
//! GPIO layer.
//!
//! # Features
//!
//! - **Zero heap allocation** - All state is caller-owned or statically allocated
//! - **One register seam** - Every peripheral goes through [`RegisterBus`](hal::RegisterBus)
//! - **Host-side register file** - Run the same drivers against RAM for tests and demos
//! - **Explicit trap-context sharing** - Interrupt flags live in caller-supplied slots
//! - **Bounded debounce** - Keypad waits take a deadline instead of spinning forever
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐           ┌──────────────────────────┐
//! │   Main line      │           │   Trap context (ISR)     │
//! │                  │           │                          │
//! │  Gpio / Timer0   │           │  router.dispatch(bus)    │
//! │  Keypad          │           │  (reads PIR/INTCON,      │
//! │  router.enable() │──slots───▶│   raises flags,          │
//! │  flag.take()     │◀──flags───│   clears status bits)    │
//! └────────┬─────────┘           └────────────┬─────────────┘
//!          │         RegisterBus              │
//!          └──────────────┬───────────────────┘
//!                 Mmio (hardware) / RegisterFile (host)
//! ```
//!
//! # Example
//!
//! ```rust
//! use pic18_hal::prelude::*;
//!
//! let mut bus = RegisterFile::new();
//! let led = GpioPinConfig::new(Port::D, 3, Direction::Output);
//!
//! let mut gpio = Gpio::new(&mut bus);
//! gpio.init(&led).unwrap();
//! gpio.set(&led).unwrap();
//! assert_eq!(gpio.get_read(&led).unwrap(), PinStatus::High);
//!
//! let mut timer = Timer0::new(&mut bus);
//! let config = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, Prescaler::Div8, 0x1234);
//! timer.update_config(&config).unwrap();
//! assert!(timer.is_running());
//! ```

#![deny(unsafe_code)]
#![no_std]

mod fmt;

pub mod hal;

pub mod prelude {
    pub use crate::hal::prelude::*;
}
