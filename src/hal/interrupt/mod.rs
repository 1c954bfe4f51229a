//! Interrupt routing.
//!
//! Twenty peripheral sources, each with a fixed status flag and enable bit
//! spread over INTCON, INTCON3, PIR1/PIE1 and PIR2/PIE2. An
//! [`InterruptRouter`] enables and disables sources and, from the interrupt
//! handler, acknowledges pending ones and raises the [`InterruptFlag`] the
//! application registered for them.
//!
//! ```
//! use pic18_hal::prelude::*;
//!
//! static TIMER_DONE: InterruptFlag = InterruptFlag::new();
//! static SLOTS: FlagSlots<'static> = FlagSlots::new();
//!
//! let mut bus = RegisterFile::new();
//! let router = InterruptRouter::builder()
//!     .dispatch(SourceSet::from([InterruptSource::Timer0]))
//!     .flag_slots(&SLOTS)
//!     .build();
//!
//! router.enable(&mut bus, InterruptSource::Timer0, Some(&TIMER_DONE));
//!
//! // The timer overflows.
//! let route = InterruptSource::Timer0.route();
//! bus.poke(route.status, bus.peek(route.status) | (1 << route.status_bit));
//!
//! router.dispatch(&mut bus);
//! assert!(TIMER_DONE.take());
//! ```

mod builder;
mod flags;
mod router;
mod source;

pub use builder::{InterruptRouterBuilder, NeedDispatchSet, NeedFlagSlots, Ready};
pub use flags::{FlagSlots, InterruptFlag, Occurrence};
pub use router::InterruptRouter;
pub use source::{InterruptSource, Route, SOURCE_COUNT, SourceSet};
