use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use super::source::{InterruptSource, SOURCE_COUNT};

/// Whether an interrupt fired since the flag was last cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Occurrence {
    #[default]
    NotHappened = 0,
    Happened = 1,
}

/// Completion flag shared between the interrupt handler and application code.
///
/// The handler only ever raises the flag; the application reads and clears
/// it. Every access runs inside a critical section, so a flag can live in a
/// `static`.
pub struct InterruptFlag {
    state: Mutex<Cell<Occurrence>>,
}

impl InterruptFlag {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(Occurrence::NotHappened)),
        }
    }

    pub fn get(&self) -> Occurrence {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    pub fn occurred(&self) -> bool {
        self.get() == Occurrence::Happened
    }

    /// Reads and clears the flag in one critical section.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| {
            self.state.borrow(cs).replace(Occurrence::NotHappened) == Occurrence::Happened
        })
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.state.borrow(cs).set(Occurrence::NotHappened));
    }

    pub(crate) fn raise(&self, cs: CriticalSection<'_>) {
        self.state.borrow(cs).set(Occurrence::Happened);
    }
}

impl Default for InterruptFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for InterruptFlag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("InterruptFlag").field(&self.get()).finish()
    }
}

/// Per-source registration table consulted by the dispatcher.
///
/// Holds at most one flag per [`InterruptSource`]. Registering a second flag
/// for the same source replaces the first.
pub struct FlagSlots<'f> {
    slots: [Mutex<Cell<Option<&'f InterruptFlag>>>; SOURCE_COUNT],
}

impl<'f> FlagSlots<'f> {
    pub const fn new() -> Self {
        Self {
            slots: [const { Mutex::new(Cell::new(None)) }; SOURCE_COUNT],
        }
    }

    /// Returns true if a flag is registered for `source`.
    pub fn is_registered(&self, source: InterruptSource) -> bool {
        critical_section::with(|cs| self.slots[source.index()].borrow(cs).get().is_some())
    }

    pub(crate) fn register(&self, source: InterruptSource, flag: Option<&'f InterruptFlag>) {
        critical_section::with(|cs| self.slots[source.index()].borrow(cs).set(flag));
    }

    /// Raises the flag registered for `source`, if any.
    pub(crate) fn raise(&self, source: InterruptSource) -> bool {
        critical_section::with(|cs| match self.slots[source.index()].borrow(cs).get() {
            Some(flag) => {
                flag.raise(cs);
                true
            }
            None => false,
        })
    }
}

impl Default for FlagSlots<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FlagSlots<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlagSlots").finish_non_exhaustive()
    }
}
