pub mod error;
pub mod gpio;
pub mod interrupt;
pub mod keypad;
pub mod map;
pub mod register;
pub mod timer0;
pub mod wait;

#[cfg(test)]
mod test_support;

pub use error::HalError;
pub use gpio::{Direction, Gpio, GpioPinConfig, PinDriver, PinStatus, Port, SiblingEffects};
pub use interrupt::{
    FlagSlots, InterruptFlag, InterruptRouter, InterruptRouterBuilder, InterruptSource,
    Occurrence, Route, SourceSet,
};
pub use keypad::{KEY_NOT_PRESSED, KeyPosition, Keypad, KeypadMatrix};
pub use map::RegisterAddress;
pub use register::{Mmio, RegisterBus, RegisterFile};
pub use timer0::{DataSize, Prescaler, Timer0, Timer0Config, Timer0Mode};
pub use wait::{DelayDeadline, Deadline, PollBudget, WaitOutcome, wait_until};

pub mod prelude {
    pub use super::{
        DataSize, Deadline, DelayDeadline, Direction, FlagSlots, Gpio, GpioPinConfig, HalError,
        InterruptFlag, InterruptRouter, InterruptSource, KEY_NOT_PRESSED, KeyPosition, Keypad,
        KeypadMatrix, Mmio, Occurrence, PinDriver, PinStatus, PollBudget, Port, Prescaler,
        RegisterAddress, RegisterBus, RegisterFile, SourceSet, Timer0, Timer0Config, Timer0Mode,
        WaitOutcome,
    };
}
