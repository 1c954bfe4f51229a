//! Digital I/O pins.
//!
//! A [`GpioPinConfig`] only names a pin; it owns no hardware. [`Gpio`] borrows a
//! [`RegisterBus`] and applies validated operations to the pin's port registers.

use crate::{
    fmt::trace,
    hal::{
        HalError,
        map::{
            ADCON1, ANALOG_DISABLE_MASK, DIRECTION_OFFSET, LATCH_OFFSET, PORTA, PORTB, PORTC,
            PORTD, PORTE, RegisterAddress,
        },
        register::RegisterBus,
    },
};

/// One of the five GPIO ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    pub const ALL: [Port; 5] = [Port::A, Port::B, Port::C, Port::D, Port::E];

    /// Port data register (PORTx), also the port's base address.
    pub const fn address(self) -> RegisterAddress {
        match self {
            Port::A => PORTA,
            Port::B => PORTB,
            Port::C => PORTC,
            Port::D => PORTD,
            Port::E => PORTE,
        }
    }

    /// Direction register (TRISx).
    pub const fn direction_register(self) -> RegisterAddress {
        self.address().offset(DIRECTION_OFFSET)
    }

    /// Output latch register (LATx).
    pub const fn latch_register(self) -> RegisterAddress {
        self.address().offset(LATCH_OFFSET)
    }

    /// Maps a base address back to its port, if it is one.
    pub fn from_address(addr: RegisterAddress) -> Option<Port> {
        Port::ALL.into_iter().find(|port| port.address() == addr)
    }

    /// Ports whose pins share the ADCON1 analog configuration.
    pub const fn has_analog_pins(self) -> bool {
        matches!(self, Port::A | Port::B)
    }
}

/// Pin direction as encoded in TRISx (clear = output, set = input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Output = 0,
    Input = 1,
}

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinStatus {
    Low = 0,
    High = 1,
}

impl PinStatus {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            PinStatus::Low => PinStatus::High,
            PinStatus::High => PinStatus::Low,
        }
    }
}

impl From<bool> for PinStatus {
    fn from(high: bool) -> Self {
        if high { PinStatus::High } else { PinStatus::Low }
    }
}

/// Static description of one pin: port base address, pin index, direction.
///
/// Built from const tables, so the port is stored as a raw address and pin as
/// a raw index; both are checked by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPinConfig {
    pub port: RegisterAddress,
    pub pin: u8,
    pub direction: Direction,
}

impl GpioPinConfig {
    pub const fn new(port: Port, pin: u8, direction: Direction) -> Self {
        Self {
            port: port.address(),
            pin,
            direction,
        }
    }

    /// Config from a raw port address, for tables that store addresses.
    pub const fn from_raw(port: RegisterAddress, pin: u8, direction: Direction) -> Self {
        Self {
            port,
            pin,
            direction,
        }
    }

    /// Same pin, different direction.
    #[must_use]
    pub const fn with_direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }

    /// Checks the port address and pin index, returning the resolved port.
    pub fn validate(&self) -> Result<Port, HalError> {
        let port = Port::from_address(self.port).ok_or(HalError::UnknownPort)?;
        if self.pin >= 8 {
            return Err(HalError::PinOutOfRange);
        }
        Ok(port)
    }
}

/// Bits outside the target pin that [`Gpio::init`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SiblingEffects {
    /// Every bit of this port's data register was written low, not just the
    /// configured pin.
    pub cleared_port: Port,
    /// ADCON1 PCFG<3:0> were set, turning every analog-capable pin on ports A
    /// and B digital.
    pub analog_disabled: bool,
}

/// Validated pin operations over a borrowed register bus.
pub struct Gpio<'a, B: RegisterBus> {
    bus: &'a mut B,
}

impl<'a, B: RegisterBus> core::fmt::Debug for Gpio<'a, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gpio").finish_non_exhaustive()
    }
}

impl<'a, B: RegisterBus> Gpio<'a, B> {
    pub fn new(bus: &'a mut B) -> Self {
        Self { bus }
    }

    /// Configures the pin direction and resets the port to its initial state.
    ///
    /// Besides the pin's TRISx bit this also:
    /// - for an input on port A or B, sets ADCON1 PCFG<3:0>, disabling analog
    ///   input on every analog-capable pin;
    /// - writes 0 to the whole PORTx data register (output-low initial state).
    ///
    /// The returned [`SiblingEffects`] reports both.
    pub fn init(&mut self, config: &GpioPinConfig) -> Result<SiblingEffects, HalError> {
        let port = config.validate()?;
        let tris = port.direction_register();
        let mask = 1 << config.pin;

        let mut direction = self.bus.read(tris);
        let mut analog_disabled = false;
        match config.direction {
            Direction::Output => direction &= !mask,
            Direction::Input => {
                direction |= mask;
                if port.has_analog_pins() {
                    let adcon1 = self.bus.read(ADCON1);
                    self.bus.write(ADCON1, adcon1 | ANALOG_DISABLE_MASK);
                    analog_disabled = true;
                }
            }
        }
        self.bus.write(tris, direction);
        self.bus.write(port.address(), PinStatus::Low as u8);

        trace!(
            "gpio init port={} pin={} input={}",
            config.port.get(),
            config.pin,
            config.direction == Direction::Input
        );

        Ok(SiblingEffects {
            cleared_port: port,
            analog_disabled,
        })
    }

    /// Drives the pin high.
    pub fn set(&mut self, config: &GpioPinConfig) -> Result<(), HalError> {
        let port = config.validate()?;
        self.bus.set_bit(port.address(), config.pin);
        Ok(())
    }

    /// Drives the pin low.
    pub fn clear(&mut self, config: &GpioPinConfig) -> Result<(), HalError> {
        let port = config.validate()?;
        self.bus.clear_bit(port.address(), config.pin);
        Ok(())
    }

    /// Inverts the pin's current data bit.
    pub fn toggle(&mut self, config: &GpioPinConfig) -> Result<(), HalError> {
        let port = config.validate()?;
        if self.bus.test_bit(port.address(), config.pin) {
            self.bus.clear_bit(port.address(), config.pin);
        } else {
            self.bus.set_bit(port.address(), config.pin);
        }
        Ok(())
    }

    pub fn assign_status(
        &mut self,
        config: &GpioPinConfig,
        status: PinStatus,
    ) -> Result<(), HalError> {
        let port = config.validate()?;
        self.bus
            .assign_bit(port.address(), config.pin, status == PinStatus::High);
        Ok(())
    }

    /// Reads the pin level from the port data register.
    pub fn get_read(&mut self, config: &GpioPinConfig) -> Result<PinStatus, HalError> {
        let port = config.validate()?;
        Ok(PinStatus::from(self.bus.test_bit(port.address(), config.pin)))
    }

    /// Binds one validated pin to this bus as an `embedded-hal` pin.
    pub fn pin(&mut self, config: GpioPinConfig) -> Result<PinDriver<'_, B>, HalError> {
        config.validate()?;
        Ok(PinDriver {
            bus: &mut *self.bus,
            config,
        })
    }
}

/// A single pin bound to a bus, implementing the `embedded-hal` digital traits.
pub struct PinDriver<'a, B: RegisterBus> {
    bus: &'a mut B,
    config: GpioPinConfig,
}

impl<'a, B: RegisterBus> PinDriver<'a, B> {
    pub fn config(&self) -> &GpioPinConfig {
        &self.config
    }

    fn gpio(&mut self) -> Gpio<'_, B> {
        Gpio::new(&mut *self.bus)
    }
}

impl<'a, B: RegisterBus> core::fmt::Debug for PinDriver<'a, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PinDriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, B: RegisterBus> embedded_hal::digital::ErrorType for PinDriver<'a, B> {
    type Error = HalError;
}

impl<'a, B: RegisterBus> embedded_hal::digital::OutputPin for PinDriver<'a, B> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let config = self.config;
        self.gpio().clear(&config)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let config = self.config;
        self.gpio().set(&config)
    }
}

impl<'a, B: RegisterBus> embedded_hal::digital::StatefulOutputPin for PinDriver<'a, B> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        let config = self.config;
        Ok(self.gpio().get_read(&config)? == PinStatus::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_set_high()?)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let config = self.config;
        self.gpio().toggle(&config)
    }
}

impl<'a, B: RegisterBus> embedded_hal::digital::InputPin for PinDriver<'a, B> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let config = self.config;
        Ok(self.gpio().get_read(&config)? == PinStatus::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}
