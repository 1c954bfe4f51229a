//! Timer0 counter/timer.
//!
//! [`Timer0Config`] encodes into the T0CON control byte; [`Timer0`] writes it
//! and controls the run bit.

use crate::{
    fmt::debug,
    hal::{
        HalError,
        map::{
            T0CON, T0CON_PSA, T0CON_T08BIT, T0CON_T0CS, T0CON_T0PS0, T0CON_T0SE, T0CON_TMR0ON,
            TMR0H, TMR0L,
        },
        register::RegisterBus,
    },
};

/// Clock source of the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timer0Mode {
    /// Increment on the internal instruction clock.
    Timer,
    /// Increment on rising edges of T0CKI.
    CounterRising,
    /// Increment on falling edges of T0CKI.
    CounterFalling,
}

/// Width of the count register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataSize {
    Bits8,
    Bits16,
}

/// Clock divider applied before the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Off,
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl Prescaler {
    pub const ALL: [Prescaler; 9] = [
        Prescaler::Off,
        Prescaler::Div2,
        Prescaler::Div4,
        Prescaler::Div8,
        Prescaler::Div16,
        Prescaler::Div32,
        Prescaler::Div64,
        Prescaler::Div128,
        Prescaler::Div256,
    ];

    /// Input clocks per counter increment.
    pub const fn ratio(self) -> u16 {
        match self {
            Prescaler::Off => 1,
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div32 => 32,
            Prescaler::Div64 => 64,
            Prescaler::Div128 => 128,
            Prescaler::Div256 => 256,
        }
    }

    /// PSA and T0PS<2:0>, i.e. bits 3..0 of T0CON.
    ///
    /// `Off` bypasses the prescaler (PSA set, PS bits zero). Otherwise PSA is
    /// clear and PS<2:0> = log2(ratio) - 1.
    pub const fn bits(self) -> u8 {
        match self {
            Prescaler::Off => 1 << T0CON_PSA,
            Prescaler::Div2 => 0b000 << T0CON_T0PS0,
            Prescaler::Div4 => 0b001 << T0CON_T0PS0,
            Prescaler::Div8 => 0b010 << T0CON_T0PS0,
            Prescaler::Div16 => 0b011 << T0CON_T0PS0,
            Prescaler::Div32 => 0b100 << T0CON_T0PS0,
            Prescaler::Div64 => 0b101 << T0CON_T0PS0,
            Prescaler::Div128 => 0b110 << T0CON_T0PS0,
            Prescaler::Div256 => 0b111 << T0CON_T0PS0,
        }
    }
}

/// Timer0 configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timer0Config {
    pub mode: Timer0Mode,
    pub data_size: DataSize,
    pub prescaler: Prescaler,
    /// Initial count. Only the low byte is used in 8-bit mode.
    pub count: u16,
}

impl Timer0Config {
    pub const fn new(
        mode: Timer0Mode,
        data_size: DataSize,
        prescaler: Prescaler,
        count: u16,
    ) -> Self {
        Self {
            mode,
            data_size,
            prescaler,
            count,
        }
    }

    /// Field-level validation hook. Every representable config is accepted;
    /// an 8-bit config with a count above 0xFF is truncated, not rejected.
    pub fn validate(&self) -> Result<(), HalError> {
        Ok(())
    }

    /// T0CON value for this config with the run bit clear.
    pub const fn control_byte(&self) -> u8 {
        let mut byte = self.prescaler.bits();
        if let DataSize::Bits8 = self.data_size {
            byte |= 1 << T0CON_T08BIT;
        }
        match self.mode {
            Timer0Mode::Timer => {}
            Timer0Mode::CounterRising => byte |= 1 << T0CON_T0CS,
            Timer0Mode::CounterFalling => byte |= (1 << T0CON_T0CS) | (1 << T0CON_T0SE),
        }
        byte
    }
}

/// Timer0 driver over a borrowed register bus.
pub struct Timer0<'a, B: RegisterBus> {
    bus: &'a mut B,
}

impl<'a, B: RegisterBus> core::fmt::Debug for Timer0<'a, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timer0").finish_non_exhaustive()
    }
}

impl<'a, B: RegisterBus> Timer0<'a, B> {
    pub fn new(bus: &'a mut B) -> Self {
        Self { bus }
    }

    /// Stops the timer, loads the initial count and writes the control byte.
    ///
    /// Calling this doesn't start the timer.
    pub fn init(&mut self, config: &Timer0Config) -> Result<(), HalError> {
        config.validate()?;

        self.stop();
        self.write_count(config.data_size, config.count);
        let control = config.control_byte();
        self.bus.write(T0CON, control);

        debug!("timer0 init t0con={} count={}", control, config.count);
        Ok(())
    }

    /// Sets TMR0ON.
    pub fn start(&mut self) {
        self.bus.set_bit(T0CON, T0CON_TMR0ON);
    }

    /// Clears TMR0ON.
    pub fn stop(&mut self) {
        self.bus.clear_bit(T0CON, T0CON_TMR0ON);
    }

    /// [`Timer0::init`] followed by [`Timer0::start`].
    pub fn update_config(&mut self, config: &Timer0Config) -> Result<(), HalError> {
        self.init(config)?;
        self.start();
        Ok(())
    }

    pub fn is_running(&mut self) -> bool {
        self.bus.test_bit(T0CON, T0CON_TMR0ON)
    }

    fn data_size(&mut self) -> DataSize {
        if self.bus.test_bit(T0CON, T0CON_T08BIT) {
            DataSize::Bits8
        } else {
            DataSize::Bits16
        }
    }

    /// Current count in the configured width.
    ///
    /// TMR0L is read first: on silicon that latches TMR0H.
    pub fn count(&mut self) -> u16 {
        let low = self.bus.read(TMR0L);
        match self.data_size() {
            DataSize::Bits8 => u16::from(low),
            DataSize::Bits16 => u16::from_le_bytes([low, self.bus.read(TMR0H)]),
        }
    }

    /// Reloads the count in the currently configured width.
    pub fn set_count(&mut self, count: u16) {
        let size = self.data_size();
        self.write_count(size, count);
    }

    // TMR0H is a buffer that the TMR0L write transfers, so it goes first.
    fn write_count(&mut self, size: DataSize, count: u16) {
        let [low, high] = count.to_le_bytes();
        if let DataSize::Bits16 = size {
            self.bus.write(TMR0H, high);
        }
        self.bus.write(TMR0L, low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::register::RegisterFile;

    const PRESCALER_TABLE: [(Prescaler, u8); 9] = [
        (Prescaler::Off, 0b1000),
        (Prescaler::Div2, 0b0000),
        (Prescaler::Div4, 0b0001),
        (Prescaler::Div8, 0b0010),
        (Prescaler::Div16, 0b0011),
        (Prescaler::Div32, 0b0100),
        (Prescaler::Div64, 0b0101),
        (Prescaler::Div128, 0b0110),
        (Prescaler::Div256, 0b0111),
    ];

    #[test]
    fn prescaler_encoding_matches_table() {
        for (prescaler, expected) in PRESCALER_TABLE {
            let mut bus = RegisterFile::new();
            let config = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, prescaler, 0);

            Timer0::new(&mut bus).init(&config).unwrap();

            let t0con = bus.peek(T0CON);
            assert_eq!(t0con & 0x0F, expected, "{:?}", prescaler);
            assert_eq!(t0con & 0b0110_0000, 0, "{:?}", prescaler);
            assert_eq!(t0con & 0x80, 0, "{:?}", prescaler);
        }
    }

    #[test]
    fn mode_and_size_bits() {
        let rising = Timer0Config::new(
            Timer0Mode::CounterRising,
            DataSize::Bits16,
            Prescaler::Div2,
            0,
        );
        assert_eq!(rising.control_byte(), 0b0010_0000);

        let falling = Timer0Config::new(
            Timer0Mode::CounterFalling,
            DataSize::Bits8,
            Prescaler::Off,
            0,
        );
        assert_eq!(falling.control_byte(), 0b0111_1000);
    }

    #[test]
    fn sixteen_bit_count_splits_across_registers() {
        let mut bus = RegisterFile::new();
        let config = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, Prescaler::Off, 0x1234);

        Timer0::new(&mut bus).init(&config).unwrap();

        assert_eq!(bus.peek(TMR0L), 0x34);
        assert_eq!(bus.peek(TMR0H), 0x12);
    }

    #[test]
    fn eight_bit_count_leaves_high_register_untouched() {
        let mut bus = RegisterFile::new();
        bus.poke(TMR0H, 0xEE);
        let config = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits8, Prescaler::Off, 0x1234);

        Timer0::new(&mut bus).init(&config).unwrap();

        assert_eq!(bus.peek(TMR0L), 0x34);
        assert_eq!(bus.peek(TMR0H), 0xEE);
        assert!(!bus.was_written(TMR0H));
        assert_ne!(bus.peek(T0CON) & (1 << T0CON_T08BIT), 0);
    }

    #[test]
    fn init_leaves_running_timer_stopped() {
        let mut bus = RegisterFile::new();
        bus.poke(T0CON, 0xFF);
        let config = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, Prescaler::Div4, 0);

        let mut timer = Timer0::new(&mut bus);
        timer.init(&config).unwrap();

        assert!(!timer.is_running());
        assert_eq!(bus.peek(T0CON), 0b0000_0001);
    }

    #[test]
    fn update_config_starts_and_stop_clears() {
        let mut bus = RegisterFile::new();
        let config = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, Prescaler::Div256, 0);
        let mut timer = Timer0::new(&mut bus);

        timer.update_config(&config).unwrap();
        assert!(timer.is_running());

        timer.stop();
        assert!(!timer.is_running());
        timer.stop();
        assert!(!timer.is_running());

        timer.start();
        assert!(timer.is_running());
        assert_eq!(bus.peek(T0CON), 0x80 | Prescaler::Div256.bits());
    }

    #[test]
    fn count_reads_configured_width() {
        let mut bus = RegisterFile::new();
        let wide = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, Prescaler::Off, 0xBEEF);
        let mut timer = Timer0::new(&mut bus);
        timer.init(&wide).unwrap();
        assert_eq!(timer.count(), 0xBEEF);

        let narrow = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits8, Prescaler::Off, 0x0042);
        timer.init(&narrow).unwrap();
        assert_eq!(timer.count(), 0x0042);

        timer.set_count(0x1299);
        assert_eq!(timer.count(), 0x0099);
        assert_eq!(bus.peek(TMR0H), 0xBE);
    }

    #[test]
    fn prescaler_ratios_double() {
        for pair in Prescaler::ALL[1..].windows(2) {
            assert_eq!(pair[1].ratio(), pair[0].ratio() * 2);
        }
        assert_eq!(Prescaler::Off.ratio(), 1);
    }
}
