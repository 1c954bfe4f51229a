//! Special function register addresses and bit positions.
//!
//! Addresses are fixed by the silicon and never computed at runtime except by
//! the fixed port offsets ([`DIRECTION_OFFSET`], [`LATCH_OFFSET`]).

/// Address of one byte-wide special function register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress(u16);

impl RegisterAddress {
    #[inline]
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Address `by` bytes above this one.
    #[inline]
    pub const fn offset(self, by: u16) -> Self {
        Self(self.0 + by)
    }
}

pub const PORTA: RegisterAddress = RegisterAddress::new(0x0F80);
pub const PORTB: RegisterAddress = RegisterAddress::new(0x0F81);
pub const PORTC: RegisterAddress = RegisterAddress::new(0x0F82);
pub const PORTD: RegisterAddress = RegisterAddress::new(0x0F83);
pub const PORTE: RegisterAddress = RegisterAddress::new(0x0F84);

/// PORTx to TRISx distance.
pub const DIRECTION_OFFSET: u16 = 0x12;
/// PORTx to LATx distance.
pub const LATCH_OFFSET: u16 = 0x09;

pub const ADCON1: RegisterAddress = RegisterAddress::new(0x0FC1);
/// PCFG<3:0> set: every analog-capable pin becomes digital.
pub const ANALOG_DISABLE_MASK: u8 = 0x0F;

pub const T0CON: RegisterAddress = RegisterAddress::new(0x0FD5);
pub const TMR0L: RegisterAddress = RegisterAddress::new(0x0FD6);
pub const TMR0H: RegisterAddress = RegisterAddress::new(0x0FD7);

pub const INTCON: RegisterAddress = RegisterAddress::new(0x0FF2);
pub const INTCON3: RegisterAddress = RegisterAddress::new(0x0FF0);
pub const PIR1: RegisterAddress = RegisterAddress::new(0x0F9E);
pub const PIE1: RegisterAddress = RegisterAddress::new(0x0F9D);
pub const PIR2: RegisterAddress = RegisterAddress::new(0x0FA1);
pub const PIE2: RegisterAddress = RegisterAddress::new(0x0FA0);

/// Generates `<REG>_<BIT>` bit-position constants for one register.
macro_rules! register_bits {
    ($reg:ident { $($bit:ident = $pos:literal),* $(,)? }) => {
        paste::paste! {
            $(
                #[doc = "`" $bit "` bit position in `" $reg "`."]
                pub const [<$reg _ $bit>]: u8 = $pos;
            )*
        }
    };
}

register_bits!(T0CON {
    TMR0ON = 7,
    T08BIT = 6,
    T0CS = 5,
    T0SE = 4,
    PSA = 3,
    T0PS0 = 0,
});

register_bits!(INTCON {
    GIE = 7,
    PEIE = 6,
    TMR0IE = 5,
    INT0IE = 4,
    RBIE = 3,
    TMR0IF = 2,
    INT0IF = 1,
    RBIF = 0,
});

register_bits!(INTCON3 {
    INT2IE = 4,
    INT1IE = 3,
    INT2IF = 1,
    INT1IF = 0,
});

register_bits!(PIR1 {
    PSPIF = 7,
    ADIF = 6,
    RCIF = 5,
    TXIF = 4,
    SSPIF = 3,
    CCP1IF = 2,
    TMR2IF = 1,
    TMR1IF = 0,
});

register_bits!(PIE1 {
    PSPIE = 7,
    ADIE = 6,
    RCIE = 5,
    TXIE = 4,
    SSPIE = 3,
    CCP1IE = 2,
    TMR2IE = 1,
    TMR1IE = 0,
});

register_bits!(PIR2 {
    OSCFIF = 7,
    CMIF = 6,
    EEIF = 4,
    BCLIF = 3,
    HLVDIF = 2,
    TMR3IF = 1,
    CCP2IF = 0,
});

register_bits!(PIE2 {
    OSCFIE = 7,
    CMIE = 6,
    EEIE = 4,
    BCLIE = 3,
    HLVDIE = 2,
    TMR3IE = 1,
    CCP2IE = 0,
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_offsets_land_on_tris_and_lat() {
        assert_eq!(PORTA.offset(DIRECTION_OFFSET).get(), 0x0F92);
        assert_eq!(PORTE.offset(DIRECTION_OFFSET).get(), 0x0F96);
        assert_eq!(PORTB.offset(LATCH_OFFSET).get(), 0x0F8A);
    }

    #[test]
    fn generated_bit_names() {
        assert_eq!(INTCON_GIE, 7);
        assert_eq!(INTCON3_INT2IE, 4);
        assert_eq!(PIR2_OSCFIF, 7);
        assert_eq!(T0CON_PSA, 3);
    }
}
