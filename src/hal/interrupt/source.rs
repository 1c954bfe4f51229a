use crate::hal::map::{
    INTCON, INTCON_INT0IE, INTCON_INT0IF, INTCON_RBIE, INTCON_RBIF, INTCON_TMR0IE,
    INTCON_TMR0IF, INTCON3, INTCON3_INT1IE, INTCON3_INT1IF, INTCON3_INT2IE, INTCON3_INT2IF, PIE1,
    PIE1_ADIE, PIE1_CCP1IE, PIE1_PSPIE, PIE1_RCIE, PIE1_SSPIE, PIE1_TMR1IE, PIE1_TMR2IE,
    PIE1_TXIE, PIE2, PIE2_BCLIE, PIE2_CCP2IE, PIE2_CMIE, PIE2_EEIE, PIE2_HLVDIE, PIE2_OSCFIE,
    PIE2_TMR3IE, PIR1, PIR1_ADIF, PIR1_CCP1IF, PIR1_PSPIF, PIR1_RCIF, PIR1_SSPIF, PIR1_TMR1IF,
    PIR1_TMR2IF, PIR1_TXIF, PIR2, PIR2_BCLIF, PIR2_CCP2IF, PIR2_CMIF, PIR2_EEIF, PIR2_HLVDIF,
    PIR2_OSCFIF, PIR2_TMR3IF, RegisterAddress,
};

/// Number of interrupt sources.
pub const SOURCE_COUNT: usize = 20;

/// Peripheral interrupt sources, by fixed ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InterruptSource {
    Ext0 = 0,
    Ext1,
    Ext2,
    RbChange,
    Timer0,
    Timer1,
    Timer2,
    Timer3,
    Ccp1,
    Ccp2,
    UsartTx,
    UsartRx,
    Ssp,
    AdConverter,
    ParallelSlave,
    HighLowVoltage,
    BusCollision,
    Eeprom,
    Comparator,
    OscillatorFail,
}

impl InterruptSource {
    pub const ALL: [InterruptSource; SOURCE_COUNT] = [
        InterruptSource::Ext0,
        InterruptSource::Ext1,
        InterruptSource::Ext2,
        InterruptSource::RbChange,
        InterruptSource::Timer0,
        InterruptSource::Timer1,
        InterruptSource::Timer2,
        InterruptSource::Timer3,
        InterruptSource::Ccp1,
        InterruptSource::Ccp2,
        InterruptSource::UsartTx,
        InterruptSource::UsartRx,
        InterruptSource::Ssp,
        InterruptSource::AdConverter,
        InterruptSource::ParallelSlave,
        InterruptSource::HighLowVoltage,
        InterruptSource::BusCollision,
        InterruptSource::Eeprom,
        InterruptSource::Comparator,
        InterruptSource::OscillatorFail,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SOURCE_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Fixed status/enable location of this source.
    #[inline]
    pub const fn route(self) -> Route {
        ROUTES[self.index()]
    }
}

/// Where a source's status flag and enable bit live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Route {
    pub status: RegisterAddress,
    pub status_bit: u8,
    pub enable: RegisterAddress,
    pub enable_bit: u8,
}

const fn route(status: RegisterAddress, status_bit: u8, enable: RegisterAddress, enable_bit: u8) -> Route {
    Route {
        status,
        status_bit,
        enable,
        enable_bit,
    }
}

/// Indexed by [`InterruptSource::index`].
const ROUTES: [Route; SOURCE_COUNT] = [
    route(INTCON, INTCON_INT0IF, INTCON, INTCON_INT0IE),
    route(INTCON3, INTCON3_INT1IF, INTCON3, INTCON3_INT1IE),
    route(INTCON3, INTCON3_INT2IF, INTCON3, INTCON3_INT2IE),
    route(INTCON, INTCON_RBIF, INTCON, INTCON_RBIE),
    route(INTCON, INTCON_TMR0IF, INTCON, INTCON_TMR0IE),
    route(PIR1, PIR1_TMR1IF, PIE1, PIE1_TMR1IE),
    route(PIR1, PIR1_TMR2IF, PIE1, PIE1_TMR2IE),
    route(PIR2, PIR2_TMR3IF, PIE2, PIE2_TMR3IE),
    route(PIR1, PIR1_CCP1IF, PIE1, PIE1_CCP1IE),
    route(PIR2, PIR2_CCP2IF, PIE2, PIE2_CCP2IE),
    route(PIR1, PIR1_TXIF, PIE1, PIE1_TXIE),
    route(PIR1, PIR1_RCIF, PIE1, PIE1_RCIE),
    route(PIR1, PIR1_SSPIF, PIE1, PIE1_SSPIE),
    route(PIR1, PIR1_ADIF, PIE1, PIE1_ADIE),
    route(PIR1, PIR1_PSPIF, PIE1, PIE1_PSPIE),
    route(PIR2, PIR2_HLVDIF, PIE2, PIE2_HLVDIE),
    route(PIR2, PIR2_BCLIF, PIE2, PIE2_BCLIE),
    route(PIR2, PIR2_EEIF, PIE2, PIE2_EEIE),
    route(PIR2, PIR2_CMIF, PIE2, PIE2_CMIE),
    route(PIR2, PIR2_OSCFIF, PIE2, PIE2_OSCFIE),
];

/// Status registers in dispatch order, each with the sources flagged in it.
pub(crate) const STATUS_GROUPS: [(RegisterAddress, &[InterruptSource]); 4] = [
    (
        INTCON,
        &[
            InterruptSource::Ext0,
            InterruptSource::Timer0,
            InterruptSource::RbChange,
        ],
    ),
    (INTCON3, &[InterruptSource::Ext1, InterruptSource::Ext2]),
    (
        PIR1,
        &[
            InterruptSource::Timer1,
            InterruptSource::Timer2,
            InterruptSource::Ccp1,
            InterruptSource::Ssp,
            InterruptSource::UsartTx,
            InterruptSource::UsartRx,
            InterruptSource::AdConverter,
            InterruptSource::ParallelSlave,
        ],
    ),
    (
        PIR2,
        &[
            InterruptSource::Ccp2,
            InterruptSource::Timer3,
            InterruptSource::HighLowVoltage,
            InterruptSource::BusCollision,
            InterruptSource::Eeprom,
            InterruptSource::Comparator,
            InterruptSource::OscillatorFail,
        ],
    ),
];

/// Fixed-size set of interrupt sources.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SourceSet(bitmaps::Bitmap<SOURCE_COUNT>);

impl SourceSet {
    pub fn empty() -> Self {
        Self(bitmaps::Bitmap::new())
    }

    pub fn all() -> Self {
        InterruptSource::ALL.into_iter().collect()
    }

    /// Adds `source`, returning true if it was not already present.
    pub fn insert(&mut self, source: InterruptSource) -> bool {
        !self.0.set(source.index(), true)
    }

    /// Removes `source`, returning true if it was present.
    pub fn remove(&mut self, source: InterruptSource) -> bool {
        self.0.set(source.index(), false)
    }

    #[must_use]
    pub fn with(mut self, source: InterruptSource) -> Self {
        self.insert(source);
        self
    }

    pub fn contains(&self, source: InterruptSource) -> bool {
        self.0.get(source.index())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = InterruptSource> + '_ {
        InterruptSource::ALL
            .into_iter()
            .filter(move |source| self.contains(*source))
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl core::fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SourceSet {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SourceSet(len={=usize})", self.len());
    }
}

impl FromIterator<InterruptSource> for SourceSet {
    fn from_iter<I: IntoIterator<Item = InterruptSource>>(iter: I) -> Self {
        let mut set = Self::empty();
        for source in iter {
            set.insert(source);
        }
        set
    }
}

impl<const N: usize> From<[InterruptSource; N]> for SourceSet {
    fn from(sources: [InterruptSource; N]) -> Self {
        sources.into_iter().collect()
    }
}
