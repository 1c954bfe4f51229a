use crate::{
    fmt::{trace, warn},
    hal::{
        map::{INTCON, INTCON_GIE, INTCON_PEIE},
        register::RegisterBus,
    },
};

use super::{
    FlagSlots, InterruptFlag, InterruptRouterBuilder, InterruptSource, SourceSet,
    builder::NeedDispatchSet, source::STATUS_GROUPS,
};

/// Enables, disables and dispatches interrupt sources.
///
/// The router owns no hardware state; every operation goes through the
/// [`RegisterBus`] passed in. Completion flags live in caller-provided
/// [`FlagSlots`], and only sources in the dispatch set are serviced by
/// [`InterruptRouter::dispatch`].
pub struct InterruptRouter<'s, 'f> {
    slots: Option<&'s FlagSlots<'f>>,
    dispatch: SourceSet,
}

impl<'s, 'f> InterruptRouter<'s, 'f> {
    pub fn builder() -> InterruptRouterBuilder<'s, 'f, NeedDispatchSet> {
        InterruptRouterBuilder::new()
    }

    pub(super) fn from_parts(slots: Option<&'s FlagSlots<'f>>, dispatch: SourceSet) -> Self {
        Self { slots, dispatch }
    }

    pub fn dispatch_set(&self) -> SourceSet {
        self.dispatch
    }

    pub fn has_flag_slots(&self) -> bool {
        self.slots.is_some()
    }

    /// Sets the global (GIE) and peripheral (PEIE) enables.
    pub fn enable_global<B: RegisterBus>(&self, bus: &mut B) {
        bus.set_bit(INTCON, INTCON_GIE);
        bus.set_bit(INTCON, INTCON_PEIE);
    }

    /// Clears GIE and PEIE. Per-source enable bits are left alone.
    pub fn disable_global<B: RegisterBus>(&self, bus: &mut B) {
        bus.clear_bit(INTCON, INTCON_GIE);
        bus.clear_bit(INTCON, INTCON_PEIE);
    }

    pub fn is_global_enabled<B: RegisterBus>(&self, bus: &mut B) -> bool {
        bus.test_bit(INTCON, INTCON_GIE) && bus.test_bit(INTCON, INTCON_PEIE)
    }

    /// Turns on interrupts globally, records `flag` for `source` and unmasks
    /// the source's enable bit, in that order.
    ///
    /// Passing `None` drops any flag previously recorded for the source.
    pub fn enable<B: RegisterBus>(
        &self,
        bus: &mut B,
        source: InterruptSource,
        flag: Option<&'f InterruptFlag>,
    ) {
        self.enable_global(bus);

        match self.slots {
            Some(slots) => slots.register(source, flag),
            None if flag.is_some() => {
                warn!("router has no flag slots; flag for source {} dropped", source.index());
            }
            None => {}
        }

        let route = source.route();
        bus.set_bit(route.enable, route.enable_bit);
        trace!("interrupt source {} enabled", source.index());
    }

    /// Forgets the flag for `source` and masks its enable bit.
    ///
    /// The status bit and global enables are not touched.
    pub fn disable<B: RegisterBus>(&self, bus: &mut B, source: InterruptSource) {
        if let Some(slots) = self.slots {
            slots.register(source, None);
        }

        let route = source.route();
        bus.clear_bit(route.enable, route.enable_bit);
        trace!("interrupt source {} disabled", source.index());
    }

    pub fn is_enabled<B: RegisterBus>(&self, bus: &mut B, source: InterruptSource) -> bool {
        let route = source.route();
        bus.test_bit(route.enable, route.enable_bit)
    }

    /// Returns true if the source's status flag is set.
    pub fn is_pending<B: RegisterBus>(&self, bus: &mut B, source: InterruptSource) -> bool {
        let route = source.route();
        bus.test_bit(route.status, route.status_bit)
    }

    /// Services pending sources. Intended to be called from the interrupt
    /// handler.
    ///
    /// Each status register is read once, in the order INTCON, INTCON3, PIR1,
    /// PIR2. For every source in the dispatch set whose status bit was set in
    /// that snapshot, the registered flag (if any) is raised and the status
    /// bit is cleared. Sources outside the dispatch set are left pending.
    ///
    /// Returns the set of sources serviced.
    pub fn dispatch<B: RegisterBus>(&self, bus: &mut B) -> SourceSet {
        let mut serviced = SourceSet::empty();

        for (status, sources) in STATUS_GROUPS {
            let snapshot = bus.read(status);
            if snapshot == 0 {
                continue;
            }

            for &source in sources {
                if !self.dispatch.contains(source) {
                    continue;
                }
                let route = source.route();
                if snapshot & (1 << route.status_bit) == 0 {
                    continue;
                }

                if let Some(slots) = self.slots {
                    slots.raise(source);
                }
                bus.clear_bit(route.status, route.status_bit);
                serviced.insert(source);
            }
        }

        trace!("dispatched {} interrupt sources", serviced.len());
        serviced
    }
}

impl core::fmt::Debug for InterruptRouter<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InterruptRouter")
            .field("dispatch", &self.dispatch)
            .field("has_flag_slots", &self.slots.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{
        map::{INTCON3, PIE1, PIE2, PIR1, PIR1_TMR1IF, PIR1_TMR2IF, PIR2, RegisterAddress},
        register::RegisterFile,
        test_support::assert_untouched,
    };

    const ENABLE_REGISTERS: [RegisterAddress; 4] = [INTCON, INTCON3, PIE1, PIE2];
    const GLOBAL_BITS: u8 = (1 << INTCON_GIE) | (1 << INTCON_PEIE);

    /// Raises TMR2IF right after the first read of PIR1.
    struct LateTimer2 {
        file: RegisterFile,
        pir1_reads: u32,
    }

    impl RegisterBus for LateTimer2 {
        fn read(&mut self, addr: RegisterAddress) -> u8 {
            let value = self.file.read(addr);
            if addr == PIR1 {
                self.pir1_reads += 1;
                if self.pir1_reads == 1 {
                    self.file.poke(PIR1, value | (1 << PIR1_TMR2IF));
                }
            }
            value
        }

        fn write(&mut self, addr: RegisterAddress, value: u8) {
            self.file.write(addr, value);
        }
    }

    fn pend(file: &mut RegisterFile, source: InterruptSource) {
        let route = source.route();
        let value = file.peek(route.status) | (1 << route.status_bit);
        file.poke(route.status, value);
    }

    #[test]
    fn enable_sets_exactly_one_bit_plus_globals() {
        for source in InterruptSource::ALL {
            let mut bus = RegisterFile::new();
            let router = InterruptRouter::builder().dispatch_all().no_flags().build();

            router.enable(&mut bus, source, None);

            let route = source.route();
            for reg in ENABLE_REGISTERS {
                let mut expected = if reg == INTCON { GLOBAL_BITS } else { 0 };
                if reg == route.enable {
                    expected |= 1 << route.enable_bit;
                }
                assert_eq!(bus.peek(reg), expected, "{:?} in {:?}", source, reg);
            }
            assert!(router.is_enabled(&mut bus, source));
            assert!(router.is_global_enabled(&mut bus));
        }
    }

    #[test]
    fn disable_clears_only_the_enable_bit() {
        for source in InterruptSource::ALL {
            let mut bus = RegisterFile::new();
            for reg in ENABLE_REGISTERS {
                bus.poke(reg, 0xFF);
            }
            let router = InterruptRouter::builder().dispatch_all().no_flags().build();

            router.disable(&mut bus, source);

            let route = source.route();
            for reg in ENABLE_REGISTERS {
                let expected = if reg == route.enable {
                    !(1 << route.enable_bit)
                } else {
                    0xFF
                };
                assert_eq!(bus.peek(reg), expected, "{:?} in {:?}", source, reg);
            }
            assert!(router.is_global_enabled(&mut bus));
        }
    }

    #[test]
    fn global_enable_and_disable() {
        let mut bus = RegisterFile::new();
        bus.poke(INTCON, 1 << 5);
        let router = InterruptRouter::builder().dispatch_all().no_flags().build();

        router.enable_global(&mut bus);
        assert_eq!(bus.peek(INTCON), GLOBAL_BITS | (1 << 5));

        router.disable_global(&mut bus);
        assert_eq!(bus.peek(INTCON), 1 << 5);
        assert!(!router.is_global_enabled(&mut bus));
    }

    #[test]
    fn dispatch_raises_registered_flags_and_acks() {
        let timer = InterruptFlag::new();
        let ccp2 = InterruptFlag::new();
        let slots = FlagSlots::new();
        let router = InterruptRouter::builder()
            .dispatch_all()
            .flag_slots(&slots)
            .build();

        let mut bus = RegisterFile::new();
        router.enable(&mut bus, InterruptSource::Timer0, Some(&timer));
        router.enable(&mut bus, InterruptSource::Ccp2, Some(&ccp2));
        pend(&mut bus, InterruptSource::Timer0);
        pend(&mut bus, InterruptSource::Ccp2);

        let serviced = router.dispatch(&mut bus);

        assert_eq!(
            serviced,
            SourceSet::from([InterruptSource::Timer0, InterruptSource::Ccp2])
        );
        assert!(timer.take());
        assert!(ccp2.take());
        assert!(!router.is_pending(&mut bus, InterruptSource::Timer0));
        assert!(!router.is_pending(&mut bus, InterruptSource::Ccp2));
        assert_eq!(bus.peek(PIR2), 0);
    }

    #[test]
    fn dispatch_leaves_sources_outside_the_set_pending() {
        let flag = InterruptFlag::new();
        let slots = FlagSlots::new();
        let router = InterruptRouter::builder()
            .dispatch(SourceSet::from([InterruptSource::UsartRx]))
            .flag_slots(&slots)
            .build();

        let mut bus = RegisterFile::new();
        router.enable(&mut bus, InterruptSource::AdConverter, Some(&flag));
        pend(&mut bus, InterruptSource::AdConverter);
        pend(&mut bus, InterruptSource::UsartRx);

        let serviced = router.dispatch(&mut bus);

        assert_eq!(serviced, SourceSet::from([InterruptSource::UsartRx]));
        assert!(router.is_pending(&mut bus, InterruptSource::AdConverter));
        assert!(!router.is_pending(&mut bus, InterruptSource::UsartRx));
        assert!(!flag.occurred());
    }

    #[test]
    fn dispatch_acks_source_without_flag() {
        let slots = FlagSlots::new();
        let router = InterruptRouter::builder()
            .dispatch_all()
            .flag_slots(&slots)
            .build();

        let mut bus = RegisterFile::new();
        pend(&mut bus, InterruptSource::Ext1);

        let serviced = router.dispatch(&mut bus);

        assert!(serviced.contains(InterruptSource::Ext1));
        assert_eq!(bus.peek(INTCON3), 0);
    }

    #[test]
    fn disabled_source_no_longer_raises_its_flag() {
        let flag = InterruptFlag::new();
        let slots = FlagSlots::new();
        let router = InterruptRouter::builder()
            .dispatch_all()
            .flag_slots(&slots)
            .build();

        let mut bus = RegisterFile::new();
        router.enable(&mut bus, InterruptSource::Timer1, Some(&flag));
        router.disable(&mut bus, InterruptSource::Timer1);
        assert!(!slots.is_registered(InterruptSource::Timer1));

        pend(&mut bus, InterruptSource::Timer1);
        router.dispatch(&mut bus);

        assert!(!flag.occurred());
        assert!(!router.is_pending(&mut bus, InterruptSource::Timer1));
    }

    #[test]
    fn router_without_slots_only_acks() {
        let router = InterruptRouter::builder()
            .dispatch(SourceSet::from([InterruptSource::Eeprom]))
            .no_flags()
            .build();
        assert!(!router.has_flag_slots());

        let mut bus = RegisterFile::new();
        pend(&mut bus, InterruptSource::Eeprom);
        pend(&mut bus, InterruptSource::Comparator);

        let serviced = router.dispatch(&mut bus);

        assert_eq!(serviced, SourceSet::from([InterruptSource::Eeprom]));
        assert_eq!(bus.peek(PIR2), 1 << 6);
    }

    #[test]
    fn quiet_dispatch_writes_nothing() {
        let router = InterruptRouter::builder().dispatch_all().no_flags().build();
        let mut bus = RegisterFile::new();

        assert!(router.dispatch(&mut bus).is_empty());
        assert_untouched(&bus);
    }

    #[test]
    fn flag_raised_after_snapshot_waits_for_next_dispatch() {
        let router = InterruptRouter::builder().dispatch_all().no_flags().build();
        let mut bus = LateTimer2 {
            file: RegisterFile::new(),
            pir1_reads: 0,
        };
        pend(&mut bus.file, InterruptSource::Timer1);

        let serviced = router.dispatch(&mut bus);

        assert_eq!(serviced, SourceSet::from([InterruptSource::Timer1]));
        assert_eq!(bus.file.peek(PIR1), 1 << PIR1_TMR2IF);
        assert_eq!(bus.file.peek(PIR1) & (1 << PIR1_TMR1IF), 0);
        // One snapshot plus the read-modify-write acknowledging TMR1IF.
        assert_eq!(bus.pir1_reads, 2);

        let serviced = router.dispatch(&mut bus);

        assert_eq!(serviced, SourceSet::from([InterruptSource::Timer2]));
        assert_eq!(bus.file.peek(PIR1), 0);
    }
}
