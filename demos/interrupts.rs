//! Interrupt routing example: timer overflow and serial receive on the host
//!
//! This example demonstrates:
//! - Static flags and flag slots shared with the interrupt handler
//! - Building a router that only services selected sources
//! - Simulating hardware by setting status bits in a register file
//! - Reading and clearing flags from the main loop

use pic18_hal::prelude::*;

static TIMER_OVERFLOW: InterruptFlag = InterruptFlag::new();
static BYTE_RECEIVED: InterruptFlag = InterruptFlag::new();
static SLOTS: FlagSlots<'static> = FlagSlots::new();

fn pend(bus: &mut RegisterFile, source: InterruptSource) {
    let route = source.route();
    let value = bus.peek(route.status) | (1 << route.status_bit);
    bus.poke(route.status, value);
}

fn main() {
    println!("=== Interrupt Routing Example ===\n");

    let mut bus = RegisterFile::new();
    let router = InterruptRouter::builder()
        .dispatch(SourceSet::from([
            InterruptSource::Timer0,
            InterruptSource::UsartRx,
        ]))
        .flag_slots(&SLOTS)
        .build();

    let timer = Timer0Config::new(Timer0Mode::Timer, DataSize::Bits16, Prescaler::Div256, 0x0BDC);
    Timer0::new(&mut bus).update_config(&timer).unwrap();

    router.enable(&mut bus, InterruptSource::Timer0, Some(&TIMER_OVERFLOW));
    router.enable(&mut bus, InterruptSource::UsartRx, Some(&BYTE_RECEIVED));
    println!("Router: {router:?}");

    for cycle in 0..4 {
        println!("Cycle {cycle}");

        // "Hardware" raises status bits
        pend(&mut bus, InterruptSource::Timer0);
        if cycle % 2 == 1 {
            pend(&mut bus, InterruptSource::UsartRx);
        }
        // Not in the dispatch set: stays pending
        pend(&mut bus, InterruptSource::AdConverter);

        // Trap context
        let serviced = router.dispatch(&mut bus);
        println!("  ISR serviced {serviced:?}");

        // Main line
        if TIMER_OVERFLOW.take() {
            println!("  Timer0 overflowed, reloading");
            Timer0::new(&mut bus).set_count(0x0BDC);
        }
        if BYTE_RECEIVED.take() {
            println!("  Byte received");
        }
        println!(
            "  A/D still pending: {}",
            router.is_pending(&mut bus, InterruptSource::AdConverter)
        );
    }

    router.disable(&mut bus, InterruptSource::UsartRx);
    println!("\nUSART receive enabled: {}", router.is_enabled(&mut bus, InterruptSource::UsartRx));
    println!("Slot still registered: {}", SLOTS.is_registered(InterruptSource::UsartRx));

    println!("\n=== Example Complete ===");
}
