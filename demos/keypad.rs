//! Keypad example: scanning a 4x3 phone keypad against a simulated matrix
//!
//! This example demonstrates:
//! - Describing a keypad wiring with a const table
//! - Initializing rows and columns through the keypad scanner
//! - A register bus that models a pressed key on top of a register file
//! - Bounded debounce with a poll budget, and non-blocking snapshots

use pic18_hal::prelude::*;

const fn row(pin: u8) -> GpioPinConfig {
    GpioPinConfig::new(Port::D, pin, Direction::Output)
}

const fn col(pin: u8) -> GpioPinConfig {
    GpioPinConfig::new(Port::B, pin, Direction::Input)
}

const PHONE_PAD: KeypadMatrix = KeypadMatrix::new(
    [row(3), row(2), row(1), row(0)],
    [col(0), col(1), col(2)],
    [
        [b'1', b'2', b'3'],
        [b'4', b'5', b'6'],
        [b'7', b'8', b'9'],
        [b'*', b'0', b'#'],
    ],
);

/// Register file with one key held down for a number of column reads.
struct Bench {
    file: RegisterFile,
    key: Option<(KeyPosition, u32)>,
}

impl Bench {
    fn new() -> Self {
        Self {
            file: RegisterFile::new(),
            key: None,
        }
    }

    fn press(&mut self, row: u8, col: u8, reads: u32) {
        self.key = Some((KeyPosition::new(row, col), reads));
    }
}

impl RegisterBus for Bench {
    fn read(&mut self, addr: RegisterAddress) -> u8 {
        let mut value = self.file.read(addr);
        if addr != PORTB_ADDR {
            return value;
        }
        // Pull-ups
        value |= 0b0000_0111;

        if let Some((position, reads)) = self.key {
            let row = PHONE_PAD.rows[position.row as usize];
            let row_low = self.file.peek(row.port) & (1 << row.pin) == 0;
            if row_low {
                if reads == 0 {
                    self.key = None;
                } else {
                    self.key = Some((position, reads - 1));
                    value &= !(1 << PHONE_PAD.cols[position.col as usize].pin);
                }
            }
        }
        value
    }

    fn write(&mut self, addr: RegisterAddress, value: u8) {
        self.file.write(addr, value);
    }
}

const PORTB_ADDR: RegisterAddress = Port::B.address();

fn main() {
    println!("=== Keypad Example ===\n");

    let mut bench = Bench::new();
    Keypad::new(&mut bench).init(&PHONE_PAD).unwrap();
    bench.file.iter_written(|addr, value| {
        println!("  init wrote {:#06x} = {:#04x}", addr.get(), value);
    });

    // Rows idle high
    bench.file.poke(Port::D.address(), 0x0F);

    let reading = Keypad::new(&mut bench)
        .get_reading(&PHONE_PAD, &mut PollBudget::new(100))
        .unwrap();
    println!("\nNo key: {reading}");

    bench.press(2, 1, 5);
    let reading = Keypad::new(&mut bench)
        .get_reading(&PHONE_PAD, &mut PollBudget::new(100))
        .unwrap();
    println!("Tapped: '{}'", reading as char);

    bench.press(3, 2, u32::MAX);
    let keys = Keypad::new(&mut bench).snapshot(&PHONE_PAD).unwrap();
    for key in &keys {
        println!("Held: '{}' at {:?}", PHONE_PAD.scancode(*key) as char, key);
    }

    match Keypad::new(&mut bench).get_reading(&PHONE_PAD, &mut PollBudget::new(20)) {
        Ok(code) => println!("Unexpected reading {code}"),
        Err(err) => println!("Held key: {err}"),
    }

    println!("\n=== Example Complete ===");
}
