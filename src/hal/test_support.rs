//! Test support utilities - only compiled in test builds.

use crate::hal::{
    keypad::{KeypadMatrix, MAX_COLS, MAX_ROWS},
    map::RegisterAddress,
    register::{RegisterBus, RegisterFile},
};

/// Asserts that nothing was written through the bus.
#[track_caller]
pub fn assert_untouched(file: &RegisterFile) {
    let mut first = None;
    file.iter_written(|addr, value| {
        if first.is_none() {
            first = Some((addr, value));
        }
    });
    assert!(
        !file.any_written(),
        "expected no register writes, first was {:?}",
        first
    );
}

/// Delay that only adds up the time it was asked to wait.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    row: usize,
    col: usize,
    /// Column reads left before release; `None` holds forever.
    low_reads: Option<u32>,
}

/// Register bus with a simulated key matrix wired to it.
///
/// Column pins read high (pulled up) unless a held key sits on a row whose
/// data bit is low. Rows start high. Each read of a column's port while the
/// key's row is low uses up one of the key's `low_reads`.
pub struct KeypadRig {
    pub file: RegisterFile,
    /// Number of high-to-low transitions written to each row pin.
    pub row_drives: [u32; MAX_ROWS],
    matrix: KeypadMatrix,
    held: heapless::Vec<HeldKey, { MAX_ROWS * MAX_COLS }>,
}

impl KeypadRig {
    pub fn new(matrix: KeypadMatrix) -> Self {
        let mut file = RegisterFile::new();
        for row in &matrix.rows {
            file.poke(row.port, 0xFF);
        }
        Self {
            file,
            row_drives: [0; MAX_ROWS],
            matrix,
            held: heapless::Vec::new(),
        }
    }

    /// Holds the key down for good.
    pub fn press(self, row: usize, col: usize) -> Self {
        self.hold(row, col, None)
    }

    /// Holds the key for `low_reads` reads of its column's port.
    pub fn tap(self, row: usize, col: usize, low_reads: u32) -> Self {
        self.hold(row, col, Some(low_reads))
    }

    pub fn all_released(&self) -> bool {
        self.held.is_empty()
    }

    fn hold(mut self, row: usize, col: usize, low_reads: Option<u32>) -> Self {
        self.held
            .push(HeldKey {
                row,
                col,
                low_reads,
            })
            .unwrap();
        self
    }

    fn row_driven_low(&self, row: usize) -> bool {
        let config = self.matrix.rows[row];
        self.file.peek(config.port) & (1 << config.pin) == 0
    }
}

impl RegisterBus for KeypadRig {
    fn read(&mut self, addr: RegisterAddress) -> u8 {
        let mut value = self.file.peek(addr);
        for column in &self.matrix.cols {
            if column.port == addr {
                value |= 1 << column.pin;
            }
        }

        let mut i = 0;
        while i < self.held.len() {
            let key = self.held[i];
            let column = self.matrix.cols[key.col];
            if column.port != addr || !self.row_driven_low(key.row) {
                i += 1;
                continue;
            }
            match key.low_reads {
                Some(0) => {
                    self.held.swap_remove(i);
                    continue;
                }
                Some(n) => self.held[i].low_reads = Some(n - 1),
                None => {}
            }
            value &= !(1 << column.pin);
            i += 1;
        }

        value
    }

    fn write(&mut self, addr: RegisterAddress, value: u8) {
        let old = self.file.peek(addr);
        for (row, config) in self.matrix.rows.iter().enumerate() {
            let mask = 1 << config.pin;
            if config.port == addr && old & mask != 0 && value & mask == 0 {
                self.row_drives[row] += 1;
            }
        }
        self.file.write(addr, value);
    }
}
