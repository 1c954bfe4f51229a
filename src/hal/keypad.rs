//! Matrix keypad scanning.
//!
//! Rows are driven outputs, columns are inputs with pull-ups. A scan drives
//! one row low at a time and reads every column; a low column means the key
//! at that intersection is down.

use heapless::Vec;

use crate::{
    fmt::{debug, warn},
    hal::{
        error::HalError,
        gpio::{Direction, Gpio, GpioPinConfig, PinStatus},
        register::RegisterBus,
        wait::{Deadline, WaitOutcome, wait_until},
    },
};

/// Largest supported row count.
pub const MAX_ROWS: usize = 4;
/// Largest supported column count.
pub const MAX_COLS: usize = 3;
/// Returned by [`Keypad::get_reading`] when no key is down.
pub const KEY_NOT_PRESSED: u8 = 0;

/// Every key position of the largest matrix.
pub type Snapshot = Vec<KeyPosition, { MAX_ROWS * MAX_COLS }>;

/// Static description of a keypad wiring.
///
/// Only the first `row_count` rows and `col_count` columns are scanned; the
/// remaining table entries are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadMatrix {
    pub row_count: u8,
    pub col_count: u8,
    pub rows: [GpioPinConfig; MAX_ROWS],
    pub cols: [GpioPinConfig; MAX_COLS],
    pub scancodes: [[u8; MAX_COLS]; MAX_ROWS],
}

impl KeypadMatrix {
    /// A full 4x3 matrix.
    pub const fn new(
        rows: [GpioPinConfig; MAX_ROWS],
        cols: [GpioPinConfig; MAX_COLS],
        scancodes: [[u8; MAX_COLS]; MAX_ROWS],
    ) -> Self {
        Self {
            row_count: MAX_ROWS as u8,
            col_count: MAX_COLS as u8,
            rows,
            cols,
            scancodes,
        }
    }

    /// Restricts scanning to the leading `row_count` x `col_count` corner.
    #[must_use]
    pub const fn with_size(self, row_count: u8, col_count: u8) -> Self {
        Self {
            row_count,
            col_count,
            ..self
        }
    }

    /// Checks the dimensions and every scanned pin, returning the dimensions
    /// as `(rows, cols)`.
    pub fn validate(&self) -> Result<(usize, usize), HalError> {
        let (rows, cols) = (self.row_count as usize, self.col_count as usize);
        if rows == 0 || cols == 0 {
            return Err(HalError::EmptyMatrix);
        }
        if rows > MAX_ROWS || cols > MAX_COLS {
            return Err(HalError::MatrixTooLarge);
        }
        for pin in self.rows[..rows].iter().chain(&self.cols[..cols]) {
            pin.validate()?;
        }
        Ok((rows, cols))
    }

    /// Scancode at `position`. Positions outside the table yield
    /// [`KEY_NOT_PRESSED`].
    pub fn scancode(&self, position: KeyPosition) -> u8 {
        self.scancodes
            .get(position.row as usize)
            .and_then(|row| row.get(position.col as usize))
            .copied()
            .unwrap_or(KEY_NOT_PRESSED)
    }
}

/// Row and column of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPosition {
    pub row: u8,
    pub col: u8,
}

impl KeyPosition {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Keypad scanner over a borrowed register bus.
pub struct Keypad<'a, B: RegisterBus> {
    gpio: Gpio<'a, B>,
}

impl<'a, B: RegisterBus> core::fmt::Debug for Keypad<'a, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keypad").finish_non_exhaustive()
    }
}

impl<'a, B: RegisterBus> Keypad<'a, B> {
    pub fn new(bus: &'a mut B) -> Self {
        Self {
            gpio: Gpio::new(bus),
        }
    }

    /// Configures rows as outputs and columns as inputs.
    ///
    /// Pins are initialized interleaved (column 0, row 0, column 1, row 1,
    /// ...). The direction stored in the matrix is ignored. Each pin init
    /// resets its whole port; see [`Gpio::init`].
    pub fn init(&mut self, matrix: &KeypadMatrix) -> Result<(), HalError> {
        let (rows, cols) = matrix.validate()?;

        for i in 0..rows.max(cols) {
            if i < cols {
                self.gpio
                    .init(&matrix.cols[i].with_direction(Direction::Input))?;
            }
            if i < rows {
                self.gpio
                    .init(&matrix.rows[i].with_direction(Direction::Output))?;
            }
        }

        debug!("keypad init {}x{}", rows, cols);
        Ok(())
    }

    /// Scans the matrix once and returns the scancode of the first key found
    /// down, or [`KEY_NOT_PRESSED`].
    ///
    /// Rows are scanned in order, columns in order within a row. Once a key
    /// is found the scanner waits for its column to go high again (the key
    /// being released), polling until `deadline` expires. A key still held
    /// at expiry yields [`HalError::DebounceTimeout`].
    pub fn get_reading<D>(&mut self, matrix: &KeypadMatrix, deadline: &mut D) -> Result<u8, HalError>
    where
        D: Deadline + ?Sized,
    {
        let (rows, cols) = matrix.validate()?;

        for row in 0..rows {
            self.select_row(&matrix.rows[..rows], row)?;

            for col in 0..cols {
                let column = &matrix.cols[col];
                if self.gpio.get_read(column)? == PinStatus::High {
                    continue;
                }

                let gpio = &mut self.gpio;
                let outcome = wait_until(deadline, || {
                    Ok::<_, HalError>(gpio.get_read(column)? == PinStatus::High)
                })?;
                if outcome == WaitOutcome::TimedOut {
                    warn!("key at row {} col {} never released", row, col);
                    return Err(HalError::DebounceTimeout);
                }

                return Ok(matrix.scancode(KeyPosition::new(row as u8, col as u8)));
            }
        }

        Ok(KEY_NOT_PRESSED)
    }

    /// Scans the matrix once and returns every key found down, row-major.
    ///
    /// No debounce is applied.
    pub fn snapshot(&mut self, matrix: &KeypadMatrix) -> Result<Snapshot, HalError> {
        let (rows, cols) = matrix.validate()?;
        let mut pressed = Snapshot::new();

        for row in 0..rows {
            self.select_row(&matrix.rows[..rows], row)?;

            for col in 0..cols {
                if self.gpio.get_read(&matrix.cols[col])? == PinStatus::Low {
                    // Capacity covers the largest valid matrix.
                    let _ = pressed.push(KeyPosition::new(row as u8, col as u8));
                }
            }
        }

        Ok(pressed)
    }

    /// Drives every row high, then `active` low.
    fn select_row(&mut self, rows: &[GpioPinConfig], active: usize) -> Result<(), HalError> {
        for row in rows {
            self.gpio.set(row)?;
        }
        self.gpio.clear(&rows[active])
    }
}
