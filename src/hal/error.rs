/// Errors returned by validated HAL operations.
///
/// Every fallible operation succeeds or fails as a whole; the variant only
/// names which precondition was violated. Validation always runs before the
/// first register access, so a returned error means no hardware state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Port address is not one of PORTA..PORTE.
    UnknownPort,
    /// Pin index is 8 or greater.
    PinOutOfRange,
    /// Keypad row or column count is zero.
    EmptyMatrix,
    /// Keypad row or column count exceeds the matrix capacity.
    MatrixTooLarge,
    /// A pressed key was not released before the deadline elapsed.
    DebounceTimeout,
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::UnknownPort => write!(f, "port address is not a known GPIO port"),
            HalError::PinOutOfRange => write!(f, "pin index exceeds port width"),
            HalError::EmptyMatrix => write!(f, "keypad matrix has no rows or columns"),
            HalError::MatrixTooLarge => write!(f, "keypad matrix exceeds fixed capacity"),
            HalError::DebounceTimeout => write!(f, "key not released before deadline"),
        }
    }
}

impl embedded_hal::digital::Error for HalError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
