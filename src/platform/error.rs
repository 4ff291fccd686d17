//! Platform error types
//!
//! Bus-level failures as seen by device drivers. HAL-specific errors are
//! mapped onto these variants through `embedded_hal_async::i2c::ErrorKind`.

use core::fmt;
use embedded_hal_async::i2c::ErrorKind;

/// I2C transaction failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum I2cError {
    /// No acknowledgment received
    Nack,
    /// Transaction did not complete within the allotted time
    Timeout,
    /// Arbitration lost
    ArbitrationLost,
    /// Any other bus error
    Bus,
}

impl I2cError {
    /// Map a HAL error kind onto the platform error
    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => I2cError::Nack,
            ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost,
            _ => I2cError::Bus,
        }
    }
}

impl fmt::Display for I2cError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cError::Nack => write!(f, "I2C NACK"),
            I2cError::Timeout => write!(f, "I2C timeout"),
            I2cError::ArbitrationLost => write!(f, "I2C arbitration lost"),
            I2cError::Bus => write!(f, "I2C bus error"),
        }
    }
}
