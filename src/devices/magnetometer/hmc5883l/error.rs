//! HMC5883L error types

use crate::platform::I2cError;
use core::fmt;
use mag_node_core::magnetometer::Axis;

/// Register-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum MagError {
    /// Transaction failed at the transport level
    Bus(I2cError),
    /// Configuration readback differs from what was written
    ReadbackMismatch,
}

impl From<I2cError> for MagError {
    fn from(e: I2cError) -> Self {
        MagError::Bus(e)
    }
}

impl fmt::Display for MagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagError::Bus(e) => write!(f, "bus error: {}", e),
            MagError::ReadbackMismatch => write!(f, "configuration readback mismatch"),
        }
    }
}

/// Self-test failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestError {
    /// Self-test configuration could not be applied
    SetupFailed(MagError),
    /// One of the settle reads failed
    ReadFailed(MagError),
    /// Kept sample outside the acceptance band
    OutOfRange { axis: Axis, value: i16 },
}

impl fmt::Display for SelfTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfTestError::SetupFailed(e) => write!(f, "self test setup failed: {}", e),
            SelfTestError::ReadFailed(e) => write!(f, "self test read failed: {}", e),
            SelfTestError::OutOfRange { axis, value } => {
                write!(f, "self test sample {} on axis {} out of range", value, axis)
            }
        }
    }
}

// Axis lives in the core crate, which carries no defmt support
#[cfg(feature = "embedded")]
impl defmt::Format for SelfTestError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SelfTestError::SetupFailed(e) => defmt::write!(f, "SetupFailed({})", e),
            SelfTestError::ReadFailed(e) => defmt::write!(f, "ReadFailed({})", e),
            SelfTestError::OutOfRange { axis, value } => defmt::write!(
                f,
                "OutOfRange({}, {})",
                defmt::Display2Format(axis),
                value
            ),
        }
    }
}
