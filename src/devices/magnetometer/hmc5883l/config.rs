//! HMC5883L driver configuration

use super::registers;
use mag_node_core::magnetometer::Polarity;

/// Contents of the CRA, CRB and MODE registers, written as one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct RegisterConfig {
    pub cra: u8,
    pub crb: u8,
    pub mode: u8,
}

impl RegisterConfig {
    /// Self-test configuration for the given bias polarity
    pub const fn self_test(polarity: Polarity) -> Self {
        Self {
            cra: match polarity {
                Polarity::Positive => registers::CRA_SELF_TEST_POSITIVE,
                Polarity::Negative => registers::CRA_SELF_TEST_NEGATIVE,
            },
            crb: registers::CRB_GAIN_7,
            mode: registers::MODE_CONTINUOUS,
        }
    }

    /// Normal measurement configuration at the default gain
    pub const fn normal() -> Self {
        Self {
            cra: registers::CRA_NORMAL,
            crb: registers::CRB_GAIN_DEFAULT,
            mode: registers::MODE_CONTINUOUS,
        }
    }

    pub const fn as_bytes(&self) -> [u8; 3] {
        [self.cra, self.crb, self.mode]
    }
}

/// HMC5883L driver configuration
#[derive(Debug, Clone, Copy)]
pub struct Hmc5883lConfig {
    /// 7-bit I2C address
    pub i2c_address: u8,
    /// Per-transaction timeout in milliseconds
    pub timeout_ms: u64,
    /// Wait before each self-test read so the device reflects the new
    /// configuration (several conversion cycles at 15 Hz)
    pub settle_delay_us: u64,
}

impl Default for Hmc5883lConfig {
    fn default() -> Self {
        Self {
            i2c_address: registers::HMC5883L_ADDR,
            timeout_ms: 5,
            settle_delay_us: 80_000,
        }
    }
}
