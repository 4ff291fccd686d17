//! Magnetometer drivers
//!
//! - `hmc5883l`: Honeywell HMC5883L over I2C

pub mod hmc5883l;

pub use hmc5883l::{Hmc5883lConfig, Hmc5883lDriver, MagError, SelfTestError};
