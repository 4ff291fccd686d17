//! HMC5883L 3-Axis Magnetometer Driver
//!
//! I2C driver for the Honeywell HMC5883L digital compass.
//!
//! ## Features
//!
//! - Configuration writes verified by readback
//! - 6-byte data block decoded from wire order (X, Z, Y)
//! - Two-polarity factory self-test with acceptance band check
//!
//! ## Usage
//!
//! ```ignore
//! use mag_node::devices::magnetometer::hmc5883l::{Hmc5883lConfig, Hmc5883lDriver};
//! use mag_node_core::magnetometer::Polarity;
//!
//! let mut mag = Hmc5883lDriver::new(i2c, Hmc5883lConfig::default());
//! mag.run_self_test(Polarity::Positive, &clock).await?;
//! let raw = mag.read_raw().await?;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod registers;

pub use config::{Hmc5883lConfig, RegisterConfig};
pub use driver::Hmc5883lDriver;
pub use error::{MagError, SelfTestError};
