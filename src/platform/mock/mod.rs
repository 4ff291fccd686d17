//! Mock platform implementation for testing
//!
//! Available during test builds and when the `mock` feature is enabled.

#![cfg(any(test, feature = "mock"))]

mod i2c;

pub use i2c::{I2cTransaction, MockI2c};
