//! Device drivers
//!
//! Drivers are written against `embedded_hal_async` traits so they stay
//! platform independent.

pub mod magnetometer;
