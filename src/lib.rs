#![cfg_attr(not(test), no_std)]

//! mag_node - HMC5883L magnetometer node
//!
//! This library provides the bus error mapping, the HMC5883L device driver,
//! and the sampling subsystem that publishes NED field vectors to the rest
//! of the node. Pure logic lives in `mag_node_core`.

#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Platform abstraction layer
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Logging
pub mod core;

// Sampling task, shared cache, node contracts
pub mod subsystems;
