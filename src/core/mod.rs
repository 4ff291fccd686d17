//! Core node infrastructure
//!
//! Logging macros shared by drivers and subsystems.

pub mod logging;
