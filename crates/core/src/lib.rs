//! mag_node_core - Pure no_std logic for the magnetometer node
//!
//! This crate contains platform-agnostic algorithms and types
//! that can be tested on host without any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies outside tests
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Time abstractions (`TimeSource`, `Clock`, `MockTime`)
//! - [`magnetometer`]: Reading types, frame transform, health and self-test rules
//! - [`parameters`]: Parameter store and the magnetometer parameter group

#![cfg_attr(not(test), no_std)]

pub mod magnetometer;
pub mod parameters;
pub mod traits;
