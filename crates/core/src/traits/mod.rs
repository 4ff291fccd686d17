//! Core traits for platform-agnostic driver functionality.
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (Embassy) live in the `mag_node` crate

pub mod time;

pub use time::{Clock, MockTime, TimeSource};
