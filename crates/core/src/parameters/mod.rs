//! Parameter management types
//!
//! The node's persisted configuration is loaded into a `ParameterStore`;
//! parameter groups such as [`MagParams`] read typed, range-checked values
//! out of it.

pub mod error;
pub mod magnetometer;
pub mod storage;

pub use error::ParameterError;
pub use magnetometer::MagParams;
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
