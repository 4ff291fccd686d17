//! Magnetometer Parameter Definitions
//!
//! # Parameters
//!
//! - `mag.variance` - Measurement variance published with each sample (gauss²)
//! - `uavcan.pubp-mag` - Publication period in microseconds
//! - `uavcan.prio-mag` - Transfer priority of the published message
//!
//! Out-of-range stored values are clamped, ill-typed or missing ones fall
//! back to defaults.

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

pub const PARAM_VARIANCE: &str = "mag.variance";
pub const PARAM_PERIOD_US: &str = "uavcan.pubp-mag";
pub const PARAM_PRIORITY: &str = "uavcan.prio-mag";

const DEFAULT_VARIANCE: f32 = 0.005;
const MIN_VARIANCE: f32 = 1e-6;
const MAX_VARIANCE: f32 = 1.0;

const DEFAULT_PERIOD_US: u32 = 20_000;
const MIN_PERIOD_US: u32 = 20_000;
const MAX_PERIOD_US: u32 = 1_000_000;

const DEFAULT_PRIORITY: u8 = 16;
/// Numerically highest (most urgent) transfer priority
pub const PRIORITY_NUMERICALLY_MIN: u8 = 0;
/// Numerically lowest (least urgent) transfer priority
pub const PRIORITY_NUMERICALLY_MAX: u8 = 31;

/// Magnetometer parameters loaded from the parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagParams {
    /// Variance attached to every published field vector
    pub variance: f32,
    /// Sampling and publication period in microseconds
    pub period_us: u32,
    /// Transport priority for published messages
    pub priority: u8,
}

impl Default for MagParams {
    fn default() -> Self {
        Self {
            variance: DEFAULT_VARIANCE,
            period_us: DEFAULT_PERIOD_US,
            priority: DEFAULT_PRIORITY,
        }
    }
}

impl MagParams {
    /// Register magnetometer parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            PARAM_VARIANCE,
            ParamValue::Float(DEFAULT_VARIANCE),
            ParamFlags::empty(),
        )?;
        store.register(
            PARAM_PERIOD_US,
            ParamValue::Int(DEFAULT_PERIOD_US as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            PARAM_PRIORITY,
            ParamValue::Int(DEFAULT_PRIORITY as i32),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load magnetometer parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let variance = match store.get(PARAM_VARIANCE) {
            Some(ParamValue::Float(v)) if v.is_finite() => v.clamp(MIN_VARIANCE, MAX_VARIANCE),
            _ => DEFAULT_VARIANCE,
        };

        let period_us = match store.get(PARAM_PERIOD_US) {
            Some(ParamValue::Int(v)) => {
                (*v).clamp(MIN_PERIOD_US as i32, MAX_PERIOD_US as i32) as u32
            }
            _ => DEFAULT_PERIOD_US,
        };

        let priority = match store.get(PARAM_PRIORITY) {
            Some(ParamValue::Int(v)) => (*v).clamp(
                PRIORITY_NUMERICALLY_MIN as i32,
                PRIORITY_NUMERICALLY_MAX as i32,
            ) as u8,
            _ => DEFAULT_PRIORITY,
        };

        Self {
            variance,
            period_us,
            priority,
        }
    }

    /// Validate magnetometer parameters
    pub fn is_valid(&self) -> bool {
        (MIN_VARIANCE..=MAX_VARIANCE).contains(&self.variance)
            && (MIN_PERIOD_US..=MAX_PERIOD_US).contains(&self.period_us)
            && self.priority <= PRIORITY_NUMERICALLY_MAX
    }
}
