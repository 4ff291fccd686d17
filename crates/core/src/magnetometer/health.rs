//! Health classification from the reading stream
//!
//! The estimator only distinguishes OK from WARNING. ERROR is reserved for
//! I/O failures and is decided by the sampling task.

use super::types::NavigationReading;
use libm::fabsf;

/// Any component above this magnitude is implausible at the default gain
pub const ABS_MAX_VALID_GAUSS: f32 = 1.3;

/// How long an all-zero vector may persist before it is reported
pub const MAX_ZERO_VECTOR_DURATION_MS: u64 = 5000;

/// Components below this magnitude count as zero
pub const ZERO_EPSILON: f32 = 1e-9;

/// Three-level health classification reported to the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Ok,
    Warning,
    Error,
}

impl core::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HealthStatus::Ok => write!(f, "OK"),
            HealthStatus::Warning => write!(f, "WARNING"),
            HealthStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Stateful classifier over successive NED readings
#[derive(Debug, Clone, Default)]
pub struct HealthEstimator {
    /// Time of the last non-zero reading (µs); None until the first reading
    last_nonzero_us: Option<u64>,
}

impl HealthEstimator {
    pub const fn new() -> Self {
        Self {
            last_nonzero_us: None,
        }
    }

    pub fn last_nonzero_us(&self) -> Option<u64> {
        self.last_nonzero_us
    }

    /// Classify one reading taken at `now_us`
    pub fn classify(&mut self, reading: &NavigationReading, now_us: u64) -> HealthStatus {
        let v = reading.as_array();
        let zero_vector = v.iter().all(|c| fabsf(*c) <= ZERO_EPSILON);

        match self.last_nonzero_us {
            Some(last) if zero_vector => {
                let zero_duration_us = now_us.saturating_sub(last);
                if zero_duration_us > MAX_ZERO_VECTOR_DURATION_MS * 1000 {
                    return HealthStatus::Warning;
                }
            }
            // Non-zero reading, or the very first one seeding the timer
            _ => self.last_nonzero_us = Some(now_us),
        }

        if v.iter().any(|c| fabsf(*c) > ABS_MAX_VALID_GAUSS) {
            return HealthStatus::Warning;
        }

        HealthStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const MS: u64 = 1000;

    fn reading(x: f32, y: f32, z: f32) -> NavigationReading {
        NavigationReading {
            field_ga: Vector3::new(x, y, z),
        }
    }

    #[test]
    fn test_nonzero_in_range_is_ok() {
        let mut est = HealthEstimator::new();
        assert_eq!(
            est.classify(&reading(-0.046, 0.092, -0.0276), 0),
            HealthStatus::Ok
        );
        assert_eq!(est.last_nonzero_us(), Some(0));
    }

    #[test]
    fn test_first_zero_seeds_timer() {
        let mut est = HealthEstimator::new();
        assert_eq!(est.classify(&NavigationReading::zero(), 7 * MS), HealthStatus::Ok);
        assert_eq!(est.last_nonzero_us(), Some(7 * MS));
    }

    #[test]
    fn test_zero_within_ceiling_is_ok() {
        let mut est = HealthEstimator::new();
        est.classify(&reading(0.1, 0.1, 0.1), 1000 * MS);
        assert_eq!(
            est.classify(&NavigationReading::zero(), 6000 * MS),
            HealthStatus::Ok
        );
        // Zero readings do not move the timer forward
        assert_eq!(est.last_nonzero_us(), Some(1000 * MS));
    }

    #[test]
    fn test_zero_beyond_ceiling_is_warning() {
        let mut est = HealthEstimator::new();
        est.classify(&reading(0.1, 0.1, 0.1), 1000 * MS);
        assert_eq!(
            est.classify(&NavigationReading::zero(), 6000 * MS + 1),
            HealthStatus::Warning
        );
    }

    #[test]
    fn test_recovers_after_nonzero() {
        let mut est = HealthEstimator::new();
        est.classify(&reading(0.1, 0.1, 0.1), 0);
        assert_eq!(
            est.classify(&NavigationReading::zero(), 10_000 * MS),
            HealthStatus::Warning
        );
        assert_eq!(
            est.classify(&reading(0.2, 0.0, 0.0), 10_020 * MS),
            HealthStatus::Ok
        );
        assert_eq!(
            est.classify(&NavigationReading::zero(), 10_040 * MS),
            HealthStatus::Ok
        );
    }

    #[test]
    fn test_tiny_components_count_as_zero() {
        let mut est = HealthEstimator::new();
        est.classify(&reading(0.5, 0.0, 0.0), 0);
        assert_eq!(
            est.classify(&reading(1e-10, -1e-10, 0.0), 5001 * MS),
            HealthStatus::Warning
        );
    }

    #[test]
    fn test_out_of_range_component_is_warning() {
        let mut est = HealthEstimator::new();
        assert_eq!(est.classify(&reading(1.31, 0.0, 0.0), 0), HealthStatus::Warning);
        assert_eq!(
            est.classify(&reading(0.0, -1.5, 0.0), 20 * MS),
            HealthStatus::Warning
        );
        assert_eq!(est.classify(&reading(0.0, 0.0, 1.3), 40 * MS), HealthStatus::Ok);
    }

    #[test]
    fn test_out_of_range_still_updates_timer() {
        let mut est = HealthEstimator::new();
        est.classify(&reading(2.0, 0.0, 0.0), 3 * MS);
        assert_eq!(est.last_nonzero_us(), Some(3 * MS));
    }

    #[test]
    fn test_never_returns_error() {
        let mut est = HealthEstimator::new();
        for (i, r) in [
            reading(0.0, 0.0, 0.0),
            reading(5.0, 5.0, 5.0),
            reading(0.0, 0.0, 0.0),
        ]
        .iter()
        .enumerate()
        {
            assert_ne!(est.classify(r, i as u64 * 10_000 * MS), HealthStatus::Error);
        }
    }

    #[test]
    fn test_status_ordering() {
        assert!(HealthStatus::Ok < HealthStatus::Warning);
        assert!(HealthStatus::Warning < HealthStatus::Error);
    }
}
