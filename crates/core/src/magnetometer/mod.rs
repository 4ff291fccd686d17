//! Magnetometer data model and pure processing stages
//!
//! ```text
//! RawReading ──scale──▶ PhysicalReading ──to_ned──▶ NavigationReading
//!                                                        │
//!                                     HealthEstimator ◀──┤
//!                                                        ▼
//!                                               PublishedSample
//! ```

pub mod frame;
pub mod health;
pub mod types;

pub use frame::{to_ned, GAUSS_PER_COUNT};
pub use health::{
    HealthEstimator, HealthStatus, ABS_MAX_VALID_GAUSS, MAX_ZERO_VECTOR_DURATION_MS,
    ZERO_EPSILON,
};
pub use self_test::{
    validate_self_test_sample, Polarity, SelfTestViolation, SELF_TEST_HIGH_LIMIT,
    SELF_TEST_LOW_LIMIT,
};
pub use types::{Axis, NavigationReading, PhysicalReading, PublishedSample, RawReading};
