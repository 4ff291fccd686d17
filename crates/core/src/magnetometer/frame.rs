//! Unit scaling and sensor-to-NED frame transform

use super::types::{NavigationReading, PhysicalReading, RawReading};
use nalgebra::Vector3;

/// Gauss per raw count at the default gain (1090 LSB/Ga)
pub const GAUSS_PER_COUNT: f32 = 0.92e-3;

impl RawReading {
    /// Scale raw counts to gauss, per axis
    pub fn to_physical(&self) -> PhysicalReading {
        PhysicalReading {
            field_ga: Vector3::new(
                self.x as f32 * GAUSS_PER_COUNT,
                self.y as f32 * GAUSS_PER_COUNT,
                self.z as f32 * GAUSS_PER_COUNT,
            ),
        }
    }
}

/// Rotate a body-axis reading into the NED frame: `(x, y, z) -> (-y, x, z)`
pub fn to_ned(reading: &PhysicalReading) -> NavigationReading {
    let v = reading.field_ga;
    NavigationReading {
        field_ga: Vector3::new(-v.y, v.x, v.z),
    }
}
