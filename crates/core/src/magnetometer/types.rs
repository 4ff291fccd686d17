//! Reading types passed between the sampling stages

use nalgebra::Vector3;

/// Sensor axis, used to pinpoint which component failed a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in logical order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Raw ADC counts in logical X, Y, Z order
///
/// The device transmits its data block as X, Z, Y; `from_wire` performs the
/// remapping so nothing downstream has to know about it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawReading {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decode the 6-byte data block (big-endian X, Z, Y)
    pub fn from_wire(buf: &[u8; 6]) -> Self {
        Self {
            x: i16::from_be_bytes([buf[0], buf[1]]),
            z: i16::from_be_bytes([buf[2], buf[3]]),
            y: i16::from_be_bytes([buf[4], buf[5]]),
        }
    }

    /// Encode into the device's wire layout (big-endian X, Z, Y)
    pub fn to_wire(&self) -> [u8; 6] {
        let x = self.x.to_be_bytes();
        let z = self.z.to_be_bytes();
        let y = self.y.to_be_bytes();
        [x[0], x[1], z[0], z[1], y[0], y[1]]
    }

    /// Components in logical order
    pub fn axes(&self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }

    pub fn get(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Field strength in gauss, sensor body axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalReading {
    pub field_ga: Vector3<f32>,
}

/// Field strength in gauss, North-East-Down frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationReading {
    pub field_ga: Vector3<f32>,
}

impl NavigationReading {
    pub const fn zero() -> Self {
        Self {
            field_ga: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.field_ga.x, self.field_ga.y, self.field_ga.z]
    }
}

impl Default for NavigationReading {
    fn default() -> Self {
        Self::zero()
    }
}

/// Latest published sample as seen by readers
///
/// `sequence_id` grows by exactly one per successful sampling cycle and is
/// the only freshness indicator readers get.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PublishedSample {
    pub sequence_id: u64,
    pub field: NavigationReading,
}

impl PublishedSample {
    /// All-zero sample held before the first successful cycle
    pub const fn initial() -> Self {
        Self {
            sequence_id: 0,
            field: NavigationReading::zero(),
        }
    }
}
