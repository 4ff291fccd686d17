//! Node collaborator contracts
//!
//! The magnetometer task talks to the rest of the node through three narrow
//! seams: a transport that broadcasts field messages, a health reporter,
//! and a stop signal polled between iterations. Implementations live with
//! the node; tests use in-memory recorders.

use core::sync::atomic::{AtomicBool, Ordering};
use mag_node_core::magnetometer::HealthStatus;

/// Maximum covariance entries carried by a field message
pub const MAX_COVARIANCE_LEN: usize = 9;

/// Identifier of a node component for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct ComponentId(pub u8);

impl ComponentId {
    pub const MAGNETOMETER: ComponentId = ComponentId(2);
}

/// Magnetic field broadcast message
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticFieldStrength {
    /// Field in gauss, NED frame
    pub magnetic_field_ga: [f32; 3],
    /// Either empty, a single shared variance, or a full 3x3 matrix
    pub magnetic_field_covariance: heapless::Vec<f32, MAX_COVARIANCE_LEN>,
}

impl MagneticFieldStrength {
    /// Message carrying one variance shared by all axes
    pub fn with_variance(field_ga: [f32; 3], variance: f32) -> Self {
        let mut magnetic_field_covariance = heapless::Vec::new();
        // Capacity is nine, one entry always fits
        let _ = magnetic_field_covariance.push(variance);
        Self {
            magnetic_field_ga: field_ga,
            magnetic_field_covariance,
        }
    }
}

/// Outgoing message transport
pub trait Transport {
    /// Whether the node has started and can emit messages
    fn is_started(&self) -> bool;

    /// Set the transfer priority used for magnetometer messages
    fn set_priority(&mut self, priority: u8);

    /// Broadcast a field message; delivery is not reported back
    fn broadcast(&mut self, msg: &MagneticFieldStrength);
}

/// Node lifecycle and health aggregation
pub trait HealthReporter {
    /// Announce that the component has started its bring-up
    fn mark_initialized(&mut self, component: ComponentId);

    /// Report the current health of a component
    fn set_health(&mut self, component: ComponentId, status: HealthStatus);
}

/// Cooperative cancellation flag
pub trait StopSignal {
    fn stop_requested(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn stop_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<S: StopSignal + ?Sized> StopSignal for &S {
    fn stop_requested(&self) -> bool {
        (**self).stop_requested()
    }
}
