//! Field message publisher
//!
//! Wraps the node transport and applies the configured transfer priority
//! once, on the first publish after the node has started.

use super::node::{MagneticFieldStrength, Transport};
use mag_node_core::magnetometer::NavigationReading;

pub struct FieldPublisher<T: Transport> {
    transport: T,
    priority: u8,
    variance: f32,
    priority_applied: bool,
}

impl<T: Transport> FieldPublisher<T> {
    pub fn new(transport: T, priority: u8, variance: f32) -> Self {
        Self {
            transport,
            priority,
            variance,
            priority_applied: false,
        }
    }

    /// Broadcast one reading with the configured variance
    ///
    /// Silently does nothing until the node reports started.
    pub fn publish(&mut self, reading: &NavigationReading) {
        if !self.transport.is_started() {
            return;
        }

        if !self.priority_applied {
            self.transport.set_priority(self.priority);
            self.priority_applied = true;
        }

        let msg = MagneticFieldStrength::with_variance(reading.as_array(), self.variance);
        self.transport.broadcast(&msg);
    }

    pub fn priority_applied(&self) -> bool {
        self.priority_applied
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::vec::Vec;

    /// Transport that records everything it is asked to do
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub started: bool,
        pub priorities: Vec<u8>,
        pub messages: Vec<MagneticFieldStrength>,
    }

    impl RecordingTransport {
        pub fn started() -> Self {
            Self {
                started: true,
                ..Default::default()
            }
        }
    }

    impl Transport for RecordingTransport {
        fn is_started(&self) -> bool {
            self.started
        }

        fn set_priority(&mut self, priority: u8) {
            self.priorities.push(priority);
        }

        fn broadcast(&mut self, msg: &MagneticFieldStrength) {
            self.messages.push(msg.clone());
        }
    }

    fn reading() -> NavigationReading {
        NavigationReading {
            field_ga: Vector3::new(0.1, -0.2, 0.3),
        }
    }

    #[test]
    fn test_publish_before_start_is_noop() {
        let mut publisher = FieldPublisher::new(RecordingTransport::default(), 16, 0.005);
        publisher.publish(&reading());

        assert!(publisher.transport().messages.is_empty());
        assert!(publisher.transport().priorities.is_empty());
        assert!(!publisher.priority_applied());
    }

    #[test]
    fn test_priority_applied_once() {
        let mut publisher = FieldPublisher::new(RecordingTransport::started(), 20, 0.005);
        publisher.publish(&reading());
        publisher.publish(&reading());
        publisher.publish(&reading());

        assert_eq!(publisher.transport().priorities, [20]);
        assert_eq!(publisher.transport().messages.len(), 3);
    }

    #[test]
    fn test_priority_applied_after_late_start() {
        let mut publisher = FieldPublisher::new(RecordingTransport::default(), 7, 0.005);
        publisher.publish(&reading());
        publisher.transport_mut().started = true;
        publisher.publish(&reading());

        assert_eq!(publisher.transport().priorities, [7]);
        assert_eq!(publisher.transport().messages.len(), 1);
    }

    #[test]
    fn test_message_contents() {
        let mut publisher = FieldPublisher::new(RecordingTransport::started(), 16, 0.01);
        publisher.publish(&reading());

        let msg = &publisher.transport().messages[0];
        assert_eq!(msg.magnetic_field_ga, [0.1, -0.2, 0.3]);
        assert_eq!(msg.magnetic_field_covariance.as_slice(), &[0.01]);
    }
}
