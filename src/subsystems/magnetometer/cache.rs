//! Shared latest-sample cache
//!
//! The sampling task is the only writer; any task may read a snapshot at
//! any time. Reads and writes copy one small struct inside a critical
//! section, so neither side waits for more than that copy.

use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use mag_node_core::magnetometer::{NavigationReading, PublishedSample};

/// Most recent published magnetometer sample
///
/// # Example
///
/// ```ignore
/// static MAG_CACHE: SampleCache = SampleCache::new();
///
/// let sample = MAG_CACHE.get();
/// if sample.sequence_id != last_seen {
///     // new reading available
/// }
/// ```
pub struct SampleCache {
    inner: Mutex<CriticalSectionRawMutex, Cell<PublishedSample>>,
}

impl SampleCache {
    /// Create an empty cache (sequence id 0, zero field)
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(PublishedSample::initial())),
        }
    }

    /// Store a new reading and bump the sequence id
    pub fn set(&self, reading: NavigationReading) {
        self.inner.lock(|cell| {
            let current = cell.get();
            cell.set(PublishedSample {
                sequence_id: current.sequence_id.wrapping_add(1),
                field: reading,
            });
        });
    }

    /// Snapshot of the latest sample
    pub fn get(&self) -> PublishedSample {
        self.inner.lock(|cell| cell.get())
    }
}

impl Default for SampleCache {
    fn default() -> Self {
        Self::new()
    }
}
