//! Time abstraction traits for platform-agnostic timing operations.
//!
//! `TimeSource` reads the monotonic clock; `Clock` adds absolute-deadline
//! sleeping so every delay in the driver goes through one mockable seam.

use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// This trait abstracts over different time providers:
/// - `EmbassyTime` (in the `mag_node` crate) for embedded targets using Embassy
/// - `MockTime` for host testing with controllable time
pub trait TimeSource: Clone + Send + Sync {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle potential overflow.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Time source that can suspend the calling task.
///
/// # Blocking contract
///
/// Both methods yield the processor to other tasks until the deadline has
/// passed. A deadline already in the past returns immediately. Sleeps are
/// never interrupted early.
#[allow(async_fn_in_trait)]
pub trait Clock: TimeSource {
    /// Sleeps until the absolute monotonic time `deadline_us`.
    async fn sleep_until(&self, deadline_us: u64);

    /// Sleeps for `us` microseconds relative to now.
    async fn sleep_us(&self, us: u64) {
        self.sleep_until(self.now_us().saturating_add(us)).await
    }
}

impl<T: TimeSource> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

impl<T: Clock> Clock for &T {
    async fn sleep_until(&self, deadline_us: u64) {
        (**self).sleep_until(deadline_us).await
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// Sleeping jumps simulated time forward to the deadline, so timing-heavy
/// code runs instantly and deterministically.
///
/// # Example
///
/// ```
/// use mag_node_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_us(), 0);
///
/// time.advance(1000); // Advance 1ms
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
    sleeps: Cell<u32>,
}

// Safety: MockTime is only used in single-threaded test contexts
// where Cell is safe. The Send+Sync bounds on TimeSource trait
// are required for embedded contexts, but MockTime is not used there.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
            sleeps: Cell::new(0),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }

    /// Number of `sleep_until` calls observed so far.
    pub fn sleep_count(&self) -> u32 {
        self.sleeps.get()
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

impl Clock for MockTime {
    async fn sleep_until(&self, deadline_us: u64) {
        self.sleeps.set(self.sleeps.get() + 1);
        if deadline_us > self.current_us.get() {
            self.current_us.set(deadline_us);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
