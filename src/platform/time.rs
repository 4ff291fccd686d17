//! Embassy-based clock implementation.
//!
//! This module provides the `EmbassyTime` implementation of the
//! `TimeSource` and `Clock` traits using Embassy's time driver.

use embassy_time::{Instant, Timer};
use mag_node_core::traits::{Clock, TimeSource};

/// Embassy-based clock using the Embassy time driver.
///
/// # Example
///
/// ```ignore
/// use mag_node::platform::EmbassyTime;
/// use mag_node_core::traits::Clock;
///
/// let clock = EmbassyTime;
/// clock.sleep_until(clock.now_us() + 20_000).await;
/// ```
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

impl Clock for EmbassyTime {
    async fn sleep_until(&self, deadline_us: u64) {
        Timer::at(Instant::from_micros(deadline_us)).await
    }
}
