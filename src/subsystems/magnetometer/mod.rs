//! Magnetometer subsystem
//!
//! Brings the HMC5883L up, samples it on a fixed period, and shares the
//! latest NED field vector with the rest of the node.
//!
//! ## Data flow
//!
//! ```text
//!  read_raw ─► to_physical ─► to_ned ─┬─► FieldPublisher ─► Transport
//!                                     ├─► HealthEstimator ─► HealthReporter
//!                                     └─► SampleCache ◄─ readers (any task)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use mag_node::subsystems::magnetometer::{init, SampleCache};
//!
//! static MAG_CACHE: SampleCache = SampleCache::new();
//!
//! let mut task = init(i2c, EmbassyTime, transport, health, &MAG_CACHE, params);
//! task.run(&STOP).await;
//!
//! // elsewhere
//! let latest = MAG_CACHE.get();
//! ```

pub mod cache;
pub mod node;
pub mod publisher;
pub mod task;

pub use cache::SampleCache;
pub use node::{ComponentId, HealthReporter, MagneticFieldStrength, StopSignal, Transport};
pub use publisher::FieldPublisher;
pub use task::{init, InitError, MagPhase, MagTask, MagTaskConfig};
