//! Platform abstraction
//!
//! Bus error mapping, the Embassy clock, and host-side mocks.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "embassy")]
pub mod time;

pub use error::I2cError;
#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
