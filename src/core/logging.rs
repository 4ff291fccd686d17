//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`embedded` feature): Uses defmt
//! - Host tests: Uses println!
//! - Host non-test: No-op
//!
//! Arguments must be primitives or `&str` so the same call site formats
//! under both defmt and `core::fmt`.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[INFO] {}", format!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[WARN] {}", format!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[DEBUG] {}", format!($($arg)*));
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "embedded")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(not(feature = "embedded"), test))]
        println!("[TRACE] {}", format!($($arg)*));
    }};
}
