//! Conditional, tagged logging macros.
//!
//! Each module that uses them defines two consts:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//! const LOG_TAG: &str = "poll_loop";
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("cycle {} done", 3); // -> "[poll_loop] cycle 3 done"
//! ```
//! Setting `ENABLE_LOGS` to false silences a module without touching `RUST_LOG`.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!("[{}] {}", LOG_TAG, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!("[{}] {}", LOG_TAG, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!("[{}] {}", LOG_TAG, format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!("[{}] {}", LOG_TAG, format_args!($($arg)*));
        }
    };
}
