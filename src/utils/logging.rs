//! Logger setup plus conditional logging macros gated on a module-level
//! `ENABLE_LOGS` flag.
//!
//! Usage:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("only emitted while ENABLE_LOGS is true");
//! ```

use std::sync::Once;

pub const DEBUG_ENV: &str = "ECOSORT_DEBUG";

static INIT: Once = Once::new();

pub fn debug_mode() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Installs `env_logger`. `RUST_LOG` wins when set; otherwise the level is
/// `info`, or `debug` with `ECOSORT_DEBUG=1`. Safe to call more than once.
pub fn init() {
    INIT.call_once(|| {
        let default_level = if debug_mode() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };

        let mut builder = env_logger::Builder::new();
        builder.filter_level(default_level);
        builder.parse_default_env();
        if builder.try_init().is_err() {
            log::debug!("Logger already installed by host");
        }
    });
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
