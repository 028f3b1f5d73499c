//! Driver logging with a configurable level threshold.
//!
//! Messages are handed to [`Host::log`](crate::host::Host::log), which routes
//! them to the kernel log. The `dev_*` macros pass the device along so the
//! host can prefix the line with its name; the `pr_*` macros don't.
//!
//! Levels, lowest first:
//! - DEBUG: Debugging information
//! - INFO: Informational messages
//! - WARN: Warning messages
//! - ERROR: Error messages

use core::sync::atomic::{AtomicU8, Ordering};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// printk loglevel (`KERN_ERR` .. `KERN_DEBUG`).
    pub const fn printk_level(self) -> u8 {
        match self {
            LogLevel::Error => 3,
            LogLevel::Warn => 4,
            LogLevel::Info => 6,
            LogLevel::Debug => 7,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" | "err" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Global log level filter. Messages below this level are suppressed.
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Get the current log level threshold.
pub fn get_log_level() -> LogLevel {
    match LOG_LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Debug,
        1 => LogLevel::Info,
        2 => LogLevel::Warn,
        _ => LogLevel::Error,
    }
}

/// Set the log level threshold. Messages below this level will be suppressed.
pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Check if a message at the given level should be logged.
#[inline]
pub fn should_log(level: LogLevel) -> bool {
    level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Internal macro for driver logging with level filtering.
#[macro_export]
macro_rules! klog {
    ($host:expr, $level:expr, $dev:expr, $($arg:tt)*) => {{
        let level: $crate::logging::LogLevel = $level;
        if $crate::logging::should_log(level) {
            $crate::host::Host::log($host, level, $dev, format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! pr_err {
    ($host:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Error, None, $($arg)*)
    };
}

#[macro_export]
macro_rules! pr_warn {
    ($host:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Warn, None, $($arg)*)
    };
}

#[macro_export]
macro_rules! pr_info {
    ($host:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Info, None, $($arg)*)
    };
}

#[macro_export]
macro_rules! dev_err {
    ($host:expr, $dev:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Error, Some($dev), $($arg)*)
    };
}

#[macro_export]
macro_rules! dev_warn {
    ($host:expr, $dev:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Warn, Some($dev), $($arg)*)
    };
}

#[macro_export]
macro_rules! dev_info {
    ($host:expr, $dev:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Info, Some($dev), $($arg)*)
    };
}

#[macro_export]
macro_rules! dev_dbg {
    ($host:expr, $dev:expr, $($arg:tt)*) => {
        $crate::klog!($host, $crate::logging::LogLevel::Debug, Some($dev), $($arg)*)
    };
}
