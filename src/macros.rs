//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Each one evaluates
//! to the [`Result`](crate::Result) of the underlying emit.
//!
//! # Examples
//!
//! ```
//! use stumper::prelude::*;
//! use stumper::{error, info};
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! error!(logger, "Server failed to start").unwrap();
//!
//! // With format arguments and an identifier
//! let port = 8080;
//! info!(logger, id: "http", "listening on port {}", port).unwrap();
//! ```

/// Emit a formatted message of the given [`EntryKind`](crate::EntryKind).
///
/// # Examples
///
/// ```
/// # use stumper::prelude::*;
/// # let logger = Logger::new();
/// use stumper::log;
/// log!(logger, EntryKind::Error, "Simple message").unwrap();
/// log!(logger, EntryKind::Error, id: "db", "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $kind:expr, id: $id:expr, $($arg:tt)+) => {
        $logger.emit($kind, format!($($arg)+), &$id)
    };
    ($logger:expr, $kind:expr, $($arg:tt)+) => {
        $logger.emit($kind, format!($($arg)+), "")
    };
}

/// Log an error message; never filtered.
///
/// # Examples
///
/// ```
/// # use stumper::prelude::*;
/// # let logger = Logger::new();
/// use stumper::error;
/// error!(logger, "Connection lost").unwrap();
/// error!(logger, id: "db", "Query failed after {} ms", 250).unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, id: $id:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Error, id: $id, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Error, $($arg)+)
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, id: $id:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Warning, id: $id, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Warning, $($arg)+)
    };
}

/// Log an info message.
///
/// # Examples
///
/// ```
/// # use stumper::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_threshold(LogLevel::Info);
/// use stumper::info;
/// info!(logger, "Items: {}", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, id: $id:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Info, id: $id, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Info, $($arg)+)
    };
}

/// Log a success message, filtered like info.
#[macro_export]
macro_rules! success {
    ($logger:expr, id: $id:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Success, id: $id, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Success, $($arg)+)
    };
}

/// Log a debug message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, id: $id:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Debug, id: $id, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::EntryKind::Debug, $($arg)+)
    };
}
