//! # Stumper
//!
//! A small leveled logger for applications that want readable console output
//! and, optionally, a rotating log file.
//!
//! ## Features
//!
//! - **Severity kinds**: error, warning, info, success, debug and two exception
//!   kinds, each with its own label and color
//! - **Threshold filtering**: errors always pass, everything else is gated by
//!   a [`LogLevel`]
//! - **Decoration**: optional identifier, ANSI color and timestamp per line
//! - **Output modes**: console, file or both, switchable at runtime
//! - **Rotating files**: size, time, daily or hourly rotation with backups
//!
//! ## Example
//!
//! ```
//! use stumper::prelude::*;
//!
//! let logger = Logger::with_config(
//!     LoggerConfig::default().with_threshold(LogLevel::Info),
//! ).unwrap();
//!
//! logger.info_with_id("listening on 8080", "http").unwrap();
//! logger.success("migrations applied").unwrap();
//! logger.debug("not shown below LogLevel::All").unwrap();
//! ```

use std::sync::OnceLock;

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleChannel, ConsoleSink, FileSink, FileSinkOptions, MemoryConsole, MemoryFileSink,
        RotatingFileSink, RotationStrategy, StdConsole,
    };
    pub use crate::core::{
        ConfigOptions, EntryKind, Exception, Json, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, OutputMode, Payload, RaisedError, Result, Timezone, ToPayload,
    };
}

pub use appenders::{ConsoleSink, FileSink, FileSinkOptions, RotationStrategy};
pub use core::{
    ConfigOptions, EntryKind, Exception, Json, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, OutputMode, Payload, RaisedError, Result, Timezone, ToPayload,
};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Process-wide logger, created with the default configuration on first use.
///
/// ```
/// stumper::global().set_threshold(stumper::LogLevel::Warning);
/// stumper::global().warning("cache is cold").unwrap();
/// ```
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}
