//! Core logger types and traits

pub mod config;
pub mod error;
pub mod formatter;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod payload;
pub mod router;
pub mod timestamp;

pub use config::{ConfigOptions, LoggerConfig, OutputMode};
pub use error::{LoggerError, Result};
pub use formatter::Formatter;
pub use log_entry::LogEntry;
pub use log_level::{admits, EntryKind, LogLevel};
pub use logger::{FileSinkFactory, Logger, LoggerBuilder};
pub use payload::{Exception, Json, Payload, RaisedError, ToPayload};
pub use router::{SharedFileSink, SinkRouter};
pub use timestamp::{Clock, FixedClock, SharedClock, SystemClock, Timezone};
