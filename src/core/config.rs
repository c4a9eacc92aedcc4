//! Logger configuration
//!
//! [`LoggerConfig`] is the full configuration snapshot read on every emit.
//! [`ConfigOptions`] is the partial override accepted by
//! [`Logger::set_config`](crate::Logger::set_config); unset fields fall back
//! to the defaults, not to the previous configuration.

use super::log_level::LogLevel;
use super::timestamp::Timezone;
use crate::appenders::rotating_file::FileSinkOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where formatted messages are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    #[default]
    Console,
    File,
    Both,
}

impl OutputMode {
    #[inline]
    pub fn writes_console(&self) -> bool {
        matches!(self, OutputMode::Console | OutputMode::Both)
    }

    #[inline]
    pub fn writes_file(&self) -> bool {
        matches!(self, OutputMode::File | OutputMode::Both)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Console => "CONSOLE",
            OutputMode::File => "FILE",
            OutputMode::Both => "BOTH",
        })
    }
}

/// Complete logger configuration
///
/// # Examples
///
/// ```
/// use stumper::{LoggerConfig, LogLevel, OutputMode, Timezone};
///
/// let config = LoggerConfig::default()
///     .with_colors(false)
///     .with_timezone(Timezone::Utc)
///     .with_threshold(LogLevel::Info);
///
/// assert!(config.use_timestamp);
/// assert_eq!(config.output_mode, OutputMode::Console);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Wrap message bodies in ANSI color codes
    pub use_colors: bool,
    /// Prefix messages with a timestamp
    pub use_timestamp: bool,
    pub timezone: Timezone,
    pub threshold: LogLevel,
    pub output_mode: OutputMode,
    pub file_sink: FileSinkOptions,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            use_timestamp: true,
            timezone: Timezone::Local,
            threshold: LogLevel::Error,
            output_mode: OutputMode::Console,
            file_sink: FileSinkOptions::default(),
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `options` over the defaults
    #[must_use]
    pub fn from_options(options: ConfigOptions) -> Self {
        let defaults = Self::default();
        Self {
            use_colors: options.use_colors.unwrap_or(defaults.use_colors),
            use_timestamp: options.use_timestamp.unwrap_or(defaults.use_timestamp),
            timezone: options.timezone.unwrap_or(defaults.timezone),
            threshold: options.threshold.unwrap_or(defaults.threshold),
            output_mode: options.output_mode.unwrap_or(defaults.output_mode),
            file_sink: options.file_sink.unwrap_or(defaults.file_sink),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.use_timestamp = enabled;
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: LogLevel) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    #[must_use]
    pub fn with_file_sink(mut self, options: FileSinkOptions) -> Self {
        self.file_sink = options;
        self
    }
}

/// Partial configuration; `None` fields take their default value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    pub use_colors: Option<bool>,
    pub use_timestamp: Option<bool>,
    pub timezone: Option<Timezone>,
    pub threshold: Option<LogLevel>,
    pub output_mode: Option<OutputMode>,
    pub file_sink: Option<FileSinkOptions>,
}

impl ConfigOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn use_colors(mut self, enabled: bool) -> Self {
        self.use_colors = Some(enabled);
        self
    }

    #[must_use]
    pub fn use_timestamp(mut self, enabled: bool) -> Self {
        self.use_timestamp = Some(enabled);
        self
    }

    #[must_use]
    pub fn timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = Some(timezone);
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: LogLevel) -> Self {
        self.threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn file_sink(mut self, options: FileSinkOptions) -> Self {
        self.file_sink = Some(options);
        self
    }
}

impl From<ConfigOptions> for LoggerConfig {
    fn from(options: ConfigOptions) -> Self {
        LoggerConfig::from_options(options)
    }
}
