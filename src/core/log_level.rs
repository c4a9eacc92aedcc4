//! Log level and entry kind definitions

use super::error::LoggerError;
use crate::appenders::console::ConsoleChannel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold that decides which entries are emitted.
///
/// Levels are additive: `Error` is the most restrictive threshold and `All`
/// admits every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    #[default]
    Error = 0,
    Warning = 1,
    Info = 2,
    All = 3,
}

impl LogLevel {
    pub const ALL_LEVELS: [LogLevel; 4] =
        [LogLevel::Error, LogLevel::Warning, LogLevel::Info, LogLevel::All];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::All => "ALL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "INFO" => Ok(LogLevel::Info),
            "ALL" => Ok(LogLevel::All),
            _ => Err(LoggerError::config("log level", format!("unknown level '{}'", s))),
        }
    }
}

/// The category of a single log call.
///
/// Every kind has a fixed label, color and console channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Error,
    Warning,
    Info,
    Success,
    Debug,
    Exception,
    CatastrophicException,
}

impl EntryKind {
    pub const ALL_KINDS: [EntryKind; 7] = [
        EntryKind::Error,
        EntryKind::Warning,
        EntryKind::Info,
        EntryKind::Success,
        EntryKind::Debug,
        EntryKind::Exception,
        EntryKind::CatastrophicException,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Error => "ERROR",
            EntryKind::Warning => "WARNING",
            EntryKind::Info => "INFO",
            EntryKind::Success => "SUCCESS",
            EntryKind::Debug => "DEBUG",
            EntryKind::Exception => "EXCEPTION",
            EntryKind::CatastrophicException => "CATASTROPHIC_EXCEPTION",
        }
    }

    /// Foreground color for this kind, `None` for uncolored output
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self {
            EntryKind::Error | EntryKind::CatastrophicException => Some(Red),
            EntryKind::Warning => Some(Yellow),
            EntryKind::Info => Some(Blue),
            EntryKind::Success => Some(Green),
            EntryKind::Exception => Some(Magenta),
            EntryKind::Debug => None,
        }
    }

    pub fn channel(&self) -> ConsoleChannel {
        match self {
            EntryKind::Error | EntryKind::Exception | EntryKind::CatastrophicException => {
                ConsoleChannel::Error
            }
            EntryKind::Warning => ConsoleChannel::Warn,
            EntryKind::Info | EntryKind::Success => ConsoleChannel::Info,
            EntryKind::Debug => ConsoleChannel::Debug,
        }
    }

    /// Lowest threshold at which this kind is emitted.
    ///
    /// `None` means the kind bypasses filtering and is always emitted.
    pub fn required_level(&self) -> Option<LogLevel> {
        match self {
            EntryKind::Error | EntryKind::Exception | EntryKind::CatastrophicException => None,
            EntryKind::Warning => Some(LogLevel::Warning),
            EntryKind::Info | EntryKind::Success => Some(LogLevel::Info),
            EntryKind::Debug => Some(LogLevel::All),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decide whether an entry of `kind` passes the configured `threshold`.
///
/// Error kinds are never filtered out.
#[inline]
pub fn admits(kind: EntryKind, threshold: LogLevel) -> bool {
    match kind.required_level() {
        None => true,
        Some(required) => threshold >= required,
    }
}
