//! Message formatting
//!
//! Builds the final text of a log line in four fixed steps: payload to text,
//! label and identifier, color, timestamp. The timestamp is added last so it
//! is never colorized.

use super::config::LoggerConfig;
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::EntryKind;
use super::timestamp::{format_timestamp, Clock};

/// ANSI reset sequence appended after every colorized body
pub const RESET: &str = "\x1b[0m";

/// Formats entries against one configuration snapshot and clock
pub struct Formatter<'a> {
    config: &'a LoggerConfig,
    clock: &'a dyn Clock,
}

impl<'a> Formatter<'a> {
    pub fn new(config: &'a LoggerConfig, clock: &'a dyn Clock) -> Self {
        Self { config, clock }
    }

    /// Produce the text written to the sinks for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Serialization`](crate::LoggerError::Serialization)
    /// if the payload cannot be rendered.
    pub fn format(&self, entry: &LogEntry) -> Result<String> {
        let rendered = entry.payload.render()?;
        let mut message = entry.compose(&rendered);

        if self.config.use_colors {
            message = colorize(&message, entry.kind);
        }

        if self.config.use_timestamp {
            let timestamp = format_timestamp(&self.clock.now(), self.config.timezone);
            message = format!("{} - {}", timestamp, message);
        }

        Ok(message)
    }
}

/// Wrap `message` in the color of `kind` followed by a reset.
///
/// Uncolored kinds still get the reset prefix and suffix so every line has the
/// same shape.
pub fn colorize(message: &str, kind: EntryKind) -> String {
    let code = kind
        .color_code()
        .map(|color| color.to_fg_str().to_string())
        .unwrap_or_else(|| "0".to_string());
    format!("\x1b[{}m{}{}", code, message, RESET)
}
