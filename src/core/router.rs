//! Sink dispatch
//!
//! Sends a formatted message to the console channel of its kind and/or the
//! file sink. In `Both` mode the two writes are independent: both are
//! attempted and their failures are reported together.

use super::config::OutputMode;
use super::error::{LoggerError, Result};
use super::log_level::EntryKind;
use crate::appenders::console::ConsoleSink;
use crate::appenders::rotating_file::FileSink;
use parking_lot::Mutex;

/// File sink guarded for serialized writes
pub type SharedFileSink = Mutex<Box<dyn FileSink>>;

pub struct SinkRouter<'a> {
    console: &'a dyn ConsoleSink,
    file: Option<&'a SharedFileSink>,
}

impl<'a> SinkRouter<'a> {
    pub fn new(console: &'a dyn ConsoleSink, file: Option<&'a SharedFileSink>) -> Self {
        Self { console, file }
    }

    /// Write `message` to every destination `mode` selects.
    pub fn dispatch(&self, message: &str, kind: EntryKind, mode: OutputMode) -> Result<()> {
        let mut failures = Vec::new();

        if mode.writes_console() {
            if let Err(e) = self.console.write_line(kind.channel(), message) {
                failures.push(e);
            }
        }

        if mode.writes_file() {
            if let Err(e) = self.write_file(message, mode) {
                failures.push(e);
            }
        }

        LoggerError::aggregate(failures)
    }

    /// Write to the file sink only.
    ///
    /// # Errors
    ///
    /// [`LoggerError::FileOutputNotEnabled`] when `mode` is `Console` or no
    /// file sink exists.
    pub fn write_file(&self, message: &str, mode: OutputMode) -> Result<()> {
        self.file_sink(mode)?.lock().write(message)
    }

    /// Forward a rotation request to the file sink.
    pub fn rotate(&self, force: bool, mode: OutputMode) -> Result<()> {
        self.file_sink(mode)?.lock().rotate(force)
    }

    fn file_sink(&self, mode: OutputMode) -> Result<&'a SharedFileSink> {
        if !mode.writes_file() {
            return Err(LoggerError::FileOutputNotEnabled);
        }
        self.file.ok_or(LoggerError::FileOutputNotEnabled)
    }
}
