//! Console sink implementation

use crate::core::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::io::Write;

/// One of the four console output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleChannel {
    Error,
    Warn,
    Info,
    Debug,
}

/// Console collaborator: accepts whole lines on a channel
pub trait ConsoleSink: Send + Sync {
    fn write_line(&self, channel: ConsoleChannel, line: &str) -> Result<()>;
    fn name(&self) -> &str;
}

/// Writes to the process's standard streams.
///
/// Error and warn lines go to stderr, info and debug lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for StdConsole {
    fn write_line(&self, channel: ConsoleChannel, line: &str) -> Result<()> {
        let written = match channel {
            ConsoleChannel::Error | ConsoleChannel::Warn => {
                let mut stderr = std::io::stderr().lock();
                writeln!(stderr, "{}", line)
            }
            ConsoleChannel::Info | ConsoleChannel::Debug => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", line).and_then(|_| stdout.flush())
            }
        };
        written.map_err(|e| LoggerError::sink_io(self.name(), e))
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Keeps every line in memory, tagged with its channel.
///
/// Useful for tests and for hosts that display logs themselves.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<(ConsoleChannel, String)>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far, in order
    pub fn lines(&self) -> Vec<(ConsoleChannel, String)> {
        self.lines.lock().clone()
    }

    /// Lines written to a single channel
    pub fn channel_lines(&self, channel: ConsoleChannel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl ConsoleSink for MemoryConsole {
    fn write_line(&self, channel: ConsoleChannel, line: &str) -> Result<()> {
        self.lines.lock().push((channel, line.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory-console"
    }
}
