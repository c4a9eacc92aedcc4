//! Main logger implementation
//!
//! Every emit runs the same synchronous pipeline under a read lock on the
//! logger state: filter, payload to text, format, dispatch. Configuration
//! changes take the write lock and swap the configuration and the file sink
//! together, so an emit never sees a file output mode without a sink.

use super::{
    config::{ConfigOptions, LoggerConfig, OutputMode},
    error::{LoggerError, Result},
    formatter::Formatter,
    log_entry::LogEntry,
    log_level::{admits, EntryKind, LogLevel},
    payload::{Exception, ToPayload},
    router::{SharedFileSink, SinkRouter},
    timestamp::{SharedClock, SystemClock},
};
use crate::appenders::console::{ConsoleSink, StdConsole};
use crate::appenders::rotating_file::{FileSink, FileSinkOptions, RotatingFileSink};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Builds a file sink from its options; called whenever the options change
pub type FileSinkFactory =
    Arc<dyn Fn(&FileSinkOptions) -> Result<Box<dyn FileSink>> + Send + Sync>;

fn rotating_file_factory() -> FileSinkFactory {
    Arc::new(|options: &FileSinkOptions| {
        RotatingFileSink::new(options.clone()).map(|sink| Box::new(sink) as Box<dyn FileSink>)
    })
}

struct LoggerState {
    config: LoggerConfig,
    /// Present iff `config.output_mode` writes to a file
    file_sink: Option<SharedFileSink>,
}

pub struct Logger {
    state: RwLock<LoggerState>,
    console: Arc<dyn ConsoleSink>,
    clock: SharedClock,
    sink_factory: FileSinkFactory,
}

impl Logger {
    /// Console-only logger with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LoggerState {
                config: LoggerConfig::default(),
                file_sink: None,
            }),
            console: Arc::new(StdConsole::new()),
            clock: Arc::new(SystemClock),
            sink_factory: rotating_file_factory(),
        }
    }

    /// Create a logger from a full configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration enables file output and the file sink cannot
    /// be created.
    pub fn with_config(config: LoggerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    // ---------------------------------------------------------------------
    // Emit operations
    // ---------------------------------------------------------------------

    /// Run the pipeline for one entry.
    ///
    /// Entries below the threshold return `Ok(())` without touching the
    /// payload or any sink.
    pub fn emit(&self, kind: EntryKind, payload: impl ToPayload, identifier: &str) -> Result<()> {
        let state = self.state.read();
        if !admits(kind, state.config.threshold) {
            return Ok(());
        }

        let entry = LogEntry::new(kind, payload.to_payload()?).with_identifier(identifier);
        let message = Formatter::new(&state.config, self.clock.as_ref()).format(&entry)?;

        SinkRouter::new(self.console.as_ref(), state.file_sink.as_ref()).dispatch(
            &message,
            kind,
            state.config.output_mode,
        )
    }

    /// Errors are emitted at every threshold.
    #[inline]
    pub fn error(&self, payload: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Error, payload, "")
    }

    #[inline]
    pub fn error_with_id(&self, payload: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Error, payload, identifier)
    }

    #[inline]
    pub fn warning(&self, payload: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Warning, payload, "")
    }

    #[inline]
    pub fn warning_with_id(&self, payload: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Warning, payload, identifier)
    }

    #[inline]
    pub fn info(&self, payload: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Info, payload, "")
    }

    #[inline]
    pub fn info_with_id(&self, payload: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Info, payload, identifier)
    }

    /// Success messages share the info threshold.
    #[inline]
    pub fn success(&self, payload: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Success, payload, "")
    }

    #[inline]
    pub fn success_with_id(&self, payload: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Success, payload, identifier)
    }

    /// Debug messages are only emitted at [`LogLevel::All`].
    #[inline]
    pub fn debug(&self, payload: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Debug, payload, "")
    }

    #[inline]
    pub fn debug_with_id(&self, payload: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Debug, payload, identifier)
    }

    /// Log a caught error, or any other payload, at error severity.
    ///
    /// Pass a [`RaisedError`](crate::RaisedError) (or a `&dyn Error`) to get
    /// its stack text, or `[name] message` when no stack was captured.
    ///
    /// # Examples
    ///
    /// ```
    /// use stumper::{Logger, RaisedError};
    ///
    /// let logger = Logger::new();
    /// if let Err(e) = std::fs::read_to_string("/definitely/missing") {
    ///     logger.caught_error(RaisedError::from(&e)).unwrap();
    /// }
    /// ```
    pub fn caught_error(&self, value: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Error, value, "")
    }

    pub fn caught_error_with_id(&self, value: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Error, value, identifier)
    }

    /// Like [`caught_error`](Self::caught_error), at warning severity.
    pub fn caught_warning(&self, value: impl ToPayload) -> Result<()> {
        self.emit(EntryKind::Warning, value, "")
    }

    pub fn caught_warning_with_id(&self, value: impl ToPayload, identifier: &str) -> Result<()> {
        self.emit(EntryKind::Warning, value, identifier)
    }

    /// Log an application exception with its code as identifier.
    pub fn caught_exception(&self, exception: &Exception) -> Result<()> {
        let kind = if exception.catastrophic {
            EntryKind::CatastrophicException
        } else {
            EntryKind::Exception
        };
        self.emit(kind, exception.message.as_str(), &exception.error_code.to_string())
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

    /// Replace the configuration with `options` merged over the defaults.
    ///
    /// # Errors
    ///
    /// Fails, leaving the previous configuration in place, if file output is
    /// enabled and the file sink cannot be built.
    pub fn set_config(&self, options: ConfigOptions) -> Result<()> {
        self.replace_config(LoggerConfig::from_options(options))
    }

    /// Replace the whole configuration.
    pub fn replace_config(&self, config: LoggerConfig) -> Result<()> {
        let mut state = self.state.write();
        let rebuild = state.file_sink.is_none() || state.config.file_sink != config.file_sink;
        let file_sink = self.reconcile_sink(&mut state, &config, rebuild)?;
        state.file_sink = file_sink;
        state.config = config;
        Ok(())
    }

    /// Snapshot of the current configuration
    #[must_use]
    pub fn config(&self) -> LoggerConfig {
        self.state.read().config.clone()
    }

    #[must_use]
    pub fn threshold(&self) -> LogLevel {
        self.state.read().config.threshold
    }

    pub fn set_threshold(&self, threshold: LogLevel) {
        self.state.write().config.threshold = threshold;
    }

    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        self.state.read().config.output_mode
    }

    /// Switch output destinations.
    ///
    /// Enabling file output builds the file sink from the current options;
    /// switching to console only drops it.
    pub fn set_output_mode(&self, mode: OutputMode) -> Result<()> {
        let mut state = self.state.write();
        let config = state.config.clone().with_output_mode(mode);
        let file_sink = self.reconcile_sink(&mut state, &config, false)?;
        state.file_sink = file_sink;
        state.config = config;
        Ok(())
    }

    /// Store new file sink options, rebuilding the sink if file output is on.
    pub fn set_file_sink_options(&self, options: FileSinkOptions) -> Result<()> {
        let mut state = self.state.write();
        let config = state.config.clone().with_file_sink(options);
        let file_sink = self.reconcile_sink(&mut state, &config, true)?;
        state.file_sink = file_sink;
        state.config = config;
        Ok(())
    }

    /// Install a custom file sink.
    ///
    /// The sink lives only as long as the current file options and output
    /// mode. It is replaced by one built from the factory when the options
    /// change through [`set_file_sink_options`](Self::set_file_sink_options),
    /// [`set_config`](Self::set_config) or
    /// [`replace_config`](Self::replace_config), and dropped when output
    /// switches to console only.
    ///
    /// # Errors
    ///
    /// [`LoggerError::FileOutputNotEnabled`] if the output mode is console only.
    pub fn set_file_sink(&self, sink: Box<dyn FileSink>) -> Result<()> {
        let mut state = self.state.write();
        if !state.config.output_mode.writes_file() {
            return Err(LoggerError::FileOutputNotEnabled);
        }
        state.file_sink = Some(Mutex::new(sink));
        Ok(())
    }

    /// Rotate the log file now.
    ///
    /// # Errors
    ///
    /// [`LoggerError::FileOutputNotEnabled`] if the output mode is console only.
    pub fn force_file_rotate(&self) -> Result<()> {
        let state = self.state.read();
        SinkRouter::new(self.console.as_ref(), state.file_sink.as_ref())
            .rotate(true, state.config.output_mode)
    }

    /// Flush the file sink, if any
    pub fn flush(&self) -> Result<()> {
        let state = self.state.read();
        match state.file_sink {
            Some(ref sink) => sink.lock().flush(),
            None => Ok(()),
        }
    }

    /// Compute the file sink that goes with `config`.
    ///
    /// Takes the current sink out of `state` when it can be kept; the caller
    /// stores the result. Nothing in `state` changes on error.
    fn reconcile_sink(
        &self,
        state: &mut LoggerState,
        config: &LoggerConfig,
        rebuild: bool,
    ) -> Result<Option<SharedFileSink>> {
        if !config.output_mode.writes_file() {
            return Ok(None);
        }
        if !rebuild {
            if let Some(existing) = state.file_sink.take() {
                return Ok(Some(existing));
            }
        }
        let sink = (self.sink_factory)(&config.file_sink)?;
        Ok(Some(Mutex::new(sink)))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use stumper::prelude::*;
/// use std::sync::Arc;
///
/// let console = Arc::new(MemoryConsole::new());
/// let logger = Logger::builder()
///     .config(LoggerConfig::default().with_colors(false).with_timestamp(false))
///     .console(console.clone())
///     .build()
///     .unwrap();
///
/// logger.error("disk full").unwrap();
/// assert_eq!(console.channel_lines(ConsoleChannel::Error), vec!["ERROR: disk full"]);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: Arc<dyn ConsoleSink>,
    clock: SharedClock,
    sink_factory: FileSinkFactory,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            console: Arc::new(StdConsole::new()),
            clock: Arc::new(SystemClock),
            sink_factory: rotating_file_factory(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `options` merged over the defaults
    #[must_use = "builder methods return a new value"]
    pub fn options(mut self, options: ConfigOptions) -> Self {
        self.config = LoggerConfig::from_options(options);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, console: Arc<dyn ConsoleSink>) -> Self {
        self.console = console;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace how file sinks are built from [`FileSinkOptions`]
    #[must_use = "builder methods return a new value"]
    pub fn file_sink_factory(mut self, factory: FileSinkFactory) -> Self {
        self.sink_factory = factory;
        self
    }

    /// Build the Logger, creating the file sink if file output is enabled
    pub fn build(self) -> Result<Logger> {
        let file_sink = if self.config.output_mode.writes_file() {
            Some(Mutex::new((self.sink_factory)(&self.config.file_sink)?))
        } else {
            None
        };

        Ok(Logger {
            state: RwLock::new(LoggerState {
                config: self.config,
                file_sink,
            }),
            console: self.console,
            clock: self.clock,
            sink_factory: self.sink_factory,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
