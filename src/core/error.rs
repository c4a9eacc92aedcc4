//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Payload could not be rendered as text
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A file-only operation was requested while output goes to the console only
    #[error("File output is not enabled (output mode is CONSOLE)")]
    FileOutputNotEnabled,

    /// A console or file sink failed to write
    #[error("{sink} sink write failed: {source}")]
    SinkIo {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// More than one sink failed during a single dispatch
    #[error("{} sinks failed: {}", .0.len(), join_errors(.0))]
    SinkFailures(Vec<LoggerError>),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },
}

fn join_errors(errors: &[LoggerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoggerError {
    /// Create a sink write error
    pub fn sink_io(sink: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkIo {
            sink: sink.into(),
            source,
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Combine the outcomes of independent sink writes.
    ///
    /// A single failure is returned unchanged; several are wrapped in
    /// [`LoggerError::SinkFailures`].
    pub fn aggregate(mut errors: Vec<LoggerError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(LoggerError::SinkFailures(errors)),
        }
    }
}
