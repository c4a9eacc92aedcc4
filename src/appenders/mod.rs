//! Sink implementations

pub mod console;
pub mod rotating_file;

pub use console::{ConsoleChannel, ConsoleSink, MemoryConsole, StdConsole};
pub use rotating_file::{
    FileSink, FileSinkOptions, MemoryFileSink, RotatingFileSink, RotationStrategy, DATE_TOKEN,
};
