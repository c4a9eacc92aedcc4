//! File logging example
//!
//! Demonstrates logging to both console and a rotating file, switching output
//! modes at runtime and forcing a rotation.
//!
//! Run with: cargo run --example file_logging

use stumper::prelude::*;

fn main() -> Result<()> {
    println!("=== Stumper - File Logging Example ===\n");

    let logger = Logger::with_config(
        LoggerConfig::default()
            .with_threshold(LogLevel::All)
            .with_output_mode(OutputMode::Both)
            .with_file_sink(
                FileSinkOptions::new("logs/application-%DATE%.log")
                    .with_frequency(RotationStrategy::size(1024 * 1024))
                    .with_max_backups(5)
                    .with_verbose(true)
                    .with_compression(true),
            ),
    )?;

    println!("1. Logging to both console and file:");
    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.success("Configuration loaded")?;
    logger.warning("Using default settings for some options")?;
    logger.error_with_id("Failed to load optional plugin", "plugins")?;

    println!("\n2. File only:");
    logger.set_output_mode(OutputMode::File)?;
    for i in 1..=5 {
        logger.info(format!("Processing item {}/5", i))?;
    }

    println!("\n3. Forcing a rotation:");
    logger.force_file_rotate()?;
    logger.info("First line of the fresh file")?;

    println!("\n4. Back to console only:");
    logger.set_output_mode(OutputMode::Console)?;
    logger.info("Console again")?;
    if let Err(e) = logger.force_file_rotate() {
        println!("   rotation rejected as expected: {}", e);
    }

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs/' directory for the log files");

    Ok(())
}
