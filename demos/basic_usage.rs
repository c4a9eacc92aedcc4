//! Basic logger usage example
//!
//! Demonstrates console logging with thresholds, identifiers and the caught
//! error helpers.
//!
//! Run with: cargo run --example basic_usage

use serde::Serialize;
use stumper::prelude::*;
use stumper::{info, warning};

#[derive(Serialize)]
struct Connection<'a> {
    host: &'a str,
    port: u16,
}

fn main() -> Result<()> {
    println!("=== Stumper - Basic Usage Example ===\n");

    let logger = Logger::new();

    println!("1. Default threshold (ERROR) - only errors show:");
    logger.error("This is an error message")?;
    logger.warning("Warning message (hidden)")?;
    logger.info("Info message (hidden)")?;

    println!("\n2. Threshold ALL - every kind shows:");
    logger.set_threshold(LogLevel::All);
    logger.warning("This is a warning message")?;
    logger.info("This is an info message")?;
    logger.success("This is a success message")?;
    logger.debug("This is a debug message")?;

    println!("\n3. Identifiers, formatting and structured payloads:");
    logger.info_with_id(Json(Connection { host: "db.local", port: 5432 }), "pool")?;
    info!(logger, id: "http", "listening on port {}", 8080)?;
    warning!(logger, "retry {} of {}", 2, 3)?;

    println!("\n4. Caught errors and exceptions:");
    if let Err(e) = std::fs::read_to_string("/nonexistent/config.toml") {
        logger.caught_error_with_id(RaisedError::from(&e), "config")?;
    }
    logger.caught_exception(&Exception::new("quota exceeded", 507))?;
    logger.caught_exception(&Exception::catastrophic("state store corrupted", 1))?;

    println!("\n5. Without colors or timestamps:");
    logger.set_config(
        ConfigOptions::new()
            .use_colors(false)
            .use_timestamp(false)
            .threshold(LogLevel::Info),
    )?;
    logger.info("plain output")?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
