//! Integration tests for stumper
//!
//! Drive the public API end to end: filtering, decoration, routing and the
//! real rotating file sink on a temporary directory.

use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use stumper::core::timestamp::FixedClock;
use stumper::prelude::*;
use stumper::{error, info};
use tempfile::TempDir;

fn plain() -> LoggerConfig {
    LoggerConfig::default()
        .with_colors(false)
        .with_timestamp(false)
}

fn file_options(dir: &Path) -> FileSinkOptions {
    named_options(dir, "app.log")
}

fn named_options(dir: &Path, name: &str) -> FileSinkOptions {
    FileSinkOptions::new(dir.join(name)).with_frequency(RotationStrategy::Never)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn console_logger(config: LoggerConfig) -> (Logger, Arc<MemoryConsole>) {
    let console = Arc::new(MemoryConsole::new());
    let logger = Logger::builder()
        .config(config)
        .console(console.clone())
        .build()
        .expect("console logger");
    (logger, console)
}

#[test]
fn test_default_configuration() {
    let logger = Logger::new();
    let config = logger.config();

    assert!(config.use_colors);
    assert!(config.use_timestamp);
    assert_eq!(config.timezone, Timezone::Local);
    assert_eq!(config.threshold, LogLevel::Error);
    assert_eq!(config.output_mode, OutputMode::Console);
}

#[test]
fn test_warning_threshold_scenario() {
    let (logger, console) = console_logger(plain().with_threshold(LogLevel::Warning));

    logger.info("x").unwrap();
    assert!(console.lines().is_empty());

    logger.warning("disk low").unwrap();
    logger.error("disk full").unwrap();
    assert_eq!(
        console.lines(),
        vec![
            (ConsoleChannel::Warn, "WARNING: disk low".to_string()),
            (ConsoleChannel::Error, "ERROR: disk full".to_string()),
        ]
    );
}

#[test]
fn test_full_decoration_with_fixed_clock() {
    let console = Arc::new(MemoryConsole::new());
    let logger = Logger::builder()
        .config(
            LoggerConfig::default()
                .with_timezone(Timezone::Utc)
                .with_threshold(LogLevel::All),
        )
        .console(console.clone())
        .clock(Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 12, 31, 18, 7, 9).unwrap()
                + chrono::Duration::milliseconds(450),
        )))
        .build()
        .unwrap();

    logger.success_with_id("deployed", "ci").unwrap();
    logger.debug("tick").unwrap();

    assert_eq!(
        console.lines(),
        vec![
            (
                ConsoleChannel::Info,
                "12/31/2024 18:07:09.450 - \x1b[32mSUCCESS(ci): deployed\x1b[0m".to_string()
            ),
            (
                ConsoleChannel::Debug,
                "12/31/2024 18:07:09.450 - \x1b[0mDEBUG: tick\x1b[0m".to_string()
            ),
        ]
    );
}

#[test]
fn test_structured_payloads() {
    #[derive(Serialize)]
    struct Request<'a> {
        method: &'a str,
        status: u16,
    }

    let (logger, console) = console_logger(plain().with_threshold(LogLevel::Info));
    logger
        .info_with_id(Json(Request { method: "GET", status: 200 }), "http")
        .unwrap();
    logger.info(serde_json::json!([1, "two", null])).unwrap();
    logger.info(3.5).unwrap();

    assert_eq!(
        console.channel_lines(ConsoleChannel::Info),
        vec![
            r#"INFO(http): {"method":"GET","status":200}"#,
            r#"INFO: [1,"two",null]"#,
            "INFO: 3.5",
        ]
    );
}

#[test]
fn test_unserializable_payload_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let (logger, console) = console_logger(plain());
    logger.set_file_sink_options(file_options(dir.path())).unwrap();
    logger.set_output_mode(OutputMode::Both).unwrap();

    let mut by_pair: HashMap<(u8, u8), &str> = HashMap::new();
    by_pair.insert((1, 2), "pair keys are not JSON object keys");

    let result = logger.error(Json(&by_pair));
    assert!(matches!(result, Err(LoggerError::Serialization(_))));
    assert!(console.lines().is_empty());
    assert!(read_lines(&dir.path().join("app.log")).is_empty());
}

#[test]
fn test_file_output_writes_lines() {
    let dir = TempDir::new().unwrap();
    let config = plain()
        .with_output_mode(OutputMode::File)
        .with_threshold(LogLevel::Info)
        .with_file_sink(file_options(dir.path()));
    let (logger, console) = console_logger(config);

    info!(logger, id: "boot", "starting {} workers", 4).unwrap();
    error!(logger, "worker {} crashed", 2).unwrap();
    logger.flush().unwrap();

    assert!(console.lines().is_empty());
    assert_eq!(
        read_lines(&dir.path().join("app.log")),
        vec!["INFO(boot): starting 4 workers", "ERROR: worker 2 crashed"]
    );
}

#[test]
fn test_both_mode_writes_identical_text() {
    let dir = TempDir::new().unwrap();
    let config = LoggerConfig::default()
        .with_output_mode(OutputMode::Both)
        .with_file_sink(file_options(dir.path()));
    let (logger, console) = console_logger(config);

    logger.error("same everywhere").unwrap();

    let console_lines = console.channel_lines(ConsoleChannel::Error);
    assert_eq!(console_lines.len(), 1);
    // Color codes and timestamp included in the file line too
    assert_eq!(read_lines(&dir.path().join("app.log")), console_lines);
}

#[test]
fn test_force_rotate_requires_file_output() {
    let logger = Logger::new();
    assert!(matches!(
        logger.force_file_rotate(),
        Err(LoggerError::FileOutputNotEnabled)
    ));
}

#[test]
fn test_force_rotate_moves_current_file() {
    let dir = TempDir::new().unwrap();
    let config = plain()
        .with_output_mode(OutputMode::File)
        .with_file_sink(file_options(dir.path()).with_max_backups(2));
    let (logger, _console) = console_logger(config);
    let log_path = dir.path().join("app.log");

    logger.error("first").unwrap();
    logger.force_file_rotate().unwrap();
    logger.error("second").unwrap();
    logger.force_file_rotate().unwrap();
    logger.error("third").unwrap();
    logger.force_file_rotate().unwrap();
    logger.error("fourth").unwrap();
    logger.flush().unwrap();

    assert_eq!(read_lines(&log_path), vec!["ERROR: fourth"]);
    assert_eq!(read_lines(&dir.path().join("app.log.1")), vec!["ERROR: third"]);
    assert_eq!(read_lines(&dir.path().join("app.log.2")), vec!["ERROR: second"]);
    // Only two backups are kept
    assert!(!dir.path().join("app.log.3").exists());
}

#[test]
fn test_size_rotation() {
    let dir = TempDir::new().unwrap();
    let options = FileSinkOptions::new(dir.path().join("sized.log"))
        .with_frequency(RotationStrategy::size(64))
        .with_max_backups(3);
    let config = plain()
        .with_output_mode(OutputMode::File)
        .with_file_sink(options);
    let (logger, _console) = console_logger(config);

    for i in 0..20 {
        logger.error(format!("message number {:02}", i)).unwrap();
    }
    logger.flush().unwrap();

    assert!(dir.path().join("sized.log.1").exists());
    let current = fs::metadata(dir.path().join("sized.log")).unwrap().len();
    assert!(current <= 64 + "ERROR: message number 00\n".len() as u64);
}

#[test]
fn test_failed_automatic_rotation_is_reported() {
    let dir = TempDir::new().unwrap();
    // A non-empty directory occupies the backup slot, so rotation cannot complete
    let blocker = dir.path().join("app.log.1");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("occupied"), "x").unwrap();

    let config = plain().with_output_mode(OutputMode::File).with_file_sink(
        file_options(dir.path())
            .with_frequency(RotationStrategy::size(20))
            .with_max_backups(1),
    );
    let (logger, _console) = console_logger(config);

    let results: Vec<_> = (0..12)
        .map(|i| logger.error(format!("long enough message {:02}", i)))
        .collect();
    logger.flush().unwrap();

    assert!(results[0].is_ok());
    for result in &results[1..] {
        assert!(
            matches!(result, Err(LoggerError::FileRotationError { .. })),
            "unexpected result: {:?}",
            result
        );
    }
    // Every line still reached the file
    let lines = read_lines(&dir.path().join("app.log"));
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[11], "ERROR: long enough message 11");
}

#[test]
fn test_compressed_backups() {
    let dir = TempDir::new().unwrap();
    let config = plain()
        .with_output_mode(OutputMode::File)
        .with_file_sink(file_options(dir.path()).with_compression(true));
    let (logger, _console) = console_logger(config);

    logger.error("to be compressed").unwrap();
    logger.force_file_rotate().unwrap();

    assert!(dir.path().join("app.log.1.gz").exists());
    assert!(!dir.path().join("app.log.1").exists());
}

#[test]
fn test_date_token_in_path() {
    let dir = TempDir::new().unwrap();
    let pattern = dir
        .path()
        .join(format!("app-{}.log", stumper::appenders::DATE_TOKEN));
    let options = FileSinkOptions::new(pattern).with_frequency(RotationStrategy::Never);
    let config = plain()
        .with_output_mode(OutputMode::File)
        .with_file_sink(options);
    let (logger, _console) = console_logger(config);

    logger.error("dated").unwrap();

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let dated = dir.path().join(format!("app-{}.log", today));
    assert_eq!(read_lines(&dated), vec!["ERROR: dated"]);
}

#[test]
fn test_switching_output_modes() {
    let dir = TempDir::new().unwrap();
    let (logger, console) = console_logger(plain());
    let log_path = dir.path().join("app.log");

    logger.set_file_sink_options(file_options(dir.path())).unwrap();
    assert!(!log_path.exists());

    logger.set_output_mode(OutputMode::File).unwrap();
    logger.error("file only").unwrap();

    logger.set_output_mode(OutputMode::Console).unwrap();
    logger.error("console only").unwrap();
    assert!(matches!(
        logger.force_file_rotate(),
        Err(LoggerError::FileOutputNotEnabled)
    ));

    assert_eq!(read_lines(&log_path), vec!["ERROR: file only"]);
    assert_eq!(
        console.channel_lines(ConsoleChannel::Error),
        vec!["ERROR: console only"]
    );
}

#[test]
fn test_set_config_rebuilds_file_sink() {
    let dir = TempDir::new().unwrap();
    let (logger, _console) = console_logger(plain());

    logger
        .set_config(
            ConfigOptions::new()
                .use_colors(false)
                .use_timestamp(false)
                .output_mode(OutputMode::File)
                .file_sink(named_options(dir.path(), "one.log")),
        )
        .unwrap();
    logger.error("into one").unwrap();

    logger
        .set_file_sink_options(named_options(dir.path(), "two.log"))
        .unwrap();
    logger.error("into two").unwrap();
    logger.flush().unwrap();

    assert_eq!(read_lines(&dir.path().join("one.log")), vec!["ERROR: into one"]);
    assert_eq!(read_lines(&dir.path().join("two.log")), vec!["ERROR: into two"]);
}

#[test]
fn test_config_options_from_json() {
    let options: ConfigOptions =
        serde_json::from_str(r#"{ "threshold": "Info", "use_colors": false }"#).unwrap();
    let (logger, console) = console_logger(plain());
    logger.set_config(options).unwrap();

    let config = logger.config();
    assert_eq!(config.threshold, LogLevel::Info);
    assert!(!config.use_colors);
    // Unset fields fall back to defaults
    assert!(config.use_timestamp);

    logger.info("now visible").unwrap();
    assert_eq!(console.lines().len(), 1);
}

#[test]
fn test_caught_values() {
    let (logger, console) = console_logger(plain().with_threshold(LogLevel::Warning));

    let parse_err = "abc".parse::<i32>().unwrap_err();
    logger.caught_error_with_id(RaisedError::from(&parse_err), "parser").unwrap();

    let boxed: Box<dyn std::error::Error + Send + Sync> = "dependency timed out".into();
    logger.caught_warning(&*boxed).unwrap();

    logger.caught_exception(&Exception::new("rate limited", 429)).unwrap();

    let errors = console.channel_lines(ConsoleChannel::Error);
    assert_eq!(errors[0], "ERROR(parser): [ParseIntError] invalid digit found in string");
    assert_eq!(errors[1], "EXCEPTION(429): rate limited");

    let warnings = console.channel_lines(ConsoleChannel::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("WARNING: "));
    assert!(warnings[0].ends_with("dependency timed out"));
}

#[test]
fn test_file_sink_open_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be opened as a log file
    let config = plain()
        .with_output_mode(OutputMode::File)
        .with_file_sink(FileSinkOptions::new(dir.path()));

    let result = Logger::with_config(config);
    assert!(matches!(result, Err(LoggerError::FileAppenderError { .. })));
}

#[test]
fn test_global_logger() {
    let logger = stumper::global();
    assert!(std::ptr::eq(logger, stumper::global()));
    // Console output only; errors pass the default threshold
    logger.error("global logger works").unwrap();
}
