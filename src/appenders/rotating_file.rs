//! Rotating file sink
//!
//! The logger treats file output as an injected [`FileSink`] with two
//! operations, `write` and `rotate`. [`RotatingFileSink`] is the default
//! implementation: it appends one line per message and rotates the file by
//! size, time, or on demand, keeping a bounded number of numbered backups.

use crate::core::error::{LoggerError, Result};
use crate::core::timestamp::{SharedClock, SystemClock};
use chrono::{DateTime, Local, NaiveDate, Timelike};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Token in [`FileSinkOptions::path`] replaced by the local date (`YYYY-MM-DD`)
pub const DATE_TOKEN: &str = "%DATE%";

/// Destination for formatted log lines on disk
pub trait FileSink: Send {
    /// Append one formatted message
    fn write(&mut self, text: &str) -> Result<()>;

    /// Rotate the backing file; `force` rotates even if the strategy says not yet
    fn rotate(&mut self, force: bool) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

/// Rotation frequency
///
/// # Examples
///
/// ```
/// use stumper::appenders::RotationStrategy;
/// use std::time::Duration;
///
/// // Rotate when file exceeds 100 MB
/// let size_strategy = RotationStrategy::Size { max_bytes: 100 * 1024 * 1024 };
///
/// // Rotate daily at midnight
/// let daily_strategy = RotationStrategy::Daily { hour: 0 };
///
/// // Rotate on size OR time, whichever comes first
/// let hybrid_strategy = RotationStrategy::Hybrid {
///     max_bytes: 50 * 1024 * 1024,
///     interval: Duration::from_secs(24 * 3600),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationStrategy {
    /// Rotate when file exceeds size in bytes
    Size { max_bytes: u64 },

    /// Rotate at time interval
    Time { interval: Duration },

    /// Rotate daily at specified hour (0-23)
    Daily { hour: u8 },

    /// Rotate hourly
    Hourly,

    /// Rotate on size OR time, whichever comes first
    Hybrid { max_bytes: u64, interval: Duration },

    /// Only rotate when forced
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Daily { hour: 0 }
    }
}

impl RotationStrategy {
    #[must_use]
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    #[must_use]
    pub fn time(interval: Duration) -> Self {
        RotationStrategy::Time { interval }
    }

    /// Create a daily rotation strategy
    ///
    /// # Panics
    ///
    /// Panics if hour is greater than 23
    #[must_use]
    pub fn daily(hour: u8) -> Self {
        assert!(hour <= 23, "Hour must be between 0 and 23");
        RotationStrategy::Daily { hour }
    }
}

/// Options a file sink is built from
///
/// # Examples
///
/// ```
/// use stumper::appenders::{FileSinkOptions, RotationStrategy};
///
/// let options = FileSinkOptions::new("logs/%DATE%.log")
///     .with_frequency(RotationStrategy::size(5 * 1024 * 1024))
///     .with_max_backups(3)
///     .with_verbose(true);
/// assert_eq!(options.max_backups, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkOptions {
    /// Target path; may contain [`DATE_TOKEN`]
    pub path: PathBuf,
    /// When to rotate
    pub frequency: RotationStrategy,
    /// Number of rotated files to keep
    pub max_backups: usize,
    /// Report rotations on stderr
    pub verbose: bool,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for FileSinkOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs/stumper.log"),
            frequency: RotationStrategy::default(),
            max_backups: 7,
            verbose: false,
            compress: false,
        }
    }
}

impl FileSinkOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_frequency(mut self, frequency: RotationStrategy) -> Self {
        self.frequency = frequency;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// The concrete path for `now`, with [`DATE_TOKEN`] substituted
    pub fn resolve_path(&self, now: &DateTime<Local>) -> PathBuf {
        let raw = self.path.to_string_lossy();
        if raw.contains(DATE_TOKEN) {
            PathBuf::from(raw.replace(DATE_TOKEN, &now.format("%Y-%m-%d").to_string()))
        } else {
            self.path.clone()
        }
    }

    /// Directory, file name prefix and suffix around [`DATE_TOKEN`].
    ///
    /// `None` unless the token appears in the file name itself.
    fn date_pattern(&self) -> Option<(PathBuf, &str, &str)> {
        let file_name = self.path.file_name()?.to_str()?;
        let (prefix, suffix) = file_name.split_once(DATE_TOKEN)?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Some((dir, prefix, suffix))
    }
}

/// Match `name` against a dated pattern: `{prefix}{YYYY-MM-DD}{suffix}`,
/// optionally followed by `.N` and `.gz`. Returns the date and backup index
/// (0 for the dated file itself).
fn parse_generation<'n>(name: &'n str, prefix: &str, suffix: &str) -> Option<(&'n str, usize)> {
    let rest = name.strip_prefix(prefix)?;
    let date = rest.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let tail = rest.get(10..)?.strip_prefix(suffix)?;
    let tail = tail.strip_suffix(".gz").unwrap_or(tail);
    if tail.is_empty() {
        return Some((date, 0));
    }
    let index = tail.strip_prefix('.')?.parse().ok()?;
    Some((date, index))
}

const MAX_DELETION_FAILURES: usize = 5;

/// File sink with size/time based rotation and numbered backups
///
/// # Examples
///
/// ```no_run
/// use stumper::appenders::{FileSink, FileSinkOptions, RotatingFileSink, RotationStrategy};
///
/// let options = FileSinkOptions::new("/var/log/app.log")
///     .with_frequency(RotationStrategy::Hourly)
///     .with_max_backups(24);
/// let mut sink = RotatingFileSink::new(options).unwrap();
/// sink.write("INFO: service started").unwrap();
/// ```
pub struct RotatingFileSink {
    options: FileSinkOptions,
    base_path: PathBuf,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    /// Timestamp of the last rotation (used for time-based strategies)
    last_rotation: SystemTime,
    /// Counter for consecutive deletion failures (reset on successful deletion)
    deletion_failure_count: usize,
    /// Source of the date substituted into the path
    clock: SharedClock,
}

impl RotatingFileSink {
    /// Open (or create) the target file
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new(options: FileSinkOptions) -> Result<Self> {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new), reading the date for [`DATE_TOKEN`] from `clock`
    pub fn with_clock(options: FileSinkOptions, clock: SharedClock) -> Result<Self> {
        let base_path = options.resolve_path(&clock.now().with_timezone(&Local));

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size, last_rotation) = Self::open_file(&base_path)?;

        Ok(Self {
            options,
            base_path,
            writer: Some(BufWriter::new(file)),
            current_size,
            last_rotation,
            deletion_failure_count: 0,
            clock,
        })
    }

    fn current_target(&self) -> PathBuf {
        self.options
            .resolve_path(&self.clock.now().with_timezone(&Local))
    }

    fn open_file(path: &Path) -> Result<(File, u64, SystemTime)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let metadata = file.metadata().map_err(|e| {
            LoggerError::file_appender(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?;
        let size = metadata.len();
        // File modification time stands in for the last rotation
        let last_rotation = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        Ok((file, size, last_rotation))
    }

    fn elapsed_since_rotation(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.last_rotation)
            .unwrap_or(Duration::ZERO)
    }

    /// Check if rotation is needed based on the configured strategy
    fn should_rotate(&self) -> bool {
        // A dated path moves to a new file once the date changes
        if self.options.date_pattern().is_some() && self.current_target() != self.base_path {
            return true;
        }

        match &self.options.frequency {
            RotationStrategy::Never => false,

            RotationStrategy::Size { max_bytes } => self.current_size >= *max_bytes,

            RotationStrategy::Time { interval } => self.elapsed_since_rotation() >= *interval,

            RotationStrategy::Daily { hour } => {
                let now: DateTime<Local> = SystemTime::now().into();
                let last: DateTime<Local> = self.last_rotation.into();
                now.date_naive() != last.date_naive() && now.hour() >= u32::from(*hour)
            }

            RotationStrategy::Hourly => self.elapsed_since_rotation() >= Duration::from_secs(3600),

            RotationStrategy::Hybrid { max_bytes, interval } => {
                self.current_size >= *max_bytes || self.elapsed_since_rotation() >= *interval
            }
        }
    }

    /// Move the current file to `.1`, shift older backups, and open a fresh file
    fn perform_rotation(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let next_base = self.current_target();
        let retired = if next_base == self.base_path {
            self.shift_backups()?
        } else {
            // The date changed: the finished file keeps its dated name
            if self.options.compress && self.base_path.exists() {
                compress_file(&self.base_path)?;
                gz_path(&self.base_path)
            } else {
                self.base_path.clone()
            }
        };

        self.base_path = next_base;
        if self.options.date_pattern().is_some() {
            self.prune_dated_generations()?;
        }

        let (file, size, _) = Self::open_file(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        self.last_rotation = SystemTime::now();

        if self.options.verbose {
            eprintln!(
                "[INFO] Rotated log file {} (backup: {})",
                self.base_path.display(),
                retired.display()
            );
        }

        Ok(())
    }

    /// Move the current file to `.1` and shift older backups up by one.
    ///
    /// Returns the path the current file was moved to.
    fn shift_backups(&mut self) -> Result<PathBuf> {
        self.remove_oldest_backup()?;

        for i in (1..self.options.max_backups).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);
            let old_compressed = gz_path(&old_path);

            let shifted = if old_compressed.exists() {
                rename_replacing(&old_compressed, &gz_path(&new_path))
            } else if old_path.exists() {
                rename_replacing(&old_path, &new_path)
            } else {
                Ok(())
            };
            shifted.map_err(|e| {
                LoggerError::file_rotation(
                    old_path.display().to_string(),
                    format!("Failed to rotate backup files: {}", e),
                )
            })?;
        }

        let backup_path = self.backup_path(1);
        if self.options.max_backups == 0 {
            if self.base_path.exists() {
                fs::remove_file(&self.base_path).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to discard current log file: {}", e),
                    )
                })?;
            }
        } else if self.base_path.exists() {
            fs::rename(&self.base_path, &backup_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.options.compress {
                compress_file(&backup_path)?;
                return Ok(gz_path(&backup_path));
            }
        }
        Ok(backup_path)
    }

    /// Apply `max_backups` across every date of a dated path.
    ///
    /// Dated files and their numbered backups all count; the newest are kept,
    /// ordered by date and then by backup index.
    fn prune_dated_generations(&mut self) -> Result<()> {
        let Some((dir, prefix, suffix)) = self.options.date_pattern() else {
            return Ok(());
        };
        let current_name = self.base_path.file_name().map(|n| n.to_os_string());

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log directory",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut generations: Vec<(String, usize, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| Some(entry.file_name()) != current_name)
            .filter_map(|entry| {
                let name = entry.file_name();
                let (date, index) = parse_generation(name.to_str()?, prefix, suffix)?;
                Some((date.to_string(), index, entry.path()))
            })
            .collect();
        generations.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut deletion_failed = false;
        for (_, _, path) in generations.into_iter().skip(self.options.max_backups) {
            if let Err(e) = fs::remove_file(&path) {
                deletion_failed = true;
                eprintln!(
                    "[WARN] Failed to remove expired log file {}: {} (failure #{}/{})",
                    path.display(),
                    e,
                    self.deletion_failure_count + 1,
                    MAX_DELETION_FAILURES
                );
            }
        }
        self.record_deletion_outcome(deletion_failed)
    }

    /// Delete the backup that would exceed the retention count
    fn remove_oldest_backup(&mut self) -> Result<()> {
        if self.options.max_backups == 0 {
            return Ok(());
        }
        let oldest = self.backup_path(self.options.max_backups);
        let mut deletion_failed = false;

        for candidate in [gz_path(&oldest), oldest] {
            if candidate.exists() {
                if let Err(e) = fs::remove_file(&candidate) {
                    deletion_failed = true;
                    eprintln!(
                        "[WARN] Failed to remove oldest backup {}: {} (failure #{}/{})",
                        candidate.display(),
                        e,
                        self.deletion_failure_count + 1,
                        MAX_DELETION_FAILURES
                    );
                }
            }
        }

        self.record_deletion_outcome(deletion_failed)
    }

    /// Reset or advance the consecutive deletion failure counter.
    ///
    /// Fails once the counter reaches [`MAX_DELETION_FAILURES`].
    fn record_deletion_outcome(&mut self, failed: bool) -> Result<()> {
        if !failed {
            self.deletion_failure_count = 0;
            return Ok(());
        }

        self.deletion_failure_count += 1;
        if self.deletion_failure_count >= MAX_DELETION_FAILURES {
            return Err(LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!(
                    "Rotation aborted: failed to delete old backup files {} consecutive times",
                    self.deletion_failure_count
                ),
            ));
        }
        Ok(())
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("stumper.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn append_line(&mut self, text: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_appender(self.base_path.display().to_string(), "Writer not initialized")
        })?;

        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush())
            .map_err(|e| LoggerError::sink_io("file", e))?;
        self.current_size += text.len() as u64 + 1;
        Ok(())
    }

    /// Reopen the active file after a failed rotation left no writer
    fn recover_writer(&mut self) -> Result<()> {
        if self.writer.is_some() {
            return Ok(());
        }
        let (file, size, last_rotation) = Self::open_file(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        self.last_rotation = last_rotation;
        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Path of the file currently written to
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn options(&self) -> &FileSinkOptions {
        &self.options
    }

    #[must_use]
    pub fn last_rotation(&self) -> SystemTime {
        self.last_rotation
    }
}

impl FileSink for RotatingFileSink {
    /// Append `text`, rotating first when due.
    ///
    /// A failed rotation does not lose the line: the current file is reopened,
    /// the line written, and the rotation error returned.
    fn write(&mut self, text: &str) -> Result<()> {
        let mut failures = Vec::new();

        if self.should_rotate() {
            if let Err(e) = self.perform_rotation() {
                if let Err(reopen_err) = self.recover_writer() {
                    return LoggerError::aggregate(vec![e, reopen_err]);
                }
                // Prevent a rotation attempt on every subsequent write
                self.current_size = 0;
                self.last_rotation = SystemTime::now();
                failures.push(e);
            }
        }

        if let Err(e) = self.append_line(text) {
            failures.push(e);
        }
        LoggerError::aggregate(failures)
    }

    fn rotate(&mut self, force: bool) -> Result<()> {
        if force || self.should_rotate() {
            self.perform_rotation()
        } else {
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| LoggerError::sink_io("file", e))?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating-file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            // Best effort flush - ignore errors during drop
            let _ = writer.flush();
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Rename, removing the destination first on platforms where rename does not replace
fn rename_replacing(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            if to.exists() {
                let _ = fs::remove_file(to);
            }
            fs::rename(from, to)
        }
    }
}

/// Gzip `path` next to itself and remove the original once compression succeeded
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let final_path = gz_path(path);
    let mut temp_name = final_path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let compress = || -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_path)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp_path, &final_path)
    };

    if let Err(e) = compress() {
        let _ = fs::remove_file(&temp_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[derive(Debug, Default)]
struct MemoryFileState {
    writes: Vec<String>,
    rotations: Vec<bool>,
    flushes: usize,
    fail_writes: bool,
    fail_rotations: bool,
}

/// In-memory sink that records writes and rotation requests.
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to a logger.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSink {
    state: Arc<Mutex<MemoryFileState>>,
}

impl MemoryFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.lock().writes.clone()
    }

    /// `force` flag of every rotate call, in order
    pub fn rotations(&self) -> Vec<bool> {
        self.state.lock().rotations.clone()
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    /// Make subsequent writes fail with an IO error
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Make subsequent rotations fail with an IO error
    pub fn set_fail_rotations(&self, fail: bool) {
        self.state.lock().fail_rotations = fail;
    }
}

impl FileSink for MemoryFileSink {
    fn write(&mut self, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(LoggerError::sink_io(
                "file",
                io::Error::new(io::ErrorKind::Other, "simulated write failure"),
            ));
        }
        state.writes.push(text.to_string());
        Ok(())
    }

    fn rotate(&mut self, force: bool) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_rotations {
            return Err(LoggerError::file_rotation("memory", "simulated rotation failure"));
        }
        state.rotations.push(force);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.state.lock().flushes += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::thread;
    use tempfile::tempdir;

    fn count_files(dir: &Path, prefix: &str) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap().starts_with(prefix))
            .count()
    }

    #[test]
    fn test_strategy_constructors() {
        assert_eq!(RotationStrategy::size(1024), RotationStrategy::Size { max_bytes: 1024 });
        assert_eq!(
            RotationStrategy::time(Duration::from_secs(3600)),
            RotationStrategy::Time {
                interval: Duration::from_secs(3600)
            }
        );
        assert_eq!(RotationStrategy::daily(2), RotationStrategy::Daily { hour: 2 });
        assert_eq!(RotationStrategy::default(), RotationStrategy::Daily { hour: 0 });
    }

    #[test]
    #[should_panic(expected = "Hour must be between 0 and 23")]
    fn test_daily_strategy_invalid_hour() {
        let _ = RotationStrategy::daily(24);
    }

    #[test]
    fn test_options_builder() {
        let options = FileSinkOptions::new("app.log")
            .with_frequency(RotationStrategy::Hourly)
            .with_max_backups(3)
            .with_verbose(true)
            .with_compression(true);

        assert_eq!(options.path, PathBuf::from("app.log"));
        assert_eq!(options.frequency, RotationStrategy::Hourly);
        assert_eq!(options.max_backups, 3);
        assert!(options.verbose);
        assert!(options.compress);
    }

    #[test]
    fn test_resolve_date_pattern() {
        let options = FileSinkOptions::new("logs/%DATE%.log");
        let now = Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(options.resolve_path(&now), PathBuf::from("logs/2024-03-09.log"));

        let plain = FileSinkOptions::new("logs/app.log");
        assert_eq!(plain.resolve_path(&now), PathBuf::from("logs/app.log"));
    }

    #[test]
    fn test_sink_creation_makes_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("test.log");

        let sink = RotatingFileSink::new(FileSinkOptions::new(&log_path)).unwrap();
        assert_eq!(sink.path(), log_path);
        assert_eq!(sink.current_size(), 0);
        assert!(log_path.exists());
    }

    #[test]
    fn test_write_appends_lines() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("lines.log");

        let mut sink = RotatingFileSink::new(FileSinkOptions::new(&log_path)).unwrap();
        sink.write("ERROR: first").unwrap();
        sink.write("INFO: second").unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content, "ERROR: first\nINFO: second\n");
        assert_eq!(sink.current_size(), content.len() as u64);
    }

    #[test]
    fn test_size_based_rotation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::size(100))
            .with_max_backups(3);

        let mut sink = RotatingFileSink::new(options).unwrap();
        for i in 0..20 {
            sink.write(&format!("Test message number {}", i)).unwrap();
        }

        assert!(log_path.with_file_name("rotation.log.1").exists());
    }

    #[test]
    fn test_time_based_rotation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("time_rotation.log");
        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::time(Duration::from_millis(50)))
            .with_max_backups(3);

        let mut sink = RotatingFileSink::new(options).unwrap();
        sink.write("Initial message").unwrap();

        thread::sleep(Duration::from_millis(80));
        sink.write("After interval").unwrap();

        assert!(log_path.with_file_name("time_rotation.log.1").exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "After interval\n");
    }

    #[test]
    fn test_never_strategy_only_rotates_when_forced() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("never.log");
        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::Never)
            .with_max_backups(3);

        let mut sink = RotatingFileSink::new(options).unwrap();
        for i in 0..100 {
            sink.write(&format!("Test message number {}", i)).unwrap();
        }
        sink.rotate(false).unwrap();
        assert!(!log_path.with_file_name("never.log.1").exists());

        sink.rotate(true).unwrap();
        assert!(log_path.with_file_name("never.log.1").exists());
        assert_eq!(sink.current_size(), 0);
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_retention_limit() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::size(50))
            .with_max_backups(2);

        let mut sink = RotatingFileSink::new(options).unwrap();
        for i in 0..100 {
            sink.write(&format!("Entry {}", i)).unwrap();
        }

        // current + 2 backups
        assert!(count_files(dir.path(), "multi.log") <= 3);
        assert!(!log_path.with_file_name("multi.log.3").exists());
    }

    #[test]
    fn test_forced_rotation_shifts_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("shift.log");
        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::Never)
            .with_max_backups(3);

        let mut sink = RotatingFileSink::new(options).unwrap();
        sink.write("one").unwrap();
        sink.rotate(true).unwrap();
        sink.write("two").unwrap();
        sink.rotate(true).unwrap();
        sink.write("three").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "three\n");
        assert_eq!(fs::read_to_string(log_path.with_file_name("shift.log.1")).unwrap(), "two\n");
        assert_eq!(fs::read_to_string(log_path.with_file_name("shift.log.2")).unwrap(), "one\n");
    }

    #[test]
    fn test_compressed_rotation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("gz.log");
        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::Never)
            .with_compression(true);

        let mut sink = RotatingFileSink::new(options).unwrap();
        sink.write("compress me").unwrap();
        sink.rotate(true).unwrap();

        assert!(log_path.with_file_name("gz.log.1.gz").exists());
        assert!(!log_path.with_file_name("gz.log.1").exists());
    }

    /// Clock that only moves when told to
    struct SteppingClock(Mutex<DateTime<chrono::Utc>>);

    impl SteppingClock {
        fn starting(instant: DateTime<chrono::Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(instant)))
        }

        fn advance_days(&self, days: i64) {
            let mut now = self.0.lock();
            *now += chrono::Duration::days(days);
        }

        fn local_date(&self) -> String {
            self.0.lock().with_timezone(&Local).format("%Y-%m-%d").to_string()
        }
    }

    impl crate::core::timestamp::Clock for SteppingClock {
        fn now(&self) -> DateTime<chrono::Utc> {
            *self.0.lock()
        }
    }

    #[test]
    fn test_parse_generation() {
        assert_eq!(
            parse_generation("app-2024-06-15.log", "app-", ".log"),
            Some(("2024-06-15", 0))
        );
        assert_eq!(
            parse_generation("app-2024-06-15.log.2.gz", "app-", ".log"),
            Some(("2024-06-15", 2))
        );
        assert_eq!(parse_generation("app-latest.log", "app-", ".log"), None);
        assert_eq!(parse_generation("app-2024-06-15.logx", "app-", ".log"), None);
        assert_eq!(parse_generation("other-2024-06-15.log", "app-", ".log"), None);
    }

    #[test]
    fn test_date_change_prunes_earlier_dates() {
        let dir = tempdir().unwrap();
        let clock = SteppingClock::starting(chrono::Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let options = FileSinkOptions::new(dir.path().join("app-%DATE%.log"))
            .with_frequency(RotationStrategy::Never)
            .with_max_backups(2);

        let mut sink = RotatingFileSink::with_clock(options, clock.clone()).unwrap();
        let mut dates = Vec::new();
        for day in 0..5 {
            dates.push(clock.local_date());
            sink.write(&format!("day {}", day)).unwrap();
            clock.advance_days(1);
        }
        dates.push(clock.local_date());
        sink.write("day 5").unwrap();

        let dated = |i: usize| dir.path().join(format!("app-{}.log", dates[i]));
        assert_eq!(sink.path(), dated(5));
        assert_eq!(count_files(dir.path(), "app-"), 3);
        for expired in 0..3 {
            assert!(!dated(expired).exists(), "{} should be pruned", dates[expired]);
        }
        assert_eq!(fs::read_to_string(dated(3)).unwrap(), "day 3\n");
        assert_eq!(fs::read_to_string(dated(4)).unwrap(), "day 4\n");
        assert_eq!(fs::read_to_string(dated(5)).unwrap(), "day 5\n");
    }

    #[test]
    fn test_date_change_counts_numbered_backups() {
        let dir = tempdir().unwrap();
        let clock = SteppingClock::starting(chrono::Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let options = FileSinkOptions::new(dir.path().join("%DATE%.log"))
            .with_frequency(RotationStrategy::Never)
            .with_max_backups(1);

        let mut sink = RotatingFileSink::with_clock(options, clock.clone()).unwrap();
        let first_day = dir.path().join(format!("{}.log", clock.local_date()));
        sink.write("a").unwrap();
        sink.rotate(true).unwrap();
        sink.write("b").unwrap();
        assert!(first_day.with_extension("log.1").exists());

        clock.advance_days(1);
        sink.write("c").unwrap();

        let second_day = dir.path().join(format!("{}.log", clock.local_date()));
        assert_eq!(fs::read_to_string(&second_day).unwrap(), "c\n");
        assert_eq!(fs::read_to_string(&first_day).unwrap(), "b\n");
        assert!(!first_day.with_extension("log.1").exists());
    }

    #[test]
    fn test_failed_rotation_keeps_line_and_reports_error() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("blocked.log");
        // A non-empty directory where the first backup belongs
        let blocker = dir.path().join("blocked.log.1");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let options = FileSinkOptions::new(&log_path)
            .with_frequency(RotationStrategy::size(20))
            .with_max_backups(1);
        let mut sink = RotatingFileSink::new(options).unwrap();

        sink.write("first line over twenty bytes").unwrap();
        let result = sink.write("second line");
        assert!(
            matches!(result, Err(LoggerError::FileRotationError { .. })),
            "unexpected result: {:?}",
            result
        );

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content, "first line over twenty bytes\nsecond line\n");
        assert!(blocker.join("keep").exists());
    }

    #[test]
    fn test_options_serde_defaults() {
        let options: FileSinkOptions =
            serde_json::from_str(r#"{"path": "x.log", "max_backups": 2}"#).expect("deserialize");
        assert_eq!(options.path, PathBuf::from("x.log"));
        assert_eq!(options.max_backups, 2);
        assert_eq!(options.frequency, RotationStrategy::Daily { hour: 0 });
        assert!(!options.verbose);
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemoryFileSink::new();
        let mut handle: Box<dyn FileSink> = Box::new(sink.clone());

        handle.write("a").unwrap();
        handle.rotate(true).unwrap();
        handle.flush().unwrap();

        assert_eq!(sink.writes(), vec!["a"]);
        assert_eq!(sink.rotations(), vec![true]);
        assert_eq!(sink.flush_count(), 1);

        sink.set_fail_writes(true);
        assert!(matches!(handle.write("b"), Err(LoggerError::SinkIo { .. })));
        assert_eq!(sink.writes().len(), 1);
    }
}
