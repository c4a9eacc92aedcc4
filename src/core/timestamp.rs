//! Timestamp formatting utilities
//!
//! Log lines carry a `M/D/YYYY H:MM:SS.mmm` timestamp: month, day, hour and
//! millisecond unpadded, minute and second padded to two digits. The current
//! instant comes from a [`Clock`] so output can be pinned in tests.

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which calendar the timestamp fields are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timezone {
    /// The host's local time
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
///
/// # Examples
///
/// ```
/// use stumper::core::timestamp::{Clock, FixedClock, Timezone, format_timestamp};
/// use chrono::{TimeZone, Utc};
///
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 5, 3, 4, 5).unwrap());
/// assert_eq!(format_timestamp(&clock.now(), Timezone::Utc), "1/5/2024 3:04:05.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock handle shared between a logger and its builder
pub type SharedClock = Arc<dyn Clock>;

/// Format `instant` in the given timezone.
#[must_use]
pub fn format_timestamp(instant: &DateTime<Utc>, timezone: Timezone) -> String {
    match timezone {
        Timezone::Local => format_fields(&instant.with_timezone(&Local)),
        Timezone::Utc => format_fields(instant),
    }
}

fn format_fields<T: Datelike + Timelike>(time: &T) -> String {
    // Leap seconds report nanoseconds >= 1_000_000_000
    let millis = (time.nanosecond() / 1_000_000) % 1000;
    format!(
        "{}/{}/{} {}:{:02}:{:02}.{}",
        time.month(),
        time.day(),
        time.year(),
        time.hour(),
        time.minute(),
        time.second(),
        millis
    )
}
