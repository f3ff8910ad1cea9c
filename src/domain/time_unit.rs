//! Time unit granularity for the submission window.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Granularity of the rolling window. One unit is the gate interval.
///
/// Parses case-insensitively, so `"SECONDS"`, `"seconds"` and `"Seconds"`
/// are all accepted.
///
/// # Example
/// ```
/// use registry_throttle::TimeUnit;
/// use std::time::Duration;
///
/// let unit: TimeUnit = "minutes".parse().unwrap();
/// assert_eq!(unit.one(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeUnit {
    /// One nanosecond
    Nanoseconds,
    /// One microsecond
    Microseconds,
    /// One millisecond
    Milliseconds,
    /// One second
    Seconds,
    /// 60 seconds
    Minutes,
    /// 3600 seconds
    Hours,
    /// 86400 seconds
    Days,
}

impl TimeUnit {
    /// Duration of a single unit.
    pub fn one(&self) -> Duration {
        self.times(1)
    }

    /// Duration of `count` units.
    pub fn times(&self, count: u32) -> Duration {
        let count = u64::from(count);
        match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(count),
            TimeUnit::Microseconds => Duration::from_micros(count),
            TimeUnit::Milliseconds => Duration::from_millis(count),
            TimeUnit::Seconds => Duration::from_secs(count),
            TimeUnit::Minutes => Duration::from_secs(count * 60),
            TimeUnit::Hours => Duration::from_secs(count * 3_600),
            TimeUnit::Days => Duration::from_secs(count * 86_400),
        }
    }

    /// Upper-case configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "NANOSECONDS",
            TimeUnit::Microseconds => "MICROSECONDS",
            TimeUnit::Milliseconds => "MILLISECONDS",
            TimeUnit::Seconds => "SECONDS",
            TimeUnit::Minutes => "MINUTES",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Days => "DAYS",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a time unit name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time unit `{0}`")]
pub struct ParseTimeUnitError(String);

impl FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NANOSECONDS" => Ok(TimeUnit::Nanoseconds),
            "MICROSECONDS" => Ok(TimeUnit::Microseconds),
            "MILLISECONDS" => Ok(TimeUnit::Milliseconds),
            "SECONDS" => Ok(TimeUnit::Seconds),
            "MINUTES" => Ok(TimeUnit::Minutes),
            "HOURS" => Ok(TimeUnit::Hours),
            "DAYS" => Ok(TimeUnit::Days),
            _ => Err(ParseTimeUnitError(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = ParseTimeUnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.as_str().to_string()
    }
}
