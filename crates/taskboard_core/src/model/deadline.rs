//! Deadline value type.
//!
//! # Responsibility
//! - Own the `"YYYY-MM-DD | HH:MM"` text convention in one place.
//! - Convert form input (`YYYY-MM-DDTHH:MM`) into the canonical text.
//!
//! # Invariants
//! - A `Deadline` always has zero seconds; parse(format(d)) == d.
//! - Shape is checked before calendar validity, so errors say which failed.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const CANONICAL_FORMAT: &str = "%Y-%m-%d | %H:%M";

static CANONICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2}) \| (\d{2}):(\d{2})$").expect("valid deadline regex")
});
static INPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})[T ](\d{2}):(\d{2})(?::\d{2}(?:\.\d+)?)?$")
        .expect("valid datetime-local regex")
});

/// Errors raised while reading deadline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineParseError {
    /// Text does not follow the expected layout.
    Shape(String),
    /// Layout is right but the date or time does not exist.
    OutOfRange(String),
}

impl Display for DeadlineParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape(raw) => write!(
                f,
                "deadline `{raw}` must look like `YYYY-MM-DD | HH:MM` or `YYYY-MM-DDTHH:MM`"
            ),
            Self::OutOfRange(raw) => write!(f, "deadline `{raw}` is not a valid date and time"),
        }
    }
}

impl Error for DeadlineParseError {}

/// Local, timezone-free deadline at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(NaiveDateTime);

impl Deadline {
    /// Parses the canonical `"YYYY-MM-DD | HH:MM"` text.
    pub fn parse(raw: &str) -> Result<Self, DeadlineParseError> {
        let trimmed = raw.trim();
        let caps = CANONICAL_RE
            .captures(trimmed)
            .ok_or_else(|| DeadlineParseError::Shape(trimmed.to_string()))?;
        from_captures(&caps, trimmed)
    }

    /// Parses form input: `YYYY-MM-DDTHH:MM` (seconds are dropped) or the
    /// canonical text.
    pub fn from_input(raw: &str) -> Result<Self, DeadlineParseError> {
        let trimmed = raw.trim();
        if let Some(caps) = INPUT_RE.captures(trimmed) {
            return from_captures(&caps, trimmed);
        }
        Self::parse(trimmed)
    }

    /// Builds a deadline from any date-time, truncating to the minute.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        let truncated = value
            .with_second(0)
            .and_then(|v| v.with_nanosecond(0))
            .unwrap_or(value);
        Self(truncated)
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Renders the value for a `datetime-local` style input field.
    pub fn to_input(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M").to_string()
    }
}

fn from_captures(caps: &Captures<'_>, raw: &str) -> Result<Deadline, DeadlineParseError> {
    let field = |idx: usize| -> Result<u32, DeadlineParseError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| DeadlineParseError::Shape(raw.to_string()))
    };
    let year = i32::try_from(field(1)?).map_err(|_| DeadlineParseError::OutOfRange(raw.to_string()))?;
    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .and_then(|date| date.and_hms_opt(field(4).ok()?, field(5).ok()?, 0))
        .map(Deadline)
        .ok_or_else(|| DeadlineParseError::OutOfRange(raw.to_string()))
}

impl Display for Deadline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Deadline {
    type Err = DeadlineParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDateTime> for Deadline {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_datetime(value)
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Deadline, DeadlineParseError};

    #[test]
    fn shape_errors_are_distinguished_from_calendar_errors() {
        assert!(matches!(
            Deadline::parse("2025-04-02 19:00"),
            Err(DeadlineParseError::Shape(_))
        ));
        assert!(matches!(
            Deadline::parse("2025-02-30 | 10:00"),
            Err(DeadlineParseError::OutOfRange(_))
        ));
        assert!(matches!(
            Deadline::parse("2025-04-02 | 24:00"),
            Err(DeadlineParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn input_form_drops_seconds() {
        let deadline = Deadline::from_input("2025-04-02T19:00:42").expect("input with seconds should parse");
        assert_eq!(deadline.to_string(), "2025-04-02 | 19:00");
        assert_eq!(deadline.to_input(), "2025-04-02T19:00");
    }
}
