//! Calendar time on the UTC axis.
//!
//! `CalendarTime` is the externally visible time representation. Geometry runs
//! on plain Unix seconds; conversion goes through `from_unix_seconds` and
//! `unix_seconds` only, with nanosecond resolution and no local offsets.

use std::fmt;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// ISOT rendering with millisecond digits, e.g. `2006-03-01T21:47:26.000`.
const ISOT_OUT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]");

/// ISOT input; fractional seconds and a trailing `Z` are optional.
const ISOT_IN: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][optional [Z]]"
);

/// Errors converting between numeric seconds, strings and calendar time.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeError {
    /// NaN or infinite seconds value.
    NonFinite(f64),
    /// Seconds value outside the representable calendar range.
    OutOfRange(f64),
    /// String is not an ISOT timestamp.
    Parse { input: String, reason: String },
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::NonFinite(v) => write!(f, "time value {v} is not finite"),
            TimeError::OutOfRange(v) => {
                write!(f, "time value {v} s is outside the calendar range")
            }
            TimeError::Parse { input, reason } => {
                write!(f, "cannot parse {input:?} as an ISOT timestamp: {reason}")
            }
        }
    }
}

impl std::error::Error for TimeError {}

/// An absolute UTC instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarTime(OffsetDateTime);

impl CalendarTime {
    /// Instant at `secs` seconds after 1970-01-01T00:00:00 UTC.
    ///
    /// The fractional part is rounded to the nearest nanosecond.
    pub fn from_unix_seconds(secs: f64) -> Result<Self, TimeError> {
        if !secs.is_finite() {
            return Err(TimeError::NonFinite(secs));
        }
        // Split before scaling: `secs * 1e9` would lose the sub-microsecond digits.
        let whole = secs.floor();
        let frac_ns = ((secs - whole) * 1e9).round() as i128;
        let total = (whole as i128)
            .checked_mul(NANOS_PER_SECOND)
            .and_then(|ns| ns.checked_add(frac_ns))
            .ok_or(TimeError::OutOfRange(secs))?;
        OffsetDateTime::from_unix_timestamp_nanos(total)
            .map(Self)
            .map_err(|_| TimeError::OutOfRange(secs))
    }

    /// Seconds since the Unix epoch.
    #[inline]
    pub fn unix_seconds(&self) -> f64 {
        self.0.unix_timestamp() as f64 + f64::from(self.0.nanosecond()) * 1e-9
    }

    /// Parse an ISOT string (`YYYY-MM-DDTHH:MM:SS[.fff][Z]`), read as UTC.
    pub fn parse_isot(input: &str) -> Result<Self, TimeError> {
        PrimitiveDateTime::parse(input.trim(), ISOT_IN)
            .map(|dt| Self(dt.assume_utc()))
            .map_err(|e| TimeError::Parse {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Shift by a signed duration; `None` on calendar overflow.
    #[inline]
    pub fn offset_by(self, d: Duration) -> Option<Self> {
        self.0.checked_add(d).map(Self)
    }

    #[inline]
    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for CalendarTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.to_offset(time::UtcOffset::UTC))
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(ISOT_OUT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
