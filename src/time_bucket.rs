//! Interval/range token resolution, compact timestamp conversion and
//! epoch-aligned bucket arithmetic.
//!
//! Callers rely on exact bucket alignment, so unknown tokens fail fast with
//! [`GraphError::InvalidArgument`] instead of silently defaulting.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{GraphError, Result};
use crate::model::{Timestamp, EPOCH};

const COMPACT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second][subsecond digits:3]Z");

const MILLIS_PER_SECOND: i64 = 1_000;

/// Fixed set of histogram bucket widths, from 30 seconds to 1 day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeInterval {
    /// `30s`
    ThirtySeconds,
    /// `1min`
    OneMinute,
    /// `5min`
    FiveMinutes,
    /// `10min`
    TenMinutes,
    /// `30min`
    ThirtyMinutes,
    /// `1hr`
    OneHour,
    /// `4hr`
    FourHours,
    /// `1days`
    OneDay,
}

impl TimeInterval {
    /// Resolves an interval token. Unenumerated tokens are rejected.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "30s" => Ok(Self::ThirtySeconds),
            "1min" => Ok(Self::OneMinute),
            "5min" => Ok(Self::FiveMinutes),
            "10min" => Ok(Self::TenMinutes),
            "30min" => Ok(Self::ThirtyMinutes),
            "1hr" => Ok(Self::OneHour),
            "4hr" => Ok(Self::FourHours),
            "1days" => Ok(Self::OneDay),
            other => Err(GraphError::InvalidArgument(format!(
                "unknown interval token `{other}`"
            ))),
        }
    }

    /// The token this interval parses from.
    pub fn token(self) -> &'static str {
        match self {
            Self::ThirtySeconds => "30s",
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::TenMinutes => "10min",
            Self::ThirtyMinutes => "30min",
            Self::OneHour => "1hr",
            Self::FourHours => "4hr",
            Self::OneDay => "1days",
        }
    }

    /// Bucket width in whole seconds.
    pub fn as_seconds(self) -> i64 {
        match self {
            Self::ThirtySeconds => 30,
            Self::OneMinute => 60,
            Self::FiveMinutes => 300,
            Self::TenMinutes => 600,
            Self::ThirtyMinutes => 1_800,
            Self::OneHour => 3_600,
            Self::FourHours => 14_400,
            Self::OneDay => 86_400,
        }
    }
}

/// Relative query window resolved against "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    /// The trailing hour.
    Hour,
    /// The trailing day.
    Day,
    /// The trailing week.
    Week,
}

impl TimeRange {
    /// Resolves a range token. Unenumerated tokens are rejected.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            other => Err(GraphError::InvalidArgument(format!(
                "unknown range token `{other}`"
            ))),
        }
    }

    /// The token this range parses from.
    pub fn token(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    /// Window length in milliseconds.
    pub fn as_millis(self) -> i64 {
        match self {
            Self::Hour => 3_600 * MILLIS_PER_SECOND,
            Self::Day => 86_400 * MILLIS_PER_SECOND,
            Self::Week => 7 * 86_400 * MILLIS_PER_SECOND,
        }
    }

    /// Cutoff timestamp for this range relative to `now`.
    pub fn cutoff_from(self, now: Timestamp) -> Timestamp {
        now - self.as_millis()
    }
}

/// Maps an optional range to a cutoff; `None` means unbounded (epoch start).
pub fn since_cutoff(range: Option<TimeRange>, now: Timestamp) -> Timestamp {
    range.map_or(EPOCH, |r| r.cutoff_from(now))
}

/// Losslessly converts a compact `YYYYMMDDThhmmssfffZ` timestamp to epoch
/// milliseconds. Malformed input is rejected, never coerced.
pub fn parse_compact_timestamp(raw: &str) -> Result<Timestamp> {
    let parsed = PrimitiveDateTime::parse(raw, COMPACT_FORMAT).map_err(|err| {
        GraphError::InvalidArgument(format!("malformed compact timestamp `{raw}`: {err}"))
    })?;
    Ok((parsed.assume_utc().unix_timestamp_nanos() / 1_000_000) as Timestamp)
}

/// Renders epoch milliseconds back into the compact wire format.
pub fn format_compact_timestamp(ts: Timestamp) -> Result<String> {
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(i128::from(ts) * 1_000_000)
        .map_err(|err| GraphError::InvalidArgument(format!("timestamp {ts} out of range: {err}")))?;
    datetime
        .format(COMPACT_FORMAT)
        .map_err(|err| GraphError::InvalidArgument(format!("timestamp {ts}: {err}")))
}

/// Epoch-aligned bucket start, in whole seconds:
/// `floor(seconds(ts) / width) * width`.
pub fn bucket_start(ts: Timestamp, width_secs: i64) -> i64 {
    let secs = ts.div_euclid(MILLIS_PER_SECOND);
    secs.div_euclid(width_secs) * width_secs
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_timestamp() -> Timestamp {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as Timestamp
}
