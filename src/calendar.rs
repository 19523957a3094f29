use crate::error::SplitError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar fields of a GPX `<time>` value such as `2023-01-01T10:00:00Z`.
///
/// No range checks are applied to the fields; `2023-13-45T99:00:00` parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Timestamp {
    /// Parses the fixed layout `YYYY-MM-DDTHH:MM:SS` with an optional trailing byte
    /// (normally `Z`).
    ///
    /// Fields are sliced at fixed offsets. The separator bytes are never inspected.
    pub fn parse(bytes: &[u8]) -> Result<Self, SplitError> {
        if bytes.len() != 19 && bytes.len() != 20 {
            tracing::debug!(len = bytes.len(), "timestamp has wrong length");
            return Err(SplitError::InvalidDatetime);
        }

        Ok(Timestamp {
            year: parse_digits(&bytes[0..4])?,
            month: parse_digits(&bytes[5..7])?,
            day: parse_digits(&bytes[8..10])?,
            hour: parse_digits(&bytes[11..13])?,
            minute: parse_digits(&bytes[14..16])?,
            second: parse_digits(&bytes[17..19])?,
        })
    }
}

impl FromStr for Timestamp {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s.as_bytes())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn parse_digits(slice: &[u8]) -> Result<u32, SplitError> {
    slice.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(SplitError::InvalidDatetime)
        }
    })
}

/// Proleptic Gregorian leap year rule.
pub fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: u32, month: u32) -> Result<u32, SplitError> {
    match month {
        2 if is_leap_year(year) => Ok(29),
        1..=12 => Ok(DAYS_IN_MONTH[month as usize - 1]),
        _ => Err(SplitError::InvalidDatetime),
    }
}

/// Absolute number of seconds between two timestamps.
///
/// Each calendar field contributes its own linear term instead of both values being
/// converted to an epoch offset. The month term is sized by the earlier timestamp's
/// month and the leap-day term counts every fourth year, so the result is only exact
/// for timestamps that are close together, which is the case for consecutive track
/// points.
///
/// The earlier timestamp (compared field by field) is always taken as the starting
/// point, so `elapsed_seconds(a, b) == elapsed_seconds(b, a)`. That includes the
/// month-length lookup: its month must be in `1..=12`, otherwise the call fails with
/// [`SplitError::InvalidDatetime`]. An out-of-range month on the later timestamp is
/// only used as a difference and is not rejected.
pub fn elapsed_seconds(a: &Timestamp, b: &Timestamp) -> Result<u64, SplitError> {
    let (from, to) = match a.cmp(b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let delta = |to: u32, from: u32| i64::from(to) - i64::from(from);
    let leap_days = |year: u32| (i64::from(year) + 3).div_euclid(4);

    let years = delta(to.year, from.year) * 365 * SECONDS_PER_DAY;
    let leap = (leap_days(to.year) - leap_days(from.year)) * SECONDS_PER_DAY;
    let months = delta(to.month, from.month)
        * i64::from(days_in_month(from.year, from.month)?)
        * SECONDS_PER_DAY;
    let days = delta(to.day, from.day) * SECONDS_PER_DAY;
    let hours = delta(to.hour, from.hour) * SECONDS_PER_HOUR;
    let minutes = delta(to.minute, from.minute) * SECONDS_PER_MINUTE;
    let seconds = delta(to.second, from.second);

    Ok((years + leap + months + days + hours + minutes + seconds).unsigned_abs())
}
