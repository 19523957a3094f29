use crate::calendar::elapsed_seconds;
use crate::error::SplitError;
use crate::geo::{DistanceUnit, distance};
use crate::gpxxml::Token;
use crate::trackpoint::TrackPointExtractor;
use time::Duration;

/// Aggregate distance and elapsed time of a whole track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub distance: f64,
    pub distance_unit: DistanceUnit,
    /// Elapsed seconds.
    pub time: u64,
}

impl Split {
    /// Seconds per `unit_distance` units of distance, rounded to the nearest second.
    ///
    /// A zero-distance split has no meaningful pace; the result is then whatever the
    /// saturating float to integer conversion makes of NaN or infinity.
    pub fn average_pace(&self, unit_distance: f64) -> u64 {
        (self.time as f64 / (self.distance / unit_distance)).round() as u64
    }

    pub fn pace_per_unit(&self) -> u64 {
        self.average_pace(1.0)
    }
}

/// Sums the distance (in miles) and elapsed time between consecutive track points.
pub fn total_split<'a, I>(tokens: I) -> Result<Split, SplitError>
where
    I: Iterator<Item = Token<'a>>,
{
    total_split_in(tokens, DistanceUnit::Miles)
}

/// Like [`total_split`], measuring distance in `unit`.
///
/// A track with a single point yields a zero split. Any malformed point aborts the
/// whole computation.
pub fn total_split_in<'a, I>(tokens: I, unit: DistanceUnit) -> Result<Split, SplitError>
where
    I: Iterator<Item = Token<'a>>,
{
    let mut extractor = TrackPointExtractor::new(tokens);
    let mut previous = extractor.next_point()?.ok_or(SplitError::NoTrkpt)?;

    let radius = unit.earth_radius();
    let mut total_distance = 0.0;
    let mut total_time = 0;
    let mut count = 1usize;

    while let Some(point) = extractor.next_point()? {
        total_distance += distance(&previous.position, &point.position, radius);
        total_time += elapsed_seconds(&previous.timestamp, &point.timestamp)?;
        previous = point;
        count += 1;
    }

    tracing::debug!(
        points = count,
        distance = total_distance,
        %unit,
        seconds = total_time,
        "split complete"
    );

    Ok(Split {
        distance: total_distance,
        distance_unit: unit,
        time: total_time,
    })
}

/// Formats seconds as `H:MM:SS`, or `M:SS` below one hour.
pub fn format_clock(seconds: u64) -> String {
    let duration = Duration::seconds(i64::try_from(seconds).unwrap_or(i64::MAX));
    let hours = duration.whole_hours();
    let minutes = duration.whole_minutes() % 60;
    let secs = duration.whole_seconds() % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
