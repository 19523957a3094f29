//! GPX track point extraction and split (distance, elapsed time, pace) computation.
//!
//! ```no_run
//! use gpxsplit::{GpxTokenizer, total_split};
//!
//! let input = std::fs::read("run.gpx").unwrap();
//! let split = total_split(GpxTokenizer::new(&input)).unwrap();
//! println!("{:.2} {} in {}s", split.distance, split.distance_unit, split.time);
//! ```

pub mod calendar;
pub mod error;
pub mod geo;
pub mod gpxxml;
pub mod split;
pub mod trackpoint;

pub use calendar::{Timestamp, days_in_month, elapsed_seconds};
pub use error::SplitError;
pub use geo::{AngleUnit, DistanceUnit, GeoPoint, distance, distance_km, distance_miles};
pub use gpxxml::{GpxTokenizer, Token, TokenKind};
pub use split::{Split, format_clock, total_split, total_split_in};
pub use trackpoint::{TrackPoint, TrackPointExtractor};
