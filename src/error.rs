use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitError {
    #[error("no trkpt element found")]
    NoTrkpt,
    /// Reserved for track points whose `<time>` child is missing. Nothing raises it
    /// while `<time>` is mandatory.
    #[error("trkpt has no time element")]
    NoTime,
    #[error("invalid datetime")]
    InvalidDatetime,
    #[error("invalid trkpt element")]
    InvalidTrkpt,
    /// Reserved for rejecting out-of-order timestamps. Elapsed time is currently
    /// taken as an absolute value instead.
    #[error("second timestamp is before the first")]
    SecondTimeBeforeFirst,
}
