use crate::calendar::Timestamp;
use crate::error::SplitError;
use crate::geo::GeoPoint;
use crate::gpxxml::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub position: GeoPoint,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingTrkpt,
    ExpectLatKey,
    ExpectLatValue,
    ExpectLonKey,
    ExpectLonValue,
    SeekingTime,
    ExpectTimeContent,
}

/// Pulls `<trkpt lat=".." lon=".."><time>..</time></trkpt>` records out of a token
/// stream, one token at a time.
///
/// A `trkpt` must open with a `lat` attribute followed by a `lon` attribute; any
/// other name or order is rejected as [`SplitError::InvalidTrkpt`]. Attribute
/// values arrive wrapped in quotes, exactly one character of which is dropped from
/// each end. Everything between the attributes and the first `<time>` element is
/// skipped.
pub struct TrackPointExtractor<I> {
    tokens: I,
    done: bool,
}

impl<'a, I> TrackPointExtractor<I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new(tokens: I) -> Self {
        TrackPointExtractor {
            tokens,
            done: false,
        }
    }

    /// Returns the next track point, `Ok(None)` once the stream holds no further
    /// `trkpt` element, or the error for a malformed one.
    pub fn next_point(&mut self) -> Result<Option<TrackPoint>, SplitError> {
        if self.done {
            return Ok(None);
        }

        let mut state = State::SeekingTrkpt;
        let mut lat = 0.0;
        let mut lon = 0.0;

        loop {
            let token = self.tokens.next().unwrap_or_else(Token::eof);

            state = match (state, token.kind) {
                (State::SeekingTrkpt, _) if token.is_end() => {
                    self.done = true;
                    return Ok(None);
                }
                (State::SeekingTrkpt, TokenKind::TagOpen) if token.bytes.as_ref() == b"trkpt" => {
                    State::ExpectLatKey
                }
                (State::SeekingTrkpt, _) => State::SeekingTrkpt,

                (State::ExpectLatKey, TokenKind::AttrKey) if token.bytes.as_ref() == b"lat" => {
                    State::ExpectLatValue
                }
                (State::ExpectLatValue, TokenKind::AttrValue) => {
                    lat = parse_coordinate(&token.bytes)?;
                    State::ExpectLonKey
                }
                (State::ExpectLonKey, TokenKind::AttrKey) if token.bytes.as_ref() == b"lon" => {
                    State::ExpectLonValue
                }
                (State::ExpectLonValue, TokenKind::AttrValue) => {
                    lon = parse_coordinate(&token.bytes)?;
                    State::SeekingTime
                }

                (State::SeekingTime, TokenKind::TagOpen) if token.bytes.as_ref() == b"time" => {
                    State::ExpectTimeContent
                }
                (State::SeekingTime, _) if !token.is_end() => State::SeekingTime,

                (State::ExpectTimeContent, TokenKind::Content) => {
                    let timestamp = Timestamp::parse(&token.bytes)?;
                    let point = TrackPoint {
                        position: GeoPoint::degrees(lat, lon),
                        timestamp,
                    };
                    tracing::trace!(lat, lon, %timestamp, "track point");
                    return Ok(Some(point));
                }

                (state, kind) => {
                    tracing::debug!(?state, ?kind, "unexpected token inside trkpt");
                    return Err(SplitError::InvalidTrkpt);
                }
            };
        }
    }
}

impl<'a, I> Iterator for TrackPointExtractor<I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = Result<TrackPoint, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_point() {
            Ok(point) => point.map(Ok),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn parse_coordinate(quoted: &[u8]) -> Result<f64, SplitError> {
    quoted
        .get(1..quoted.len().saturating_sub(1))
        .and_then(|inner| std::str::from_utf8(inner).ok())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            tracing::debug!(value = %String::from_utf8_lossy(quoted), "coordinate is not a number");
            SplitError::InvalidTrkpt
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpxxml::GpxTokenizer;

    fn trkpt<'a>(lat: &'a [u8], lon: &'a [u8], time: &'a [u8]) -> Vec<Token<'a>> {
        vec![
            Token::tag_open(b"trkpt"),
            Token::attr_key(b"lat"),
            Token::attr_value(lat),
            Token::attr_key(b"lon"),
            Token::attr_value(lon),
            Token::tag_open(b"ele"),
            Token::content(b"100"),
            Token::tag_open(b"time"),
            Token::content(time),
        ]
    }

    #[test]
    fn test_extract_from_quoted_tokens() {
        let tokens = trkpt(b"\"37.7749\"", b"'-122.4194'", b"2023-01-01T10:00:00Z");
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());

        let point = extractor.next_point().unwrap().unwrap();
        assert_eq!(point.position, GeoPoint::degrees(37.7749, -122.4194));
        assert_eq!(
            point.timestamp,
            "2023-01-01T10:00:00Z".parse::<Timestamp>().unwrap()
        );
        assert_eq!(extractor.next_point(), Ok(None));
    }

    #[test]
    fn test_extract_skips_leading_tokens() {
        let mut tokens = vec![
            Token::tag_open(b"gpx"),
            Token::attr_key(b"version"),
            Token::attr_value(b"\"1.1\""),
            Token::tag_open(b"name"),
            Token::content(b"Test Track"),
        ];
        tokens.extend(trkpt(b"\"1.5\"", b"\"2.5\"", b"2023-01-01T10:00:00"));
        tokens.extend(trkpt(b"\"1.6\"", b"\"2.6\"", b"2023-01-01T10:00:05"));

        let points: Vec<TrackPoint> = TrackPointExtractor::new(tokens.into_iter())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].position.lat, 1.6);
        assert_eq!(points[1].timestamp.second, 5);
    }

    #[test]
    fn test_extract_stops_at_invalid_token() {
        let mut tokens = trkpt(b"\"1.5\"", b"\"2.5\"", b"2023-01-01T10:00:00");
        tokens.push(Token::invalid());
        tokens.extend(trkpt(b"\"1.6\"", b"\"2.6\"", b"2023-01-01T10:00:05"));

        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert!(extractor.next_point().unwrap().is_some());
        assert_eq!(extractor.next_point(), Ok(None));
        assert_eq!(extractor.next_point(), Ok(None));
    }

    #[test]
    fn test_extract_empty_stream() {
        let mut extractor = TrackPointExtractor::new(std::iter::empty());
        assert_eq!(extractor.next_point(), Ok(None));
    }

    #[test]
    fn test_extract_value_where_key_expected() {
        let tokens = vec![
            Token::tag_open(b"trkpt"),
            Token::attr_value(b"\"37.7749\""),
            Token::attr_key(b"lon"),
            Token::attr_value(b"\"-122.4194\""),
        ];
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));
    }

    #[test]
    fn test_extract_non_numeric_coordinate() {
        let tokens = trkpt(b"\"north\"", b"\"-122.4194\"", b"2023-01-01T10:00:00Z");
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));
    }

    #[test]
    fn test_extract_missing_time() {
        let tokens = vec![
            Token::tag_open(b"trkpt"),
            Token::attr_key(b"lat"),
            Token::attr_value(b"\"1.0\""),
            Token::attr_key(b"lon"),
            Token::attr_value(b"\"2.0\""),
            Token::tag_open(b"ele"),
            Token::content(b"12"),
            Token::eof(),
        ];
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));
    }

    #[test]
    fn test_extract_time_without_content() {
        let tokens = vec![
            Token::tag_open(b"trkpt"),
            Token::attr_key(b"lat"),
            Token::attr_value(b"\"1.0\""),
            Token::attr_key(b"lon"),
            Token::attr_value(b"\"2.0\""),
            Token::tag_open(b"time"),
            Token::tag_open(b"extensions"),
        ];
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));
    }

    #[test]
    fn test_extract_bad_timestamp() {
        let tokens = trkpt(b"\"1.0\"", b"\"2.0\"", b"yesterday");
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidDatetime));
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut tokens = trkpt(b"\"1.0\"", b"\"2.0\"", b"yesterday");
        tokens.extend(trkpt(b"\"1.6\"", b"\"2.6\"", b"2023-01-01T10:00:05"));

        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next(), Some(Err(SplitError::InvalidDatetime)));
        assert_eq!(extractor.next(), None);
    }

    #[test]
    fn test_extract_from_gpx_document() {
        let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk>
    <trkseg>
      <trkpt lat="37.7749" lon="-122.4194">
        <ele>100</ele>
        <time>2023-01-01T10:00:00Z</time>
        <extensions>
          <ns3:TrackPointExtension xmlns:ns3="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
            <ns3:hr>150</ns3:hr>
          </ns3:TrackPointExtension>
        </extensions>
      </trkpt>
      <trkpt lat="37.7750" lon="-122.4195">
        <time>2023-01-01T10:00:05Z</time>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;

        let points: Vec<TrackPoint> = TrackPointExtractor::new(GpxTokenizer::new(gpx.as_bytes()))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].position.lat, 37.7749);
        assert_eq!(points[0].position.lon, -122.4194);
        assert_eq!(points[1].position.lat, 37.7750);
        assert_eq!(points[1].position.lon, -122.4195);
        assert_eq!(points[1].timestamp.to_string(), "2023-01-01T10:00:05Z");
    }

    #[test]
    fn test_extract_rejects_reversed_attributes() {
        let tokens = vec![
            Token::tag_open(b"trkpt"),
            Token::attr_key(b"lon"),
            Token::attr_value(b"\"-105.0\""),
            Token::attr_key(b"lat"),
            Token::attr_value(b"\"40.0\""),
            Token::tag_open(b"time"),
            Token::content(b"2023-01-01T10:00:00Z"),
        ];
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));

        let gpx = r#"<gpx><trk><trkseg>
            <trkpt lon="-105.0" lat="40.0"><time>2023-01-01T10:00:00Z</time></trkpt>
        </trkseg></trk></gpx>"#;
        let mut extractor = TrackPointExtractor::new(GpxTokenizer::new(gpx.as_bytes()));
        assert_eq!(extractor.next(), Some(Err(SplitError::InvalidTrkpt)));
    }

    #[test]
    fn test_extract_rejects_unexpected_attribute_name() {
        let tokens = vec![
            Token::tag_open(b"trkpt"),
            Token::attr_key(b"lat"),
            Token::attr_value(b"\"40.0\""),
            Token::attr_key(b"ele"),
            Token::attr_value(b"\"1600\""),
        ];
        let mut extractor = TrackPointExtractor::new(tokens.into_iter());
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));
    }

    #[test]
    fn test_extract_drops_exactly_one_quote_pair() {
        // Quotes that belong to the value survive and make it non-numeric.
        let gpx = r#"<gpx><trkpt lat='"1.0"' lon="2.0"><time>2023-01-01T10:00:00Z</time></trkpt></gpx>"#;
        let mut extractor = TrackPointExtractor::new(GpxTokenizer::new(gpx.as_bytes()));
        assert_eq!(extractor.next_point(), Err(SplitError::InvalidTrkpt));

        let gpx = r#"<gpx><trkpt lat='1.0' lon="2.0"><time>2023-01-01T10:00:00Z</time></trkpt></gpx>"#;
        let mut extractor = TrackPointExtractor::new(GpxTokenizer::new(gpx.as_bytes()));
        let point = extractor.next_point().unwrap().unwrap();
        assert_eq!(point.position, GeoPoint::degrees(1.0, 2.0));
    }

    #[test]
    fn test_parse_coordinate_requires_enclosing_quotes() {
        assert_eq!(parse_coordinate(b"\"1.5\""), Ok(1.5));
        // The enclosing characters are dropped without being inspected.
        assert_eq!(parse_coordinate(b"'1.5'"), Ok(1.5));
        assert_eq!(parse_coordinate(b"\"\"1.5\"\""), Err(SplitError::InvalidTrkpt));
        assert_eq!(parse_coordinate(b"\""), Err(SplitError::InvalidTrkpt));
        assert_eq!(parse_coordinate(b""), Err(SplitError::InvalidTrkpt));
    }
}
