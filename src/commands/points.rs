use super::read_input;
use gpxsplit::{GpxTokenizer, TrackPointExtractor};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

pub fn points_command(path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let input = read_input(path)?;
    let mut out = io::stdout().lock();

    for point in TrackPointExtractor::new(GpxTokenizer::new(&input)) {
        let point = point?;
        writeln!(
            out,
            "{}\t{}\t{}",
            point.position.lat, point.position.lon, point.timestamp
        )?;
    }

    Ok(())
}
