use super::read_input;
use gpxsplit::{DistanceUnit, GpxTokenizer, format_clock, total_split_in};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

pub fn split_command(
    path: Option<&Path>,
    unit: DistanceUnit,
    per: f64,
) -> Result<(), Box<dyn Error>> {
    if !(per.is_finite() && per > 0.0) {
        return Err(format!("Pace distance must be positive, got {per}").into());
    }

    let input = read_input(path)?;
    let split = total_split_in(GpxTokenizer::new(&input), unit)?;

    let mut out = io::stdout().lock();
    writeln!(out, "distance: {:.2} {}", split.distance, split.distance_unit)?;
    writeln!(out, "time: {}", format_clock(split.time))?;

    let per_label = if per == 1.0 {
        unit.to_string()
    } else {
        format!("{per} {unit}")
    };
    if split.distance > 0.0 {
        let pace = split.average_pace(per);
        writeln!(out, "pace: {} /{per_label}", format_clock(pace))?;
    } else {
        writeln!(out, "pace: - /{per_label}")?;
    }

    Ok(())
}
