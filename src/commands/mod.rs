pub mod points;
pub mod split;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Reads the whole input file, or stdin when no path (or `-`) is given.
pub fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path),
        _ => {
            let mut input = Vec::new();
            io::stdin().lock().read_to_end(&mut input)?;
            Ok(input)
        }
    }
}
