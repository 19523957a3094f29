use std::fmt;
use std::str::FromStr;

/// Mean earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;
/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Miles => EARTH_RADIUS_MILES,
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Ok(DistanceUnit::Kilometers)
            }
            _ => Err(format!("Invalid distance unit: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub unit: AngleUnit,
}

impl GeoPoint {
    pub fn degrees(lat: f64, lon: f64) -> Self {
        GeoPoint {
            lat,
            lon,
            unit: AngleUnit::Degrees,
        }
    }

    pub fn radians(lat: f64, lon: f64) -> Self {
        GeoPoint {
            lat,
            lon,
            unit: AngleUnit::Radians,
        }
    }

    /// `(lat, lon)` in radians.
    pub fn to_radians(&self) -> (f64, f64) {
        match self.unit {
            AngleUnit::Degrees => (self.lat.to_radians(), self.lon.to_radians()),
            AngleUnit::Radians => (self.lat, self.lon),
        }
    }
}

/// Great circle distance between two points on a sphere of the given radius.
///
/// This is a small-angle form of the haversine formula: `sin(d²/4)` stands in for
/// `sin²(d/2)`. Both agree to first order for the short hops between consecutive
/// track points; the result drifts from the true distance as the separation grows,
/// so it must not be used for far-apart points.
///
/// The result is in the unit of `radius`.
pub fn distance(a: &GeoPoint, b: &GeoPoint, radius: f64) -> f64 {
    let (lat_a, lon_a) = a.to_radians();
    let (lat_b, lon_b) = b.to_radians();
    let dlat = lat_b - lat_a;
    let dlon = lon_b - lon_a;

    let h = (dlat * dlat / 4.0).sin() + lat_a.cos() * lat_b.cos() * (dlon * dlon / 4.0).sin();

    2.0 * radius * h.sqrt().asin()
}

pub fn distance_miles(a: &GeoPoint, b: &GeoPoint) -> f64 {
    distance(a, b, EARTH_RADIUS_MILES)
}

pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    distance(a, b, EARTH_RADIUS_KM)
}
