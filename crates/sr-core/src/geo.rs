//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Stop coordinates arrive from a
//! geocoder with 6+ decimal places and are echoed back in GeoJSON, so the
//! extra precision is kept end to end.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside the WGS-84 range.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing from `self` to `other`, in radians
    /// clockwise from north, normalised to `[0, 2π)`.
    ///
    /// Matches PostGIS `ST_Azimuth` on geographic points.  Returns `0.0` for
    /// coincident points.
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        if x == 0.0 && y == 0.0 {
            return 0.0;
        }
        y.atan2(x).rem_euclid(TAU)
    }

    /// Shortest distance in metres from `self` to the segment `a`–`b`.
    ///
    /// Projects onto a local equirectangular plane centred on `self`, which
    /// is accurate to well under a metre at snapping radii (hundreds of
    /// metres).
    pub fn distance_to_segment_m(self, a: GeoPoint, b: GeoPoint) -> f64 {
        let (ax, ay) = self.project(a);
        let (bx, by) = self.project(b);
        let (dx, dy) = (bx - ax, by - ay);
        let len_2 = dx * dx + dy * dy;
        let t = if len_2 == 0.0 {
            0.0
        } else {
            (-(ax * dx + ay * dy) / len_2).clamp(0.0, 1.0)
        };
        let (px, py) = (ax + t * dx, ay + t * dy);
        (px * px + py * py).sqrt()
    }

    /// Shortest distance in metres from `self` to a polyline.
    ///
    /// A single-point line degenerates to point distance; an empty line is
    /// infinitely far away.
    pub fn distance_to_polyline_m(self, line: &[GeoPoint]) -> f64 {
        match line {
            [] => f64::INFINITY,
            [only] => self.distance_m(*only),
            _ => line
                .windows(2)
                .map(|w| self.distance_to_segment_m(w[0], w[1]))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Half-extent in degrees `(d_lat, d_lon)` of a box that contains every
    /// point within `radius_m` of `self`.
    pub fn degree_extent(self, radius_m: f64) -> (f64, f64) {
        let d_lat = (radius_m / EARTH_RADIUS_M).to_degrees();
        let cos_lat = self.lat.to_radians().cos().abs().max(1e-6);
        let d_lon = (d_lat / cos_lat).min(180.0);
        (d_lat, d_lon)
    }

    /// `other` in metres east/north of `self`.
    #[inline]
    fn project(self, other: GeoPoint) -> (f64, f64) {
        let x = (other.lon - self.lon).to_radians() * self.lat.to_radians().cos() * EARTH_RADIUS_M;
        let y = (other.lat - self.lat).to_radians() * EARTH_RADIUS_M;
        (x, y)
    }
}

/// Absolute angular difference between two bearings, wrapped into `[0, π]`.
pub fn angle_between(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI { TAU - d } else { d }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Parse a `"lat,lng"` pair.  Whitespace around either number is ignored.
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidCoordinate {
            input: s.to_owned(),
            reason,
        };

        let mut parts = s.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected exactly two comma-separated values".into()));
        };

        let lat: f64 = lat.trim().parse().map_err(|e| invalid(format!("latitude: {e}")))?;
        let lon: f64 = lon.trim().parse().map_err(|e| invalid(format!("longitude: {e}")))?;

        let point = GeoPoint::new(lat, lon);
        if !point.is_valid() {
            return Err(invalid("latitude or longitude out of range".into()));
        }
        Ok(point)
    }
}
