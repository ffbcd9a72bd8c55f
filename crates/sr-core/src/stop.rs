//! Stop records: the geocoded waypoints a route must visit, in order.

use crate::GeoPoint;

/// Outcome of geocoding a stop.  Only `Success` stops take part in routing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopStatus {
    Success,
    /// Any status other than `success` deserializes here.
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Failed,
}

/// One geocoded stop.
///
/// Stops are ordered by `stop_number`; equal numbers keep their input order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub stop_number: i64,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub formatted_address: String,
    pub status: StopStatus,
}

impl Stop {
    /// A successfully geocoded stop with empty address fields.
    pub fn at(stop_number: i64, pos: GeoPoint) -> Self {
        Self {
            stop_number,
            lat: pos.lat,
            lng: pos.lon,
            address: String::new(),
            formatted_address: String::new(),
            status: StopStatus::Success,
        }
    }

    #[inline]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == StopStatus::Success
    }
}

/// The per-stop echo included in a routing response.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopSummary {
    pub stop_number: i64,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

impl From<&Stop> for StopSummary {
    fn from(stop: &Stop) -> Self {
        Self {
            stop_number: stop.stop_number,
            address: stop.address.clone(),
            lat: stop.lat,
            lng: stop.lng,
            formatted_address: stop.formatted_address.clone(),
        }
    }
}
