//! Wire types for the HTTP API.

use geojson::{Geometry, Value};
use serde::{Deserialize, Serialize};

use sr_core::{Stop, StopStatus, StopSummary};
use sr_route::Route;

// ── POST /route ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// `"lat,lng"`.
    pub start_coords: String,
    pub end_coords: String,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub success: bool,
    pub route_geojson: Geometry,
    pub start_coords: String,
    pub end_coords: String,
}

// ── POST /route-from-batch ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub geocode_results: Vec<GeocodeResult>,
}

/// One geocoder result.  Failed geocodes usually carry no coordinates.
#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub stop_number: i64,
    #[serde(default)]
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub status: StopStatus,
}

impl From<GeocodeResult> for Stop {
    /// Missing coordinates become NaN so that a successful stop without
    /// them fails coordinate validation.
    fn from(g: GeocodeResult) -> Self {
        Stop {
            stop_number: g.stop_number,
            lat: g.lat.unwrap_or(f64::NAN),
            lng: g.lng.unwrap_or(f64::NAN),
            address: g.address,
            formatted_address: g.formatted_address,
            status: g.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub total_stops: usize,
    pub route_geojson: Geometry,
    pub stops: Vec<StopSummary>,
    pub total_time_min: f64,
    pub segment_count: usize,
    pub total_distance_m: f64,
}

impl From<Route> for BatchResponse {
    fn from(route: Route) -> Self {
        Self {
            success: true,
            total_stops: route.stops.len(),
            route_geojson: route_geojson(&route),
            total_time_min: route.total_time_minutes,
            segment_count: route.segment_count,
            total_distance_m: route.total_distance_m,
            stops: route.stops,
        }
    }
}

// ── Shared ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub vertices: usize,
    pub edges: usize,
}

/// Route geometry as a GeoJSON `MultiLineString` with `[lng, lat]`
/// positions.
pub fn route_geojson(route: &Route) -> Geometry {
    let lines: Vec<Vec<Vec<f64>>> = route
        .geometry
        .iter()
        .map(|line| line.iter().map(|p| vec![p.lon, p.lat]).collect())
        .collect();
    Geometry::new(Value::MultiLineString(lines))
}
