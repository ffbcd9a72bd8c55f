//! kitchener — smallest end-to-end example for stoproute.
//!
//! Routes a three-stop delivery batch (one failed geocode mixed in) over a
//! synthetic downtown Kitchener network, once with the preference-weighted
//! cost profile and once with plain travel time.
//!
//! Run with:
//!   cargo run -p kitchener

mod network;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use sr_core::{GeoPoint, Stop, StopStatus};
use sr_route::{BatchRouteOrchestrator, CostProfile, Route, RoutingConfig, SnapVia};

use network::build_network;

// ── Stops ─────────────────────────────────────────────────────────────────────

fn stop(stop_number: i64, address: &str, pos: GeoPoint, status: StopStatus) -> Stop {
    Stop {
        stop_number,
        lat: pos.lat,
        lng: pos.lon,
        address: address.to_owned(),
        formatted_address: format!("{address}, Kitchener, ON"),
        status,
    }
}

fn batch() -> Vec<Stop> {
    vec![
        stop(3, "50 Grand River Blvd", GeoPoint::new(43.4608, -80.4793), StopStatus::Success),
        stop(1, "20 Victoria St S", GeoPoint::new(43.4476, -80.4988), StopStatus::Success),
        stop(4, "Unknown Rd", GeoPoint::new(0.0, 0.0), StopStatus::Failed),
        stop(2, "200 King St W", GeoPoint::new(43.4520, -80.4919), StopStatus::Success),
    ]
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_route(label: &str, route: &Route) {
    println!("── {label} ──");
    println!(
        "  {} stops, {} segments, {:.1} min, {:.0} m, {} line(s)",
        route.stops.len(),
        route.segment_count,
        route.total_time_minutes,
        route.total_distance_m,
        route.geometry.len(),
    );
    for seg in &route.segments {
        let via = match seg.from.via {
            SnapVia::Edge(e) => format!("entered via {e}"),
            SnapVia::NearestVertex => "nearest vertex".to_owned(),
        };
        println!(
            "  stop {} → stop {}: {} edges, {:.2} min  (start {}, {via})",
            seg.from.stop.stop_number,
            seg.to.stop.stop_number,
            seg.steps.len(),
            seg.cost_minutes,
            seg.from.vertex.id,
        );
    }
    println!();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== kitchener — stoproute batch routing ===");
    println!();

    let (graph, _nodes) = build_network();
    println!("Road network: {} vertices, {} edges", graph.vertex_count(), graph.edge_count());
    println!();
    let graph = Arc::new(graph);
    let stops = batch();

    let preferred = BatchRouteOrchestrator::new(Arc::clone(&graph), RoutingConfig::default())?;
    let t0 = Instant::now();
    let route = preferred.route_batch(&stops)?;
    print_route("preferred roads", &route);

    let mut config = RoutingConfig::default();
    config.cost.profile = CostProfile::TravelTime;
    let fastest = BatchRouteOrchestrator::new(graph, config)?;
    let route = fastest.route_batch(&stops)?;
    print_route("travel time", &route);

    println!("Routed both batches in {:.2?}", t0.elapsed());
    Ok(())
}
