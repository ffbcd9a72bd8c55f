//! Joins per-pair paths into one route geometry with totals.

use sr_core::{GeoPoint, NodeId, Stop, StopSummary};
use sr_graph::{Direction, RoadGraph};

use crate::solve::PathSegment;

/// A finished multi-stop route.
#[derive(Clone, Debug)]
pub struct Route {
    /// Multi-line geometry.  Contiguous edges share one line; a new line
    /// starts only where an edge does not leave from the vertex the previous
    /// edge arrived at.
    pub geometry: Vec<Vec<GeoPoint>>,
    pub total_time_minutes: f64,
    pub total_distance_m: f64,
    /// Consecutive stop pairs resolved into a path.
    pub segment_count: usize,
    pub stops: Vec<StopSummary>,
    pub segments: Vec<PathSegment>,
}

pub struct RouteAssembler<'g> {
    graph: &'g RoadGraph,
}

impl<'g> RouteAssembler<'g> {
    pub fn new(graph: &'g RoadGraph) -> Self {
        Self { graph }
    }

    /// Concatenate `segments` in the given order.  Edge order inside each
    /// segment is kept as traversed; nothing is re-sorted.
    pub fn assemble(&self, segments: Vec<PathSegment>, stops: &[Stop]) -> Route {
        let mut geometry: Vec<Vec<GeoPoint>> = Vec::new();
        let mut total_distance_m = 0.0;
        // Vertex the previous step ended at.
        let mut at: Option<NodeId> = None;

        for step in segments.iter().flat_map(|s| &s.steps) {
            let edge = self.graph.edge(step.edge);
            total_distance_m += edge.length_m;

            let oriented: Vec<GeoPoint> = match step.direction {
                Direction::Forward => edge.geometry.to_vec(),
                Direction::Reverse => edge.geometry.iter().rev().copied().collect(),
            };
            let joins = at == Some(edge.tail(step.direction));
            append_line(&mut geometry, oriented, joins);
            at = Some(edge.head(step.direction));
        }

        Route {
            geometry,
            total_time_minutes: segments.iter().map(|s| s.cost_minutes).sum(),
            total_distance_m,
            segment_count: segments.len(),
            stops: stops.iter().map(StopSummary::from).collect(),
            segments,
        }
    }
}

/// Extend the current line when `joins` (the edge starts where the last one
/// ended), otherwise start a new one.
fn append_line(lines: &mut Vec<Vec<GeoPoint>>, piece: Vec<GeoPoint>, joins: bool) {
    match lines.last_mut() {
        Some(line) if joins => line.extend(piece.into_iter().skip(1)),
        _ => lines.push(piece),
    }
}
