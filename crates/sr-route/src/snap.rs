//! Stop → graph vertex matching.
//!
//! # Directional snapping
//!
//! For stop `i` of `n` (already filtered and sorted):
//!
//! ```text
//! candidates = edges within search_radius_m, by distance then edge id
//!
//! first / last stop
//!     nearest endpoint (source or target) over all candidates
//!
//! intermediate stop
//!     b = bearing(stop → next stop)
//!     for each candidate edge e:
//!         aligned  = angle(bearing(e), b) < alignment_threshold
//!         eligible = two-way
//!                  | forward one-way and aligned
//!                  | reverse one-way and not aligned
//!         vertex   = aligned ? e.target : e.source
//!     take the first eligible candidate
//!
//! otherwise: globally nearest vertex
//! ```
//!
//! The nearest-vertex fallback only fails on a graph with no vertices.

use sr_core::{angle_between, EdgeId, GeoPoint, NodeId, Stop};
use sr_graph::{EdgeCandidate, OneWay, RoadGraph, Vertex};

use crate::config::{SnapConfig, SnapStrategy};
use crate::error::SnapError;

/// How a stop's vertex was chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapVia {
    /// An endpoint of this candidate edge.
    Edge(EdgeId),
    /// The globally nearest vertex (no usable candidate, or
    /// [`SnapStrategy::Nearest`]).
    NearestVertex,
}

/// A stop matched to its graph entry vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct SnappedStop {
    pub stop: Stop,
    pub vertex: Vertex,
    pub via: SnapVia,
}

pub struct StopSnapper<'g> {
    graph: &'g RoadGraph,
    cfg: SnapConfig,
}

impl<'g> StopSnapper<'g> {
    pub fn new(graph: &'g RoadGraph, cfg: SnapConfig) -> Self {
        Self { graph, cfg }
    }

    /// Snap every stop, preserving order.
    pub fn snap(&self, stops: &[Stop]) -> Result<Vec<SnappedStop>, SnapError> {
        #[cfg(not(feature = "parallel"))]
        {
            (0..stops.len()).map(|i| self.snap_at(stops, i)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            (0..stops.len()).into_par_iter().map(|i| self.snap_at(stops, i)).collect()
        }
    }

    /// Snap `stops[i]`, using `stops[i + 1]` for the travel bearing.
    /// `i` must index `stops`.
    pub(crate) fn snap_at(&self, stops: &[Stop], i: usize) -> Result<SnappedStop, SnapError> {
        let stop = &stops[i];
        let pos = stop.position();

        let chosen = match self.cfg.strategy {
            SnapStrategy::Nearest => None,
            SnapStrategy::Directional => {
                let candidates = self.graph.edges_within(pos, self.cfg.search_radius_m);
                let is_endpoint = i == 0 || i + 1 == stops.len();
                if is_endpoint {
                    self.nearest_endpoint(pos, &candidates)
                } else {
                    self.aligned_entry(pos, stops[i + 1].position(), &candidates)
                }
            }
        };

        let (id, via) = match chosen {
            Some(found) => found,
            None => {
                let id = self.graph.nearest_vertex(pos).ok_or(SnapError::EmptyGraph)?;
                if self.cfg.strategy == SnapStrategy::Directional {
                    tracing::debug!(
                        stop = stop.stop_number,
                        vertex = %id,
                        "no eligible edge in radius, using nearest vertex"
                    );
                }
                (id, SnapVia::NearestVertex)
            }
        };

        Ok(SnappedStop {
            stop: stop.clone(),
            vertex: Vertex { id, pos: self.graph.vertex_pos(id) },
            via,
        })
    }

    /// Candidate endpoint closest to `pos`.  Ties: smaller edge id, then
    /// source before target.
    fn nearest_endpoint(&self, pos: GeoPoint, candidates: &[EdgeCandidate]) -> Option<(NodeId, SnapVia)> {
        candidates
            .iter()
            .flat_map(|c| {
                let e = self.graph.edge(c.edge);
                [(c.edge, 0u8, e.source), (c.edge, 1u8, e.target)]
            })
            .map(|(edge, end, v)| (pos.distance_m(self.graph.vertex_pos(v)), edge, end, v))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)))
            .map(|(_, edge, _, v)| (v, SnapVia::Edge(edge)))
    }

    /// First candidate whose one-way marking allows travel towards `next`.
    /// Candidates arrive sorted by distance then edge id.
    fn aligned_entry(
        &self,
        pos: GeoPoint,
        next: GeoPoint,
        candidates: &[EdgeCandidate],
    ) -> Option<(NodeId, SnapVia)> {
        let travel = pos.bearing_to(next);
        candidates.iter().find_map(|c| {
            let e = self.graph.edge(c.edge);
            let aligned = angle_between(e.bearing(), travel) < self.cfg.alignment_threshold_rad;
            let eligible = match e.one_way {
                OneWay::None => true,
                OneWay::Forward => aligned,
                OneWay::Reverse => !aligned,
            };
            eligible.then(|| {
                let v = if aligned { e.target } else { e.source };
                (v, SnapVia::Edge(c.edge))
            })
        })
    }
}
