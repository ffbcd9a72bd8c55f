//! Pairwise shortest paths between consecutive snapped stops.

use std::time::Duration;

use sr_graph::{CancelFlag, GraphError, PathStep, RoadGraph, Router, SearchLimits};

use crate::config::DegeneratePolicy;
use crate::cost::CostModel;
use crate::error::{NoPathReason, RoutingError, RoutingResult};
use crate::snap::SnappedStop;

/// The path between one consecutive pair of stops.
#[derive(Clone, Debug)]
pub struct PathSegment {
    pub from: SnappedStop,
    pub to: SnappedStop,
    /// Traversed edges in order, with the direction each was travelled.
    pub steps: Vec<PathStep>,
    pub cost_minutes: f64,
}

pub struct RouteSolver<'a, R: Router> {
    graph: &'a RoadGraph,
    router: &'a R,
    cost: &'a CostModel,
    timeout: Option<Duration>,
    degenerate: DegeneratePolicy,
}

impl<'a, R: Router> RouteSolver<'a, R> {
    pub fn new(graph: &'a RoadGraph, router: &'a R, cost: &'a CostModel) -> Self {
        Self { graph, router, cost, timeout: None, degenerate: DegeneratePolicy::Reject }
    }

    /// Per-search wall-clock budget.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn degenerate_pairs(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }

    /// Solve one pair.  A pair whose stops share a vertex is always a
    /// degenerate no-path error here; the skip policy applies in
    /// [`solve_all`](Self::solve_all).
    pub fn solve(
        &self,
        from: &SnappedStop,
        to: &SnappedStop,
        cancel: &CancelFlag,
    ) -> RoutingResult<PathSegment> {
        let no_path = |reason| RoutingError::NoPath {
            from_stop: from.stop.stop_number,
            to_stop: to.stop.stop_number,
            reason,
        };

        if from.vertex.id == to.vertex.id {
            return Err(no_path(NoPathReason::Degenerate));
        }

        let limits = SearchLimits::new(self.timeout, cancel.clone());
        match self.router.route(self.graph, from.vertex.id, to.vertex.id, self.cost, &limits) {
            Ok(path) => Ok(PathSegment {
                from: from.clone(),
                to: to.clone(),
                steps: path.steps,
                cost_minutes: path.cost_minutes,
            }),
            Err(GraphError::NoRoute { .. }) => Err(no_path(NoPathReason::Unreachable)),
            Err(e) => Err(RoutingError::Engine(e)),
        }
    }

    /// Solve every consecutive pair, in stop order.  On failure the first
    /// failing pair in stop order is reported.
    pub fn solve_all(
        &self,
        snapped: &[SnappedStop],
        cancel: &CancelFlag,
    ) -> RoutingResult<Vec<PathSegment>> {
        #[cfg(not(feature = "parallel"))]
        let solved: Vec<RoutingResult<Option<PathSegment>>> =
            snapped.windows(2).map(|w| self.solve_pair(&w[0], &w[1], cancel)).collect();

        #[cfg(feature = "parallel")]
        let solved: Vec<RoutingResult<Option<PathSegment>>> = {
            use rayon::prelude::*;

            snapped.par_windows(2).map(|w| self.solve_pair(&w[0], &w[1], cancel)).collect()
        };

        let mut segments = Vec::with_capacity(solved.len());
        for r in solved {
            if let Some(segment) = r? {
                segments.push(segment);
            }
        }
        Ok(segments)
    }

    fn solve_pair(
        &self,
        from: &SnappedStop,
        to: &SnappedStop,
        cancel: &CancelFlag,
    ) -> RoutingResult<Option<PathSegment>> {
        if from.vertex.id == to.vertex.id && self.degenerate == DegeneratePolicy::Skip {
            tracing::debug!(
                from_stop = from.stop.stop_number,
                to_stop = to.stop.stop_number,
                vertex = %from.vertex.id,
                "skipping degenerate pair"
            );
            return Ok(None);
        }
        self.solve(from, to, cancel).map(Some)
    }
}
