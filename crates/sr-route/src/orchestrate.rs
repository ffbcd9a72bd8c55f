//! Top-level driver: validate → snap → solve → assemble.
//!
//! ```text
//! Received ──validate──▶ Validated ──snap──▶ Snapped ──solve──▶ Solved
//!                                                                  │
//!                       Succeeded ◀────────── Assembled ◀─assemble─┘
//! ```
//!
//! Any transition may fail; [`RoutingError::stage`] reports where.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use sr_core::{CoreResult, GeoPoint, Stop};
use sr_graph::{CancelFlag, DijkstraRouter, RoadGraph, Router};

use crate::assemble::{Route, RouteAssembler};
use crate::config::RoutingConfig;
use crate::cost::CostModel;
use crate::error::{NoPathReason, RoutingError, RoutingResult, ValidationError};
use crate::snap::StopSnapper;
use crate::solve::RouteSolver;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteStage {
    Received,
    Validated,
    Snapped,
    Solved,
    Assembled,
    Succeeded,
}

impl fmt::Display for RouteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteStage::Received => "received",
            RouteStage::Validated => "validated",
            RouteStage::Snapped => "snapped",
            RouteStage::Solved => "solved",
            RouteStage::Assembled => "assembled",
            RouteStage::Succeeded => "succeeded",
        })
    }
}

/// Routes ordered stop batches over a shared graph snapshot.
///
/// Holds no per-request state, so one instance (typically behind an `Arc`)
/// serves concurrent requests.
pub struct BatchRouteOrchestrator<R: Router = DijkstraRouter> {
    graph: Arc<RoadGraph>,
    config: RoutingConfig,
    cost: CostModel,
    router: R,
}

impl BatchRouteOrchestrator<DijkstraRouter> {
    /// Orchestrator using Dijkstra.  Fails if `config` does not validate.
    pub fn new(graph: Arc<RoadGraph>, config: RoutingConfig) -> CoreResult<Self> {
        Self::with_router(graph, config, DijkstraRouter)
    }
}

impl<R: Router> BatchRouteOrchestrator<R> {
    pub fn with_router(graph: Arc<RoadGraph>, config: RoutingConfig, router: R) -> CoreResult<Self> {
        config.validate()?;
        let cost = CostModel::new(config.cost.clone());
        Ok(Self { graph, config, cost, router })
    }

    pub fn graph(&self) -> &Arc<RoadGraph> {
        &self.graph
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Keep successful stops, check their count and coordinates, and sort
    /// them by `stop_number` (stable, so equal numbers keep input order).
    pub fn validate(&self, stops: &[Stop]) -> Result<Vec<Stop>, ValidationError> {
        let mut kept: Vec<Stop> = stops.iter().filter(|s| s.is_success()).cloned().collect();

        let limits = &self.config.limits;
        if kept.len() < limits.min_stops {
            return Err(ValidationError::InsufficientStops { found: kept.len(), min: limits.min_stops });
        }
        if kept.len() > limits.max_stops {
            return Err(ValidationError::TooManyStops { found: kept.len(), max: limits.max_stops });
        }

        if let Some(bad) = kept.iter().find(|s| !s.position().is_valid()) {
            return Err(ValidationError::InvalidCoordinate {
                stop_number: bad.stop_number,
                reason: format!("({}, {}) is missing or out of range", bad.lat, bad.lng),
            });
        }

        kept.sort_by_key(|s| s.stop_number);
        Ok(kept)
    }

    pub fn route_batch(&self, stops: &[Stop]) -> RoutingResult<Route> {
        self.route_batch_cancellable(stops, &CancelFlag::new())
    }

    /// Like [`route_batch`](Self::route_batch), abandoning in-flight
    /// searches once `cancel` is set.
    pub fn route_batch_cancellable(&self, stops: &[Stop], cancel: &CancelFlag) -> RoutingResult<Route> {
        let started = Instant::now();
        let result = self.run(stops, cancel);
        match &result {
            Ok(route) => tracing::debug!(
                stage = %RouteStage::Succeeded,
                segments = route.segment_count,
                minutes = route.total_time_minutes,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "route complete"
            ),
            Err(e) => tracing::warn!(
                stage = %e.stage(),
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "route failed"
            ),
        }
        result
    }

    /// Two-stop route from `start` to `end`.
    pub fn route_between(&self, start: GeoPoint, end: GeoPoint, cancel: &CancelFlag) -> RoutingResult<Route> {
        self.route_batch_cancellable(&[Stop::at(1, start), Stop::at(2, end)], cancel)
    }

    fn run(&self, stops: &[Stop], cancel: &CancelFlag) -> RoutingResult<Route> {
        let validated = self.validate(stops)?;
        tracing::debug!(stage = %RouteStage::Validated, stops = validated.len());

        let snapped = StopSnapper::new(&self.graph, self.config.snap.clone()).snap(&validated)?;
        tracing::debug!(stage = %RouteStage::Snapped, stops = snapped.len());

        let segments = RouteSolver::new(&self.graph, &self.router, &self.cost)
            .timeout(self.config.solve_timeout())
            .degenerate_pairs(self.config.degenerate_pairs)
            .solve_all(&snapped, cancel)?;
        tracing::debug!(stage = %RouteStage::Solved, segments = segments.len());

        // Every pair was skipped as degenerate.
        if segments.is_empty() {
            return Err(RoutingError::NoPath {
                from_stop: validated[0].stop_number,
                to_stop: validated[validated.len() - 1].stop_number,
                reason: NoPathReason::Degenerate,
            });
        }

        let route = RouteAssembler::new(&self.graph).assemble(segments, &validated);
        tracing::debug!(stage = %RouteStage::Assembled, lines = route.geometry.len());
        Ok(route)
    }
}
