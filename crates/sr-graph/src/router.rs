//! Cost seam, routing trait, and the Dijkstra / A* implementations.
//!
//! # Pluggability
//!
//! Edge weights come from an [`EdgeCost`] supplied per query, so the graph
//! itself carries no routing policy: one-way legality and road preference
//! live entirely in the cost function.  Searches are driven through the
//! [`Router`] trait so callers can swap algorithms without touching the
//! routing pipeline.
//!
//! # Cost units
//!
//! All costs are `f64` **minutes**.  `Traversal::Unreachable` removes an arc
//! from the search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use sr_core::{EdgeId, NodeId};

use crate::edge::{Direction, EdgeRef};
use crate::limits::SearchLimits;
use crate::network::RoadGraph;
use crate::{GraphError, GraphResult};

/// Settled-node interval between deadline/cancellation checks.
const CHECK_INTERVAL: u32 = 256;

// ── Cost seam ─────────────────────────────────────────────────────────────────

/// Weight of traversing one edge in one direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Traversal {
    Cost(f64),
    Unreachable,
}

impl Traversal {
    /// Usable cost in minutes, or `None` if the arc may not be traversed.
    #[inline]
    pub fn minutes(self) -> Option<f64> {
        match self {
            Traversal::Cost(c) if c >= 0.0 && c.is_finite() => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn is_unreachable(self) -> bool {
        self.minutes().is_none()
    }
}

/// Direction-aware edge weight function.
pub trait EdgeCost: Sync {
    fn cost(&self, edge: &EdgeRef<'_>, dir: Direction) -> Traversal;

    /// Smallest ratio of returned cost to stored travel time this function
    /// ever produces.  A* scales its straight-line heuristic by this.
    fn min_scale(&self) -> f64 {
        1.0
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// One traversed edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub edge: EdgeId,
    pub direction: Direction,
}

/// The result of a search: edges in traversal order and their summed cost.
#[derive(Clone, Debug)]
pub struct Path {
    pub steps: Vec<PathStep>,
    pub cost_minutes: f64,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so one router can serve many
/// requests and Rayon workers at once.
pub trait Router: Send + Sync {
    /// Cheapest path from `from` to `to` under `cost`.
    ///
    /// `from == to` yields an empty path.  Returns [`GraphError::NoRoute`]
    /// when `to` is unreachable, and [`GraphError::Timeout`] /
    /// [`GraphError::Cancelled`] when `limits` trip.
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
        cost: &dyn EdgeCost,
        limits: &SearchLimits,
    ) -> GraphResult<Path>;
}

/// Plain Dijkstra.  The default router.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
        cost: &dyn EdgeCost,
        limits: &SearchLimits,
    ) -> GraphResult<Path> {
        search(graph, from, to, cost, limits, |_| 0.0)
    }
}

/// A* with a straight-line heuristic: distance to the target at the fastest
/// speed found in the graph, scaled by [`EdgeCost::min_scale`].
///
/// Falls back to Dijkstra behaviour when the graph has no usable speed.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
        cost: &dyn EdgeCost,
        limits: &SearchLimits,
    ) -> GraphResult<Path> {
        let speed = graph.max_speed_mps();
        if !(speed > 0.0 && speed.is_finite()) || !graph.contains_vertex(to) {
            return search(graph, from, to, cost, limits, |_| 0.0);
        }
        let goal = graph.vertex_pos(to);
        let per_metre = cost.min_scale().max(0.0) / speed / 60.0;
        search(graph, from, to, cost, limits, |n| {
            graph.vertex_pos(n).distance_m(goal) * per_metre
        })
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Heap entry ordered so that `BinaryHeap` pops the lowest `priority`
/// first, breaking ties on the smaller `NodeId` for determinism.
struct Queued {
    priority: f64,
    g: f64,
    node: NodeId,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

fn search(
    graph: &RoadGraph,
    from: NodeId,
    to: NodeId,
    cost: &dyn EdgeCost,
    limits: &SearchLimits,
    heuristic: impl Fn(NodeId) -> f64,
) -> GraphResult<Path> {
    for n in [from, to] {
        if !graph.contains_vertex(n) {
            return Err(GraphError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Path { steps: vec![], cost_minutes: 0.0 });
    }

    let started = Instant::now();
    limits.check(from, to, started)?;

    let n = graph.vertex_count();
    // dist[v] = best known cost (minutes) to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = arc that reached v.
    let mut prev: Vec<Option<PathStep>> = vec![None; n];

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Queued { priority: heuristic(from), g: 0.0, node: from });

    let mut settled: u32 = 0;
    while let Some(Queued { g, node, .. }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev, to, g));
        }

        // Skip stale heap entries.
        if g > dist[node.index()] {
            continue;
        }

        settled += 1;
        if settled % CHECK_INTERVAL == 0 {
            limits.check(from, to, started)?;
        }

        for (edge, dir, head) in graph.out_arcs(node) {
            let Some(w) = cost.cost(&graph.edge(edge), dir).minutes() else {
                continue;
            };
            let next = g + w;
            if next < dist[head.index()] {
                dist[head.index()] = next;
                prev[head.index()] = Some(PathStep { edge, direction: dir });
                heap.push(Queued { priority: next + heuristic(head), g: next, node: head });
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(graph: &RoadGraph, prev: &[Option<PathStep>], to: NodeId, total: f64) -> Path {
    let mut steps = Vec::new();
    let mut cur = to;
    while let Some(step) = prev[cur.index()] {
        steps.push(step);
        cur = graph.edge(step.edge).tail(step.direction);
    }
    steps.reverse();
    Path { steps, cost_minutes: total }
}
