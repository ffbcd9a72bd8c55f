//! Road graph representation and builder.
//!
//! # Data layout
//!
//! Each edge is one physical road segment with two potential traversal
//! directions.  Every edge contributes two **arcs** to a Compressed Sparse
//! Row (CSR) adjacency: a forward arc at its source and a reverse arc at its
//! target.  Given a `NodeId n`, its outgoing arcs occupy the slice:
//!
//! ```text
//! arc_*[ node_arc_start[n] .. node_arc_start[n+1] ]
//! ```
//!
//! Whether an arc may actually be used is decided at search time by the
//! [`EdgeCost`](crate::EdgeCost) in play, never at build time.  The one-way
//! marking is just another edge attribute.
//!
//! Edge attributes are stored as parallel arrays indexed by `EdgeId`
//! (insertion order).  Shape points are flattened into one `Vec` with a
//! per-edge start offset, in the same CSR style.
//!
//! # Spatial indexes
//!
//! Two R-trees (via `rstar`): one over vertices for nearest-vertex snapping,
//! one over edge bounding boxes for radius queries.  Longitudes are scaled
//! by `cos(mean latitude)` so squared distances in index space track ground
//! distance within a city.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sr_core::{EdgeId, GeoPoint, NodeId};

use crate::edge::{Direction, EdgeRef, EdgeSpec, OneWay, RoadClass};

/// Index candidates re-ranked by [`RoadGraph::nearest_vertex`].
pub const NEAREST_SHORTLIST: usize = 8;

// ── R-tree entries ────────────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2], // [lat, lon * lon_scale]
    id: NodeId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d0 = self.point[0] - point[0];
        let d1 = self.point[1] - point[1];
        d0 * d0 + d1 * d1
    }
}

#[derive(Clone)]
struct EdgeEntry {
    envelope: AABB<[f64; 2]>,
    id: EdgeId,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

// ── Query results ─────────────────────────────────────────────────────────────

/// A graph vertex: id plus position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub id: NodeId,
    pub pos: GeoPoint,
}

/// An edge found by [`RoadGraph::edges_within`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeCandidate {
    pub edge: EdgeId,
    /// Ground distance from the query point to the edge geometry, metres.
    pub distance_m: f64,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Immutable road graph plus spatial indexes.
///
/// Built once per snapshot by [`RoadGraphBuilder`] and then shared read-only
/// (typically as `Arc<RoadGraph>`) by every concurrent request.
pub struct RoadGraph {
    // ── Vertex data ───────────────────────────────────────────────────────
    vertex_pos: Vec<GeoPoint>,

    // ── CSR arc adjacency ─────────────────────────────────────────────────
    /// Length = `vertex_count + 1`.
    node_arc_start: Vec<u32>,
    arc_edge: Vec<EdgeId>,
    arc_dir: Vec<Direction>,
    arc_head: Vec<NodeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    edge_source: Vec<NodeId>,
    edge_target: Vec<NodeId>,
    edge_one_way: Vec<OneWay>,
    edge_cost_s: Vec<f64>,
    edge_reverse_cost_s: Vec<f64>,
    edge_speed_kmh: Vec<f64>,
    edge_priority: Vec<f64>,
    edge_class: Vec<RoadClass>,
    edge_length_m: Vec<f64>,
    edge_geom_start: Vec<u32>,
    geom_points: Vec<GeoPoint>,

    /// Fastest `length / stored time` over all usable directions, m/s.
    /// Lower-bounds travel time for A*.  Zero when unknown.
    max_speed_mps: f64,

    // ── Spatial indexes ───────────────────────────────────────────────────
    lon_scale: f64,
    vertex_idx: RTree<VertexEntry>,
    edge_idx: RTree<EdgeEntry>,
}

impl RoadGraph {
    /// A graph with no vertices or edges.  Every snap against it fails.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_pos.is_empty()
    }

    pub fn max_speed_mps(&self) -> f64 {
        self.max_speed_mps
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Position of `id`.  Panics if `id` did not come from this graph.
    #[inline]
    pub fn vertex_pos(&self, id: NodeId) -> GeoPoint {
        self.vertex_pos[id.index()]
    }

    /// Checked vertex lookup.
    pub fn vertex(&self, id: NodeId) -> Option<Vertex> {
        self.vertex_pos.get(id.index()).map(|&pos| Vertex { id, pos })
    }

    pub fn contains_vertex(&self, id: NodeId) -> bool {
        id.index() < self.vertex_pos.len()
    }

    /// Attribute view of `id`.  Panics if `id` did not come from this graph.
    pub fn edge(&self, id: EdgeId) -> EdgeRef<'_> {
        let i = id.index();
        EdgeRef {
            id,
            source: self.edge_source[i],
            target: self.edge_target[i],
            one_way: self.edge_one_way[i],
            cost_s: self.edge_cost_s[i],
            reverse_cost_s: self.edge_reverse_cost_s[i],
            forward_speed_kmh: self.edge_speed_kmh[i],
            priority: self.edge_priority[i],
            road_class: self.edge_class[i],
            length_m: self.edge_length_m[i],
            geometry: self.edge_geometry(id),
        }
    }

    /// Shape points of `id` in digitised (`source → target`) order.
    #[inline]
    pub fn edge_geometry(&self, id: EdgeId) -> &[GeoPoint] {
        let start = self.edge_geom_start[id.index()] as usize;
        let end = self.edge_geom_start[id.index() + 1] as usize;
        &self.geom_points[start..end]
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing arcs of `node` as `(edge, direction, head)`.
    ///
    /// Contiguous index range; no heap allocation.
    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, Direction, NodeId)> + '_ {
        let start = self.node_arc_start[node.index()] as usize;
        let end = self.node_arc_start[node.index() + 1] as usize;
        (start..end).map(|a| (self.arc_edge[a], self.arc_dir[a], self.arc_head[a]))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_arc_start[node.index()] as usize;
        let end = self.node_arc_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The vertex nearest to `pos` by ground distance.  `None` only if the
    /// graph is empty.
    ///
    /// The index shortlists [`NEAREST_SHORTLIST`] vertices in scaled-degree
    /// space; the shortlist is re-ranked by haversine distance (ties: smaller
    /// id), so a snapshot spanning many degrees of latitude still agrees
    /// with point-to-point distances used elsewhere.
    pub fn nearest_vertex(&self, pos: GeoPoint) -> Option<NodeId> {
        self.k_nearest_vertices(pos, NEAREST_SHORTLIST)
            .into_iter()
            .map(|id| (pos.distance_m(self.vertex_pos(id)), id))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Up to `k` nearest vertices, by ascending scaled-degree distance.
    pub fn k_nearest_vertices(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.vertex_idx
            .nearest_neighbor_iter(&self.key(pos))
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Every edge whose geometry passes within `radius_m` of `pos`, sorted
    /// by ascending distance and then by edge id.
    pub fn edges_within(&self, pos: GeoPoint, radius_m: f64) -> Vec<EdgeCandidate> {
        let (d_lat, d_lon) = pos.degree_extent(radius_m);
        let search = AABB::from_corners(
            self.key(GeoPoint::new(pos.lat - d_lat, pos.lon - d_lon)),
            self.key(GeoPoint::new(pos.lat + d_lat, pos.lon + d_lon)),
        );

        let mut found: Vec<EdgeCandidate> = self
            .edge_idx
            .locate_in_envelope_intersecting(&search)
            .filter_map(|entry| {
                let distance_m = pos.distance_to_polyline_m(self.edge_geometry(entry.id));
                (distance_m <= radius_m).then_some(EdgeCandidate { edge: entry.id, distance_m })
            })
            .collect();

        found.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then(a.edge.cmp(&b.edge)));
        found
    }

    #[inline]
    fn key(&self, pos: GeoPoint) -> [f64; 2] {
        [pos.lat, pos.lon * self.lon_scale]
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// Vertices and edges get sequential ids in insertion order.  `build()`
/// expands every edge into its two arcs, sorts arcs by tail vertex for the
/// CSR arrays, and bulk-loads both R-trees.
///
/// # Example
///
/// ```
/// use sr_core::GeoPoint;
/// use sr_graph::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_vertex(GeoPoint::new(43.4517, -80.4913));
/// let c = b.add_vertex(GeoPoint::new(43.4530, -80.4800));
/// b.add_road(a, c, 90.0);
/// let g = b.build();
/// assert_eq!(g.vertex_count(), 2);
/// assert_eq!(g.edge_count(), 1);
/// assert_eq!(g.out_degree(a), 1);
/// assert_eq!(g.out_degree(c), 1);
/// ```
pub struct RoadGraphBuilder {
    vertices: Vec<GeoPoint>,
    edges: Vec<EdgeSpec>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), edges: Vec::new() }
    }

    /// Pre-allocate for bulk loading from a snapshot.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Add a vertex and return its `NodeId` (sequential from 0).
    pub fn add_vertex(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.vertices.len() as u32);
        self.vertices.push(pos);
        id
    }

    /// Add a road segment and return its `EdgeId` (sequential from 0).
    pub fn add_edge(&mut self, spec: EdgeSpec) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(spec);
        id
    }

    /// Convenience: a straight two-way residential segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, cost_s: f64) -> EdgeId {
        self.add_edge(EdgeSpec::new(a, b, cost_s))
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the arc sort + O((N + E) log (N + E))
    /// for the R-tree bulk loads.
    pub fn build(self) -> RoadGraph {
        let vertex_count = self.vertices.len();
        let edge_count = self.edges.len();

        let lon_scale = if vertex_count == 0 {
            1.0
        } else {
            let mean_lat = self.vertices.iter().map(|p| p.lat).sum::<f64>() / vertex_count as f64;
            mean_lat.to_radians().cos().abs().max(1e-6)
        };

        // ── Edge attribute arrays ─────────────────────────────────────────
        let mut edge_source         = Vec::with_capacity(edge_count);
        let mut edge_target         = Vec::with_capacity(edge_count);
        let mut edge_one_way        = Vec::with_capacity(edge_count);
        let mut edge_cost_s         = Vec::with_capacity(edge_count);
        let mut edge_reverse_cost_s = Vec::with_capacity(edge_count);
        let mut edge_speed_kmh      = Vec::with_capacity(edge_count);
        let mut edge_priority       = Vec::with_capacity(edge_count);
        let mut edge_class          = Vec::with_capacity(edge_count);
        let mut edge_length_m       = Vec::with_capacity(edge_count);
        let mut edge_geom_start     = Vec::with_capacity(edge_count + 1);
        let mut geom_points         = Vec::with_capacity(edge_count * 2);
        let mut edge_entries        = Vec::with_capacity(edge_count);
        let mut max_speed_mps: f64  = 0.0;

        for (i, spec) in self.edges.into_iter().enumerate() {
            let id = EdgeId(i as u32);
            let geometry = if spec.geometry.len() >= 2 {
                spec.geometry
            } else {
                vec![self.vertices[spec.source.index()], self.vertices[spec.target.index()]]
            };
            let length_m = spec
                .length_m
                .unwrap_or_else(|| geometry.windows(2).map(|w| w[0].distance_m(w[1])).sum());

            for cost in [spec.cost_s, spec.reverse_cost_s] {
                if cost > 0.0 && cost.is_finite() {
                    max_speed_mps = max_speed_mps.max(length_m / cost);
                }
            }

            let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
            for p in &geometry {
                let k = [p.lat, p.lon * lon_scale];
                lo = [lo[0].min(k[0]), lo[1].min(k[1])];
                hi = [hi[0].max(k[0]), hi[1].max(k[1])];
            }
            edge_entries.push(EdgeEntry { envelope: AABB::from_corners(lo, hi), id });

            edge_geom_start.push(geom_points.len() as u32);
            geom_points.extend(geometry);

            edge_source.push(spec.source);
            edge_target.push(spec.target);
            edge_one_way.push(spec.one_way);
            edge_cost_s.push(spec.cost_s);
            edge_reverse_cost_s.push(spec.reverse_cost_s);
            edge_speed_kmh.push(spec.forward_speed_kmh);
            edge_priority.push(spec.priority);
            edge_class.push(spec.road_class);
            edge_length_m.push(length_m);
        }
        edge_geom_start.push(geom_points.len() as u32);

        // ── Arcs, sorted by tail (stable: edge order within a tail) ───────
        let mut arcs: Vec<(NodeId, EdgeId, Direction, NodeId)> = Vec::with_capacity(edge_count * 2);
        for i in 0..edge_count {
            let (s, t) = (edge_source[i], edge_target[i]);
            arcs.push((s, EdgeId(i as u32), Direction::Forward, t));
            arcs.push((t, EdgeId(i as u32), Direction::Reverse, s));
        }
        arcs.sort_by_key(|a| a.0);

        let mut node_arc_start = vec![0u32; vertex_count + 1];
        for a in &arcs {
            node_arc_start[a.0.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            node_arc_start[i] += node_arc_start[i - 1];
        }
        debug_assert_eq!(node_arc_start[vertex_count] as usize, arcs.len());

        let arc_edge = arcs.iter().map(|a| a.1).collect();
        let arc_dir  = arcs.iter().map(|a| a.2).collect();
        let arc_head = arcs.iter().map(|a| a.3).collect();

        // ── Spatial indexes ───────────────────────────────────────────────
        let vertex_entries: Vec<VertexEntry> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, p)| VertexEntry { point: [p.lat, p.lon * lon_scale], id: NodeId(i as u32) })
            .collect();

        RoadGraph {
            vertex_pos: self.vertices,
            node_arc_start,
            arc_edge,
            arc_dir,
            arc_head,
            edge_source,
            edge_target,
            edge_one_way,
            edge_cost_s,
            edge_reverse_cost_s,
            edge_speed_kmh,
            edge_priority,
            edge_class,
            edge_length_m,
            edge_geom_start,
            geom_points,
            max_speed_mps,
            lon_scale,
            vertex_idx: RTree::bulk_load(vertex_entries),
            edge_idx: RTree::bulk_load(edge_entries),
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
