//! Edge attributes: one-way marking, traversal direction, road class.

use sr_core::{EdgeId, GeoPoint, NodeId};

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Legal travel direction(s) of a road segment relative to its digitised
/// `source → target` order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum OneWay {
    /// Two-way road.
    #[default]
    None,
    /// Only `source → target` is legal.
    Forward,
    /// Only `target → source` is legal.
    Reverse,
}

impl OneWay {
    /// Decode the osm2pgrouting `one_way` column: `1` forward, `-1` reverse,
    /// everything else (unknown, two-way, reversible) two-way.
    pub fn from_pgr(code: i64) -> Self {
        match code {
            1  => OneWay::Forward,
            -1 => OneWay::Reverse,
            _  => OneWay::None,
        }
    }

    /// `true` if this marking forbids travelling in `dir`.
    #[inline]
    pub fn forbids(self, dir: Direction) -> bool {
        matches!(
            (self, dir),
            (OneWay::Forward, Direction::Reverse) | (OneWay::Reverse, Direction::Forward)
        )
    }
}

/// Direction in which an edge is traversed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `source → target`.
    Forward,
    /// `target → source`.
    Reverse,
}

impl Direction {
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Functional road class, from the OSM `highway` tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    #[default]
    Residential,
    Service,
    Unclassified,
    Other,
}

impl RoadClass {
    /// Map an OSM `highway=*` value (links fold into their parent class).
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "motorway"  | "motorway_link"          => RoadClass::Motorway,
            "trunk"     | "trunk_link"             => RoadClass::Trunk,
            "primary"   | "primary_link"           => RoadClass::Primary,
            "secondary" | "secondary_link"         => RoadClass::Secondary,
            "tertiary"  | "tertiary_link"          => RoadClass::Tertiary,
            "residential" | "living_street"        => RoadClass::Residential,
            "service"                              => RoadClass::Service,
            "unclassified" | "road"                => RoadClass::Unclassified,
            _                                      => RoadClass::Other,
        }
    }

    /// Limited-access, highway-class roads.
    #[inline]
    pub fn is_highway(self) -> bool {
        matches!(self, RoadClass::Motorway | RoadClass::Trunk)
    }

    /// Assumed free-flow speed (km/h) when the source data has none.
    pub fn default_speed_kmh(self) -> f64 {
        match self {
            RoadClass::Motorway     => 105.0,
            RoadClass::Trunk        => 90.0,
            RoadClass::Primary      => 70.0,
            RoadClass::Secondary    => 60.0,
            RoadClass::Tertiary     => 50.0,
            RoadClass::Residential  => 40.0,
            RoadClass::Service      => 20.0,
            RoadClass::Unclassified => 40.0,
            RoadClass::Other        => 30.0,
        }
    }
}

// ── EdgeSpec ──────────────────────────────────────────────────────────────────

/// Everything needed to add one road segment to a
/// [`RoadGraphBuilder`](crate::RoadGraphBuilder).
///
/// ```
/// use sr_core::GeoPoint;
/// use sr_graph::{EdgeSpec, OneWay, RoadClass, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_vertex(GeoPoint::new(43.4517, -80.4913));
/// let c = b.add_vertex(GeoPoint::new(43.4507, -80.4921));
/// b.add_edge(EdgeSpec::new(a, c, 18.0).one_way(OneWay::Forward).class(RoadClass::Primary));
/// let g = b.build();
/// assert_eq!(g.edge_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct EdgeSpec {
    pub source: NodeId,
    pub target: NodeId,
    /// Intermediate shape points including both ends.  Empty means a straight
    /// line between the end vertices.
    pub geometry: Vec<GeoPoint>,
    pub one_way: OneWay,
    /// Stored `source → target` travel time in seconds.  Negative means the
    /// direction does not exist (pgRouting convention).
    pub cost_s: f64,
    /// Stored `target → source` travel time in seconds.
    pub reverse_cost_s: f64,
    pub forward_speed_kmh: f64,
    /// Source-data routing priority.  `0.0` means unset.
    pub priority: f64,
    pub road_class: RoadClass,
    /// Physical length; derived from the geometry when `None`.
    pub length_m: Option<f64>,
}

impl EdgeSpec {
    /// A two-way residential segment with equal travel time both ways.
    pub fn new(source: NodeId, target: NodeId, cost_s: f64) -> Self {
        Self {
            source,
            target,
            geometry: Vec::new(),
            one_way: OneWay::None,
            cost_s,
            reverse_cost_s: cost_s,
            forward_speed_kmh: RoadClass::Residential.default_speed_kmh(),
            priority: 0.0,
            road_class: RoadClass::Residential,
            length_m: None,
        }
    }

    pub fn one_way(mut self, one_way: OneWay) -> Self {
        self.one_way = one_way;
        self
    }

    pub fn reverse_cost(mut self, reverse_cost_s: f64) -> Self {
        self.reverse_cost_s = reverse_cost_s;
        self
    }

    /// Set the road class; also resets the speed to the class default.
    pub fn class(mut self, road_class: RoadClass) -> Self {
        self.road_class = road_class;
        self.forward_speed_kmh = road_class.default_speed_kmh();
        self
    }

    pub fn speed_kmh(mut self, kmh: f64) -> Self {
        self.forward_speed_kmh = kmh;
        self
    }

    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn length_m(mut self, length_m: f64) -> Self {
        self.length_m = Some(length_m);
        self
    }
}

// ── EdgeRef ───────────────────────────────────────────────────────────────────

/// Read-only view of one edge's attributes, borrowed from a
/// [`RoadGraph`](crate::RoadGraph).
#[derive(Copy, Clone, Debug)]
pub struct EdgeRef<'g> {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub one_way: OneWay,
    pub cost_s: f64,
    pub reverse_cost_s: f64,
    pub forward_speed_kmh: f64,
    pub priority: f64,
    pub road_class: RoadClass,
    pub length_m: f64,
    /// Shape points from `source` to `target`; always at least two.
    pub geometry: &'g [GeoPoint],
}

impl EdgeRef<'_> {
    /// Stored travel time (seconds) when traversed in `dir`.
    #[inline]
    pub fn stored_cost_s(&self, dir: Direction) -> f64 {
        match dir {
            Direction::Forward => self.cost_s,
            Direction::Reverse => self.reverse_cost_s,
        }
    }

    /// Vertex the traversal starts from.
    #[inline]
    pub fn tail(&self, dir: Direction) -> NodeId {
        match dir {
            Direction::Forward => self.source,
            Direction::Reverse => self.target,
        }
    }

    /// Vertex the traversal ends at.
    #[inline]
    pub fn head(&self, dir: Direction) -> NodeId {
        self.tail(dir.reversed())
    }

    /// Bearing of the digitised direction, first shape point to last.
    pub fn bearing(&self) -> f64 {
        match (self.geometry.first(), self.geometry.last()) {
            (Some(a), Some(b)) => a.bearing_to(*b),
            _ => 0.0,
        }
    }
}
