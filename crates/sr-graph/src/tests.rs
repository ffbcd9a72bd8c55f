//! Unit tests for sr-graph.
//!
//! All tests use hand-built graphs or small inline CSV/SQLite snapshots.

#[cfg(test)]
mod helpers {
    use sr_core::{GeoPoint, NodeId};

    use crate::{Direction, EdgeCost, EdgeRef, RoadGraph, RoadGraphBuilder, Traversal};

    /// Stored travel time in minutes, honouring one-way markings and
    /// negative (absent) costs.
    pub struct StoredTime;

    impl EdgeCost for StoredTime {
        fn cost(&self, edge: &EdgeRef<'_>, dir: Direction) -> Traversal {
            if edge.one_way.forbids(dir) {
                return Traversal::Unreachable;
            }
            let s = edge.stored_cost_s(dir);
            if s < 0.0 { Traversal::Unreachable } else { Traversal::Cost(s / 60.0) }
        }
    }

    /// Five vertices around a block:
    ///
    /// ```text
    ///   n3 ─────────────── n4
    ///   │                   │
    ///   n0 ────── n1 ────── n2
    /// ```
    ///
    /// Edges (seconds): e0 0-1 60, e1 1-2 60, e2 2-4 60, e3 0-3 300, e4 3-4 60.
    /// Cheapest 0→4 is e0, e1, e2 = 3 minutes.
    pub fn block() -> (RoadGraph, [NodeId; 5]) {
        let mut b = RoadGraphBuilder::new();
        let n0 = b.add_vertex(GeoPoint::new(43.450, -80.490));
        let n1 = b.add_vertex(GeoPoint::new(43.450, -80.485));
        let n2 = b.add_vertex(GeoPoint::new(43.450, -80.480));
        let n3 = b.add_vertex(GeoPoint::new(43.455, -80.490));
        let n4 = b.add_vertex(GeoPoint::new(43.455, -80.480));

        b.add_road(n0, n1, 60.0);
        b.add_road(n1, n2, 60.0);
        b.add_road(n2, n4, 60.0);
        b.add_road(n0, n3, 300.0);
        b.add_road(n3, n4, 60.0);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & CSR structure ───────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use sr_core::{EdgeId, GeoPoint};

    use crate::{Direction, EdgeSpec, RoadGraph, RoadGraphBuilder};

    #[test]
    fn empty_build() {
        let g = RoadGraphBuilder::new().build();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert_eq!(g.max_speed_mps(), 0.0);
    }

    #[test]
    fn empty_graph_constructor() {
        let g = RoadGraph::empty();
        assert!(g.is_empty());
        assert!(g.nearest_vertex(GeoPoint::new(43.45, -80.49)).is_none());
    }

    #[test]
    fn one_edge_gives_two_arcs() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_vertex(GeoPoint::new(43.4517, -80.4913));
        let c = b.add_vertex(GeoPoint::new(43.4530, -80.4800));
        b.add_road(a, c, 90.0);
        let g = b.build();

        assert_eq!(g.edge_count(), 1);
        let from_a: Vec<_> = g.out_arcs(a).collect();
        let from_c: Vec<_> = g.out_arcs(c).collect();
        assert_eq!(from_a, vec![(EdgeId(0), Direction::Forward, c)]);
        assert_eq!(from_c, vec![(EdgeId(0), Direction::Reverse, a)]);
    }

    #[test]
    fn csr_degrees() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::block();
        assert_eq!(g.out_degree(n0), 2);
        assert_eq!(g.out_degree(n1), 2);
        assert_eq!(g.out_degree(n2), 2);
        assert_eq!(g.out_degree(n3), 2);
        assert_eq!(g.out_degree(n4), 2);
        for n in [n0, n1, n2, n3, n4] {
            for (edge, dir, head) in g.out_arcs(n) {
                let e = g.edge(edge);
                assert_eq!(e.tail(dir), n);
                assert_eq!(e.head(dir), head);
            }
        }
    }

    #[test]
    fn straight_geometry_and_derived_length() {
        let (g, [n0, n1, ..]) = super::helpers::block();
        let e = g.edge(EdgeId(0));
        assert_eq!(e.geometry, &[g.vertex_pos(n0), g.vertex_pos(n1)]);
        let expected = g.vertex_pos(n0).distance_m(g.vertex_pos(n1));
        assert!((e.length_m - expected).abs() < 1e-6);
    }

    #[test]
    fn explicit_length_and_shape_kept() {
        let mut b = RoadGraphBuilder::new();
        let (pa, pc) = (GeoPoint::new(43.450, -80.490), GeoPoint::new(43.450, -80.480));
        let a = b.add_vertex(pa);
        let c = b.add_vertex(pc);
        let bend = GeoPoint::new(43.452, -80.485);
        b.add_edge(
            EdgeSpec::new(a, c, 100.0)
                .geometry(vec![pa, bend, pc])
                .length_m(950.0),
        );
        let g = b.build();
        let e = g.edge(EdgeId(0));
        assert_eq!(e.geometry.len(), 3);
        assert_eq!(e.geometry[1], bend);
        assert_eq!(e.length_m, 950.0);
        assert!((g.max_speed_mps() - 9.5).abs() < 1e-9);
    }

    #[test]
    fn vertex_lookup_is_checked() {
        let (g, [n0, ..]) = super::helpers::block();
        assert_eq!(g.vertex(n0).map(|v| v.id), Some(n0));
        assert!(g.vertex(sr_core::NodeId(99)).is_none());
        assert!(!g.contains_vertex(sr_core::NodeId::INVALID));
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use sr_core::{EdgeId, GeoPoint};

    use crate::{RoadGraph, RoadGraphBuilder};

    #[test]
    fn nearest_vertex_exact_and_offset() {
        let (g, [n0, n1, _, _, n4]) = super::helpers::block();
        assert_eq!(g.nearest_vertex(g.vertex_pos(n1)), Some(n1));
        assert_eq!(g.nearest_vertex(GeoPoint::new(43.4501, -80.4899)), Some(n0));
        assert_eq!(g.nearest_vertex(GeoPoint::new(43.46, -80.47)), Some(n4));
    }

    #[test]
    fn nearest_vertex_uses_ground_distance() {
        let mut b = RoadGraphBuilder::new();
        // 0.9° of longitude at 60°N is ~50 km; 0.6° of latitude is ~67 km.
        // The index scales longitude by cos(mean lat ≈ 40°), which ranks
        // `north` first; ground distance must pick `east`.
        let east = b.add_vertex(GeoPoint::new(60.0, 0.9));
        let north = b.add_vertex(GeoPoint::new(60.6, 0.0));
        b.add_vertex(GeoPoint::new(0.0, 0.0));
        let g = b.build();

        let q = GeoPoint::new(60.0, 0.0);
        assert_eq!(g.k_nearest_vertices(q, 1), vec![north]);
        assert_eq!(g.nearest_vertex(q), Some(east));
    }

    #[test]
    fn k_nearest_by_distance() {
        let (g, [n0, n1, n2, ..]) = super::helpers::block();
        let near = g.k_nearest_vertices(GeoPoint::new(43.450, -80.4849), 3);
        assert_eq!(near[0], n1);
        assert_eq!(near.len(), 3);
        assert!(near.contains(&n0) || near.contains(&n2));
    }

    #[test]
    fn edges_within_sorted_by_distance_then_id() {
        let (g, [_, n1, ..]) = super::helpers::block();
        let found = g.edges_within(g.vertex_pos(n1), 10.0);
        let ids: Vec<_> = found.iter().map(|c| c.edge).collect();
        assert_eq!(ids, vec![EdgeId(0), EdgeId(1)]);
        assert!(found.iter().all(|c| c.distance_m < 1e-6));
    }

    #[test]
    fn edges_within_respects_radius() {
        let (g, _) = super::helpers::block();
        // ~55 m north of the n0-n2 street, ~500 m from everything else.
        let p = GeoPoint::new(43.4505, -80.487);
        let close = g.edges_within(p, 100.0);
        assert_eq!(close.len(), 1);
        assert_eq!(close[0].edge, EdgeId(0));
        assert!((close[0].distance_m - 55.6).abs() < 1.0);

        assert!(g.edges_within(p, 20.0).is_empty());
        assert_eq!(g.edges_within(p, 2_000.0).len(), 5);
    }

    #[test]
    fn edges_within_empty_graph() {
        assert!(RoadGraph::empty().edges_within(GeoPoint::new(0.0, 0.0), 500.0).is_empty());
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::time::Instant;

    use sr_core::{EdgeId, GeoPoint, NodeId};

    use super::helpers::StoredTime;
    use crate::{
        AStarRouter, CancelFlag, Direction, DijkstraRouter, EdgeSpec, GraphError, OneWay,
        PathStep, RoadGraphBuilder, Router, SearchLimits,
    };

    #[test]
    fn dijkstra_picks_cheapest() {
        let (g, [n0, _, _, _, n4]) = super::helpers::block();
        let path = DijkstraRouter.route(&g, n0, n4, &StoredTime, &SearchLimits::unbounded()).unwrap();
        let edges: Vec<_> = path.steps.iter().map(|s| s.edge).collect();
        assert_eq!(edges, vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
        assert!(path.steps.iter().all(|s| s.direction == Direction::Forward));
        assert!((path.cost_minutes - 3.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_traversal_recorded() {
        let (g, [n0, _, _, _, n4]) = super::helpers::block();
        let path = DijkstraRouter.route(&g, n4, n0, &StoredTime, &SearchLimits::unbounded()).unwrap();
        assert_eq!(
            path.steps,
            vec![
                PathStep { edge: EdgeId(2), direction: Direction::Reverse },
                PathStep { edge: EdgeId(1), direction: Direction::Reverse },
                PathStep { edge: EdgeId(0), direction: Direction::Reverse },
            ]
        );
    }

    #[test]
    fn same_vertex_gives_empty_path() {
        let (g, [n0, ..]) = super::helpers::block();
        let path = DijkstraRouter.route(&g, n0, n0, &StoredTime, &SearchLimits::unbounded()).unwrap();
        assert!(path.steps.is_empty());
        assert_eq!(path.cost_minutes, 0.0);
    }

    #[test]
    fn astar_agrees_with_dijkstra() {
        let (g, nodes) = super::helpers::block();
        for &a in &nodes {
            for &b in &nodes {
                let d = DijkstraRouter.route(&g, a, b, &StoredTime, &SearchLimits::unbounded()).unwrap();
                let s = AStarRouter.route(&g, a, b, &StoredTime, &SearchLimits::unbounded()).unwrap();
                assert!((d.cost_minutes - s.cost_minutes).abs() < 1e-9, "{a} → {b}");
            }
        }
    }

    #[test]
    fn one_way_blocks_reverse() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_vertex(GeoPoint::new(43.450, -80.490));
        let c = b.add_vertex(GeoPoint::new(43.450, -80.480));
        b.add_edge(EdgeSpec::new(a, c, 60.0).one_way(OneWay::Forward));
        let g = b.build();

        assert!(DijkstraRouter.route(&g, a, c, &StoredTime, &SearchLimits::unbounded()).is_ok());
        let err = DijkstraRouter.route(&g, c, a, &StoredTime, &SearchLimits::unbounded()).unwrap_err();
        assert!(matches!(err, GraphError::NoRoute { from, to } if from == c && to == a));
    }

    #[test]
    fn negative_stored_cost_is_absent() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_vertex(GeoPoint::new(43.450, -80.490));
        let c = b.add_vertex(GeoPoint::new(43.450, -80.480));
        b.add_edge(EdgeSpec::new(a, c, 60.0).reverse_cost(-60.0));
        let g = b.build();
        let err = DijkstraRouter.route(&g, c, a, &StoredTime, &SearchLimits::unbounded()).unwrap_err();
        assert!(matches!(err, GraphError::NoRoute { .. }));
    }

    #[test]
    fn unknown_node_rejected() {
        let (g, [n0, ..]) = super::helpers::block();
        let err = DijkstraRouter
            .route(&g, n0, NodeId(99), &StoredTime, &SearchLimits::unbounded())
            .unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(NodeId(99))));
    }

    #[test]
    fn cancelled_before_start() {
        let (g, [n0, _, _, _, n4]) = super::helpers::block();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let limits = SearchLimits::new(None, cancel);
        let err = DijkstraRouter.route(&g, n0, n4, &StoredTime, &limits).unwrap_err();
        assert!(matches!(err, GraphError::Cancelled));
    }

    #[test]
    fn guard_cancels_on_drop() {
        let cancel = CancelFlag::new();
        {
            let _guard = cancel.guard();
            assert!(!cancel.is_cancelled());
        }
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn expired_deadline_times_out() {
        let (g, [n0, _, _, _, n4]) = super::helpers::block();
        let limits = SearchLimits { deadline: Some(Instant::now()), cancel: CancelFlag::new() };
        let err = AStarRouter.route(&g, n0, n4, &StoredTime, &limits).unwrap_err();
        assert!(matches!(err, GraphError::Timeout { from, to, .. } if from == n0 && to == n4));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Write;

    use sr_core::{EdgeId, NodeId};

    use super::helpers::StoredTime;
    use crate::loader::parse_linestring;
    use crate::{
        load_csv, load_csv_readers, DijkstraRouter, GraphError, OneWay, RoadClass, Router,
        SearchLimits,
    };

    const VERTICES: &str = "\
id,lat,lon
101,43.4517,-80.4913
102,43.4507,-80.4921
103,43.4530,-80.4800
";

    const WAYS: &str = "\
gid,source,target,length_m,cost_s,reverse_cost_s,one_way,maxspeed_forward,priority,tag,geometry
7,101,102,128.4,11.6,-11.6,1,40,1.0,primary,\"LINESTRING(-80.4913 43.4517,-80.4921 43.4507)\"
3,102,103,,50,50,,,,residential,
";

    #[test]
    fn readers_build_graph() {
        let g = load_csv_readers(VERTICES.as_bytes(), WAYS.as_bytes()).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);

        // Ways are ordered by gid: gid 3 first.
        let res = g.edge(EdgeId(0));
        assert_eq!((res.source, res.target), (NodeId(1), NodeId(2)));
        assert_eq!(res.one_way, OneWay::None);
        assert_eq!(res.road_class, RoadClass::Residential);
        assert_eq!(res.forward_speed_kmh, RoadClass::Residential.default_speed_kmh());
        assert_eq!(res.priority, 0.0);

        let pri = g.edge(EdgeId(1));
        assert_eq!(pri.one_way, OneWay::Forward);
        assert_eq!(pri.road_class, RoadClass::Primary);
        assert_eq!(pri.forward_speed_kmh, 40.0);
        assert_eq!(pri.length_m, 128.4);
        assert_eq!(pri.priority, 1.0);
        assert_eq!(pri.geometry.len(), 2);
    }

    #[test]
    fn loaded_one_way_is_enforced() {
        let g = load_csv_readers(VERTICES.as_bytes(), WAYS.as_bytes()).unwrap();
        let limits = SearchLimits::unbounded();
        assert!(DijkstraRouter.route(&g, NodeId(0), NodeId(2), &StoredTime, &limits).is_ok());
        let err = DijkstraRouter.route(&g, NodeId(2), NodeId(0), &StoredTime, &limits).unwrap_err();
        assert!(matches!(err, GraphError::NoRoute { .. }));
    }

    #[test]
    fn unknown_vertex_is_parse_error() {
        let ways = "\
gid,source,target,length_m,cost_s,reverse_cost_s,one_way,maxspeed_forward,priority,tag,geometry
1,101,999,,10,10,,,,residential,
";
        match load_csv_readers(VERTICES.as_bytes(), ways.as_bytes()) {
            Err(GraphError::Parse(msg)) => assert!(msg.contains("999"), "{msg}"),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("unknown vertex accepted"),
        }
    }

    #[test]
    fn duplicate_vertex_is_parse_error() {
        let vertices = "id,lat,lon\n1,43.0,-80.0\n1,43.1,-80.1\n";
        let ways = "gid,source,target,length_m,cost_s,reverse_cost_s,one_way,maxspeed_forward,priority,tag,geometry\n";
        assert!(matches!(
            load_csv_readers(vertices.as_bytes(), ways.as_bytes()),
            Err(GraphError::Parse(_))
        ));
    }

    #[test]
    fn malformed_row_is_csv_error() {
        let vertices = "id,lat,lon\n1,north,-80.0\n";
        let ways = "gid,source,target,length_m,cost_s,reverse_cost_s,one_way,maxspeed_forward,priority,tag,geometry\n";
        assert!(matches!(
            load_csv_readers(vertices.as_bytes(), ways.as_bytes()),
            Err(GraphError::Csv(_))
        ));
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let vpath = dir.path().join("vertices.csv");
        let wpath = dir.path().join("ways.csv");
        std::fs::File::create(&vpath).unwrap().write_all(VERTICES.as_bytes()).unwrap();
        std::fs::File::create(&wpath).unwrap().write_all(WAYS.as_bytes()).unwrap();

        let g = load_csv(&vpath, &wpath).unwrap();
        assert_eq!(g.edge_count(), 2);

        let missing = dir.path().join("nope.csv");
        assert!(matches!(load_csv(&missing, &wpath), Err(GraphError::Io(_))));
    }

    #[test]
    fn linestring_forms() {
        assert!(parse_linestring("").unwrap().is_empty());

        let pts = parse_linestring("LINESTRING(-80.49 43.45, -80.48 43.46)").unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!((pts[0].lat, pts[0].lon), (43.45, -80.49));

        let pts = parse_linestring("SRID=4326;linestring (-80.49 43.45,-80.485 43.455,-80.48 43.46)").unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[1].lon, -80.485);

        assert!(parse_linestring("POINT(1 2)").is_err());
        assert!(parse_linestring("LINESTRING(1 2 3)").is_err());
        assert!(parse_linestring("LINESTRING(a b)").is_err());
    }
}

// ── SQLite loader ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite {
    use crate::sqlite::{load_sqlite, BBox};
    use crate::OneWay;

    fn fixture(path: &std::path::Path) {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE ways_vertices_pgr (id INTEGER PRIMARY KEY, lat REAL, lon REAL);
             CREATE TABLE ways (
                 gid INTEGER PRIMARY KEY, source INTEGER, target INTEGER,
                 length_m REAL, cost_s REAL, reverse_cost_s REAL, one_way INTEGER,
                 maxspeed_forward REAL, priority REAL, tag TEXT, geometry TEXT
             );
             INSERT INTO ways_vertices_pgr VALUES (101, 43.4517, -80.4913);
             INSERT INTO ways_vertices_pgr VALUES (102, 43.4507, -80.4921);
             INSERT INTO ways_vertices_pgr VALUES (103, 43.4530, -80.4800);
             INSERT INTO ways VALUES (7, 101, 102, 128.4, 11.6, -11.6, 1, 40, 1.0, 'primary', NULL);
             INSERT INTO ways VALUES (3, 102, 103, NULL, 50, 50, NULL, NULL, NULL, NULL, NULL);",
        )
        .unwrap();
    }

    #[test]
    fn loads_whole_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.db");
        fixture(&path);

        let g = load_sqlite(&path, None).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge(sr_core::EdgeId(1)).one_way, OneWay::Forward);
    }

    #[test]
    fn bbox_drops_outside_ways() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.db");
        fixture(&path);

        let bbox = BBox { min_lat: 43.45, min_lon: -80.495, max_lat: 43.46, max_lon: -80.49 };
        let g = load_sqlite(&path, Some(bbox)).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_sqlite(&dir.path().join("absent.db"), None).is_err());
    }
}
