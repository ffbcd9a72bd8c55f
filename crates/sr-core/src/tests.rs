//! Unit tests for sr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_and_try_from() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel() {
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert!(!NodeId::default().is_valid());
        assert!(NodeId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(EdgeId(7).to_string(), "EdgeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use std::f64::consts::{FRAC_PI_2, PI};

    use crate::{angle_between, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(43.4517, -80.4913);
        assert!(p.distance_m(p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(43.0, -80.0);
        let b = GeoPoint::new(44.0, -80.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn cardinal_bearings() {
        let o = GeoPoint::new(43.45, -80.49);
        let north = o.bearing_to(GeoPoint::new(43.46, -80.49));
        let east = o.bearing_to(GeoPoint::new(43.45, -80.48));
        let south = o.bearing_to(GeoPoint::new(43.44, -80.49));
        let west = o.bearing_to(GeoPoint::new(43.45, -80.50));
        assert!(north.abs() < 1e-9, "north {north}");
        assert!((east - FRAC_PI_2).abs() < 1e-3, "east {east}");
        assert!((south - PI).abs() < 1e-9, "south {south}");
        assert!((west - 3.0 * FRAC_PI_2).abs() < 1e-3, "west {west}");
    }

    #[test]
    fn angle_wraps_across_north() {
        // 350° vs 10° are 20° apart, not 340°.
        let a = 350f64.to_radians();
        let b = 10f64.to_radians();
        assert!((angle_between(a, b) - 20f64.to_radians()).abs() < 1e-9);
        assert!((angle_between(b, a) - 20f64.to_radians()).abs() < 1e-9);
        assert!((angle_between(0.0, PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn segment_distance_interior_and_endpoint() {
        let a = GeoPoint::new(43.4507, -80.4930);
        let b = GeoPoint::new(43.4507, -80.4912);
        // On the segment.
        let mid = GeoPoint::new(43.4507, -80.4921);
        assert!(mid.distance_to_segment_m(a, b) < 0.01);
        // 0.001° north of the midpoint ≈ 111 m.
        let above = GeoPoint::new(43.4517, -80.4921);
        let d = above.distance_to_segment_m(a, b);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
        // Beyond the east end: distance to `b`.
        let past = GeoPoint::new(43.4507, -80.4900);
        let d = past.distance_to_segment_m(a, b);
        assert!((d - past.distance_m(b)).abs() < 0.5, "got {d}");
    }

    #[test]
    fn polyline_distance_edge_cases() {
        let p = GeoPoint::new(0.0, 0.0);
        assert!(p.distance_to_polyline_m(&[]).is_infinite());
        let q = GeoPoint::new(0.0, 0.001);
        assert!((p.distance_to_polyline_m(&[q]) - p.distance_m(q)).abs() < 1e-9);
    }

    #[test]
    fn degree_extent_contains_radius() {
        let c = GeoPoint::new(43.45, -80.49);
        let (d_lat, d_lon) = c.degree_extent(150.0);
        assert!(c.distance_m(GeoPoint::new(c.lat + d_lat, c.lon)) >= 149.9);
        assert!(c.distance_m(GeoPoint::new(c.lat, c.lon + d_lon)) >= 149.9);
    }

    #[test]
    fn parse_lat_lng() {
        let p: GeoPoint = " 43.43656 , -80.45172 ".parse().unwrap();
        assert_eq!(p, GeoPoint::new(43.43656, -80.45172));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("43.4".parse::<GeoPoint>().is_err());
        assert!("43.4,-80.4,1".parse::<GeoPoint>().is_err());
        assert!("abc,-80.4".parse::<GeoPoint>().is_err());
        assert!("95.0,-80.4".parse::<GeoPoint>().is_err());
        assert!("NaN,-80.4".parse::<GeoPoint>().is_err());
    }
}

#[cfg(test)]
mod stop {
    use crate::{GeoPoint, Stop, StopStatus, StopSummary};

    #[test]
    fn summary_copies_fields() {
        let mut s = Stop::at(3, GeoPoint::new(43.45, -80.49));
        s.address = "Stop 3: 85 Duke St".into();
        s.formatted_address = "85 Duke Street West".into();
        let sum = StopSummary::from(&s);
        assert_eq!(sum.stop_number, 3);
        assert_eq!(sum.address, "Stop 3: 85 Duke St");
        assert_eq!(sum.formatted_address, "85 Duke Street West");
        assert_eq!((sum.lat, sum.lng), (43.45, -80.49));
    }

    #[test]
    fn status_default_is_failed() {
        assert_eq!(StopStatus::default(), StopStatus::Failed);
        assert!(Stop::at(1, GeoPoint::new(0.0, 0.0)).is_success());
    }
}
