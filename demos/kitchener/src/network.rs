//! Synthetic downtown Kitchener road network.
//!
//! Seven intersections around King St, with Weber St as a one-way and a
//! short stretch of Highway 85 on the east side.

use sr_core::{GeoPoint, NodeId};
use sr_graph::{EdgeSpec, OneWay, RoadClass, RoadGraph, RoadGraphBuilder};

/// Build the network.
///
/// Returns `(graph, [city_hall, market, victoria_park, charles_station,
/// weber_north, grand_river, hwy_85])`.
pub fn build_network() -> (RoadGraph, [NodeId; 7]) {
    let mut b = RoadGraphBuilder::new();

    let city_hall       = b.add_vertex(GeoPoint::new(43.4516, -80.4925));
    let market          = b.add_vertex(GeoPoint::new(43.4545, -80.4883));
    let victoria_park   = b.add_vertex(GeoPoint::new(43.4475, -80.4990));
    let charles_station = b.add_vertex(GeoPoint::new(43.4490, -80.4895));
    let weber_north     = b.add_vertex(GeoPoint::new(43.4560, -80.4935));
    let grand_river     = b.add_vertex(GeoPoint::new(43.4610, -80.4790));
    let hwy_85          = b.add_vertex(GeoPoint::new(43.4660, -80.4840));

    // King St: primary, two-way.
    b.add_edge(EdgeSpec::new(victoria_park, city_hall, 75.0).class(RoadClass::Primary).speed_kmh(50.0));
    b.add_edge(EdgeSpec::new(city_hall, market, 60.0).class(RoadClass::Primary).speed_kmh(50.0));
    b.add_edge(EdgeSpec::new(market, grand_river, 110.0).class(RoadClass::Primary).speed_kmh(50.0));

    // Weber St: one-way eastbound.
    b.add_edge(EdgeSpec::new(weber_north, market, 55.0).one_way(OneWay::Forward).class(RoadClass::Secondary));

    // Residential connectors.
    b.add_road(city_hall, charles_station, 50.0);
    b.add_road(charles_station, market, 80.0);
    b.add_road(city_hall, weber_north, 70.0);
    b.add_road(victoria_park, charles_station, 90.0);

    // Highway 85 ramp to Grand River.
    b.add_edge(
        EdgeSpec::new(weber_north, hwy_85, 65.0)
            .class(RoadClass::Motorway)
            .speed_kmh(100.0)
            .priority(1.0),
    );
    b.add_edge(
        EdgeSpec::new(hwy_85, grand_river, 50.0)
            .class(RoadClass::Motorway)
            .speed_kmh(100.0)
            .priority(1.0),
    );

    let graph = b.build();
    (graph, [city_hall, market, victoria_park, charles_station, weber_north, grand_river, hwy_85])
}
