//! CSV graph snapshot loader.
//!
//! # File format
//!
//! Two files mirroring the osm2pgrouting `ways_vertices_pgr` and `ways`
//! tables:
//!
//! ```csv
//! id,lat,lon
//! 101,43.4517,-80.4913
//! 102,43.4507,-80.4921
//! ```
//!
//! ```csv
//! gid,source,target,length_m,cost_s,reverse_cost_s,one_way,maxspeed_forward,priority,tag,geometry
//! 7,101,102,128.4,11.6,-11.6,1,40,1.0,primary,"LINESTRING(-80.4913 43.4517,-80.4921 43.4507)"
//! ```
//!
//! | Column             | Meaning                                                   |
//! |--------------------|-----------------------------------------------------------|
//! | `one_way`          | `1` forward-only, `-1` reverse-only, anything else two-way |
//! | `cost_s` / `reverse_cost_s` | stored travel time per direction; negative = absent |
//! | `maxspeed_forward` | km/h; empty falls back to the class default              |
//! | `tag`              | OSM `highway` value                                       |
//! | `geometry`         | WKT `LINESTRING(lon lat, ...)`; empty = straight line    |
//!
//! `length_m`, `one_way`, `maxspeed_forward`, `priority`, `tag`, and
//! `geometry` may be empty.  Ways are added in ascending `gid` order so edge
//! ids follow the source identifiers.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use sr_core::{GeoPoint, NodeId};

use crate::edge::{EdgeSpec, OneWay, RoadClass};
use crate::network::{RoadGraph, RoadGraphBuilder};
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct VertexRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
pub(crate) struct WayRecord {
    pub(crate) gid:              i64,
    pub(crate) source:           i64,
    pub(crate) target:           i64,
    pub(crate) length_m:         Option<f64>,
    pub(crate) cost_s:           f64,
    pub(crate) reverse_cost_s:   f64,
    pub(crate) one_way:          Option<i64>,
    pub(crate) maxspeed_forward: Option<f64>,
    pub(crate) priority:         Option<f64>,
    #[serde(default)]
    pub(crate) tag:              String,
    #[serde(default)]
    pub(crate) geometry:         String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a graph snapshot from `vertices.csv` and `ways.csv` files.
pub fn load_csv(vertices: &Path, ways: &Path) -> GraphResult<RoadGraph> {
    let v = std::fs::File::open(vertices)?;
    let w = std::fs::File::open(ways)?;
    load_csv_readers(v, w)
}

/// Like [`load_csv`] but accepts any `Read` sources.
pub fn load_csv_readers<V: Read, W: Read>(vertices: V, ways: W) -> GraphResult<RoadGraph> {
    let vertices: Vec<(i64, GeoPoint)> = csv::Reader::from_reader(vertices)
        .deserialize::<VertexRecord>()
        .map(|r| r.map(|v| (v.id, GeoPoint::new(v.lat, v.lon))))
        .collect::<Result<_, _>>()?;

    let ways: Vec<WayRecord> = csv::Reader::from_reader(ways)
        .deserialize::<WayRecord>()
        .collect::<Result<_, _>>()?;

    let graph = assemble(vertices, ways)?;
    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded CSV graph snapshot"
    );
    Ok(graph)
}

// ── Shared assembly (CSV and SQLite) ──────────────────────────────────────────

pub(crate) fn assemble(vertices: Vec<(i64, GeoPoint)>, mut ways: Vec<WayRecord>) -> GraphResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::with_capacity(vertices.len(), ways.len());
    let mut by_ext: FxHashMap<i64, NodeId> =
        FxHashMap::with_capacity_and_hasher(vertices.len(), Default::default());

    for (ext, pos) in vertices {
        if !pos.is_valid() {
            return Err(GraphError::Parse(format!("vertex {ext}: invalid position {pos}")));
        }
        if by_ext.insert(ext, builder.add_vertex(pos)).is_some() {
            return Err(GraphError::Parse(format!("duplicate vertex id {ext}")));
        }
    }

    ways.sort_by_key(|w| w.gid);
    for way in ways {
        let lookup = |ext: i64, role: &str| {
            by_ext.get(&ext).copied().ok_or_else(|| {
                GraphError::Parse(format!("way {}: unknown {role} vertex {ext}", way.gid))
            })
        };
        let source = lookup(way.source, "source")?;
        let target = lookup(way.target, "target")?;

        let geometry = parse_linestring(&way.geometry)
            .map_err(|e| GraphError::Parse(format!("way {}: {e}", way.gid)))?;

        let class = RoadClass::from_tag(&way.tag);
        let mut spec = EdgeSpec::new(source, target, way.cost_s)
            .reverse_cost(way.reverse_cost_s)
            .class(class)
            .one_way(OneWay::from_pgr(way.one_way.unwrap_or(0)))
            .priority(way.priority.unwrap_or(0.0))
            .geometry(geometry);
        if let Some(kmh) = way.maxspeed_forward {
            spec = spec.speed_kmh(kmh);
        }
        if let Some(len) = way.length_m {
            spec = spec.length_m(len);
        }
        builder.add_edge(spec);
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Parse WKT `LINESTRING(lon lat, lon lat, ...)`, optionally prefixed with
/// `SRID=n;`.  An empty string is an empty line.
pub(crate) fn parse_linestring(wkt: &str) -> Result<Vec<GeoPoint>, String> {
    let mut s = wkt.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }
    if let Some((prefix, rest)) = s.split_once(';') {
        if prefix.trim().to_ascii_uppercase().starts_with("SRID=") {
            s = rest.trim();
        }
    }

    let upper = s.to_ascii_uppercase();
    let body = upper
        .strip_prefix("LINESTRING")
        .map(str::trim)
        .and_then(|b| b.strip_prefix('('))
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| format!("expected LINESTRING(...), got {wkt:?}"))?;

    body.split(',')
        .map(|pair| {
            let mut it = pair.split_whitespace();
            match (it.next(), it.next(), it.next()) {
                (Some(lon), Some(lat), None) => {
                    let lon: f64 = lon.parse().map_err(|_| format!("bad longitude {lon:?}"))?;
                    let lat: f64 = lat.parse().map_err(|_| format!("bad latitude {lat:?}"))?;
                    Ok(GeoPoint::new(lat, lon))
                }
                _ => Err(format!("bad coordinate pair {:?}", pair.trim())),
            }
        })
        .collect()
}
