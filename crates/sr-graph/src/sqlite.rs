//! SQLite graph snapshot loader (feature `sqlite`).
//!
//! Reads the same two tables as the CSV loader from a database opened
//! read-only:
//!
//! ```sql
//! CREATE TABLE ways_vertices_pgr (id INTEGER PRIMARY KEY, lat REAL, lon REAL);
//! CREATE TABLE ways (
//!     gid INTEGER PRIMARY KEY, source INTEGER, target INTEGER,
//!     length_m REAL, cost_s REAL, reverse_cost_s REAL, one_way INTEGER,
//!     maxspeed_forward REAL, priority REAL, tag TEXT, geometry TEXT
//! );
//! ```
//!
//! The optional bounding box is bound as statement parameters; nothing from
//! the caller is ever spliced into SQL text.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};

use sr_core::GeoPoint;

use crate::loader::{assemble, WayRecord};
use crate::network::RoadGraph;
use crate::GraphResult;

/// Inclusive lat/lon window used to load part of a large snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BBox {
    pub const WORLD: BBox = BBox { min_lat: -90.0, min_lon: -180.0, max_lat: 90.0, max_lon: 180.0 };
}

/// Load a graph snapshot from the SQLite database at `path`.
///
/// With a `bbox`, only vertices inside it and ways whose both ends are
/// inside it are loaded.
pub fn load_sqlite(path: &Path, bbox: Option<BBox>) -> GraphResult<RoadGraph> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let b = bbox.unwrap_or(BBox::WORLD);

    let mut stmt = conn.prepare(
        "SELECT id, lat, lon FROM ways_vertices_pgr \
         WHERE lat BETWEEN ?1 AND ?2 AND lon BETWEEN ?3 AND ?4",
    )?;
    let vertices: Vec<(i64, GeoPoint)> = stmt
        .query_map(params![b.min_lat, b.max_lat, b.min_lon, b.max_lon], |row| {
            Ok((row.get(0)?, GeoPoint::new(row.get(1)?, row.get(2)?)))
        })?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT w.gid, w.source, w.target, w.length_m, w.cost_s, w.reverse_cost_s, \
                w.one_way, w.maxspeed_forward, w.priority, w.tag, w.geometry \
         FROM ways w \
         JOIN ways_vertices_pgr s ON s.id = w.source \
         JOIN ways_vertices_pgr t ON t.id = w.target \
         WHERE s.lat BETWEEN ?1 AND ?2 AND s.lon BETWEEN ?3 AND ?4 \
           AND t.lat BETWEEN ?1 AND ?2 AND t.lon BETWEEN ?3 AND ?4",
    )?;
    let ways: Vec<WayRecord> = stmt
        .query_map(params![b.min_lat, b.max_lat, b.min_lon, b.max_lon], |row| {
            Ok(WayRecord {
                gid:              row.get(0)?,
                source:           row.get(1)?,
                target:           row.get(2)?,
                length_m:         row.get(3)?,
                cost_s:           row.get(4)?,
                reverse_cost_s:   row.get(5)?,
                one_way:          row.get(6)?,
                maxspeed_forward: row.get(7)?,
                priority:         row.get(8)?,
                tag:              row.get::<_, Option<String>>(9)?.unwrap_or_default(),
                geometry:         row.get::<_, Option<String>>(10)?.unwrap_or_default(),
            })
        })?
        .collect::<Result<_, _>>()?;

    let graph = assemble(vertices, ways)?;
    tracing::info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded SQLite graph snapshot"
    );
    Ok(graph)
}
