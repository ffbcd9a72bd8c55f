//! `sr-graph` — road graph, spatial indexing, and shortest-path search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`edge`]    | `OneWay`, `Direction`, `RoadClass`, `EdgeSpec`, `EdgeRef`       |
//! | [`network`] | `RoadGraph` (CSR arcs + vertex/edge R-trees), `RoadGraphBuilder` |
//! | [`router`]  | `EdgeCost`, `Router`, `DijkstraRouter`, `AStarRouter`, `Path`   |
//! | [`limits`]  | `SearchLimits`, `CancelFlag`, `CancelGuard`                     |
//! | [`loader`]  | CSV snapshot loading (`vertices.csv` + `ways.csv`)              |
//! | [`sqlite`]  | SQLite snapshot loading (feature = `"sqlite"` only)             |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag     | Effect                                                        |
//! |----------|---------------------------------------------------------------|
//! | `sqlite` | Enables snapshot loading via the `rusqlite` crate.            |

pub mod edge;
pub mod error;
pub mod limits;
pub mod loader;
pub mod network;
pub mod router;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use edge::{Direction, EdgeRef, EdgeSpec, OneWay, RoadClass};
pub use error::{GraphError, GraphResult};
pub use limits::{CancelFlag, CancelGuard, SearchLimits};
pub use loader::{load_csv, load_csv_readers};
pub use network::{EdgeCandidate, RoadGraph, RoadGraphBuilder, Vertex};
pub use router::{AStarRouter, DijkstraRouter, EdgeCost, Path, PathStep, Router, Traversal};
