//! `sr-route` — the multi-stop routing pipeline.
//!
//! # Pipeline
//!
//! ```text
//! stops ─▶ validate ─▶ StopSnapper ─▶ RouteSolver ─▶ RouteAssembler ─▶ Route
//!          (filter,     (directional   (one search     (merge lines,
//!           count,       entry vertex   per pair,       sum time and
//!           sort)        per stop)      CostModel)      distance)
//! ```
//!
//! [`BatchRouteOrchestrator`] drives the whole thing over an
//! `Arc<RoadGraph>` snapshot.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Snaps stops and solves pairs on Rayon's thread pool.        |
//! | `serde`    | `Serialize`/`Deserialize` for `RoutingConfig`.              |

pub mod assemble;
pub mod config;
pub mod cost;
pub mod error;
pub mod orchestrate;
pub mod snap;
pub mod solve;


pub use assemble::{Route, RouteAssembler};
pub use config::{
    CostConfig, CostProfile, DegeneratePolicy, RoutingConfig, SnapConfig, SnapStrategy, StopLimits,
};
pub use cost::CostModel;
pub use error::{NoPathReason, RoutingError, RoutingResult, SnapError, ValidationError};
pub use orchestrate::{BatchRouteOrchestrator, RouteStage};
pub use snap::{SnapVia, SnappedStop, StopSnapper};
pub use solve::{PathSegment, RouteSolver};
