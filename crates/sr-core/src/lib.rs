//! `sr-core` — foundational types for the `stoproute` routing service.
//!
//! This crate is a dependency of every other `sr-*` crate.  It intentionally
//! has no `sr-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`                                        |
//! | [`geo`]     | `GeoPoint`, haversine distance, bearings, `"lat,lng"` parsing |
//! | [`stop`]    | `Stop`, `StopStatus`, `StopSummary`                       |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod stop;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{angle_between, GeoPoint};
pub use ids::{EdgeId, NodeId};
pub use stop::{Stop, StopStatus, StopSummary};
