//! `sr-server` — HTTP transport for the routing pipeline.
//!
//! | Route                    | Handler                                      |
//! |--------------------------|----------------------------------------------|
//! | `POST /route`            | two `"lat,lng"` strings → GeoJSON route      |
//! | `POST /route-from-batch` | geocoder results → ordered multi-stop route  |
//! | `GET /health`            | graph size                                   |
//!
//! The `stoproute` binary (`src/main.rs`) loads a graph snapshot, builds an
//! [`AppState`], and serves [`build_router`].

pub mod api;
pub mod dto;
pub mod state;


pub use api::build_router;
pub use state::{load_config, AppState};
