//! HTTP handlers.
//!
//! Routing is CPU-bound, so each request runs on the blocking pool with a
//! per-request [`CancelFlag`].  The flag's guard lives in the handler
//! future: if the client goes away the future is dropped and the searches
//! stop at their next checkpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use sr_core::{GeoPoint, Stop};
use sr_graph::CancelFlag;
use sr_route::{BatchRouteOrchestrator, Route, RoutingError, RoutingResult};

use crate::dto::{
    route_geojson, BatchRequest, BatchResponse, ErrorResponse, HealthResponse, RouteRequest,
    RouteResponse,
};
use crate::state::AppState;

/// Build the Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/route", post(route))
        .route("/route-from-batch", post(route_from_batch))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Run `f` on the blocking pool, cancelling it if this future is dropped.
/// A panicked task becomes a ready-made 500 response.
async fn run_blocking<F>(state: &AppState, f: F) -> Result<RoutingResult<Route>, Response>
where
    F: FnOnce(&BatchRouteOrchestrator, &CancelFlag) -> RoutingResult<Route> + Send + 'static,
{
    let cancel = CancelFlag::new();
    let _guard = cancel.guard();
    let orchestrator = Arc::clone(&state.orchestrator);

    tokio::task::spawn_blocking(move || f(&orchestrator, &cancel))
        .await
        .map_err(|join| {
            tracing::error!(error = %join, "routing task failed");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Route creation failed: internal error")
        })
}

// ── POST /route ───────────────────────────────────────────────────────────────

async fn route(State(state): State<Arc<AppState>>, Json(req): Json<RouteRequest>) -> Response {
    let parsed = req
        .start_coords
        .parse::<GeoPoint>()
        .and_then(|start| Ok((start, req.end_coords.parse::<GeoPoint>()?)));
    let (start, end) = match parsed {
        Ok(pair) => pair,
        Err(e) => {
            return error(
                StatusCode::OK,
                format!("Invalid coordinate format. Expected 'lat,lng' format. Error: {e}"),
            );
        }
    };

    let result = run_blocking(&state, move |o, cancel| o.route_between(start, end, cancel)).await;
    let result = match result {
        Ok(result) => result,
        Err(response) => return response,
    };
    match result {
        Ok(route) => Json(RouteResponse {
            success: true,
            route_geojson: route_geojson(&route),
            start_coords: req.start_coords,
            end_coords: req.end_coords,
        })
        .into_response(),
        Err(RoutingError::NoPath { .. }) => error(StatusCode::OK, "No route found"),
        Err(e @ RoutingError::Engine(_)) => error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        Err(e) => error(StatusCode::OK, e.to_string()),
    }
}

// ── POST /route-from-batch ────────────────────────────────────────────────────

async fn route_from_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Response {
    let stops: Vec<Stop> = req.geocode_results.into_iter().map(Stop::from).collect();

    let result = match run_blocking(&state, move |o, cancel| o.route_batch_cancellable(&stops, cancel)).await {
        Ok(result) => result,
        Err(response) => return response,
    };
    match result {
        Ok(route) => Json(BatchResponse::from(route)).into_response(),
        Err(e) => {
            let status = batch_status(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error(status, format!("Route creation failed: {e}"))
            } else {
                error(status, e.to_string())
            }
        }
    }
}

/// 400 for request-caused failures, 500 for engine failures.
pub(crate) fn batch_status(e: &RoutingError) -> StatusCode {
    if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// ── GET /health ───────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let graph = state.graph();
    Json(HealthResponse {
        status: "ok",
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
    })
}
