//! Axum router wiring (HTTP -> WS upgrade).
//!
//! Exposes the websocket route at `server.path` and a `/healthz` liveness
//! probe.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    let path = state.cfg().server.path.clone();
    Router::new()
        .route(&path, get(transport::ws::ws_upgrade))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
