//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Proxy middleware wraps every route, so table prefixes take priority over
//! everything below. Unproxied requests reach two internal endpoints under
//! `/__devproxy`, then the built frontend (when `STATIC_DIR` is set) or 404.

use std::path::PathBuf;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::proxy::proxy_layer;
use crate::state::AppState;
use crate::table::ProxyTable;

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

pub fn app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/__devproxy/healthz", get(healthz))
        .route("/__devproxy/routes", get(list_routes))
        .with_state(state.clone());

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router.fallback(not_found),
    };

    router
        .layer(middleware::from_fn_with_state(state, proxy_layer))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn list_routes(State(state): State<AppState>) -> Json<ProxyTable> {
    Json(state.table.as_ref().clone())
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
