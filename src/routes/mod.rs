pub mod cloudwatch;
pub mod ecs;
pub mod frontend;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::middleware::request_id;
use crate::state::AppState;

/// Request bodies are small JSON documents; 256 KiB is generous.
const MAX_BODY_SIZE: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(frontend::api_root))
        .nest("/ecs", ecs::router())
        .nest("/cloudwatch", cloudwatch::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    let pages = ServeDir::new(&state.config().static_dir)
        .fallback(get(frontend::page_fallback).with_state::<()>(state.clone()));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback_service(pages)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
