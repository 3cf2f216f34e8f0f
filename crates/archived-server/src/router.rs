use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use archived_protocol::endpoints;
use archived_store::Archive;

use crate::handler;

/// Shared handler state. The archive is only a root path, so cloning it per
/// request costs one allocation.
#[derive(Clone, Debug)]
pub struct AppState {
    pub archive: Archive,
}

/// Build the axum router with all archive endpoints.
pub fn build_router(archive: Archive, max_body_size: usize) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(endpoints::READ, post(handler::read_handler))
        .route(endpoints::CREATE, post(handler::create_handler))
        .route(endpoints::MOVE, post(handler::move_handler))
        .route(endpoints::DELETE, post(handler::delete_handler))
        .route(endpoints::SEARCH, post(handler::search_handler))
        .route(endpoints::IMAGE, get(handler::image_handler))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { archive })
}
