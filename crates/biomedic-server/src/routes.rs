// ABOUTME: Route definitions for the biomedic static server.
// ABOUTME: Image API and image files get explicit routes; everything else falls through to the static root.

use axum::Router;
use axum::routing::any;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::cors::CorsLayer;
use crate::static_files;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/images", any(api::images::list_images))
        .route("/images/equipos/{name}", any(api::images::serve_image))
        .fallback(static_files::serve_static)
        .layer(CorsLayer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
