use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{config::FillOptions, dictionary::Dictionary};

use super::handlers::fill_crossword;

/// Application state shared across all handlers
pub struct AppState {
    pub dictionary: Arc<Dictionary>,
    pub options: FillOptions,
}

/// Create the HTTP router. Browsers post templates from other origins, so
/// CORS is left open.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", post(fill_crossword))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
