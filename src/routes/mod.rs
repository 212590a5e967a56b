//! API Routes
//!
//! - `POST /summarize` - summary of uploaded documents
//! - `POST /generate-exercises`, `POST /generate-exercises/by_topic` - multiple choice exercises
//! - `POST /flashcard`, `POST /flashcard/by_topic` - flashcards
//! - `POST /roadmap` - learning roadmap for a topic
//! - `GET /api/health` - health check

pub mod exercises;
pub mod flashcards;
pub mod health;
pub mod json;
pub mod roadmap;
pub mod summarize;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let server = state.config.server.clone();
    let body_limit = state.config.upload.max_upload_bytes;

    let router = Router::new()
        .merge(summarize::router(state.clone()))
        .merge(exercises::router(state.clone()))
        .merge(flashcards::router(state.clone()))
        .merge(roadmap::router(state.clone()))
        .merge(health::router(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &server)
}
