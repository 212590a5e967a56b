use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::generation::RoadmapOptions;
use crate::models::{AppState, RoadmapResponse};
use crate::routes::json::AppJson;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/roadmap", post(roadmap))
        .with_state(state)
}

async fn roadmap(
    State(state): State<AppState>,
    AppJson(options): AppJson<RoadmapOptions>,
) -> AppResult<Json<RoadmapResponse>> {
    info!(topic = %options.topic, "Roadmap request received");

    let roadmap = state.generation.generate_roadmap(options).await?;

    Ok(Json(RoadmapResponse { roadmap }))
}
