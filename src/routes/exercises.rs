use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::generation::{ExerciseOptions, ExerciseType};
use crate::models::{AppState, ExercisesResponse, TopicExercisesRequest};
use crate::routes::json::AppJson;
use crate::routes::upload::{aggregated_content, FormFields};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-exercises", post(exercises_from_files))
        .route("/generate-exercises/by_topic", post(exercises_from_topic))
        .with_state(state)
}

fn exercise_options(form: &FormFields) -> AppResult<ExerciseOptions> {
    let mut options = ExerciseOptions::default();

    if let Some(count) = form.parse("exercises_count")? {
        options.exercises_count = count;
    }
    if let Some(difficulty) = form.parse("exercises_difficulty")? {
        options.exercises_difficulty = difficulty;
    }
    let types = form.list("exercises_types");
    if !types.is_empty() {
        options.exercises_types = types
            .into_iter()
            .map(str::parse::<ExerciseType>)
            .collect::<AppResult<Vec<_>>>()?;
    }

    Ok(options)
}

async fn exercises_from_files(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ExercisesResponse>> {
    let form = FormFields::read(multipart).await?;
    form.require_files()?;
    let options = exercise_options(&form)?;

    info!(files = form.files.len(), "Exercise request received");

    let content = aggregated_content(form.files).await;
    let exercises = state.generation.generate_exercises(&content, options).await?;

    Ok(Json(ExercisesResponse { exercises }))
}

async fn exercises_from_topic(
    State(state): State<AppState>,
    AppJson(request): AppJson<TopicExercisesRequest>,
) -> AppResult<Json<ExercisesResponse>> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic must not be empty".to_string()));
    }

    info!(topic = %topic, "Exercise request by topic received");

    let exercises = state
        .generation
        .generate_exercises(topic, request.options)
        .await?;

    Ok(Json(ExercisesResponse { exercises }))
}
