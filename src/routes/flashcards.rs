use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::generation::FlashcardOptions;
use crate::models::{AppState, FlashcardsResponse, TopicFlashcardsRequest};
use crate::routes::json::AppJson;
use crate::routes::upload::{aggregated_content, FormFields};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/flashcard", post(flashcards_from_files))
        .route("/flashcard/by_topic", post(flashcards_from_topic))
        .with_state(state)
}

fn flashcard_options(form: &FormFields) -> AppResult<FlashcardOptions> {
    let mut options = FlashcardOptions::default();

    if let Some(count) = form.parse("flashcards_count")? {
        options.flashcards_count = count;
    }
    if let Some(difficulty) = form.parse("difficulty_level")? {
        options.difficulty_level = difficulty;
    }
    if let Some(focus_area) = form.text("focus_area") {
        options.focus_area = focus_area.to_string();
    }

    Ok(options)
}

async fn flashcards_from_files(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<FlashcardsResponse>> {
    let form = FormFields::read(multipart).await?;
    form.require_files()?;
    let options = flashcard_options(&form)?;

    info!(files = form.files.len(), "Flashcard request received");

    let content = aggregated_content(form.files).await;
    let flashcards = state.generation.generate_flashcards(&content, options).await?;

    Ok(Json(FlashcardsResponse { flashcards }))
}

async fn flashcards_from_topic(
    State(state): State<AppState>,
    AppJson(request): AppJson<TopicFlashcardsRequest>,
) -> AppResult<Json<FlashcardsResponse>> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic must not be empty".to_string()));
    }

    info!(topic = %topic, "Flashcard request by topic received");

    let flashcards = state
        .generation
        .generate_flashcards(topic, request.options)
        .await?;

    Ok(Json(FlashcardsResponse { flashcards }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Difficulty;
    use crate::llm::mock::MockAdapter;
    use crate::routes::test_support::{json_request, multipart_request, read_json, test_router};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    const CARDS: &str = r#"```json
{"flashcards": [{"topic": "Chemistry", "question": "Symbol for gold?", "answer": "Au", "key_terms": ["gold", "gold"]}]}
```"#;

    #[test]
    fn test_flashcard_options_from_form() {
        let form = FormFields::default()
            .with_field("flashcards_count", "12")
            .with_field("difficulty_level", "hard")
            .with_field("focus_area", " definitions ");
        let options = flashcard_options(&form).unwrap();

        assert_eq!(options.flashcards_count, 12);
        assert_eq!(options.difficulty_level, Difficulty::Hard);
        assert_eq!(options.focus_area, "definitions");

        let bad = FormFields::default().with_field("difficulty_level", "brutal");
        assert!(matches!(flashcard_options(&bad), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_flashcards_from_files() {
        let mock = Arc::new(MockAdapter::replying(CARDS));
        let response = test_router(mock)
            .oneshot(multipart_request(
                "/flashcard",
                &[("deck.txt", b"x".as_slice())],
                &[("flashcards_count", "1")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["flashcards"][0]["answer"], "Au");
        assert_eq!(body["flashcards"][0]["key_terms"], json!(["gold"]));
    }

    #[tokio::test]
    async fn test_flashcards_by_topic_blank_topic() {
        let mock = Arc::new(MockAdapter::replying(CARDS));
        let response = test_router(mock.clone())
            .oneshot(json_request("/flashcard/by_topic", json!({"topic": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_flashcards_by_topic_difficulty_is_case_insensitive() {
        let mock = Arc::new(MockAdapter::replying(CARDS));
        let router = test_router(mock.clone());

        let response = router
            .clone()
            .oneshot(json_request(
                "/flashcard/by_topic",
                json!({"topic": "Alloys", "difficulty_level": "Hard"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let prompt = &mock.last_request().unwrap().messages[0].content;
        assert!(prompt.contains("difficulty level of the flashcards is hard"));

        let response = router
            .oneshot(json_request(
                "/flashcard/by_topic",
                json!({"topic": "Alloys", "flashcards_count": -3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json(response).await["error"].is_string());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_flashcards_by_topic_empty_answer() {
        let mock = Arc::new(MockAdapter::replying(r#"{"flashcards": []}"#));
        let response = test_router(mock)
            .oneshot(json_request(
                "/flashcard/by_topic",
                json!({"topic": "Stoichiometry", "focus_area": "formulas"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"flashcards": []}));
    }
}
