use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::generation::SummaryOptions;
use crate::models::{AppState, SummaryResponse};
use crate::routes::upload::{aggregated_content, FormFields};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(summarize))
        .with_state(state)
}

/// Reads summary options from the form; absent fields keep their defaults.
fn summary_options(form: &FormFields) -> AppResult<SummaryOptions> {
    let mut options = SummaryOptions::default();

    if let Some(character) = form.text("character") {
        options.character = character.to_string();
    }
    if let Some(register) = form.text("languaje_register").or(form.text("language_register")) {
        options.language_register = register.to_string();
    }
    if let Some(language) = form.text("language") {
        options.language = language.to_string();
    }
    if let Some(extension) = form.parse("extension")? {
        options.extension = extension;
    }
    if let Some(flag) = form.flag("include_references")? {
        options.include_references = flag;
    }
    if let Some(flag) = form.flag("include_examples")? {
        options.include_examples = flag;
    }
    if let Some(flag) = form.flag("include_conclusions")? {
        options.include_conclusions = flag;
    }

    Ok(options)
}

async fn summarize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<SummaryResponse>> {
    let form = FormFields::read(multipart).await?;
    form.require_files()?;
    let options = summary_options(&form)?;

    info!(files = form.files.len(), "Summary request received");

    let content = aggregated_content(form.files).await;
    let summary = state.generation.generate_summary(&content, options).await?;

    Ok(Json(SummaryResponse { summary }))
}
