//! Generation Services
//!
//! One operation per artifact kind. Each validates its options, renders the kind's
//! template, calls the shared client and maps "nothing generated" to the kind's
//! fallback value. Transport failures propagate as `AppError::Generation`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SummaryFormat;
use crate::generation::options::CheckedOptions;
use crate::generation::templates::{
    exercise_bindings, flashcard_bindings, roadmap_bindings, summary_bindings, PromptTemplate,
};
use crate::generation::{
    Exercise, ExerciseOptions, ExerciseSet, Flashcard, FlashcardOptions, FlashcardSet,
    GenerationClient, Roadmap, RoadmapOptions, Summary, SummaryOptions,
};
use crate::types::{AppResult, ArtifactKind};

pub const NO_SUMMARY: &str = "No summary could be generated.";
pub const NO_ROADMAP: &str = "No roadmap could be generated.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryOutput {
    Structured(Summary),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoadmapOutput {
    Structured(Roadmap),
    Text(String),
}

#[derive(Clone)]
pub struct GenerationService {
    client: GenerationClient,
    summary_format: SummaryFormat,
}

impl GenerationService {
    pub fn new(client: GenerationClient, summary_format: SummaryFormat) -> Self {
        Self {
            client,
            summary_format,
        }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub async fn generate_summary(
        &self,
        content: &str,
        options: SummaryOptions,
    ) -> AppResult<SummaryOutput> {
        let options = options.checked()?;
        info!(content_len = content.len(), format = ?self.summary_format, "Generating summary");

        let prompt = PromptTemplate::for_kind(ArtifactKind::Summary)
            .render(&summary_bindings(content, &options))?;

        let output = match self.summary_format {
            SummaryFormat::Structured => self
                .client
                .generate_structured::<Summary>(&prompt)
                .await?
                .map(SummaryOutput::Structured),
            SummaryFormat::Text => self
                .client
                .generate_text(ArtifactKind::Summary, &prompt)
                .await?
                .map(SummaryOutput::Text),
        };

        Ok(output.unwrap_or_else(|| SummaryOutput::Text(NO_SUMMARY.to_string())))
    }

    pub async fn generate_exercises(
        &self,
        content: &str,
        options: ExerciseOptions,
    ) -> AppResult<Vec<Exercise>> {
        let options = options.checked()?;
        info!(
            content_len = content.len(),
            count = options.exercises_count,
            difficulty = %options.exercises_difficulty,
            "Generating exercises"
        );

        let prompt = PromptTemplate::for_kind(ArtifactKind::Exercise)
            .render(&exercise_bindings(content, &options))?;

        Ok(self
            .client
            .generate_structured::<ExerciseSet>(&prompt)
            .await?
            .map(|set| set.exercises)
            .unwrap_or_default())
    }

    pub async fn generate_flashcards(
        &self,
        content: &str,
        options: FlashcardOptions,
    ) -> AppResult<Vec<Flashcard>> {
        let options = options.checked()?;
        info!(
            content_len = content.len(),
            count = options.flashcards_count,
            difficulty = %options.difficulty_level,
            "Generating flashcards"
        );

        let prompt = PromptTemplate::for_kind(ArtifactKind::Flashcard)
            .render(&flashcard_bindings(content, &options))?;

        Ok(self
            .client
            .generate_structured::<FlashcardSet>(&prompt)
            .await?
            .map(|set| set.flashcards)
            .unwrap_or_default())
    }

    pub async fn generate_roadmap(&self, options: RoadmapOptions) -> AppResult<RoadmapOutput> {
        let options = options.checked()?;
        info!(
            complexity = %options.complexity_level,
            include_resources = options.include_resources,
            "Generating roadmap"
        );

        let prompt =
            PromptTemplate::for_kind(ArtifactKind::Roadmap).render(&roadmap_bindings(&options))?;

        Ok(self
            .client
            .generate_structured::<Roadmap>(&prompt)
            .await?
            .map(RoadmapOutput::Structured)
            .unwrap_or_else(|| RoadmapOutput::Text(NO_ROADMAP.to_string())))
    }
}
