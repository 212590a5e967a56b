use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::generation::{Exercise, ExerciseOptions, Flashcard, FlashcardOptions};
use crate::services::{GenerationService, RoadmapOutput, SummaryOutput};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub generation: GenerationService,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
}

/// Exercises generated from a topic instead of uploaded files.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicExercisesRequest {
    pub topic: String,
    #[serde(flatten)]
    pub options: ExerciseOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicFlashcardsRequest {
    pub topic: String,
    #[serde(flatten)]
    pub options: FlashcardOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: SummaryOutput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExercisesResponse {
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoadmapResponse {
    pub roadmap: RoadmapOutput,
}
