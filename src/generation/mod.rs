//! Prompt building and model invocation.
//!
//! Generation is a two-stage composition: `PromptTemplate::render(bindings)` produces
//! the prompt, `GenerationClient` sends it with the schema of the expected record.

pub mod client;
pub mod options;
pub mod structures;
pub mod templates;

pub use client::GenerationClient;
pub use options::{
    CheckedOptions, Difficulty, ExerciseOptions, ExerciseType, FlashcardOptions, LengthClass,
    RoadmapOptions, SummaryOptions,
};
pub use structures::{
    Choice, Exercise, ExerciseSet, Flashcard, FlashcardSet, LearningResource, Roadmap,
    RoadmapStage, StructuredOutput, Summary,
};
pub use templates::{Bindings, PromptTemplate};
