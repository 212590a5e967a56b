//! Typed records the model is constrained to return, with their response schemas.
//!
//! Schemas are written in the OpenAPI subset Gemini accepts (`"type": "OBJECT"`);
//! the OpenAI-compatible adapter converts them to JSON Schema on the way out.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::ArtifactKind;

pub trait StructuredOutput: DeserializeOwned + Send + 'static {
    const KIND: ArtifactKind;

    fn response_schema() -> Value;

    /// Enforces record invariants after decoding. `None` means nothing usable is left.
    fn validated(self) -> Option<Self> {
        Some(self)
    }
}

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn nullable_string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description, "nullable": true })
}

fn string_list(description: &str) -> Value {
    json!({ "type": "ARRAY", "description": description, "items": { "type": "STRING" } })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub conclusions: Option<String>,
}

impl StructuredOutput for Summary {
    const KIND: ArtifactKind = ArtifactKind::Summary;

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": string("A short title for the summarized material"),
                "summary": string("The summary text"),
                "key_points": string_list("The main points, one per entry"),
                "references": string_list("Sources, sections or pages referenced by the material"),
                "examples": string_list("Illustrative examples taken from the material"),
                "conclusions": nullable_string("Conclusions drawn from the material"),
            },
            "required": ["title", "summary"],
        })
    }

    fn validated(self) -> Option<Self> {
        (!self.summary.trim().is_empty()).then_some(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub question: String,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub learning_objective: Option<String>,
}

impl Exercise {
    /// When choices are present, exactly one of them is correct.
    pub fn has_single_correct_choice(&self) -> bool {
        match &self.choices {
            Some(choices) => choices.iter().filter(|c| c.is_correct).count() == 1,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub exercises: Vec<Exercise>,
}

impl StructuredOutput for ExerciseSet {
    const KIND: ArtifactKind = ArtifactKind::Exercise;

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "exercises": {
                    "type": "ARRAY",
                    "description": "List of exercises in the set",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "topic": nullable_string("The topic or subject area of the exercise"),
                            "difficulty": nullable_string("easy, medium or hard"),
                            "question": string("The question from the exercise"),
                            "choices": {
                                "type": "ARRAY",
                                "description": "Possible choices; exactly one is correct",
                                "nullable": true,
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "text": string("The text of the choice"),
                                        "is_correct": {
                                            "type": "BOOLEAN",
                                            "description": "Whether this choice is the correct answer",
                                        },
                                    },
                                    "required": ["text", "is_correct"],
                                },
                            },
                            "explanation": nullable_string("Why the correct answer is correct"),
                            "learning_objective": nullable_string("The concept the question tests"),
                        },
                        "required": ["question", "choices"],
                    },
                },
            },
            "required": ["exercises"],
        })
    }

    fn validated(mut self) -> Option<Self> {
        let before = self.exercises.len();
        self.exercises
            .retain(|e| !e.question.trim().is_empty() && e.has_single_correct_choice());
        let dropped = before - self.exercises.len();
        if dropped > 0 {
            tracing::warn!(dropped, "Discarded malformed exercises");
        }
        Some(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub topic: String,
    #[serde(default)]
    pub subtopic: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub flashcards: Vec<Flashcard>,
}

impl StructuredOutput for FlashcardSet {
    const KIND: ArtifactKind = ArtifactKind::Flashcard;

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "flashcards": {
                    "type": "ARRAY",
                    "description": "List of flashcards in this set",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "topic": string("Main topic or subject this flashcard belongs to"),
                            "subtopic": nullable_string("Subtopic or section of the document"),
                            "question": string("Question or prompt for the flashcard"),
                            "answer": string("Main answer text for the flashcard"),
                            "key_terms": string_list("Important terms relevant to the question"),
                            "difficulty": nullable_string("easy, medium or hard"),
                            "explanation": nullable_string("Expanded explanation behind the answer"),
                            "example": nullable_string("Example that illustrates the concept"),
                            "tags": string_list("Tags or categories to organize the flashcard"),
                        },
                        "required": ["topic", "question", "answer"],
                    },
                },
            },
            "required": ["flashcards"],
        })
    }

    fn validated(mut self) -> Option<Self> {
        self.flashcards
            .retain(|f| !f.question.trim().is_empty() && !f.answer.trim().is_empty());
        for card in &mut self.flashcards {
            dedup_in_order(&mut card.key_terms);
            dedup_in_order(&mut card.tags);
        }
        Some(self)
    }
}

/// Key terms and tags are sets; keep the first occurrence of each.
fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.trim().to_lowercase()));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    pub resource_type: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStage {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub topic: String,
    #[serde(default)]
    pub complexity_level: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    pub stages: Vec<RoadmapStage>,
}

impl StructuredOutput for Roadmap {
    const KIND: ArtifactKind = ArtifactKind::Roadmap;

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "topic": string("The topic the roadmap teaches"),
                "complexity_level": nullable_string("Target complexity level"),
                "duration": nullable_string("Total expected duration"),
                "overview": nullable_string("Short overview of the learning path"),
                "stages": {
                    "type": "ARRAY",
                    "description": "Ordered stages of the learning path",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": string("Stage title"),
                            "description": string("What the learner does in this stage"),
                            "duration": nullable_string("Expected duration of the stage"),
                            "objectives": string_list("Learning objectives of the stage"),
                            "resources": {
                                "type": "ARRAY",
                                "description": "Suggested learning resources",
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "title": string("Resource title"),
                                        "resource_type": string("book, course, article, video, documentation..."),
                                        "url": nullable_string("Link to the resource, if known"),
                                    },
                                    "required": ["title", "resource_type"],
                                },
                            },
                        },
                        "required": ["title", "description"],
                    },
                },
            },
            "required": ["topic", "stages"],
        })
    }

    fn validated(self) -> Option<Self> {
        (!self.stages.is_empty()).then_some(self)
    }
}

/// Decodes a model answer into `T`. Accepts a bare JSON document or one wrapped in a
/// Markdown code fence.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(raw))
}

pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the end of the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}
