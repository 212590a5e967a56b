//! Prompt templates.
//!
//! A template is a fixed skeleton with `{slot}` placeholders plus optional clauses
//! switched on by boolean flags. Templates depend only on the artifact kind; options
//! and content are bound at render time. `{{` and `}}` render as literal braces, and
//! bound values are inserted verbatim (never re-scanned for slots).

use std::collections::HashMap;

use crate::generation::options::{ExerciseOptions, FlashcardOptions, RoadmapOptions, SummaryOptions};
use crate::types::{AppError, AppResult, ArtifactKind};

const CLAUSES_SLOT: &str = "conditional_instructions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub kind: ArtifactKind,
    skeleton: &'static str,
    /// `(flag, clause)` pairs; each clause is rendered when its flag is bound to `true`.
    clauses: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<&'static str, String>,
    flags: HashMap<&'static str, bool>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, slot: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(slot, value.into());
        self
    }

    pub fn flag(mut self, name: &'static str, value: bool) -> Self {
        self.flags.insert(name, value);
        self
    }
}

const SUMMARY_SKELETON: &str = "\
You are an expert AI assistant specialized in summarizing documents.
Given the following document content, your task is to generate a summary that captures the main points and key information.
The summary should be written in {language} with a {languaje_register} tone and a {character} style.
The summary should be of {extension} length.
{conditional_instructions}
Content:
{content}
";

const SUMMARY_CLAUSES: &[(&str, &str)] = &[
    (
        "include_references",
        "- Include the references, sources, sections or page numbers the content relies on.",
    ),
    (
        "include_examples",
        "- Include illustrative examples taken from the content.",
    ),
    (
        "include_conclusions",
        "- Finish with the conclusions that can be drawn from the content.",
    ),
];

const EXERCISES_SKELETON: &str = "\
You are an expert educational assistant.
Given a document content or topic, your task is to create well-structured exercises to help students learn the material.

### INSTRUCTIONS:
- Read the provided topic or document content carefully.
- Generate {exercises_count} exercises related to the main ideas.
- Generate only multiple choice exercises.
- The exercises must have a {exercises_difficulty} difficulty level (\"easy\", \"medium\", \"hard\").
- For each exercise, provide:
    - A clear question.
    - Between 3 and 5 answer choices, exactly one of them marked as correct.
    - A brief explanation for why that answer is correct.
    - The learning objective (what concept the question tests).

This is the document content or topic:
{content}
";

const FLASHCARDS_SKELETON: &str = "\
You are an expert educator and instructional designer.
Your task is to generate {flashcards_count} high-quality flashcards from a given document, text or topic.
Each flashcard should test understanding of the key concepts, definitions, examples, and relationships in the material.
The difficulty level of the flashcards is {difficulty_level}.
The flashcards should focus on {focus_area}.

This is the document content or topic:
{content}
";

const ROADMAP_SKELETON: &str = "\
You are an expert curriculum designer.
Create a learning roadmap for the topic: {topic}.
The roadmap targets a {complexity_level} learner and should be completed in {duration}.
Organize it as ordered stages; each stage has a title, a description, an expected duration and concrete learning objectives.
{conditional_instructions}";

const ROADMAP_CLAUSES: &[(&str, &str)] = &[
    (
        "include_resources",
        "- For every stage, recommend learning resources (books, courses, articles, videos or documentation).",
    ),
];

impl PromptTemplate {
    /// The skeleton for an artifact kind. Pure function of `kind`.
    pub fn for_kind(kind: ArtifactKind) -> Self {
        let (skeleton, clauses) = match kind {
            ArtifactKind::Summary => (SUMMARY_SKELETON, SUMMARY_CLAUSES),
            ArtifactKind::Exercise => (EXERCISES_SKELETON, &[][..]),
            ArtifactKind::Flashcard => (FLASHCARDS_SKELETON, &[][..]),
            ArtifactKind::Roadmap => (ROADMAP_SKELETON, ROADMAP_CLAUSES),
        };
        Self {
            kind,
            skeleton,
            clauses,
        }
    }

    /// Names of the slots the skeleton expects, in order of first appearance.
    pub fn slots(&self) -> Vec<&'static str> {
        let mut slots = Vec::new();
        let mut rest = self.skeleton;
        while let Some(start) = rest.find('{') {
            if rest[start..].starts_with("{{") {
                rest = &rest[start + 2..];
                continue;
            }
            let Some(len) = rest[start + 1..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + 1 + len];
            if name != CLAUSES_SLOT && !slots.contains(&name) {
                slots.push(name);
            }
            rest = &rest[start + 1 + len + 1..];
        }
        slots
    }

    pub fn render(&self, bindings: &Bindings) -> AppResult<String> {
        let missing: Vec<&str> = self
            .slots()
            .into_iter()
            .filter(|slot| !bindings.values.contains_key(slot))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Template(format!(
                "slot(s) {} of the {} template have no binding",
                missing.join(", "),
                self.kind
            )));
        }

        let clauses: String = self
            .clauses
            .iter()
            .filter(|(flag, _)| bindings.flags.get(flag).copied().unwrap_or(false))
            .map(|(_, clause)| format!("{}\n", clause))
            .collect();

        let mut out = String::with_capacity(self.skeleton.len() + 256);
        let mut chars = self.skeleton.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    out.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let rest = &self.skeleton[i + 1..];
                    let end = rest.find('}').ok_or_else(|| {
                        AppError::Template(format!("unterminated slot in {} template", self.kind))
                    })?;
                    let name = &rest[..end];
                    if name == CLAUSES_SLOT {
                        out.push_str(&clauses);
                    } else {
                        let value = bindings.values.get(name).ok_or_else(|| {
                            AppError::Template(format!(
                                "slot '{}' of the {} template has no binding",
                                name, self.kind
                            ))
                        })?;
                        out.push_str(value);
                    }
                    // Skip the slot name and its closing brace.
                    for _ in 0..=name.chars().count() {
                        chars.next();
                    }
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

pub fn summary_bindings(content: &str, options: &SummaryOptions) -> Bindings {
    Bindings::new()
        .text("content", content)
        .text("language", &options.language)
        .text("languaje_register", &options.language_register)
        .text("character", &options.character)
        .text("extension", options.extension.as_str())
        .flag("include_references", options.include_references)
        .flag("include_examples", options.include_examples)
        .flag("include_conclusions", options.include_conclusions)
}

pub fn exercise_bindings(content: &str, options: &ExerciseOptions) -> Bindings {
    Bindings::new()
        .text("content", content)
        .text("exercises_count", options.exercises_count.to_string())
        .text("exercises_difficulty", options.exercises_difficulty.as_str())
}

pub fn flashcard_bindings(content: &str, options: &FlashcardOptions) -> Bindings {
    Bindings::new()
        .text("content", content)
        .text("flashcards_count", options.flashcards_count.to_string())
        .text("difficulty_level", options.difficulty_level.as_str())
        .text("focus_area", &options.focus_area)
}

pub fn roadmap_bindings(options: &RoadmapOptions) -> Bindings {
    Bindings::new()
        .text("topic", &options.topic)
        .text("complexity_level", &options.complexity_level)
        .text("duration", &options.duration)
        .flag("include_resources", options.include_resources)
}
