//! Option models, one per artifact kind. Every field has a default, so an absent
//! field never reaches a template as a missing value.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{AppError, AppResult};

pub const MAX_ITEMS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Difficulty {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

impl std::str::FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AppError::Validation(format!(
                "difficulty must be easy, medium or hard (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LengthClass {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthClass::Short => "short",
            LengthClass::Medium => "medium",
            LengthClass::Long => "long",
        }
    }
}

impl TryFrom<String> for LengthClass {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

impl std::str::FromStr for LengthClass {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(LengthClass::Short),
            "medium" => Ok(LengthClass::Medium),
            "long" => Ok(LengthClass::Long),
            other => Err(AppError::Validation(format!(
                "extension must be short, medium or long (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ExerciseType {
    #[default]
    MultipleChoice,
}

impl TryFrom<String> for ExerciseType {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

impl std::str::FromStr for ExerciseType {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "multiple_choice" => Ok(ExerciseType::MultipleChoice),
            other => Err(AppError::Validation(format!(
                "unsupported exercise type '{}' (only multiple_choice is generated)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SummaryOptions {
    /// Style of the summary: informative, descriptive, investigation, synopsis, review...
    #[validate(length(min = 1, max = 64))]
    pub character: String,
    #[serde(rename = "languaje_register", alias = "language_register")]
    #[validate(length(min = 1, max = 64))]
    pub language_register: String,
    #[validate(length(min = 1, max = 64))]
    pub language: String,
    pub extension: LengthClass,
    pub include_references: bool,
    pub include_examples: bool,
    pub include_conclusions: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            character: "review".to_string(),
            language_register: "formal".to_string(),
            language: "English".to_string(),
            extension: LengthClass::Medium,
            include_references: false,
            include_examples: false,
            include_conclusions: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExerciseOptions {
    #[validate(range(min = 1, max = 50))]
    pub exercises_count: u32,
    pub exercises_difficulty: Difficulty,
    #[validate(length(min = 1))]
    pub exercises_types: Vec<ExerciseType>,
}

impl Default for ExerciseOptions {
    fn default() -> Self {
        Self {
            exercises_count: 5,
            exercises_difficulty: Difficulty::Medium,
            exercises_types: vec![ExerciseType::MultipleChoice],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FlashcardOptions {
    #[validate(range(min = 1, max = 50))]
    pub flashcards_count: u32,
    pub difficulty_level: Difficulty,
    #[validate(length(min = 1, max = 200))]
    pub focus_area: String,
}

impl Default for FlashcardOptions {
    fn default() -> Self {
        Self {
            flashcards_count: 5,
            difficulty_level: Difficulty::Medium,
            focus_area: "key concepts".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RoadmapOptions {
    #[validate(length(min = 1, max = 500))]
    pub topic: String,
    #[validate(length(min = 1, max = 64))]
    pub complexity_level: String,
    #[validate(length(min = 1, max = 64))]
    pub duration: String,
    pub include_resources: bool,
}

impl Default for RoadmapOptions {
    fn default() -> Self {
        Self {
            topic: String::new(),
            complexity_level: "beginner".to_string(),
            duration: "4 weeks".to_string(),
            include_resources: false,
        }
    }
}

/// Runs `validator` and trims free-text fields before anything reaches a template.
pub trait CheckedOptions: Validate + Sized {
    fn normalized(self) -> Self {
        self
    }

    fn checked(self) -> AppResult<Self> {
        let options = self.normalized();
        options.validate()?;
        Ok(options)
    }
}

impl CheckedOptions for SummaryOptions {
    fn normalized(mut self) -> Self {
        self.character = self.character.trim().to_string();
        self.language_register = self.language_register.trim().to_string();
        self.language = self.language.trim().to_string();
        self
    }
}

impl CheckedOptions for ExerciseOptions {}

impl CheckedOptions for FlashcardOptions {
    fn normalized(mut self) -> Self {
        self.focus_area = self.focus_area.trim().to_string();
        self
    }
}

impl CheckedOptions for RoadmapOptions {
    fn normalized(mut self) -> Self {
        self.topic = self.topic.trim().to_string();
        self.complexity_level = self.complexity_level.trim().to_string();
        self.duration = self.duration.trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults() {
        let options: SummaryOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.character, "review");
        assert_eq!(options.language_register, "formal");
        assert_eq!(options.language, "English");
        assert_eq!(options.extension, LengthClass::Medium);
        assert!(!options.include_references);
        assert!(!options.include_examples);
        assert!(!options.include_conclusions);
    }

    #[test]
    fn test_summary_keeps_wire_spelling_of_register() {
        let options: SummaryOptions =
            serde_json::from_str(r#"{"languaje_register": "informal"}"#).unwrap();
        assert_eq!(options.language_register, "informal");

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["languaje_register"], "informal");
    }

    #[test]
    fn test_exercise_defaults() {
        let options: ExerciseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.exercises_count, 5);
        assert_eq!(options.exercises_difficulty, Difficulty::Medium);
        assert_eq!(options.exercises_types, vec![ExerciseType::MultipleChoice]);
    }

    #[test]
    fn test_flashcard_defaults() {
        let options = FlashcardOptions::default();
        assert_eq!(options.flashcards_count, 5);
        assert_eq!(options.difficulty_level, Difficulty::Medium);
        assert_eq!(options.focus_area, "key concepts");
    }

    #[test]
    fn test_counts_are_range_checked() {
        let zero = ExerciseOptions {
            exercises_count: 0,
            ..ExerciseOptions::default()
        };
        assert!(matches!(zero.checked(), Err(AppError::Validation(_))));

        let too_many = FlashcardOptions {
            flashcards_count: MAX_ITEMS + 1,
            ..FlashcardOptions::default()
        };
        assert!(matches!(too_many.checked(), Err(AppError::Validation(_))));

        assert!(ExerciseOptions::default().checked().is_ok());
    }

    #[test]
    fn test_negative_count_is_rejected_at_decode() {
        assert!(serde_json::from_str::<ExerciseOptions>(r#"{"exercises_count": -3}"#).is_err());
    }

    #[test]
    fn test_roadmap_requires_topic() {
        let blank = RoadmapOptions {
            topic: "   ".to_string(),
            ..RoadmapOptions::default()
        };
        assert!(matches!(blank.checked(), Err(AppError::Validation(_))));

        let ok = RoadmapOptions {
            topic: " Rust ownership ".to_string(),
            ..RoadmapOptions::default()
        }
        .checked()
        .unwrap();
        assert_eq!(ok.topic, "Rust ownership");
    }

    #[test]
    fn test_json_enums_decode_like_form_values() {
        let options: ExerciseOptions = serde_json::from_str(
            r#"{"exercises_difficulty": "Hard", "exercises_types": ["multiple-choice"]}"#,
        )
        .unwrap();
        assert_eq!(options.exercises_difficulty, Difficulty::Hard);
        assert_eq!(options.exercises_types, vec![ExerciseType::MultipleChoice]);

        let options: SummaryOptions = serde_json::from_str(r#"{"extension": "LONG"}"#).unwrap();
        assert_eq!(options.extension, LengthClass::Long);

        let err = serde_json::from_str::<FlashcardOptions>(r#"{"difficulty_level": "brutal"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("difficulty must be easy, medium or hard"));

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["extension"], "long");
        assert_eq!(
            serde_json::to_value(ExerciseType::MultipleChoice).unwrap(),
            "multiple_choice"
        );
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
        assert_eq!("Long".parse::<LengthClass>().unwrap(), LengthClass::Long);
        assert_eq!(
            "multiple-choice".parse::<ExerciseType>().unwrap(),
            ExerciseType::MultipleChoice
        );
        assert!("true_false".parse::<ExerciseType>().is_err());
    }
}
