//! Core types for the quiz engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type QuestionId = i64;
pub type CategoryId = i64;
pub type AnswerId = i64;
pub type UserId = Uuid;

/// Lowest stored difficulty value.
pub const MIN_DIFFICULTY: f64 = 1.0;
/// Highest stored difficulty value.
pub const MAX_DIFFICULTY: f64 = 5.0;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    FreeText,
}

/// Question as held by the question store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category_id: CategoryId,
    pub text: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub kind: QuestionKind,
    pub difficulty: f64,
}

/// Multiple-choice option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub text: String,
    pub is_correct: bool,
}

/// Accepted answer for a free-text question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeTextAnswer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub text: String,
    pub is_primary: bool,
}

/// Answers attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "answers", rename_all = "snake_case")]
pub enum AnswerSet {
    MultipleChoice(Vec<AnswerOption>),
    FreeText(Vec<FreeTextAnswer>),
}

impl AnswerSet {
    pub fn len(&self) -> usize {
        match self {
            Self::MultipleChoice(options) => options.len(),
            Self::FreeText(answers) => answers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Self::FreeText(_) => QuestionKind::FreeText,
        }
    }
}

/// What the user submitted for the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SubmittedAnswer {
    Option(AnswerId),
    Text(String),
}

impl SubmittedAnswer {
    /// Value stored in the raw answer log.
    pub fn as_record_value(&self) -> String {
        match self {
            Self::Option(id) => id.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Quiz mode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    Quick,
    Test,
    Adaptive,
    SpacedRepetition,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::Quick
    }
}

impl QuizMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Test => "test",
            Self::Adaptive => "adaptive",
            Self::SpacedRepetition => "spaced_repetition",
        }
    }

    /// Parse from string. "standard" is accepted as an alias of quick.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "quick" | "standard" => Some(Self::Quick),
            "test" => Some(Self::Test),
            "adaptive" => Some(Self::Adaptive),
            "spaced_repetition" => Some(Self::SpacedRepetition),
            _ => None,
        }
    }
}

/// Difficulty band used to filter test-mode questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBand {
    /// Whether a stored difficulty value falls inside this band.
    ///
    /// Bounds are inclusive, so 2.0 is both easy and medium and 4.0 is both
    /// medium and hard.
    pub fn contains(self, difficulty: f64) -> bool {
        match self {
            Self::Easy => difficulty <= 2.0,
            Self::Medium => (2.0..=4.0).contains(&difficulty),
            Self::Hard => difficulty >= 4.0,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Difficulty feedback a user gives after answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyRating {
    Easy,
    Medium,
    Hard,
}

impl DifficultyRating {
    /// Difficulty value the rating pulls a question toward.
    pub fn target(self) -> f64 {
        match self {
            Self::Easy => MIN_DIFFICULTY,
            Self::Medium => 3.0,
            Self::Hard => MAX_DIFFICULTY,
        }
    }

    /// Rating implied by an answer outcome: a correct answer reads as easy.
    pub fn from_outcome(correct: bool) -> Self {
        if correct {
            Self::Easy
        } else {
            Self::Hard
        }
    }
}

/// Spaced-repetition state for one (user, question) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub repetitions: u32,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    /// Fresh record for a question never reviewed by this user.
    pub fn new(user_id: UserId, question_id: QuestionId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            question_id,
            repetitions: 0,
            interval_days: 0,
            ease_factor: 2.5,
            due_date: now,
            last_reviewed: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }
}

/// Summary of a finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    pub user_id: UserId,
    pub total_questions: usize,
    pub correct_count: usize,
    pub accuracy: f64,
    pub duration_seconds: i64,
    pub mode: QuizMode,
    pub category_ids: Vec<CategoryId>,
}

/// Percentage of correct answers; zero when nothing was asked.
pub fn accuracy_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct.min(total) as f64 / total as f64) * 100.0
}
