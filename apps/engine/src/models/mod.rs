//! Request/response types and store records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export shared types from quiz-core
pub use quiz_core::types::{
    AnswerId, AnswerOption, AnswerSet, AttemptResult, CategoryId, DifficultyBand,
    DifficultyRating, FreeTextAnswer, Question, QuestionId, QuestionKind, QuizMode, ReviewRecord,
    SubmittedAnswer, UserId,
};

// === Engine Request/Response Types ===

/// Start a quiz session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: UserId,
    pub mode: QuizMode,
    pub category_ids: Vec<CategoryId>,
    /// Out-of-range counts fall back to the configured default
    pub question_count: usize,
    /// Test mode only
    #[serde(default)]
    pub difficulty: Option<DifficultyBand>,
}

/// Multiple-choice option as shown to the user (no correctness flag)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub id: AnswerId,
    pub text: String,
}

/// Question as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub kind: QuestionKind,
    /// Empty for free-text questions
    pub options: Vec<OptionView>,
    /// 1-based position in the session
    pub position: usize,
    pub total: usize,
}

/// Response of `current_question`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurrentQuestion {
    Pending(QuestionView),
    Finished,
}

impl CurrentQuestion {
    pub fn question(&self) -> Option<&QuestionView> {
        match self {
            CurrentQuestion::Pending(view) => Some(view),
            CurrentQuestion::Finished => None,
        }
    }
}

/// Response of `submit_answer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    /// Canonical correct answer; missing only when the answer set is broken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub explanation: String,
    pub is_complete: bool,
    pub answered: usize,
    pub total: usize,
}

// === Store Records ===

/// Raw answer log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub user_id: UserId,
    pub question_id: QuestionId,
    /// Chosen option id or typed text
    pub answer: String,
    pub is_correct: bool,
    pub mode: QuizMode,
    pub answered_at: DateTime<Utc>,
}
