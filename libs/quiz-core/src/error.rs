//! Error types for quiz-core.

use thiserror::Error;

use crate::types::QuestionId;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the pure quiz algorithms.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("review quality {0} is outside 0..=5")]
    InvalidQuality(u8),

    #[error("question {question_id} has no answers")]
    EmptyAnswerSet { question_id: QuestionId },

    #[error("question {question_id} has no option marked correct")]
    NoCorrectOption { question_id: QuestionId },

    #[error("question {question_id} has {count} options marked correct")]
    MultipleCorrectOptions { question_id: QuestionId, count: usize },

    #[error("a {interval_days}-day interval puts the due date past the supported calendar")]
    DueDateOutOfRange { interval_days: u32 },
}
