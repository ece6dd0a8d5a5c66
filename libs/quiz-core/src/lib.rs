//! Core quiz library used by the quiz engine.
//!
//! Provides:
//! - Answer evaluation (exact option match, fuzzy free-text match)
//! - Difficulty drift and adaptive per-category targets
//! - SM-2 spaced repetition scheduling
//! - Shared types (Question, AnswerSet, ReviewRecord, QuizMode, etc.)

pub mod algorithm;
pub mod difficulty;
pub mod error;
pub mod evaluator;
pub mod matching;
pub mod types;

pub use algorithm::{quality_from_outcome, SchedulingResult, SpacedRepetitionAlgorithm};
pub use difficulty::{closest_by_difficulty, drift, drift_toward, AdaptiveTargets};
pub use error::{CoreError, Result};
pub use evaluator::{canonical_answer, evaluate, validate_answer_set, Evaluation};
pub use matching::{
    levenshtein_distance, match_free_text, normalized_similarity, MatchPass, MatchPolicy,
    MatchResult, Normalization, ThresholdPolicy,
};
pub use types::{
    accuracy_percent, AnswerId, AnswerOption, AnswerSet, AttemptResult, CategoryId,
    DifficultyBand, DifficultyRating, FreeTextAnswer, Question, QuestionId, QuestionKind,
    QuizMode, ReviewRecord, SubmittedAnswer, UserId,
};
