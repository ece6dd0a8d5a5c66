//! Spaced repetition algorithm implementations.

pub mod sm2;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{QuestionId, ReviewRecord, UserId};

/// Highest review quality score.
pub const MAX_QUALITY: u8 = 5;

/// Result of scheduling a question after review.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub record: ReviewRecord,
    pub next_due: DateTime<Utc>,
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next review state after a review of `quality` (0..=5).
    fn schedule(
        &self,
        record: &ReviewRecord,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult>;

    /// State for a question the user has never reviewed.
    fn initial_record(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        now: DateTime<Utc>,
    ) -> ReviewRecord;
}

/// Binary quality used by quiz sessions: no partial credit.
pub fn quality_from_outcome(correct: bool) -> u8 {
    if correct {
        MAX_QUALITY
    } else {
        0
    }
}
