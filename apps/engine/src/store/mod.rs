//! Question store contract
//!
//! The engine never talks to a database directly. A host application
//! implements [`QuestionStore`] over its own persistence and hands it to the
//! engine; [`MemoryStore`] is a complete in-process implementation.

pub mod memory;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{
    AnswerRecord, AnswerSet, AttemptResult, CategoryId, DifficultyBand, Question, QuestionId,
    ReviewRecord, UserId,
};

pub use memory::MemoryStore;

/// Result type for store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read/write access to questions, answers, attempts and review records.
///
/// Calls may block on I/O; timeouts and retries belong to the implementation.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Questions in any of the categories, optionally limited to a band
    async fn questions_by_categories(
        &self,
        category_ids: &[CategoryId],
        difficulty: Option<DifficultyBand>,
    ) -> StoreResult<Vec<Question>>;

    /// Questions with the given ids, in the order of `ids`; unknown ids are skipped
    async fn questions_by_ids(&self, ids: &[QuestionId]) -> StoreResult<Vec<Question>>;

    /// Answer set of a question in storage order
    async fn answers_for(&self, question_id: QuestionId) -> StoreResult<AnswerSet>;

    async fn category_names(
        &self,
        category_ids: &[CategoryId],
    ) -> StoreResult<HashMap<CategoryId, String>>;

    async fn update_difficulty(&self, question_id: QuestionId, difficulty: f64) -> StoreResult<()>;

    async fn record_answer(&self, record: &AnswerRecord) -> StoreResult<()>;

    /// Ids of questions the user answered at or after `since`
    async fn answered_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> StoreResult<HashSet<QuestionId>>;

    async fn record_attempt(&self, attempt: &AttemptResult) -> StoreResult<()>;

    /// Records due at `now` in the categories, most overdue first
    async fn review_records_due(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        now: DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<ReviewRecord>>;

    /// Questions in the categories the user has no review record for
    async fn review_records_new(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        limit: usize,
    ) -> StoreResult<Vec<Question>>;

    async fn review_record(
        &self,
        user_id: UserId,
        question_id: QuestionId,
    ) -> StoreResult<Option<ReviewRecord>>;

    async fn upsert_review_record(&self, record: &ReviewRecord) -> StoreResult<()>;
}
