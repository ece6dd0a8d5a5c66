//! Spaced-repetition scheduling over the question store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::algorithm::sm2::Sm2;
use quiz_core::{CoreError, SchedulingResult, SpacedRepetitionAlgorithm};

use crate::error::{EngineError, Result};
use crate::models::{CategoryId, Question, QuestionId, ReviewRecord, UserId};
use crate::services::selection::{sample, shuffle, spaced_quotas};
use crate::store::QuestionStore;

/// Maintains review records and builds spaced-repetition sessions.
pub struct Scheduler<S: QuestionStore> {
    store: Arc<S>,
    algorithm: Arc<dyn SpacedRepetitionAlgorithm>,
}

impl<S: QuestionStore> Scheduler<S> {
    /// Scheduler using SM-2 with default parameters
    pub fn new(store: Arc<S>) -> Self {
        Self::with_algorithm(store, Arc::new(Sm2::default()))
    }

    pub fn with_algorithm(store: Arc<S>, algorithm: Arc<dyn SpacedRepetitionAlgorithm>) -> Self {
        Self { store, algorithm }
    }

    pub fn algorithm(&self) -> &dyn SpacedRepetitionAlgorithm {
        self.algorithm.as_ref()
    }

    /// Review records due now, most overdue first
    pub async fn due_cards(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        limit: usize,
    ) -> Result<Vec<ReviewRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .review_records_due(user_id, category_ids, Utc::now(), limit)
            .await?)
    }

    /// Questions the user has never reviewed
    pub async fn new_cards(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        limit: usize,
    ) -> Result<Vec<Question>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .review_records_new(user_id, category_ids, limit)
            .await?)
    }

    /// Apply one review of `quality` (0..=5) and persist the new record
    pub async fn process_review(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        quality: u8,
    ) -> Result<ReviewRecord> {
        let now = Utc::now();
        let current = match self.store.review_record(user_id, question_id).await? {
            Some(record) => record,
            None => self.algorithm.initial_record(user_id, question_id, now),
        };

        let result = self.preview(&current, quality, now)?;
        self.store.upsert_review_record(&result.record).await?;

        tracing::debug!(
            %user_id,
            question_id,
            quality,
            interval_days = result.record.interval_days,
            ease_factor = result.record.ease_factor,
            "review scheduled"
        );

        Ok(result.record)
    }

    /// Next state for a review without persisting it
    pub fn preview(
        &self,
        record: &ReviewRecord,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult> {
        self.algorithm
            .schedule(record, quality, now)
            .map_err(|e| match e {
                CoreError::InvalidQuality(q) => {
                    EngineError::InvalidInput(format!("quality {} is outside 0..=5", q))
                }
                other => EngineError::InvalidInput(other.to_string()),
            })
    }

    /// Build a spaced-repetition question list of up to `target` questions.
    ///
    /// Due cards fill the due quota; any due shortfall moves to the new-card
    /// quota; what is still missing comes from the whole category pool. The
    /// result is shuffled and free of duplicates.
    pub async fn compose_session(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        target: usize,
        due_ratio: f64,
    ) -> Result<Vec<Question>> {
        let (due_quota, new_quota) = spaced_quotas(target, due_ratio);

        let due = self.due_cards(user_id, category_ids, due_quota).await?;
        let due_ids: Vec<QuestionId> = due.iter().map(|r| r.question_id).collect();
        let mut selected = self.store.questions_by_ids(&due_ids).await?;
        let mut seen: HashSet<QuestionId> = selected.iter().map(|q| q.id).collect();
        let due_count = selected.len();

        let new_limit = new_quota + due_quota.saturating_sub(due_count);
        let fresh = self.new_cards(user_id, category_ids, new_limit).await?;
        for question in fresh {
            if selected.len() >= target {
                break;
            }
            if seen.insert(question.id) {
                selected.push(question);
            }
        }
        let new_count = selected.len() - due_count;

        let shortfall = target.saturating_sub(selected.len());
        if shortfall > 0 {
            let pool: Vec<Question> = self
                .store
                .questions_by_categories(category_ids, None)
                .await?
                .into_iter()
                .filter(|q| !seen.contains(&q.id))
                .collect();
            for question in sample(pool, shortfall) {
                seen.insert(question.id);
                selected.push(question);
            }
        }

        tracing::debug!(
            %user_id,
            due = due_count,
            new = new_count,
            backfill = selected.len() - due_count - new_count,
            "spaced repetition session composed"
        );

        shuffle(&mut selected);
        Ok(selected)
    }
}
