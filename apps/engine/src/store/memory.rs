//! In-memory question store

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{QuestionStore, StoreResult};
use crate::error::StoreError;
use crate::models::{
    AnswerRecord, AnswerSet, AttemptResult, CategoryId, DifficultyBand, Question, QuestionId,
    ReviewRecord, UserId,
};

#[derive(Debug, Default)]
struct Inner {
    categories: BTreeMap<CategoryId, String>,
    // BTreeMap keeps the natural id ordering for every query
    questions: BTreeMap<QuestionId, Question>,
    answers: HashMap<QuestionId, AnswerSet>,
    answer_log: Vec<AnswerRecord>,
    attempts: Vec<AttemptResult>,
    reviews: HashMap<(UserId, QuestionId), ReviewRecord>,
}

/// Question store kept entirely in process memory.
///
/// Writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    fail_reads: AtomicBool,
    fail_answer_writes: AtomicBool,
    fail_attempt_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Seeding ===

    pub async fn add_category(&self, id: CategoryId, name: &str) {
        self.inner
            .write()
            .await
            .categories
            .insert(id, name.to_string());
    }

    pub async fn add_question(&self, question: Question, answers: AnswerSet) {
        let mut inner = self.inner.write().await;
        inner.answers.insert(question.id, answers);
        inner.questions.insert(question.id, question);
    }

    pub async fn insert_review_record(&self, record: ReviewRecord) {
        self.inner
            .write()
            .await
            .reviews
            .insert((record.user_id, record.question_id), record);
    }

    // === Failure injection ===

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_answer_writes(&self, fail: bool) {
        self.fail_answer_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_attempt_writes(&self, fail: bool) {
        self.fail_attempt_writes.store(fail, Ordering::SeqCst);
    }

    // === Read-back ===

    pub async fn answer_records(&self) -> Vec<AnswerRecord> {
        self.inner.read().await.answer_log.clone()
    }

    pub async fn attempts(&self) -> Vec<AttemptResult> {
        self.inner.read().await.attempts.clone()
    }

    pub async fn difficulty_of(&self, question_id: QuestionId) -> Option<f64> {
        self.inner
            .read()
            .await
            .questions
            .get(&question_id)
            .map(|q| q.difficulty)
    }

    fn check(flag: &AtomicBool, what: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{} failed", what)))
        } else {
            Ok(())
        }
    }

    fn in_categories(question: &Question, category_ids: &[CategoryId]) -> bool {
        category_ids.contains(&question.category_id)
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn questions_by_categories(
        &self,
        category_ids: &[CategoryId],
        difficulty: Option<DifficultyBand>,
    ) -> StoreResult<Vec<Question>> {
        Self::check(&self.fail_reads, "questions_by_categories")?;
        let inner = self.inner.read().await;
        Ok(inner
            .questions
            .values()
            .filter(|q| Self::in_categories(q, category_ids))
            .filter(|q| difficulty.map_or(true, |band| band.contains(q.difficulty)))
            .cloned()
            .collect())
    }

    async fn questions_by_ids(&self, ids: &[QuestionId]) -> StoreResult<Vec<Question>> {
        Self::check(&self.fail_reads, "questions_by_ids")?;
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.questions.get(id).cloned())
            .collect())
    }

    async fn answers_for(&self, question_id: QuestionId) -> StoreResult<AnswerSet> {
        Self::check(&self.fail_reads, "answers_for")?;
        self.inner
            .read()
            .await
            .answers
            .get(&question_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("answers for question {}", question_id)))
    }

    async fn category_names(
        &self,
        category_ids: &[CategoryId],
    ) -> StoreResult<HashMap<CategoryId, String>> {
        Self::check(&self.fail_reads, "category_names")?;
        let inner = self.inner.read().await;
        Ok(category_ids
            .iter()
            .filter_map(|id| inner.categories.get(id).map(|name| (*id, name.clone())))
            .collect())
    }

    async fn update_difficulty(&self, question_id: QuestionId, difficulty: f64) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let question = inner
            .questions
            .get_mut(&question_id)
            .ok_or_else(|| StoreError::NotFound(format!("question {}", question_id)))?;
        question.difficulty = difficulty;
        Ok(())
    }

    async fn record_answer(&self, record: &AnswerRecord) -> StoreResult<()> {
        Self::check(&self.fail_answer_writes, "record_answer")?;
        self.inner.write().await.answer_log.push(record.clone());
        Ok(())
    }

    async fn answered_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> StoreResult<HashSet<QuestionId>> {
        Self::check(&self.fail_reads, "answered_since")?;
        let inner = self.inner.read().await;
        Ok(inner
            .answer_log
            .iter()
            .filter(|r| r.user_id == user_id && r.answered_at >= since)
            .map(|r| r.question_id)
            .collect())
    }

    async fn record_attempt(&self, attempt: &AttemptResult) -> StoreResult<()> {
        Self::check(&self.fail_attempt_writes, "record_attempt")?;
        self.inner.write().await.attempts.push(attempt.clone());
        Ok(())
    }

    async fn review_records_due(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        now: DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<ReviewRecord>> {
        Self::check(&self.fail_reads, "review_records_due")?;
        let inner = self.inner.read().await;
        let mut due: Vec<ReviewRecord> = inner
            .reviews
            .values()
            .filter(|r| r.user_id == user_id && r.is_due(now))
            .filter(|r| {
                inner
                    .questions
                    .get(&r.question_id)
                    .is_some_and(|q| Self::in_categories(q, category_ids))
            })
            .cloned()
            .collect();
        due.sort_by_key(|r| (r.due_date, r.question_id));
        due.truncate(limit);
        Ok(due)
    }

    async fn review_records_new(
        &self,
        user_id: UserId,
        category_ids: &[CategoryId],
        limit: usize,
    ) -> StoreResult<Vec<Question>> {
        Self::check(&self.fail_reads, "review_records_new")?;
        let inner = self.inner.read().await;
        Ok(inner
            .questions
            .values()
            .filter(|q| Self::in_categories(q, category_ids))
            .filter(|q| !inner.reviews.contains_key(&(user_id, q.id)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn review_record(
        &self,
        user_id: UserId,
        question_id: QuestionId,
    ) -> StoreResult<Option<ReviewRecord>> {
        Self::check(&self.fail_reads, "review_record")?;
        Ok(self
            .inner
            .read()
            .await
            .reviews
            .get(&(user_id, question_id))
            .cloned())
    }

    async fn upsert_review_record(&self, record: &ReviewRecord) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .reviews
            .insert((record.user_id, record.question_id), record.clone());
        Ok(())
    }
}
