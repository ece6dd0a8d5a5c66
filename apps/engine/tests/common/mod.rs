//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring an engine to an in-memory store
//! - Helpers for seeding questions and answering them

#![allow(dead_code)]

pub mod fixtures;

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use quiz_engine::models::{
    AnswerSet, CategoryId, DifficultyBand, QuestionId, QuizMode, ReviewRecord,
    StartSessionRequest, SubmittedAnswer,
};
use quiz_engine::{EngineConfig, MemoryStore, QuestionSnapshot, QuizEngine};

pub const HISTORY: CategoryId = 1;
pub const SCIENCE: CategoryId = 2;
pub const GEOGRAPHY: CategoryId = 3;

/// Engine plus the store behind it and a test user.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub engine: QuizEngine<MemoryStore>,
    pub user_id: Uuid,
    next_id: AtomicI64,
}

impl TestContext {
    /// Create a context with default configuration and three empty categories.
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        store.add_category(HISTORY, "History").await;
        store.add_category(SCIENCE, "Science").await;
        store.add_category(GEOGRAPHY, "Geography").await;

        let engine = QuizEngine::new(store.clone(), config);

        Self {
            store,
            engine,
            user_id: Uuid::new_v4(),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> QuestionId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Seed one multiple-choice question and return its id.
    pub async fn seed_question(&self, category_id: CategoryId, difficulty: f64) -> QuestionId {
        let id = self.allocate_id();
        let (question, answers) = fixtures::multiple_choice(id, category_id, difficulty);
        self.store.add_question(question, answers).await;
        id
    }

    /// Seed `count` multiple-choice questions of the same difficulty.
    pub async fn seed_questions(
        &self,
        category_id: CategoryId,
        count: usize,
        difficulty: f64,
    ) -> Vec<QuestionId> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.seed_question(category_id, difficulty).await);
        }
        ids
    }

    /// Seed a free-text question; the first accepted answer is primary.
    pub async fn seed_free_text(&self, category_id: CategoryId, accepted: &[&str]) -> QuestionId {
        let id = self.allocate_id();
        let (question, answers) = fixtures::free_text(id, category_id, 3.0, accepted);
        self.store.add_question(question, answers).await;
        id
    }

    /// Give the test user a review record due `due_in` from now.
    pub async fn seed_review(&self, question_id: QuestionId, due_in: Duration) -> DateTime<Utc> {
        let now = Utc::now();
        let mut record = ReviewRecord::new(self.user_id, question_id, now);
        record.repetitions = 2;
        record.interval_days = 6;
        record.due_date = now + due_in;
        record.last_reviewed = Some(now - Duration::days(6));
        let due = record.due_date;
        self.store.insert_review_record(record).await;
        due
    }

    pub fn request(&self, mode: QuizMode, category_ids: &[CategoryId], count: usize) -> StartSessionRequest {
        StartSessionRequest {
            user_id: self.user_id,
            mode,
            category_ids: category_ids.to_vec(),
            question_count: count,
            difficulty: None,
        }
    }

    pub fn test_request(
        &self,
        category_ids: &[CategoryId],
        count: usize,
        band: DifficultyBand,
    ) -> StartSessionRequest {
        StartSessionRequest {
            difficulty: Some(band),
            ..self.request(QuizMode::Test, category_ids, count)
        }
    }
}

/// An answer the engine must accept for this question.
pub fn correct_answer(snapshot: &QuestionSnapshot) -> SubmittedAnswer {
    match &snapshot.answers {
        AnswerSet::MultipleChoice(options) => {
            let option = options
                .iter()
                .find(|o| o.is_correct)
                .expect("fixture has a correct option");
            SubmittedAnswer::Option(option.id)
        }
        AnswerSet::FreeText(answers) => SubmittedAnswer::Text(answers[0].text.clone()),
    }
}

/// An answer the engine must reject for this question.
pub fn wrong_answer(snapshot: &QuestionSnapshot) -> SubmittedAnswer {
    match &snapshot.answers {
        AnswerSet::MultipleChoice(options) => {
            let option = options
                .iter()
                .find(|o| !o.is_correct)
                .expect("fixture has a wrong option");
            SubmittedAnswer::Option(option.id)
        }
        AnswerSet::FreeText(_) => SubmittedAnswer::Text("definitely not it".to_string()),
    }
}
