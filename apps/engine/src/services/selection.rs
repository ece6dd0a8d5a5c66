//! Initial question selection per quiz mode.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::error::{EngineError, Result};
use crate::models::{CategoryId, DifficultyBand, Question, QuizMode, UserId};
use crate::services::scheduler::Scheduler;
use crate::store::QuestionStore;

/// Uniform random sample of at most `count` items.
pub fn sample<T>(mut items: Vec<T>, count: usize) -> Vec<T> {
    let mut rng = thread_rng();
    items.shuffle(&mut rng);
    items.truncate(count);
    items
}

pub fn shuffle<T>(items: &mut [T]) {
    let mut rng = thread_rng();
    items.shuffle(&mut rng);
}

/// Split a spaced-repetition session into (due, new) quotas. The due share
/// rounds up, the new share gets the rest.
pub fn spaced_quotas(target: usize, due_ratio: f64) -> (usize, usize) {
    // Shave float error so 20 * 0.7 stays 14
    let due = ((target as f64 * due_ratio) - 1e-9).ceil().max(0.0) as usize;
    let due = due.min(target);
    (due, target - due)
}

/// Chooses the question list a new session starts with.
pub struct QuestionSelector<'a, S: QuestionStore> {
    store: &'a S,
    scheduler: &'a Scheduler<S>,
    due_ratio: f64,
}

impl<'a, S: QuestionStore> QuestionSelector<'a, S> {
    pub fn new(store: &'a S, scheduler: &'a Scheduler<S>, due_ratio: f64) -> Self {
        Self {
            store,
            scheduler,
            due_ratio,
        }
    }

    pub async fn select(
        &self,
        user_id: UserId,
        mode: QuizMode,
        category_ids: &[CategoryId],
        count: usize,
        difficulty: Option<DifficultyBand>,
    ) -> Result<Vec<Question>> {
        match mode {
            QuizMode::Quick => {
                let pool = self.store.questions_by_categories(category_ids, None).await?;
                Ok(sample(pool, count))
            }
            QuizMode::Test => {
                let band = difficulty.ok_or_else(|| {
                    EngineError::InvalidInput("test mode requires a difficulty band".to_string())
                })?;
                let pool = self
                    .store
                    .questions_by_categories(category_ids, Some(band))
                    .await?;
                Ok(sample(pool, count))
            }
            QuizMode::Adaptive => {
                let pool = self.store.questions_by_categories(category_ids, None).await?;
                Ok(easiest_first(pool, count))
            }
            QuizMode::SpacedRepetition => {
                self.scheduler
                    .compose_session(user_id, category_ids, count, self.due_ratio)
                    .await
            }
        }
    }
}

/// The `count` easiest questions in ascending difficulty; equal difficulties
/// come out in random order.
pub fn easiest_first(pool: Vec<Question>, count: usize) -> Vec<Question> {
    let mut pool = sample(pool, usize::MAX);
    pool.sort_by(|a, b| {
        a.difficulty
            .partial_cmp(&b.difficulty)
            .unwrap_or(Ordering::Equal)
    });
    pool.truncate(count);
    pool
}
