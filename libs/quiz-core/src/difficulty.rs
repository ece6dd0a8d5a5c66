//! Question difficulty: global drift from feedback and per-session adaptive
//! steering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, DifficultyRating, Question, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Default nudge applied to a stored difficulty per piece of feedback.
pub const DRIFT_STEP: f64 = 0.1;
/// Default change of an adaptive target per answer.
pub const ADAPTIVE_STEP: f64 = 0.5;

/// Move `current` at most `step` toward `target`, never past it.
pub fn drift_toward(current: f64, target: f64, step: f64) -> f64 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

/// New stored difficulty after one rating.
pub fn drift(current: f64, rating: DifficultyRating, step: f64) -> f64 {
    drift_toward(current, rating.target(), step)
}

/// Live per-category target difficulty for an adaptive session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdaptiveTargets {
    targets: HashMap<CategoryId, f64>,
    step: f64,
}

impl AdaptiveTargets {
    pub fn new(step: f64) -> Self {
        Self {
            targets: HashMap::new(),
            step,
        }
    }

    /// Current target for a category; categories start at the easiest level.
    pub fn target(&self, category_id: CategoryId) -> f64 {
        self.targets.get(&category_id).copied().unwrap_or(MIN_DIFFICULTY)
    }

    /// Raise the target after a correct answer, lower it otherwise.
    /// Returns the updated target.
    pub fn record(&mut self, category_id: CategoryId, correct: bool) -> f64 {
        let delta = if correct { self.step } else { -self.step };
        let next = (self.target(category_id) + delta).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        self.targets.insert(category_id, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &f64)> {
        self.targets.iter()
    }
}

/// Question whose difficulty is nearest `target`. Ties go to the earliest
/// candidate.
pub fn closest_by_difficulty<'a, I>(candidates: I, target: f64) -> Option<&'a Question>
where
    I: IntoIterator<Item = &'a Question>,
{
    candidates.into_iter().min_by(|a, b| {
        let da = (a.difficulty - target).abs();
        let db = (b.difficulty - target).abs();
        da.total_cmp(&db)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionKind;

    fn question(id: i64, difficulty: f64) -> Question {
        Question {
            id,
            category_id: 1,
            text: format!("Question {id}?"),
            explanation: String::new(),
            image: None,
            kind: QuestionKind::MultipleChoice,
            difficulty,
        }
    }

    #[test]
    fn drift_moves_one_step() {
        assert!((drift(3.0, DifficultyRating::Easy, DRIFT_STEP) - 2.9).abs() < 1e-9);
        assert!((drift(3.0, DifficultyRating::Hard, DRIFT_STEP) - 3.1).abs() < 1e-9);
        assert_eq!(drift(3.0, DifficultyRating::Medium, DRIFT_STEP), 3.0);
    }

    #[test]
    fn drift_never_overshoots() {
        assert_eq!(drift(1.05, DifficultyRating::Easy, DRIFT_STEP), 1.0);
        assert_eq!(drift(4.95, DifficultyRating::Hard, DRIFT_STEP), 5.0);
        assert_eq!(drift(3.05, DifficultyRating::Medium, DRIFT_STEP), 3.0);
    }

    #[test]
    fn repeated_easy_converges_to_floor() {
        let mut value = 2.0;
        for _ in 0..50 {
            let next = drift(value, DifficultyRating::Easy, DRIFT_STEP);
            assert!(next <= value);
            assert!(value - next <= DRIFT_STEP + 1e-9);
            assert!(next >= 1.0);
            value = next;
        }
        assert_eq!(value, 1.0);
        assert_eq!(drift(value, DifficultyRating::Easy, DRIFT_STEP), 1.0);
    }

    #[test]
    fn adaptive_targets_are_clamped() {
        let mut targets = AdaptiveTargets::new(ADAPTIVE_STEP);
        assert_eq!(targets.target(7), 1.0);

        for _ in 0..20 {
            targets.record(7, true);
        }
        assert_eq!(targets.target(7), 5.0);

        for _ in 0..20 {
            targets.record(7, false);
        }
        assert_eq!(targets.target(7), 1.0);
    }

    #[test]
    fn adaptive_targets_are_per_category() {
        let mut targets = AdaptiveTargets::new(ADAPTIVE_STEP);
        assert_eq!(targets.record(1, true), 1.5);
        assert_eq!(targets.record(1, true), 2.0);
        assert_eq!(targets.record(2, false), 1.0);
        assert_eq!(targets.target(1), 2.0);
        assert_eq!(targets.target(2), 1.0);
    }

    #[test]
    fn closest_picks_nearest_difficulty() {
        let pool = vec![question(1, 1.0), question(2, 2.4), question(3, 3.9), question(4, 2.6)];
        assert_eq!(closest_by_difficulty(&pool, 2.5).map(|q| q.id), Some(2));
        assert_eq!(closest_by_difficulty(&pool, 5.0).map(|q| q.id), Some(3));
        assert_eq!(closest_by_difficulty(&pool, 0.0).map(|q| q.id), Some(1));
        assert!(closest_by_difficulty(&[], 2.0).is_none());
    }
}
