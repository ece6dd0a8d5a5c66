//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with configurable parameters.

use super::{SchedulingResult, SpacedRepetitionAlgorithm, MAX_QUALITY};
use crate::error::{CoreError, Result};
use crate::types::{QuestionId, ReviewRecord, UserId};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    /// Reviews below this quality count as lapses.
    pub passing_quality: u8,
    /// Upper bound for any scheduled interval, in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
            passing_quality: 3,
            maximum_interval: 36_500,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_record(
        &self,
        user_id: UserId,
        question_id: QuestionId,
        now: DateTime<Utc>,
    ) -> ReviewRecord {
        ReviewRecord {
            ease_factor: self.initial_ease,
            ..ReviewRecord::new(user_id, question_id, now)
        }
    }

    fn schedule(
        &self,
        record: &ReviewRecord,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult> {
        if quality > MAX_QUALITY {
            return Err(CoreError::InvalidQuality(quality));
        }

        let (repetitions, interval_days) = if quality < self.passing_quality {
            (0, self.first_interval)
        } else {
            let repetitions = record.repetitions + 1;
            let interval = match repetitions {
                1 => self.first_interval,
                2 => self.second_interval,
                _ => (f64::from(record.interval_days) * record.ease_factor).round() as u32,
            };
            (repetitions, interval)
        };
        let interval_days = interval_days.min(self.maximum_interval).max(1);

        let next_due = now
            .checked_add_signed(Duration::days(i64::from(interval_days)))
            .ok_or(CoreError::DueDateOutOfRange { interval_days })?;

        Ok(SchedulingResult {
            record: ReviewRecord {
                user_id: record.user_id,
                question_id: record.question_id,
                repetitions,
                interval_days,
                ease_factor: self.next_ease(record.ease_factor, quality),
                due_date: next_due,
                last_reviewed: Some(now),
            },
            next_due,
        })
    }
}

impl Sm2 {
    /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored.
    pub fn next_ease(&self, ease: f64, quality: u8) -> f64 {
        let miss = f64::from(MAX_QUALITY - quality.min(MAX_QUALITY));
        (ease + 0.1 - miss * (0.08 + miss * 0.02)).max(self.minimum_ease)
    }
}
