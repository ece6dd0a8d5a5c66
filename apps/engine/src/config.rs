//! Engine configuration
//!
//! Defaults reproduce the standard quiz behavior. `EngineConfig::from_env`
//! overrides them from `QUIZ_*` environment variables (a `.env` file is
//! loaded first when present).

use std::str::FromStr;

use quiz_core::difficulty::{ADAPTIVE_STEP, DRIFT_STEP};
use quiz_core::{MatchPolicy, Normalization, ThresholdPolicy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Longest accepted recent-answer window: one hundred years
pub const MAX_RECENT_WINDOW_HOURS: i64 = 24 * 365 * 100;

/// Tunable engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Used when the requested question count is outside the accepted range
    pub default_question_count: usize,
    pub min_question_count: usize,
    pub max_question_count: usize,
    pub match_policy: MatchPolicy,
    /// Share of a spaced-repetition session reserved for due cards
    pub due_ratio: f64,
    pub adaptive_step: f64,
    pub drift_step: f64,
    /// Questions answered within this window are not picked by adaptive mode
    pub recent_window_hours: i64,
    /// Shuffle multiple-choice options in adaptive mode too
    pub shuffle_adaptive_options: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_question_count: 10,
            min_question_count: 5,
            max_question_count: 30,
            match_policy: MatchPolicy::default(),
            due_ratio: 0.7,
            adaptive_step: ADAPTIVE_STEP,
            drift_step: DRIFT_STEP,
            recent_window_hours: 24,
            shuffle_adaptive_options: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "QUIZ_DEFAULT_QUESTION_COUNT")? {
            config.default_question_count = v;
        }
        if let Some(v) = parse_var(&lookup, "QUIZ_MIN_QUESTION_COUNT")? {
            config.min_question_count = v;
        }
        if let Some(v) = parse_var(&lookup, "QUIZ_MAX_QUESTION_COUNT")? {
            config.max_question_count = v;
        }
        if let Some(v) = parse_var(&lookup, "QUIZ_DUE_RATIO")? {
            config.due_ratio = v;
        }
        if let Some(v) = parse_var(&lookup, "QUIZ_RECENT_WINDOW_HOURS")? {
            config.recent_window_hours = v;
        }
        if let Some(v) = parse_var(&lookup, "QUIZ_SHUFFLE_ADAPTIVE_OPTIONS")? {
            config.shuffle_adaptive_options = v;
        }
        if let Some(raw) = lookup("QUIZ_MATCH_THRESHOLD") {
            config.match_policy.threshold = match raw.trim() {
                "adaptive" => ThresholdPolicy::Adaptive,
                "proportional" => ThresholdPolicy::proportional(),
                other => {
                    return Err(EngineError::Config(format!(
                        "QUIZ_MATCH_THRESHOLD: unknown policy '{}'",
                        other
                    )))
                }
            };
        }
        if let Some(raw) = lookup("QUIZ_MATCH_NORMALIZATION") {
            config.match_policy.normalization = Normalization::from_str(raw.trim()).ok_or_else(
                || {
                    EngineError::Config(format!(
                        "QUIZ_MATCH_NORMALIZATION: unknown normalization '{}'",
                        raw
                    ))
                },
            )?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject inconsistent values
    pub fn validate(&self) -> Result<()> {
        if self.min_question_count == 0 || self.min_question_count > self.max_question_count {
            return Err(EngineError::Config(format!(
                "question count range {}..={} is empty",
                self.min_question_count, self.max_question_count
            )));
        }
        if !(self.min_question_count..=self.max_question_count)
            .contains(&self.default_question_count)
        {
            return Err(EngineError::Config(format!(
                "default question count {} is outside {}..={}",
                self.default_question_count, self.min_question_count, self.max_question_count
            )));
        }
        if !(0.0..=1.0).contains(&self.due_ratio) {
            return Err(EngineError::Config(format!(
                "due ratio {} is outside 0..=1",
                self.due_ratio
            )));
        }
        if !(0..=MAX_RECENT_WINDOW_HOURS).contains(&self.recent_window_hours) {
            return Err(EngineError::Config(format!(
                "recent window of {} hours is outside 0..={}",
                self.recent_window_hours, MAX_RECENT_WINDOW_HOURS
            )));
        }
        for (name, step) in [
            ("adaptive step", self.adaptive_step),
            ("drift step", self.drift_step),
        ] {
            if !step.is_finite() || step <= 0.0 {
                return Err(EngineError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, step
                )));
            }
        }
        Ok(())
    }

    /// Requested count if it is in range, otherwise the default
    pub fn question_count(&self, requested: usize) -> usize {
        if (self.min_question_count..=self.max_question_count).contains(&requested) {
            requested
        } else {
            self.default_question_count
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("{}: cannot parse '{}'", key, raw))),
        None => Ok(None),
    }
}
