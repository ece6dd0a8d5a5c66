//! Quiz session value object
//!
//! A `QuizSession` is owned by the caller for the lifetime of one attempt and
//! passed into every engine call. Dropping it abandons the attempt.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use quiz_core::{accuracy_percent, AdaptiveTargets};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    AnswerSet, AttemptResult, CategoryId, CurrentQuestion, OptionView, Question, QuestionId,
    QuestionView, QuizMode, UserId,
};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    InProgress,
    Completed,
}

/// A question captured at load time together with its answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSnapshot {
    pub question: Question,
    pub answers: AnswerSet,
    pub category_name: String,
}

impl QuestionSnapshot {
    fn view(&self, position: usize, total: usize) -> QuestionView {
        let options = match &self.answers {
            AnswerSet::MultipleChoice(options) => options
                .iter()
                .map(|o| OptionView {
                    id: o.id,
                    text: o.text.clone(),
                })
                .collect(),
            AnswerSet::FreeText(_) => Vec::new(),
        };

        QuestionView {
            question_id: self.question.id,
            category_id: self.question.category_id,
            category_name: self.category_name.clone(),
            text: self.question.text.clone(),
            image: self.question.image.clone(),
            kind: self.question.kind,
            options,
            position,
            total,
        }
    }
}

/// State of one quiz attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    id: Uuid,
    user_id: UserId,
    mode: QuizMode,
    category_ids: Vec<CategoryId>,
    questions: Vec<QuestionSnapshot>,
    index: usize,
    correct_count: usize,
    started_at: DateTime<Utc>,
    /// Adaptive mode only
    adaptive: Option<AdaptiveTargets>,
    state: SessionState,
    /// Computed once on completion
    result: Option<AttemptResult>,
}

impl QuizSession {
    pub(crate) fn new(
        user_id: UserId,
        mode: QuizMode,
        category_ids: Vec<CategoryId>,
        adaptive_step: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            mode,
            category_ids,
            questions: Vec::new(),
            index: 0,
            correct_count: 0,
            started_at: Utc::now(),
            adaptive: (mode == QuizMode::Adaptive).then(|| AdaptiveTargets::new(adaptive_step)),
            state: SessionState::Initializing,
            result: None,
        }
    }

    /// Install the initial question list and start the quiz
    pub(crate) fn load(&mut self, questions: Vec<QuestionSnapshot>) {
        self.questions = questions;
        self.index = 0;
        self.state = SessionState::InProgress;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn category_ids(&self) -> &[CategoryId] {
        &self.category_ids
    }

    pub fn questions(&self) -> &[QuestionSnapshot] {
        &self.questions
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn adaptive_targets(&self) -> Option<&AdaptiveTargets> {
        self.adaptive.as_ref()
    }

    pub(crate) fn adaptive_targets_mut(&mut self) -> Option<&mut AdaptiveTargets> {
        self.adaptive.as_mut()
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.index.min(self.questions.len()), self.questions.len())
    }

    /// All questions answered
    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Completed, or finalization already started
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Completed || self.result.is_some()
    }

    pub fn current(&self) -> Option<&QuestionSnapshot> {
        self.questions.get(self.index)
    }

    pub fn current_question(&self) -> CurrentQuestion {
        match self.current() {
            Some(snapshot) if !self.is_closed() => {
                CurrentQuestion::Pending(snapshot.view(self.index + 1, self.questions.len()))
            }
            _ => CurrentQuestion::Finished,
        }
    }

    pub(crate) fn question_ids(&self) -> HashSet<QuestionId> {
        self.questions.iter().map(|s| s.question.id).collect()
    }

    /// Whether a question is queued after the current one
    pub(crate) fn has_next(&self) -> bool {
        self.index + 1 < self.questions.len()
    }

    /// Replace the question queued right after the current one
    pub(crate) fn replace_next(&mut self, snapshot: QuestionSnapshot) -> bool {
        match self.questions.get_mut(self.index + 1) {
            Some(slot) => {
                *slot = snapshot;
                true
            }
            None => false,
        }
    }

    pub(crate) fn advance(&mut self, correct: bool) {
        if correct {
            self.correct_count += 1;
        }
        self.index += 1;
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    /// Freeze the attempt summary; later calls return the first summary
    pub(crate) fn finalize(&mut self, now: DateTime<Utc>) -> AttemptResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        let total = self.questions.len();
        let correct = self.correct_count.min(total);
        let result = AttemptResult {
            user_id: self.user_id,
            total_questions: total,
            correct_count: correct,
            accuracy: accuracy_percent(correct, total),
            duration_seconds: (now - self.started_at).num_seconds().max(0),
            mode: self.mode,
            category_ids: self.category_ids.clone(),
        };
        self.result = Some(result.clone());
        result
    }

    pub(crate) fn mark_completed(&mut self) {
        self.state = SessionState::Completed;
    }
}
