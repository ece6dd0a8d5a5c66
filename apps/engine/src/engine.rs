//! Quiz engine: session lifecycle over a question store

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use quiz_core::{
    closest_by_difficulty, drift, evaluate, quality_from_outcome, validate_answer_set,
    SpacedRepetitionAlgorithm,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::*;
use crate::services::scheduler::Scheduler;
use crate::services::selection::{shuffle, QuestionSelector};
use crate::session::{QuestionSnapshot, QuizSession, SessionState};
use crate::store::QuestionStore;

/// Entry point for host applications
pub struct QuizEngine<S: QuestionStore> {
    store: Arc<S>,
    config: EngineConfig,
    scheduler: Scheduler<S>,
}

impl<S: QuestionStore> QuizEngine<S> {
    /// Engine using SM-2 for spaced repetition
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        let scheduler = Scheduler::new(store.clone());
        Self {
            store,
            config,
            scheduler,
        }
    }

    pub fn with_algorithm(
        store: Arc<S>,
        config: EngineConfig,
        algorithm: Arc<dyn SpacedRepetitionAlgorithm>,
    ) -> Self {
        let scheduler = Scheduler::with_algorithm(store.clone(), algorithm);
        Self {
            store,
            config,
            scheduler,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    /// Start a session: pick the initial questions for the mode and capture
    /// their answers.
    pub async fn start_session(&self, request: StartSessionRequest) -> Result<QuizSession> {
        let mut category_ids = Vec::with_capacity(request.category_ids.len());
        for id in request.category_ids {
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }
        if category_ids.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one category is required".to_string(),
            ));
        }

        let count = self.config.question_count(request.question_count);
        let mut session = QuizSession::new(
            request.user_id,
            request.mode,
            category_ids.clone(),
            self.config.adaptive_step,
        );

        let selector =
            QuestionSelector::new(self.store.as_ref(), &self.scheduler, self.config.due_ratio);
        let questions = selector
            .select(
                request.user_id,
                request.mode,
                &category_ids,
                count,
                request.difficulty,
            )
            .await?;

        if questions.is_empty() {
            tracing::info!(
                user_id = %request.user_id,
                mode = request.mode.as_str(),
                ?category_ids,
                "no questions available"
            );
            return Err(EngineError::NoQuestionsAvailable);
        }

        let names = self.store.category_names(&category_ids).await?;
        let mut snapshots = Vec::with_capacity(questions.len());
        for question in questions {
            let category_name = names
                .get(&question.category_id)
                .cloned()
                .unwrap_or_default();
            snapshots.push(self.snapshot(question, category_name, request.mode).await?);
        }

        tracing::info!(
            session_id = %session.id(),
            user_id = %request.user_id,
            mode = request.mode.as_str(),
            requested = request.question_count,
            loaded = snapshots.len(),
            "quiz session started"
        );

        session.load(snapshots);
        Ok(session)
    }

    /// Question the user should answer next
    pub fn current_question(&self, session: &QuizSession) -> CurrentQuestion {
        session.current_question()
    }

    /// Evaluate an answer to the current question and advance the session.
    ///
    /// Failures of the per-answer side effects (answer log, difficulty
    /// updates, review scheduling) are logged and do not fail the call.
    pub async fn submit_answer(
        &self,
        session: &mut QuizSession,
        answer: SubmittedAnswer,
    ) -> Result<SubmitAnswerResponse> {
        if session.is_closed() {
            return Err(EngineError::SessionAlreadyComplete);
        }
        let snapshot = session.current().cloned().ok_or_else(|| {
            EngineError::InvalidInput("no question is pending; complete the session".to_string())
        })?;
        let question_id = snapshot.question.id;
        let user_id = session.user_id();

        let evaluation = evaluate(&snapshot.answers, &answer, &self.config.match_policy);
        let is_correct = evaluation.is_correct;
        if evaluation.correct_answer.is_none() {
            tracing::warn!(question_id, "question has no correct answer to show");
        }
        let answer_kind = match answer {
            SubmittedAnswer::Option(_) => QuestionKind::MultipleChoice,
            SubmittedAnswer::Text(_) => QuestionKind::FreeText,
        };
        if answer_kind != snapshot.answers.kind() {
            tracing::warn!(
                question_id,
                expected = ?snapshot.answers.kind(),
                got = ?answer_kind,
                "answer kind does not match question; scored incorrect"
            );
        }

        let record = AnswerRecord {
            user_id,
            question_id,
            answer: answer.as_record_value(),
            is_correct,
            mode: session.mode(),
            answered_at: Utc::now(),
        };
        if let Err(e) = self.store.record_answer(&record).await {
            tracing::warn!(%user_id, question_id, error = %e, "failed to record answer");
        }

        match session.mode() {
            QuizMode::Adaptive => self.steer(session, &snapshot.question, is_correct).await,
            QuizMode::SpacedRepetition => {
                let quality = quality_from_outcome(is_correct);
                if let Err(e) = self
                    .scheduler
                    .process_review(user_id, question_id, quality)
                    .await
                {
                    tracing::warn!(%user_id, question_id, error = %e, "failed to schedule review");
                }
            }
            QuizMode::Quick | QuizMode::Test => {}
        }

        session.advance(is_correct);
        let (answered, total) = session.progress();

        tracing::debug!(
            session_id = %session.id(),
            question_id,
            is_correct,
            answered,
            total,
            "answer evaluated"
        );

        Ok(SubmitAnswerResponse {
            is_correct,
            correct_answer: evaluation.correct_answer,
            explanation: snapshot.question.explanation,
            is_complete: session.is_finished(),
            answered,
            total,
        })
    }

    /// Finalize the session and persist the attempt.
    ///
    /// The summary is computed once; repeated calls return it unchanged. If
    /// persisting fails the error is returned and the call may be retried.
    pub async fn complete_session(&self, session: &mut QuizSession) -> Result<AttemptResult> {
        if session.state() == SessionState::Completed {
            if let Some(result) = session.result() {
                return Ok(result.clone());
            }
        }

        let result = session.finalize(Utc::now());
        self.store.record_attempt(&result).await?;
        session.mark_completed();

        tracing::info!(
            session_id = %session.id(),
            user_id = %result.user_id,
            mode = result.mode.as_str(),
            total = result.total_questions,
            correct = result.correct_count,
            accuracy = result.accuracy,
            duration_seconds = result.duration_seconds,
            "quiz session completed"
        );

        Ok(result)
    }

    /// Apply a user's difficulty rating to a question; returns the new value
    pub async fn rate_question(
        &self,
        question_id: QuestionId,
        rating: DifficultyRating,
    ) -> Result<f64> {
        self.drift_difficulty(question_id, rating).await
    }

    async fn drift_difficulty(
        &self,
        question_id: QuestionId,
        rating: DifficultyRating,
    ) -> Result<f64> {
        let question = self
            .store
            .questions_by_ids(&[question_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown question {}", question_id)))?;

        let next = drift(question.difficulty, rating, self.config.drift_step);
        if next != question.difficulty {
            self.store.update_difficulty(question_id, next).await?;
        }
        Ok(next)
    }

    /// Adaptive mode: move the category target, drift the question's stored
    /// difficulty, and swap in the unseen question closest to the new target.
    async fn steer(&self, session: &mut QuizSession, question: &Question, correct: bool) {
        let Some(targets) = session.adaptive_targets_mut() else {
            return;
        };
        let target = targets.record(question.category_id, correct);

        let rating = DifficultyRating::from_outcome(correct);
        if let Err(e) = self.drift_difficulty(question.id, rating).await {
            tracing::warn!(question_id = question.id, error = %e, "failed to drift difficulty");
        }

        if !session.has_next() {
            return;
        }

        match self.closest_unseen(session, target).await {
            Ok(Some(next)) => {
                tracing::debug!(
                    session_id = %session.id(),
                    target,
                    question_id = next.question.id,
                    difficulty = next.question.difficulty,
                    "adaptive pick"
                );
                session.replace_next(next);
            }
            Ok(None) => {
                tracing::debug!(session_id = %session.id(), target, "no unseen question for target");
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id(), error = %e, "adaptive lookup failed");
            }
        }
    }

    async fn closest_unseen(
        &self,
        session: &QuizSession,
        target: f64,
    ) -> Result<Option<QuestionSnapshot>> {
        let Some(since) = Duration::try_hours(self.config.recent_window_hours)
            .and_then(|window| Utc::now().checked_sub_signed(window))
        else {
            tracing::warn!(
                window_hours = self.config.recent_window_hours,
                "recent window out of range; keeping the queued question"
            );
            return Ok(None);
        };
        let recent = self.store.answered_since(session.user_id(), since).await?;
        let in_session: HashSet<QuestionId> = session.question_ids();

        let pool = self
            .store
            .questions_by_categories(session.category_ids(), None)
            .await?;
        let candidates = pool
            .iter()
            .filter(|q| !in_session.contains(&q.id) && !recent.contains(&q.id));

        let Some(pick) = closest_by_difficulty(candidates, target).cloned() else {
            return Ok(None);
        };

        let names = self.store.category_names(&[pick.category_id]).await?;
        let category_name = names.get(&pick.category_id).cloned().unwrap_or_default();
        Ok(Some(self.snapshot(pick, category_name, session.mode()).await?))
    }

    async fn snapshot(
        &self,
        question: Question,
        category_name: String,
        mode: QuizMode,
    ) -> Result<QuestionSnapshot> {
        let mut answers = self.store.answers_for(question.id).await?;

        if let Err(e) = validate_answer_set(question.id, &answers) {
            tracing::warn!(question_id = question.id, error = %e, "answer set failed validation");
        }

        let shuffle_options = mode != QuizMode::Adaptive || self.config.shuffle_adaptive_options;
        if let AnswerSet::MultipleChoice(options) = &mut answers {
            if shuffle_options {
                shuffle(options);
            }
        }

        Ok(QuestionSnapshot {
            question,
            answers,
            category_name,
        })
    }
}
