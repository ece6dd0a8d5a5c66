//! Answer evaluation for multiple-choice and free-text questions.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::matching::{match_free_text, MatchPolicy, MatchResult};
use crate::types::{AnswerSet, QuestionId, SubmittedAnswer};

/// Verdict for one submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub is_correct: bool,
    /// Canonical correct answer shown as feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Matching details, free-text answers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_result: Option<MatchResult>,
}

/// Decide whether `submitted` answers the question owning `answers`.
///
/// A non-matching answer is a normal outcome, including a submission whose
/// kind does not fit the answer set (text for a multiple-choice question, an
/// unknown option id).
pub fn evaluate(answers: &AnswerSet, submitted: &SubmittedAnswer, policy: &MatchPolicy) -> Evaluation {
    let correct_answer = canonical_answer(answers).map(str::to_string);

    match (answers, submitted) {
        (AnswerSet::MultipleChoice(options), SubmittedAnswer::Option(chosen)) => Evaluation {
            is_correct: options.iter().any(|o| o.id == *chosen && o.is_correct),
            correct_answer,
            match_result: None,
        },
        (AnswerSet::FreeText(accepted), SubmittedAnswer::Text(typed)) => {
            let result = match_free_text(typed, accepted.iter().map(|a| a.text.as_str()), policy);
            Evaluation {
                is_correct: result.is_correct,
                correct_answer,
                match_result: Some(result),
            }
        }
        _ => Evaluation {
            is_correct: false,
            correct_answer,
            match_result: None,
        },
    }
}

/// Answer text surfaced in feedback.
///
/// Multiple choice: the option flagged correct. Free text: the primary
/// answer, else the first stored one.
pub fn canonical_answer(answers: &AnswerSet) -> Option<&str> {
    match answers {
        AnswerSet::MultipleChoice(options) => options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.text.as_str()),
        AnswerSet::FreeText(accepted) => accepted
            .iter()
            .find(|a| a.is_primary)
            .or_else(|| accepted.first())
            .map(|a| a.text.as_str()),
    }
}

/// Check the authoring invariants of an answer set: non-empty, and exactly
/// one correct option for multiple choice.
pub fn validate_answer_set(question_id: QuestionId, answers: &AnswerSet) -> Result<()> {
    if answers.is_empty() {
        return Err(CoreError::EmptyAnswerSet { question_id });
    }
    if let AnswerSet::MultipleChoice(options) = answers {
        match options.iter().filter(|o| o.is_correct).count() {
            0 => return Err(CoreError::NoCorrectOption { question_id }),
            1 => {}
            count => return Err(CoreError::MultipleCorrectOptions { question_id, count }),
        }
    }
    Ok(())
}
