//! Test fixtures and factory functions for creating test data.

use quiz_engine::models::{
    AnswerOption, AnswerSet, CategoryId, FreeTextAnswer, Question, QuestionId, QuestionKind,
};

/// Letters used for multiple-choice option texts.
const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Index of the correct option in storage order.
pub const CORRECT_OPTION: usize = 2;

/// Build a multiple-choice question with four options.
///
/// Option ids are `id * 10 + index`; the option at [`CORRECT_OPTION`] is
/// the correct one.
pub fn multiple_choice(id: QuestionId, category_id: CategoryId, difficulty: f64) -> (Question, AnswerSet) {
    let question = Question {
        id,
        category_id,
        text: format!("Question {}?", id),
        explanation: format!("Explanation {}.", id),
        image: None,
        kind: QuestionKind::MultipleChoice,
        difficulty,
    };
    let options = OPTION_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| AnswerOption {
            id: id * 10 + i as i64,
            question_id: id,
            text: format!("Option {} of {}", label, id),
            is_correct: i == CORRECT_OPTION,
        })
        .collect();
    (question, AnswerSet::MultipleChoice(options))
}

/// Build a free-text question. The first accepted answer is primary.
pub fn free_text(
    id: QuestionId,
    category_id: CategoryId,
    difficulty: f64,
    accepted: &[&str],
) -> (Question, AnswerSet) {
    let question = Question {
        id,
        category_id,
        text: format!("Question {}?", id),
        explanation: format!("Explanation {}.", id),
        image: Some(format!("images/{}.png", id)),
        kind: QuestionKind::FreeText,
        difficulty,
    };
    let answers = accepted
        .iter()
        .enumerate()
        .map(|(i, text)| FreeTextAnswer {
            id: id * 10 + i as i64,
            question_id: id,
            text: text.to_string(),
            is_primary: i == 0,
        })
        .collect();
    (question, AnswerSet::FreeText(answers))
}
