//! Adaptive mode session tests.

mod common;

use chrono::Utc;
use pretty_assertions::assert_eq;

use common::{correct_answer, wrong_answer, TestContext, HISTORY, SCIENCE};
use quiz_engine::models::{AnswerRecord, AnswerSet, QuizMode};
use quiz_engine::store::QuestionStore;
use quiz_engine::EngineConfig;

/// Seeds five 1.0 questions (the initial batch) and a pool at 1.5, 3.0, 4.5.
/// Returns the pool ids in that order.
async fn seed_ladder(ctx: &TestContext) -> (i64, i64, i64) {
    ctx.seed_questions(HISTORY, 5, 1.0).await;
    let mid_low = ctx.seed_question(HISTORY, 1.5).await;
    let mid = ctx.seed_question(HISTORY, 3.0).await;
    let high = ctx.seed_question(HISTORY, 4.5).await;
    (mid_low, mid, high)
}

/// The initial batch starts with the easiest questions, ascending.
#[tokio::test]
async fn test_initial_batch_is_easiest_first() {
    let ctx = TestContext::new().await;
    for difficulty in [4.0, 2.5, 1.2, 3.3, 5.0, 1.8, 2.2, 4.4] {
        ctx.seed_question(HISTORY, difficulty).await;
    }

    let session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();

    let difficulties: Vec<f64> = session
        .questions()
        .iter()
        .map(|s| s.question.difficulty)
        .collect();
    assert_eq!(difficulties, vec![1.2, 1.8, 2.2, 2.5, 3.3]);
    assert_eq!(session.adaptive_targets().unwrap().target(HISTORY), 1.0);
}

/// Adaptive mode keeps options in storage order by default.
#[tokio::test]
async fn test_adaptive_keeps_option_order() {
    let ctx = TestContext::new().await;
    ctx.seed_questions(HISTORY, 6, 2.0).await;

    let session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();

    for snapshot in session.questions() {
        let AnswerSet::MultipleChoice(options) = &snapshot.answers else {
            panic!("expected multiple choice");
        };
        let ids: Vec<_> = options.iter().map(|o| o.id).collect();
        let base = snapshot.question.id * 10;
        assert_eq!(ids, vec![base, base + 1, base + 2, base + 3]);
    }
}

/// Each answer moves the target and pulls in the closest unseen question.
#[tokio::test]
async fn test_next_question_follows_target() {
    let ctx = TestContext::new().await;
    let (mid_low, _mid, _high) = seed_ladder(&ctx).await;

    let mut session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();
    let displaced = session.questions()[1].question.id;

    // Correct: target 1.0 -> 1.5, the 1.5 question is next
    let first = session.current().unwrap().clone();
    let response = ctx
        .engine
        .submit_answer(&mut session, correct_answer(&first))
        .await
        .unwrap();
    assert!(response.is_correct);
    assert_eq!(session.adaptive_targets().unwrap().target(HISTORY), 1.5);
    assert_eq!(session.current().unwrap().question.id, mid_low);
    assert_eq!(session.questions().len(), 5);

    // Wrong: target back to 1.0; the 1.0 question displaced above was never
    // shown, so it is unseen again and the nearest match
    let second = session.current().unwrap().clone();
    let response = ctx
        .engine
        .submit_answer(&mut session, wrong_answer(&second))
        .await
        .unwrap();
    assert!(!response.is_correct);
    assert_eq!(session.adaptive_targets().unwrap().target(HISTORY), 1.0);
    assert_eq!(session.current().unwrap().question.id, displaced);
    assert_eq!(session.current().unwrap().question.difficulty, 1.0);

    // The missed 1.5 question drifted toward hard
    let drifted = ctx.store.difficulty_of(mid_low).await.unwrap();
    assert!((drifted - 1.6).abs() < 1e-9);
}

/// Correctness drifts the stored difficulty of the answered question.
#[tokio::test]
async fn test_adaptive_answers_drift_difficulty() {
    let ctx = TestContext::new().await;
    let ids = ctx.seed_questions(HISTORY, 5, 3.0).await;

    let mut session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();

    let first = session.current().unwrap().clone();
    ctx.engine
        .submit_answer(&mut session, correct_answer(&first))
        .await
        .unwrap();
    let second = session.current().unwrap().clone();
    ctx.engine
        .submit_answer(&mut session, wrong_answer(&second))
        .await
        .unwrap();

    let easier = ctx.store.difficulty_of(first.question.id).await.unwrap();
    let harder = ctx.store.difficulty_of(second.question.id).await.unwrap();
    assert!((easier - 2.9).abs() < 1e-9);
    assert!((harder - 3.1).abs() < 1e-9);
    assert!(ids.contains(&first.question.id));
}

/// Questions answered in the last day are not picked.
#[tokio::test]
async fn test_recently_answered_are_skipped() {
    let ctx = TestContext::new().await;
    let (mid_low, mid, _high) = seed_ladder(&ctx).await;

    ctx.store
        .record_answer(&AnswerRecord {
            user_id: ctx.user_id,
            question_id: mid_low,
            answer: "1".to_string(),
            is_correct: true,
            mode: QuizMode::Quick,
            answered_at: Utc::now(),
        })
        .await
        .unwrap();

    let mut session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();
    let first = session.current().unwrap().clone();
    ctx.engine
        .submit_answer(&mut session, correct_answer(&first))
        .await
        .unwrap();

    assert_eq!(session.current().unwrap().question.id, mid);
}

/// With nothing unseen, the pre-loaded next question stays.
#[tokio::test]
async fn test_no_candidate_keeps_preloaded() {
    let ctx = TestContext::new().await;
    ctx.seed_questions(HISTORY, 5, 2.0).await;

    let mut session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();
    let preloaded = session.questions()[1].question.id;

    let first = session.current().unwrap().clone();
    ctx.engine
        .submit_answer(&mut session, correct_answer(&first))
        .await
        .unwrap();
    assert_eq!(session.current().unwrap().question.id, preloaded);
}

/// Targets stay within [1.0, 5.0] through a long run of answers.
#[tokio::test]
async fn test_targets_are_bounded() {
    let ctx = TestContext::new().await;
    ctx.seed_questions(HISTORY, 40, 2.0).await;
    ctx.seed_questions(SCIENCE, 10, 4.0).await;

    let mut session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY, SCIENCE], 30))
        .await
        .unwrap();

    let mut answered = 0;
    while let Some(snapshot) = session.current().cloned() {
        let answer = if answered < 20 {
            correct_answer(&snapshot)
        } else {
            wrong_answer(&snapshot)
        };
        ctx.engine.submit_answer(&mut session, answer).await.unwrap();
        answered += 1;

        for (_, target) in session.adaptive_targets().unwrap().iter() {
            assert!((1.0..=5.0).contains(target));
        }
    }
    assert_eq!(answered, 30);

    let result = ctx.engine.complete_session(&mut session).await.unwrap();
    assert_eq!(result.correct_count, 20);
    assert!(result.accuracy <= 100.0);
}

/// Option shuffling in adaptive mode can be enabled.
#[tokio::test]
async fn test_adaptive_shuffle_config_keeps_options() {
    let config = EngineConfig {
        shuffle_adaptive_options: true,
        ..EngineConfig::default()
    };
    let ctx = TestContext::with_config(config).await;
    ctx.seed_questions(HISTORY, 5, 2.0).await;

    let session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();
    for snapshot in session.questions() {
        assert_eq!(snapshot.answers.len(), 4);
    }
}

/// An unvalidated recent window too large for the calendar skips the
/// adaptive pick instead of failing the answer.
#[tokio::test]
async fn test_oversized_recent_window_keeps_queue() {
    let ctx = TestContext::with_config(EngineConfig {
        recent_window_hours: i64::MAX,
        ..EngineConfig::default()
    })
    .await;
    let (mid_low, _, _) = seed_ladder(&ctx).await;

    let mut session = ctx
        .engine
        .start_session(ctx.request(QuizMode::Adaptive, &[HISTORY], 5))
        .await
        .unwrap();
    let preloaded = session.questions()[1].question.id;

    let first = session.current().unwrap().clone();
    let response = ctx
        .engine
        .submit_answer(&mut session, correct_answer(&first))
        .await
        .unwrap();

    assert!(response.is_correct);
    assert_eq!(session.current().unwrap().question.id, preloaded);
    assert_ne!(preloaded, mid_low);
}
