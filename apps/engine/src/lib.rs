//! Quiz session engine.
//!
//! Selects the questions a user sees in each quiz mode, evaluates answers,
//! adapts difficulty and schedules spaced-repetition reviews. Persistence is
//! provided by the host through [`store::QuestionStore`].

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::EngineConfig;
pub use engine::QuizEngine;
pub use error::{EngineError, Result, StoreError};
pub use session::{QuestionSnapshot, QuizSession, SessionState};
pub use store::{MemoryStore, QuestionStore};

/// Install the default tracing subscriber (`RUST_LOG`, default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
