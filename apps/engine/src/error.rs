//! Error handling for the quiz engine

use thiserror::Error;

/// Errors returned by a question store implementation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Engine error types
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No questions available for the requested categories")]
    NoQuestionsAvailable,

    #[error("Session already complete")]
    SessionAlreadyComplete,

    #[error("Question store error: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable error code for hosts that map errors onto responses
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "invalid_input",
            EngineError::NoQuestionsAvailable => "no_questions_available",
            EngineError::SessionAlreadyComplete => "session_already_complete",
            EngineError::StoreUnavailable(_) => "store_unavailable",
            EngineError::Config(_) => "config_error",
        }
    }

    /// Whether the caller caused the error (bad request or protocol misuse)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput(_) | EngineError::SessionAlreadyComplete
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EngineError::InvalidInput("x".to_string()).kind(),
            "invalid_input"
        );
        assert_eq!(
            EngineError::NoQuestionsAvailable.kind(),
            "no_questions_available"
        );
        assert_eq!(
            EngineError::SessionAlreadyComplete.kind(),
            "session_already_complete"
        );
        assert_eq!(
            EngineError::StoreUnavailable(StoreError::Unavailable("down".to_string())).kind(),
            "store_unavailable"
        );
        assert_eq!(EngineError::Config("bad".to_string()).kind(), "config_error");
    }

    #[test]
    fn test_store_error_converts() {
        let error: EngineError = StoreError::NotFound("question 7".to_string()).into();
        assert!(matches!(error, EngineError::StoreUnavailable(_)));
        assert!(!error.is_caller_error());
    }

    #[test]
    fn test_caller_errors() {
        assert!(EngineError::InvalidInput("empty".to_string()).is_caller_error());
        assert!(EngineError::SessionAlreadyComplete.is_caller_error());
        assert!(!EngineError::NoQuestionsAvailable.is_caller_error());
    }

    #[test]
    fn test_error_display_invalid_input() {
        let error = EngineError::InvalidInput("no categories selected".to_string());
        assert_eq!(error.to_string(), "Invalid input: no categories selected");
    }

    #[test]
    fn test_error_display_store() {
        let error = EngineError::from(StoreError::Unavailable("timeout".to_string()));
        assert_eq!(
            error.to_string(),
            "Question store error: Store unavailable: timeout"
        );
    }
}
