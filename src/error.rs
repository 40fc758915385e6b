//! Error taxonomy.
//!
//! Input errors (empty or oversized text, invalid answers) are reported to the
//! caller as-is. [`InferenceError`] is recovered inside the analyzer by
//! substituting the safe default. Store failures are opaque apart from
//! "not found".

use std::time::Duration;

use thiserror::Error;

/// Failures of the inference engine behind the analyzer.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference timed out after {0:?}")]
    Timeout(Duration),

    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference service returned {0}")]
    Status(String),

    #[error("inference service returned malformed output: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("text is empty")]
    EmptyInput,

    #[error("text is {len} characters, above the limit of {max}")]
    OversizedInput { len: usize, max: usize },

    #[error("inference unavailable: {0}")]
    InferenceUnavailable(#[from] InferenceError),
}

/// A value outside its declared bounds.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("sentiment score {0} is outside [0, 1]")]
    SentimentOutOfRange(f64),

    #[error("score {score} for emotion {emotion} is outside [0, 1]")]
    EmotionScoreOutOfRange { emotion: &'static str, score: f64 },

    #[error("secondary emotions repeat the primary emotion {0}")]
    PrimaryInSecondary(&'static str),

    #[error("secondary emotions are not sorted by descending score")]
    SecondaryUnsorted,

    #[error("secondary emotion {0} is listed more than once")]
    DuplicateSecondary(&'static str),

    #[error("key theme {0:?} is listed more than once")]
    DuplicateTheme(String),

    #[error("a {0} assessment must carry recommendations")]
    MissingRecommendations(&'static str),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("reflection session not found")]
    NotFound,

    #[error("reflection session is already complete")]
    AlreadyComplete,

    #[error("invalid answer for {question_id}: {reason}")]
    InvalidAnswer {
        question_id: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("journal entry not found")]
    NotFound,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Top-level error for journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
