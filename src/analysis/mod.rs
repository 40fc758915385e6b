//! Text analysis: raw text in, [`AnalysisResult`] out.
//!
//! [`TextAnalyzer`] owns input validation and the inference deadline. The
//! scoring itself is delegated to an [`InferenceEngine`]: the built-in
//! [`LexiconEngine`] or a [`RemoteEngine`] talking to an inference service.
//! When the engine fails or runs past the deadline, the analyzer falls back to
//! [`AnalysisResult::safe_default`] so that saving an entry never depends on
//! inference being available.

mod lexicon;
mod recommend;
mod remote;
mod themes;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use lexicon::{analyze_text, LexiconEngine};
pub use remote::RemoteEngine;

use crate::error::{AnalysisError, InferenceError};
use crate::models::AnalysisResult;

/// Default upper bound on input length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 10_000;
/// Default deadline for a single inference call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Returned to the user when no reflection could be generated.
pub const FEEDBACK_FALLBACK: &str = "Sorry, we couldn't generate feedback at this time.";

/// The scoring backend behind the analyzer.
///
/// Implementations may block on I/O; the analyzer bounds every call with its
/// deadline.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Structured assessment of text that already passed input validation.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, InferenceError>;

    /// Narrative reflection on a questionnaire transcript.
    async fn feedback(
        &self,
        composite_text: &str,
        mood_hint: &str,
        emotion_hint: &str,
    ) -> Result<String, InferenceError>;
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSettings {
    pub max_chars: usize,
    pub timeout: Duration,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Validating, deadline-bounded front of an [`InferenceEngine`].
#[derive(Clone)]
pub struct TextAnalyzer {
    engine: Arc<dyn InferenceEngine>,
    settings: AnalyzerSettings,
}

impl TextAnalyzer {
    pub fn new(engine: Arc<dyn InferenceEngine>, settings: AnalyzerSettings) -> Self {
        Self { engine, settings }
    }

    /// Analyzer backed by the built-in lexicon with default settings.
    pub fn lexicon() -> Self {
        Self::new(Arc::new(LexiconEngine), AnalyzerSettings::default())
    }

    pub fn settings(&self) -> AnalyzerSettings {
        self.settings
    }

    /// Reject empty and oversized text. Oversized text is never truncated.
    pub fn check_input(&self, text: &str) -> Result<(), AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let len = text.chars().count();
        if len > self.settings.max_chars {
            return Err(AnalysisError::OversizedInput {
                len,
                max: self.settings.max_chars,
            });
        }
        Ok(())
    }

    /// Analyze text, reporting inference failures to the caller.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        self.check_input(text)?;

        let result = tokio::time::timeout(self.settings.timeout, self.engine.analyze(text))
            .await
            .map_err(|_| InferenceError::Timeout(self.settings.timeout))??;
        Ok(result)
    }

    /// Analyze text, substituting the safe default when inference is
    /// unavailable. Only input errors reach the caller.
    pub async fn analyze_or_default(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        match self.analyze(text).await {
            Err(AnalysisError::InferenceUnavailable(e)) => {
                tracing::warn!("Inference unavailable, using neutral default: {}", e);
                Ok(AnalysisResult::safe_default())
            }
            other => other,
        }
    }

    /// Generate a narrative reflection, reporting inference failures.
    pub async fn feedback(
        &self,
        composite_text: &str,
        mood_hint: &str,
        emotion_hint: &str,
    ) -> Result<String, AnalysisError> {
        self.check_input(composite_text)?;

        let feedback = tokio::time::timeout(
            self.settings.timeout,
            self.engine.feedback(composite_text, mood_hint, emotion_hint),
        )
        .await
        .map_err(|_| InferenceError::Timeout(self.settings.timeout))??;
        Ok(feedback)
    }

    /// Generate a narrative reflection; never fails and never returns an
    /// empty string.
    pub async fn feedback_or_fallback(
        &self,
        composite_text: &str,
        mood_hint: &str,
        emotion_hint: &str,
    ) -> String {
        match self.feedback(composite_text, mood_hint, emotion_hint).await {
            Ok(feedback) => feedback,
            Err(e) => {
                tracing::warn!("Feedback generation failed: {}", e);
                FEEDBACK_FALLBACK.to_string()
            }
        }
    }
}

impl std::fmt::Debug for TextAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextAnalyzer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
