//! Runtime configuration loaded from environment variables.
//!
//! - `MOOD_JOURNAL_INFERENCE_URL` - Remote inference base URL (unset: built-in lexicon engine)
//! - `MOOD_JOURNAL_INFERENCE_API_KEY` - Bearer token for the remote service
//! - `MOOD_JOURNAL_INFERENCE_TIMEOUT_MS` - Deadline per inference call (default 10000)
//! - `MOOD_JOURNAL_MAX_TEXT_CHARS` - Longest accepted text (default 10000)
//!
//! The database path (`MOOD_JOURNAL_DB`) is resolved by [`crate::db::default_path`]
//! and the HTTP security settings by [`crate::api::SecurityConfig`].

use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{
    AnalyzerSettings, InferenceEngine, LexiconEngine, RemoteEngine, TextAnalyzer,
    DEFAULT_MAX_CHARS, DEFAULT_TIMEOUT,
};
use crate::error::InferenceError;

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub inference_url: Option<String>,
    pub inference_api_key: Option<String>,
    pub timeout: Duration,
    pub max_chars: usize,
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let inference_url = std::env::var("MOOD_JOURNAL_INFERENCE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let inference_api_key = std::env::var("MOOD_JOURNAL_INFERENCE_API_KEY").ok();

        let timeout = std::env::var("MOOD_JOURNAL_INFERENCE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        let max_chars = std::env::var("MOOD_JOURNAL_MAX_TEXT_CHARS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CHARS);

        Self {
            inference_url,
            inference_api_key,
            timeout,
            max_chars,
        }
    }

    /// Built-in engine with default limits.
    pub fn lexicon() -> Self {
        Self {
            inference_url: None,
            inference_api_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            max_chars: self.max_chars,
            timeout: self.timeout,
        }
    }

    /// The analyzer this configuration describes: remote when an inference
    /// URL is set, the lexicon engine otherwise.
    pub fn build_analyzer(&self) -> Result<TextAnalyzer, InferenceError> {
        let engine: Arc<dyn InferenceEngine> = match &self.inference_url {
            Some(url) => {
                tracing::info!("Using remote inference engine at {}", url);
                Arc::new(RemoteEngine::new(
                    url.clone(),
                    self.inference_api_key.clone(),
                    self.timeout,
                )?)
            }
            None => {
                tracing::debug!("Using built-in lexicon engine");
                Arc::new(LexiconEngine)
            }
        };
        Ok(TextAnalyzer::new(engine, self.settings()))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
