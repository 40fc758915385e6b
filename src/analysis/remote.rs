//! HTTP client for a remote inference service.
//!
//! The service must expose:
//! - `POST {base}/analyze` with `{"text": ...}`, answering an [`AnalysisResult`]
//! - `POST {base}/feedback` with `{"entry", "mood", "emotion"}`, answering
//!   `{"feedback": ...}`
//!
//! Configuration is via environment variables:
//! - `MOOD_JOURNAL_INFERENCE_URL` - Base URL (unset: the built-in lexicon engine is used)
//! - `MOOD_JOURNAL_INFERENCE_API_KEY` - Bearer token for the service (optional)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::InferenceEngine;
use crate::error::InferenceError;
use crate::models::{AnalysisResult, AnalyzeInput, InteractiveFeedbackResponse};

/// Remote inference engine.
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    entry: &'a str,
    mood: &'a str,
    emotion: &'a str,
}

impl RemoteEngine {
    /// Create with explicit configuration.
    ///
    /// `timeout` bounds each request at the transport level; the analyzer
    /// applies its own deadline on top.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Build a POST request with optional auth header.
    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.post(&url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Handle response, converting HTTP errors to InferenceError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, InferenceError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| InferenceError::Malformed(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(InferenceError::Status(format!("{}: {}", status, body)))
        }
    }
}

#[async_trait]
impl InferenceEngine for RemoteEngine {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, InferenceError> {
        let response = self
            .post("/analyze")
            .json(&AnalyzeInput {
                text: text.to_string(),
            })
            .send()
            .await?;
        let result: AnalysisResult = self.handle_response(response).await?;

        // Enum membership is enforced by deserialization; the remaining bounds here.
        result
            .validate()
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        Ok(result)
    }

    async fn feedback(
        &self,
        composite_text: &str,
        mood_hint: &str,
        emotion_hint: &str,
    ) -> Result<String, InferenceError> {
        let response = self
            .post("/feedback")
            .json(&FeedbackRequest {
                entry: composite_text,
                mood: mood_hint,
                emotion: emotion_hint,
            })
            .send()
            .await?;
        let body: InteractiveFeedbackResponse = self.handle_response(response).await?;

        if body.feedback.trim().is_empty() {
            return Err(InferenceError::Malformed("empty feedback".to_string()));
        }
        Ok(body.feedback)
    }
}
