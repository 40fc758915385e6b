use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::AnalysisResult;
use super::mood::{Emotion, EmotionScore, Mood};
use crate::error::ValidationError;

/// A saved piece of writing together with its emotional assessment.
///
/// Entries are **immutable** once created. The only lifecycle event after
/// creation is deletion by the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub sentiment_score: f64,
    pub primary_emotion: Emotion,
    pub secondary_emotions: Vec<EmotionScore>,
    pub key_themes: Vec<String>,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an entry. The analysis fields are computed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryInput {
    #[serde(default)]
    pub title: String,
    pub content: String,
}

/// A validated entry that has not been assigned an identity yet.
///
/// Built field by field from an [`AnalysisResult`]; construction fails if any
/// field is outside its declared bounds, so nothing malformed reaches storage.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub sentiment_score: f64,
    pub primary_emotion: Emotion,
    pub secondary_emotions: Vec<EmotionScore>,
    pub key_themes: Vec<String>,
    pub recommendations: Vec<String>,
}

impl NewJournalEntry {
    pub fn from_analysis(
        user_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        analysis: AnalysisResult,
    ) -> Result<Self, ValidationError> {
        let user_id = user_id.into();
        let content = content.into();
        let mut title = title.into().trim().to_string();

        if user_id.trim().is_empty() {
            return Err(ValidationError::EmptyField("user_id"));
        }
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyField("content"));
        }
        if title.is_empty() {
            title = default_title(&content);
        }

        analysis.validate()?;

        Ok(Self {
            user_id,
            title,
            content,
            mood: analysis.mood,
            sentiment_score: analysis.sentiment_score,
            primary_emotion: analysis.primary_emotion,
            secondary_emotions: analysis.secondary_emotions,
            key_themes: analysis.key_themes,
            recommendations: analysis.recommendations,
        })
    }
}

/// Untitled entries are titled with their first few words.
fn default_title(content: &str) -> String {
    const MAX_WORDS: usize = 6;
    let words: Vec<&str> = content.split_whitespace().collect();
    let mut title = words
        .iter()
        .take(MAX_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > MAX_WORDS {
        title.push_str("...");
    }
    title
}

/// Number of entries per mood for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl MoodCounts {
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut counts, entry| {
                match entry.mood {
                    Mood::Positive => counts.positive += 1,
                    Mood::Neutral => counts.neutral += 1,
                    Mood::Negative => counts.negative += 1,
                }
                counts
            })
    }
}
