use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::mood::{Emotion, EmotionScore, Mood};
use crate::error::ValidationError;

/// Structured emotional assessment of a piece of writing.
///
/// Produced by the analyzer and owned by the caller until it is mapped onto a
/// [`NewJournalEntry`](super::NewJournalEntry) or discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub mood: Mood,
    /// Confidence in the dominant polarity, not positivity: a confidently
    /// negative text scores close to 1.0.
    pub sentiment_score: f64,
    pub primary_emotion: Emotion,
    /// Sorted by descending score, never contains `primary_emotion`.
    pub secondary_emotions: Vec<EmotionScore>,
    pub key_themes: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// The result substituted when inference is unavailable.
    ///
    /// Neutral with zero confidence and nothing else; callers recognise a
    /// degraded analysis by exactly this shape.
    pub fn safe_default() -> Self {
        Self {
            mood: Mood::Neutral,
            sentiment_score: 0.0,
            primary_emotion: Emotion::Neutral,
            secondary_emotions: Vec::new(),
            key_themes: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        *self == Self::safe_default()
    }

    /// Check the declared bounds: score ranges, secondary ordering, distinct
    /// secondaries and themes, and recommendations on anything but the
    /// degraded default.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.sentiment_score) {
            return Err(ValidationError::SentimentOutOfRange(self.sentiment_score));
        }

        for secondary in &self.secondary_emotions {
            if secondary.emotion == self.primary_emotion {
                return Err(ValidationError::PrimaryInSecondary(
                    self.primary_emotion.as_str(),
                ));
            }
            if !(0.0..=1.0).contains(&secondary.score) {
                return Err(ValidationError::EmotionScoreOutOfRange {
                    emotion: secondary.emotion.as_str(),
                    score: secondary.score,
                });
            }
        }

        if self
            .secondary_emotions
            .windows(2)
            .any(|pair| pair[0].score < pair[1].score)
        {
            return Err(ValidationError::SecondaryUnsorted);
        }

        let mut seen = HashSet::new();
        if let Some(repeated) = self
            .secondary_emotions
            .iter()
            .find(|s| !seen.insert(s.emotion))
        {
            return Err(ValidationError::DuplicateSecondary(
                repeated.emotion.as_str(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(repeated) = self.key_themes.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(ValidationError::DuplicateTheme(repeated.clone()));
        }

        if self.recommendations.is_empty() && !self.is_degraded() {
            return Err(ValidationError::MissingRecommendations(self.mood.as_str()));
        }

        Ok(())
    }
}

/// Request body for analyzing text without saving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeInput {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_secondaries(secondary_emotions: Vec<EmotionScore>) -> AnalysisResult {
        AnalysisResult {
            mood: Mood::Negative,
            sentiment_score: 0.8,
            primary_emotion: Emotion::Sadness,
            secondary_emotions,
            key_themes: vec![],
            recommendations: vec!["Rest".to_string()],
        }
    }

    #[test]
    fn safe_default_is_valid_and_degraded() {
        let result = AnalysisResult::safe_default();
        assert!(result.validate().is_ok());
        assert!(result.is_degraded());
    }

    #[test]
    fn rejects_primary_in_secondary_list() {
        let result = result_with_secondaries(vec![EmotionScore {
            emotion: Emotion::Sadness,
            score: 0.2,
        }]);
        assert_eq!(
            result.validate(),
            Err(ValidationError::PrimaryInSecondary("sadness"))
        );
    }

    #[test]
    fn rejects_unsorted_secondaries() {
        let result = result_with_secondaries(vec![
            EmotionScore {
                emotion: Emotion::Fear,
                score: 0.1,
            },
            EmotionScore {
                emotion: Emotion::Anger,
                score: 0.3,
            },
        ]);
        assert_eq!(result.validate(), Err(ValidationError::SecondaryUnsorted));
    }

    #[test]
    fn rejects_out_of_range_sentiment() {
        let mut result = result_with_secondaries(vec![]);
        result.sentiment_score = 1.5;
        assert!(matches!(
            result.validate(),
            Err(ValidationError::SentimentOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_repeated_secondary_emotion() {
        let result = result_with_secondaries(vec![
            EmotionScore {
                emotion: Emotion::Fear,
                score: 0.3,
            },
            EmotionScore {
                emotion: Emotion::Fear,
                score: 0.2,
            },
        ]);
        assert_eq!(
            result.validate(),
            Err(ValidationError::DuplicateSecondary("fear"))
        );
    }

    #[test]
    fn rejects_repeated_theme() {
        let mut result = result_with_secondaries(vec![]);
        result.key_themes = vec!["work".to_string(), "work".to_string()];
        assert_eq!(
            result.validate(),
            Err(ValidationError::DuplicateTheme("work".to_string()))
        );
    }

    #[test]
    fn polar_mood_needs_recommendations() {
        let mut result = result_with_secondaries(vec![]);
        result.mood = Mood::Positive;
        result.primary_emotion = Emotion::Joy;
        result.recommendations.clear();
        assert_eq!(
            result.validate(),
            Err(ValidationError::MissingRecommendations("positive"))
        );
    }
}
