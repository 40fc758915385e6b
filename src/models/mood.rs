use serde::{Deserialize, Serialize};

/// Coarse three-way polarity of a piece of writing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    /// Numeric encoding used for charting: positive 2, neutral 1, negative 0.
    pub fn score(&self) -> u8 {
        match self {
            Self::Positive => 2,
            Self::Neutral => 1,
            Self::Negative => 0,
        }
    }
}

/// The fixed emotion vocabulary.
///
/// Declaration order is significant: it is the tie-break order whenever two
/// emotions carry the same score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Joy,
    Surprise,
    Neutral,
    Sadness,
    Fear,
    Anger,
    Disgust,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Self::Joy,
        Self::Surprise,
        Self::Neutral,
        Self::Sadness,
        Self::Fear,
        Self::Anger,
        Self::Disgust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Surprise => "surprise",
            Self::Neutral => "neutral",
            Self::Sadness => "sadness",
            Self::Fear => "fear",
            Self::Anger => "anger",
            Self::Disgust => "disgust",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "joy" => Some(Self::Joy),
            "surprise" => Some(Self::Surprise),
            "neutral" => Some(Self::Neutral),
            "sadness" => Some(Self::Sadness),
            "fear" => Some(Self::Fear),
            "anger" => Some(Self::Anger),
            "disgust" => Some(Self::Disgust),
            _ => None,
        }
    }

    /// Position in the vocabulary, used for deterministic tie-breaking.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

/// A single emotion with its share of the detected emotional signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EmotionScore {
    pub emotion: Emotion,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_round_trips_through_its_label() {
        for mood in [Mood::Positive, Mood::Neutral, Mood::Negative] {
            assert_eq!(Mood::from_str(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::from_str("ecstatic"), None);
    }

    #[test]
    fn emotion_rank_follows_declaration_order() {
        let ranks: Vec<usize> = Emotion::ALL.iter().map(Emotion::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(Emotion::Joy < Emotion::Disgust);
    }
}
