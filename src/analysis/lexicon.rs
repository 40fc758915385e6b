//! Built-in rule-based engine.
//!
//! Scores text against a valence lexicon (roughly -4..4 per word) with
//! negation, intensifier, contrast ("but") and exclamation handling, then
//! normalizes the sum into a compound polarity in (-1, 1). Emotion-tagged
//! words feed the emotion breakdown.

use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;

use super::recommend::{compose_feedback, recommend};
use super::themes::extract_themes;
use super::InferenceEngine;
use crate::error::InferenceError;
use crate::models::{AnalysisResult, Emotion, EmotionScore, Mood};

/// Compound polarity at or beyond which text counts as positive/negative.
const POLARITY_THRESHOLD: f64 = 0.05;
/// Normalization constant for the compound score.
const NORMALIZATION_ALPHA: f64 = 15.0;
/// Applied to valence inside a negation scope.
const NEGATION_SCALAR: f64 = -0.74;
/// Number of tokens a negator reaches forward.
const NEGATION_SCOPE: usize = 3;
/// Emphasis added per exclamation mark, up to four marks.
const EXCLAMATION_BOOST: f64 = 0.292;
/// Emotion weight credited to `neutral` regardless of content.
const NEUTRAL_BASELINE: f64 = 0.5;
const MAX_SECONDARY_EMOTIONS: usize = 3;

use Emotion::{Anger, Disgust, Fear, Joy, Sadness, Surprise};

/// `(word, valence, emotion)`.
const LEXICON: &[(&str, f64, Option<Emotion>)] = &[
    // joy
    ("happy", 2.7, Some(Joy)),
    ("happiness", 2.6, Some(Joy)),
    ("joy", 2.8, Some(Joy)),
    ("joyful", 2.9, Some(Joy)),
    ("glad", 2.0, Some(Joy)),
    ("great", 3.1, Some(Joy)),
    ("wonderful", 2.7, Some(Joy)),
    ("amazing", 2.8, Some(Joy)),
    ("awesome", 3.1, Some(Joy)),
    ("fantastic", 2.6, Some(Joy)),
    ("excellent", 2.7, Some(Joy)),
    ("good", 1.9, Some(Joy)),
    ("nice", 1.8, Some(Joy)),
    ("love", 3.2, Some(Joy)),
    ("loved", 2.9, Some(Joy)),
    ("lovely", 2.8, Some(Joy)),
    ("enjoy", 2.2, Some(Joy)),
    ("enjoyed", 2.3, Some(Joy)),
    ("fun", 2.3, Some(Joy)),
    ("excited", 2.5, Some(Joy)),
    ("exciting", 2.2, Some(Joy)),
    ("grateful", 2.6, Some(Joy)),
    ("thankful", 2.4, Some(Joy)),
    ("thanks", 1.9, Some(Joy)),
    ("proud", 2.1, Some(Joy)),
    ("relaxed", 1.9, Some(Joy)),
    ("relieved", 1.6, Some(Joy)),
    ("peaceful", 2.2, Some(Joy)),
    ("cheerful", 2.5, Some(Joy)),
    ("delighted", 2.9, Some(Joy)),
    ("hopeful", 2.0, Some(Joy)),
    ("optimistic", 2.3, Some(Joy)),
    ("laugh", 2.4, Some(Joy)),
    ("laughed", 2.2, Some(Joy)),
    ("smile", 2.2, Some(Joy)),
    ("smiled", 2.1, Some(Joy)),
    ("beautiful", 2.9, Some(Joy)),
    ("blessed", 2.6, Some(Joy)),
    ("celebrate", 2.7, Some(Joy)),
    ("celebrated", 2.5, Some(Joy)),
    ("best", 3.2, Some(Joy)),
    ("better", 1.9, None),
    ("calm", 1.3, None),
    ("accomplished", 1.9, None),
    ("productive", 1.6, None),
    ("friend", 1.5, None),
    ("friends", 1.5, None),
    ("support", 1.7, None),
    ("helped", 1.7, None),
    ("fine", 0.8, None),
    // surprise
    ("surprised", 0.9, Some(Surprise)),
    ("surprise", 1.1, Some(Surprise)),
    ("surprising", 1.0, Some(Surprise)),
    ("amazed", 2.0, Some(Surprise)),
    ("astonished", 1.5, Some(Surprise)),
    ("wow", 2.0, Some(Surprise)),
    ("unexpected", 0.0, Some(Surprise)),
    ("suddenly", 0.0, Some(Surprise)),
    ("shocked", -1.3, Some(Surprise)),
    // sadness
    ("sad", -2.1, Some(Sadness)),
    ("sadness", -1.9, Some(Sadness)),
    ("unhappy", -1.8, Some(Sadness)),
    ("depressed", -2.3, Some(Sadness)),
    ("depressing", -1.6, Some(Sadness)),
    ("lonely", -1.5, Some(Sadness)),
    ("alone", -1.0, Some(Sadness)),
    ("cry", -2.1, Some(Sadness)),
    ("cried", -1.6, Some(Sadness)),
    ("crying", -2.1, Some(Sadness)),
    ("tears", -0.9, Some(Sadness)),
    ("miserable", -2.2, Some(Sadness)),
    ("heartbroken", -2.8, Some(Sadness)),
    ("hopeless", -2.0, Some(Sadness)),
    ("low", -1.1, Some(Sadness)),
    ("tired", -1.0, Some(Sadness)),
    ("exhausted", -1.5, Some(Sadness)),
    ("hurt", -2.4, Some(Sadness)),
    ("lost", -1.3, Some(Sadness)),
    ("miss", -0.8, Some(Sadness)),
    ("grief", -2.2, Some(Sadness)),
    ("disappointed", -1.9, Some(Sadness)),
    ("disappointing", -2.2, Some(Sadness)),
    ("regret", -1.8, Some(Sadness)),
    ("sorry", -0.3, Some(Sadness)),
    ("bad", -2.5, Some(Sadness)),
    ("terrible", -2.1, Some(Sadness)),
    ("awful", -2.0, Some(Sadness)),
    ("worse", -2.1, Some(Sadness)),
    ("worst", -3.1, Some(Sadness)),
    ("failed", -2.3, Some(Sadness)),
    ("failure", -2.0, Some(Sadness)),
    ("pain", -2.3, None),
    ("sick", -1.7, None),
    ("boring", -1.3, None),
    ("bored", -1.1, None),
    // fear
    ("afraid", -2.0, Some(Fear)),
    ("scared", -2.2, Some(Fear)),
    ("fear", -2.2, Some(Fear)),
    ("fearful", -2.2, Some(Fear)),
    ("anxious", -1.0, Some(Fear)),
    ("anxiety", -1.9, Some(Fear)),
    ("nervous", -1.1, Some(Fear)),
    ("worried", -1.2, Some(Fear)),
    ("worry", -1.9, Some(Fear)),
    ("worrying", -1.4, Some(Fear)),
    ("panic", -2.3, Some(Fear)),
    ("panicked", -2.0, Some(Fear)),
    ("terrified", -3.0, Some(Fear)),
    ("stressed", -1.4, Some(Fear)),
    ("stress", -1.8, Some(Fear)),
    ("stressful", -1.9, Some(Fear)),
    ("overwhelmed", -1.5, Some(Fear)),
    ("dread", -2.3, Some(Fear)),
    ("uneasy", -1.6, Some(Fear)),
    ("insecure", -1.8, Some(Fear)),
    ("tense", -1.4, Some(Fear)),
    // anger
    ("angry", -2.3, Some(Anger)),
    ("anger", -2.7, Some(Anger)),
    ("mad", -2.2, Some(Anger)),
    ("furious", -2.8, Some(Anger)),
    ("annoyed", -1.6, Some(Anger)),
    ("annoying", -1.8, Some(Anger)),
    ("irritated", -2.0, Some(Anger)),
    ("frustrated", -2.0, Some(Anger)),
    ("frustrating", -1.9, Some(Anger)),
    ("frustration", -2.1, Some(Anger)),
    ("hate", -2.7, Some(Anger)),
    ("hated", -2.7, Some(Anger)),
    ("rage", -2.6, Some(Anger)),
    ("resent", -1.8, Some(Anger)),
    ("unfair", -2.1, Some(Anger)),
    ("yelled", -1.8, Some(Anger)),
    ("argument", -1.2, Some(Anger)),
    ("fight", -1.6, Some(Anger)),
    ("fought", -1.5, Some(Anger)),
    // disgust
    ("disgusted", -2.4, Some(Disgust)),
    ("disgusting", -2.4, Some(Disgust)),
    ("gross", -2.1, Some(Disgust)),
    ("sickening", -2.2, Some(Disgust)),
    ("revolting", -2.3, Some(Disgust)),
    ("nasty", -2.6, Some(Disgust)),
    ("ashamed", -2.1, Some(Disgust)),
    ("embarrassed", -1.5, Some(Disgust)),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "without", "hardly",
    "barely", "cannot", "dont", "didnt", "cant", "wont", "isnt", "wasnt",
];

/// `(word, multiplier)`.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.25),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("super", 1.3),
    ("totally", 1.3),
    ("absolutely", 1.4),
    ("quite", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

fn lexicon() -> &'static HashMap<&'static str, (f64, Option<Emotion>)> {
    static LEXICON_MAP: OnceLock<HashMap<&'static str, (f64, Option<Emotion>)>> = OnceLock::new();
    LEXICON_MAP.get_or_init(|| {
        LEXICON
            .iter()
            .map(|&(word, valence, emotion)| (word, (valence, emotion)))
            .collect()
    })
}

fn lookup(word: &str) -> Option<(f64, Option<Emotion>)> {
    let map = lexicon();
    map.get(word)
        .or_else(|| word.strip_suffix('s').and_then(|stem| map.get(stem)))
        .copied()
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, m)| *m)
}

/// Lower-cased word tokens; apostrophes are kept so contractions stay whole.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
        .collect()
}

/// Polarity and emotion weights accumulated over a text.
#[derive(Debug, Default)]
struct Scores {
    valence_sum: f64,
    emotion_weights: [f64; 7],
}

fn score_tokens(tokens: &[String]) -> Scores {
    let mut scores = Scores::default();

    // Words before "but" are down-weighted, words after it emphasized.
    let contrast_at = tokens.iter().position(|t| t == "but");

    let mut negation_left = 0usize;
    let mut pending_intensity = 1.0f64;

    for (i, token) in tokens.iter().enumerate() {
        if is_negator(token) {
            negation_left = NEGATION_SCOPE;
            continue;
        }
        if let Some(m) = intensity(token) {
            pending_intensity *= m;
            continue;
        }

        let negated = negation_left > 0;
        negation_left = negation_left.saturating_sub(1);

        let Some((valence, emotion)) = lookup(token) else {
            pending_intensity = 1.0;
            continue;
        };

        let contrast = match contrast_at {
            Some(at) if i < at => 0.5,
            Some(at) if i > at => 1.5,
            _ => 1.0,
        };
        let weight = pending_intensity * contrast;
        pending_intensity = 1.0;

        scores.valence_sum += if negated {
            valence * NEGATION_SCALAR * weight
        } else {
            valence * weight
        };

        let emotion = match (emotion, negated) {
            (Some(e), false) => Some(e),
            // "not happy" reads as sadness; other negated emotions carry no signal.
            (Some(Joy), true) => Some(Sadness),
            _ => None,
        };
        if let Some(e) = emotion {
            let credit = valence.abs().max(1.0) * weight;
            let credit = if negated { credit * 0.5 } else { credit };
            scores.emotion_weights[e.rank()] += credit;
        }
    }

    scores
}

fn compound_from(scores: &Scores, text: &str) -> f64 {
    let mut sum = scores.valence_sum;
    if sum != 0.0 {
        let marks = text.chars().filter(|&c| c == '!').count().min(4) as f64;
        sum += sum.signum() * marks * EXCLAMATION_BOOST;
    }
    sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()
}

/// Mood plus confidence in the dominant polarity.
fn classify(compound: f64) -> (Mood, f64) {
    if compound >= POLARITY_THRESHOLD {
        (Mood::Positive, compound.min(1.0))
    } else if compound <= -POLARITY_THRESHOLD {
        (Mood::Negative, compound.abs().min(1.0))
    } else {
        let confidence = 1.0 - compound.abs() / POLARITY_THRESHOLD;
        (Mood::Neutral, confidence.clamp(0.0, 1.0))
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Primary emotion plus the ranked secondaries, primary excluded.
fn rank_emotions(weights: &[f64; 7]) -> (Emotion, Vec<EmotionScore>) {
    let mut weights = *weights;
    weights[Emotion::Neutral.rank()] += NEUTRAL_BASELINE;
    let total: f64 = weights.iter().sum();

    let mut ranked: Vec<EmotionScore> = Emotion::ALL
        .iter()
        .filter(|e| weights[e.rank()] > 0.0)
        .map(|&emotion| EmotionScore {
            emotion,
            score: round4(weights[emotion.rank()] / total),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.emotion.rank().cmp(&b.emotion.rank()))
    });

    let primary = ranked
        .first()
        .map(|s| s.emotion)
        .unwrap_or(Emotion::Neutral);
    let secondary = ranked
        .into_iter()
        .skip(1)
        .take(MAX_SECONDARY_EMOTIONS)
        .collect();

    (primary, secondary)
}

/// Full analysis of already-validated text.
pub fn analyze_text(text: &str) -> AnalysisResult {
    let tokens = tokenize(text);
    let scores = score_tokens(&tokens);
    let (mood, sentiment_score) = classify(compound_from(&scores, text));
    let (primary_emotion, secondary_emotions) = rank_emotions(&scores.emotion_weights);
    let key_themes = extract_themes(&tokens);
    let recommendations = recommend(mood, primary_emotion, &key_themes);

    AnalysisResult {
        mood,
        sentiment_score: round4(sentiment_score),
        primary_emotion,
        secondary_emotions,
        key_themes,
        recommendations,
    }
}

/// Engine backed by the built-in lexicon. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconEngine;

#[async_trait]
impl InferenceEngine for LexiconEngine {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, InferenceError> {
        Ok(analyze_text(text))
    }

    async fn feedback(
        &self,
        composite_text: &str,
        mood_hint: &str,
        emotion_hint: &str,
    ) -> Result<String, InferenceError> {
        let analysis = analyze_text(composite_text);
        Ok(compose_feedback(&analysis, mood_hint, emotion_hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(text: &str) -> f64 {
        compound_from(&score_tokens(&tokenize(text)), text)
    }

    #[test]
    fn tokenizer_keeps_contractions() {
        assert_eq!(
            tokenize("I didn't sleep, AT ALL!"),
            vec!["i", "didn't", "sleep", "at", "all"]
        );
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(compound("I am happy") > 0.0);
        assert!(compound("I am not happy") < 0.0);
    }

    #[test]
    fn intensifiers_strengthen_polarity() {
        assert!(compound("I am very happy") > compound("I am happy"));
    }

    #[test]
    fn clause_after_but_dominates() {
        assert!(compound("The morning was good but the evening was terrible") < 0.0);
    }

    #[test]
    fn plural_forms_fall_back_to_stem() {
        assert!(lookup("fights").is_some());
        assert!(lookup("table").is_none());
    }

    #[test]
    fn text_without_sentiment_is_confidently_neutral() {
        let (mood, confidence) = classify(compound("I went to the store and bought bread"));
        assert_eq!(mood, Mood::Neutral);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn emotion_ties_break_by_vocabulary_order() {
        let mut weights = [0.0; 7];
        weights[Fear.rank()] = 2.0;
        weights[Anger.rank()] = 2.0;
        let (primary, secondary) = rank_emotions(&weights);
        assert_eq!(primary, Fear);
        assert_eq!(secondary[0].emotion, Anger);
    }
}
