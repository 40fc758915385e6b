//! Recommendation tables and the narrative reflection built on them.

use crate::models::{AnalysisResult, Emotion, Mood};

const MAX_RECOMMENDATIONS: usize = 4;
const FEEDBACK_RECOMMENDATIONS: usize = 3;

const BY_EMOTION: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &[
            "Write down what made today good so you can come back to it on harder days.",
            "Share the moment with someone who matters to you.",
        ],
    ),
    (
        Emotion::Surprise,
        &[
            "Take a few minutes to note what caught you off guard and how you responded.",
            "Give yourself time to settle before making any decisions about it.",
        ],
    ),
    (
        Emotion::Neutral,
        &[
            "Check in with yourself later today and notice if anything has shifted.",
            "Pick one small thing you can look forward to tomorrow.",
        ],
    ),
    (
        Emotion::Sadness,
        &[
            "Be gentle with yourself and allow some rest today.",
            "Reach out to a friend or someone you trust and let them know how you feel.",
        ],
    ),
    (
        Emotion::Fear,
        &[
            "Try slow breathing: in for four counts, hold for four, out for six.",
            "Write down what worries you and separate what you can control from what you can't.",
        ],
    ),
    (
        Emotion::Anger,
        &[
            "Step away for a short walk before responding to what upset you.",
            "Put the frustration into words on paper, without editing.",
        ],
    ),
    (
        Emotion::Disgust,
        &[
            "Create some distance from whatever triggered this feeling.",
            "Name the value that felt violated; it can point to what matters to you.",
        ],
    ),
];

const BY_MOOD: &[(Mood, &str)] = &[
    (
        Mood::Positive,
        "Keep doing the things that contributed to this mood.",
    ),
    (
        Mood::Neutral,
        "A short walk or a favourite song can be an easy lift.",
    ),
    (
        Mood::Negative,
        "If this feeling persists, consider talking to a counsellor or mental health professional.",
    ),
];

const BY_THEME: &[(&str, &str)] = &[
    ("work", "Set a clear end to your work day and protect the time after it."),
    ("work stress", "Break the most pressing work task into one small next step."),
    ("school", "Plan a short, focused study block followed by a real break."),
    ("school stress", "List what is due and tackle the earliest deadline first."),
    ("family", "Spend a few unhurried minutes with family, or send them a message."),
    ("friends", "Make a plan to see a friend this week."),
    ("relationships", "Let your partner know one thing you appreciate about them."),
    ("health", "Listen to your body and keep up with anything your doctor suggested."),
    ("sleep", "Aim for a consistent bedtime and put screens away an hour before."),
    ("exercise", "Keep moving; even ten minutes of activity helps your mood."),
    ("finances", "Write down one concrete money task and schedule it."),
    ("finances stress", "Look at the numbers once, then set them aside for the rest of the day."),
    ("nature", "Spend some time outside again soon."),
    ("food", "Enjoy a nourishing meal without distractions."),
    ("self-care", "Keep a regular slot for the self-care that helped."),
    ("gratitude", "Note three things you are grateful for before bed."),
];

fn emotion_lines(emotion: Emotion) -> &'static [&'static str] {
    BY_EMOTION
        .iter()
        .find(|(e, _)| *e == emotion)
        .map(|(_, lines)| *lines)
        .unwrap_or(&[])
}

fn mood_line(mood: Mood) -> Option<&'static str> {
    BY_MOOD.iter().find(|(m, _)| *m == mood).map(|(_, l)| *l)
}

fn theme_line(theme: &str) -> Option<&'static str> {
    BY_THEME.iter().find(|(t, _)| *t == theme).map(|(_, l)| *l)
}

/// Ordered suggestions for a `(mood, emotion)` pairing, personalized with the
/// first theme that has a tip. Never empty.
pub(crate) fn recommend(mood: Mood, emotion: Emotion, themes: &[String]) -> Vec<String> {
    let mut lines: Vec<&str> = Vec::new();

    if let Some(line) = themes.iter().find_map(|t| theme_line(t)) {
        lines.push(line);
    }
    lines.extend(emotion_lines(emotion));
    lines.extend(mood_line(mood));

    let mut recommendations: Vec<String> = Vec::new();
    for line in lines {
        if !recommendations.iter().any(|r| r == line) {
            recommendations.push(line.to_string());
        }
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

/// Maps the answer to "How was your day?" onto a mood.
pub(crate) fn mood_from_hint(hint: &str) -> Option<Mood> {
    match hint.trim().to_lowercase().as_str() {
        "good" | "great" | "positive" => Some(Mood::Positive),
        "okay" | "ok" | "neutral" => Some(Mood::Neutral),
        "bad" | "negative" => Some(Mood::Negative),
        _ => None,
    }
}

/// Maps the answer to "How are you feeling right now?" onto an emotion.
pub(crate) fn emotion_from_hint(hint: &str) -> Option<Emotion> {
    let hint = hint.trim().to_lowercase();
    match hint.as_str() {
        "happy" => Some(Emotion::Joy),
        "calm" => Some(Emotion::Neutral),
        "anxious" => Some(Emotion::Fear),
        "tired" | "low" => Some(Emotion::Sadness),
        other => Emotion::from_str(other),
    }
}

fn mood_sentence(mood: Mood) -> &'static str {
    match mood {
        Mood::Positive => "It sounds like today had some real bright spots.",
        Mood::Neutral => "It sounds like today was a fairly even day.",
        Mood::Negative => "It sounds like today weighed on you.",
    }
}

fn emotion_phrase(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Joy => "genuinely happy",
        Emotion::Surprise => "caught off guard",
        Emotion::Neutral => "fairly settled",
        Emotion::Sadness => "low and worn down",
        Emotion::Fear => "anxious and on edge",
        Emotion::Anger => "frustrated",
        Emotion::Disgust => "put off by something",
    }
}

fn join_themes(themes: &[String]) -> String {
    match themes {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Short narrative summary followed by three bulleted suggestions.
///
/// The hints are weak priors: they only fill in when the analysis itself is
/// neutral, never override a polar reading.
pub(crate) fn compose_feedback(
    analysis: &AnalysisResult,
    mood_hint: &str,
    emotion_hint: &str,
) -> String {
    let mood = match analysis.mood {
        Mood::Neutral => mood_from_hint(mood_hint).unwrap_or(Mood::Neutral),
        polar => polar,
    };
    let emotion = match analysis.primary_emotion {
        Emotion::Neutral => emotion_from_hint(emotion_hint).unwrap_or(Emotion::Neutral),
        detected => detected,
    };

    let mut summary = vec![
        mood_sentence(mood).to_string(),
        format!("Right now you seem to be feeling {}.", emotion_phrase(emotion)),
    ];
    let top_themes: Vec<String> = analysis.key_themes.iter().take(3).cloned().collect();
    if !top_themes.is_empty() {
        summary.push(format!(
            "Much of what you shared centers on {}.",
            join_themes(&top_themes)
        ));
    }

    let bullets = recommend(mood, emotion, &analysis.key_themes)
        .into_iter()
        .take(FEEDBACK_RECOMMENDATIONS)
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nA few things that might help:\n{}",
        summary.join(" "),
        bullets
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pairing_has_recommendations() {
        for emotion in Emotion::ALL {
            for mood in [Mood::Positive, Mood::Neutral, Mood::Negative] {
                assert!(!recommend(mood, emotion, &[]).is_empty());
            }
        }
    }

    #[test]
    fn theme_tip_comes_first() {
        let recs = recommend(Mood::Negative, Emotion::Fear, &["work stress".to_string()]);
        assert_eq!(
            recs[0],
            "Break the most pressing work task into one small next step."
        );
        assert!(recs.len() <= MAX_RECOMMENDATIONS);
    }

    #[test]
    fn hints_fill_in_for_neutral_analysis() {
        let analysis = AnalysisResult::safe_default();
        let feedback = compose_feedback(&analysis, "bad", "anxious");
        assert!(feedback.starts_with("It sounds like today weighed on you."));
        assert!(feedback.contains("anxious and on edge"));
    }

    #[test]
    fn hints_do_not_override_polar_analysis() {
        let mut analysis = AnalysisResult::safe_default();
        analysis.mood = Mood::Positive;
        analysis.primary_emotion = Emotion::Joy;
        let feedback = compose_feedback(&analysis, "bad", "anxious");
        assert!(feedback.starts_with("It sounds like today had some real bright spots."));
        assert!(feedback.contains("genuinely happy"));
    }

    #[test]
    fn themes_are_joined_naturally() {
        let themes = vec!["work".to_string(), "family".to_string(), "sleep".to_string()];
        assert_eq!(join_themes(&themes), "work, family and sleep");
    }
}
