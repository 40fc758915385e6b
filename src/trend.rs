//! Mood trend aggregation.
//!
//! Turns an unordered pile of entries into a chart-ready series and derives
//! summary insights from it. Everything here is pure: no I/O, no state.

use chrono::{DateTime, Utc};

use crate::models::{AnalysisPeriod, JournalEntry, Mood, TrendPoint, TrendSummary};

/// Slope beyond which the trend is reported as improving or declining.
const TREND_SLOPE_THRESHOLD: f64 = 0.1;
/// Confidence above which the latest entry's emotion is called out.
const STRONG_EMOTION_CONFIDENCE: f64 = 0.8;

/// Anything that can contribute a point to a mood series.
///
/// The mood is exposed as a raw label so that records from outside the
/// typed model (imports, legacy rows) can be fed in; unknown labels are
/// skipped rather than rejected.
pub trait MoodObservation {
    fn mood_label(&self) -> Option<&str>;
    fn observed_at(&self) -> Option<DateTime<Utc>>;
}

impl MoodObservation for JournalEntry {
    fn mood_label(&self) -> Option<&str> {
        Some(self.mood.as_str())
    }

    fn observed_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

/// A loosely-typed mood record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodRecord {
    pub mood: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl MoodObservation for MoodRecord {
    fn mood_label(&self) -> Option<&str> {
        self.mood.as_deref()
    }

    fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// Chronological mood series.
///
/// Entries without a timestamp or with a missing/unknown mood are dropped.
/// Entries sharing a timestamp keep their relative input order.
pub fn aggregate<T: MoodObservation>(entries: &[T]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .filter_map(|entry| {
            let timestamp = entry.observed_at()?;
            let mood = Mood::from_str(entry.mood_label()?)?;
            Some(TrendPoint {
                timestamp,
                mood,
                mood_score: mood.score(),
            })
        })
        .collect();

    // sort_by_key is stable
    points.sort_by_key(|p| p.timestamp);
    points
}

/// Least-squares slope of `ys` against their index.
fn slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return 0.0;
    }
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (num, den) = ys
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Trend summary and human-readable insights for a user's entries.
///
/// Returns `None` when there is nothing to summarize.
pub fn summarize(entries: &[JournalEntry]) -> Option<TrendSummary> {
    let points = aggregate(entries);
    let (first, last) = (points.first()?, points.last()?);

    let scores: Vec<f64> = points.iter().map(|p| f64::from(p.mood_score)).collect();
    let mood_slope = slope(&scores);
    let average_mood_score = scores.iter().sum::<f64>() / scores.len() as f64;

    let mut insights = Vec::new();
    if mood_slope > TREND_SLOPE_THRESHOLD {
        insights.push("Your overall mood has been improving recently.".to_string());
    } else if mood_slope < -TREND_SLOPE_THRESHOLD {
        insights.push("You've been feeling more down lately.".to_string());
    }

    // Latest by timestamp; among equal timestamps the last one given wins.
    if let Some(latest) = entries
        .iter()
        .rev()
        .find(|e| e.created_at == last.timestamp)
    {
        if latest.sentiment_score > STRONG_EMOTION_CONFIDENCE {
            insights.push(format!(
                "You're experiencing strong {} emotions.",
                latest.primary_emotion.as_str()
            ));
        }
        if !latest.key_themes.is_empty() {
            let themes: Vec<&str> = latest.key_themes.iter().take(3).map(String::as_str).collect();
            insights.push(format!("Recent entries focus on: {}", themes.join(", ")));
        }
    }

    Some(TrendSummary {
        mood_slope,
        average_mood_score,
        period: AnalysisPeriod {
            start: first.timestamp,
            end: last.timestamp,
        },
        insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_rising_series_is_positive() {
        assert!((slope(&[0.0, 1.0, 2.0]) - 1.0).abs() < 1e-9);
        assert!(slope(&[2.0, 1.0, 0.0]) < 0.0);
    }

    #[test]
    fn slope_of_short_or_flat_series_is_zero() {
        assert_eq!(slope(&[]), 0.0);
        assert_eq!(slope(&[1.0]), 0.0);
        assert_eq!(slope(&[1.0, 1.0, 1.0]), 0.0);
    }
}
