use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mood::Mood;

/// One point of a user's mood time series. Derived on read, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub mood: Mood,
    /// 2 = positive, 1 = neutral, 0 = negative.
    pub mood_score: u8,
}

/// Aggregate view over a trend series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSummary {
    /// Least-squares slope of the mood score per entry.
    pub mood_slope: f64,
    pub average_mood_score: f64,
    pub period: AnalysisPeriod,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
