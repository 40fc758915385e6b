use chrono::{DateTime, TimeZone, Utc};
use mood_journal::models::*;
use mood_journal::trend::{aggregate, summarize, MoodRecord};
use speculate2::speculate;
use uuid::Uuid;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn record(mood: Option<&str>, secs: Option<i64>) -> MoodRecord {
    MoodRecord {
        mood: mood.map(str::to_string),
        timestamp: secs.map(at),
    }
}

fn entry(mood: Mood, secs: i64) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        title: "Entry".to_string(),
        content: "Some words".to_string(),
        mood,
        sentiment_score: 0.5,
        primary_emotion: Emotion::Neutral,
        secondary_emotions: Vec::new(),
        key_themes: Vec::new(),
        recommendations: Vec::new(),
        created_at: at(secs),
    }
}

speculate! {
    describe "aggregate" {
        it "orders points chronologically and scores them" {
            let points = aggregate(&[
                record(Some("positive"), Some(10)),
                record(Some("negative"), Some(5)),
            ]);

            assert_eq!(points.len(), 2);
            assert_eq!((points[0].mood_score, points[0].timestamp), (0, at(5)));
            assert_eq!((points[1].mood_score, points[1].timestamp), (2, at(10)));
        }

        it "maps every mood onto its score" {
            let points = aggregate(&[
                record(Some("negative"), Some(1)),
                record(Some("neutral"), Some(2)),
                record(Some("positive"), Some(3)),
            ]);

            let scores: Vec<u8> = points.iter().map(|p| p.mood_score).collect();
            assert_eq!(scores, vec![0, 1, 2]);
        }

        it "drops entries missing a mood or a timestamp" {
            let points = aggregate(&[
                record(None, Some(1)),
                record(Some("positive"), None),
                record(Some("ecstatic"), Some(2)),
                record(Some("neutral"), Some(3)),
            ]);

            assert_eq!(points.len(), 1);
            assert_eq!(points[0].mood, Mood::Neutral);
        }

        it "returns nothing for no entries" {
            assert!(aggregate::<MoodRecord>(&[]).is_empty());
        }

        it "keeps input order among equal timestamps" {
            let points = aggregate(&[
                record(Some("negative"), Some(7)),
                record(Some("positive"), Some(7)),
                record(Some("neutral"), Some(1)),
            ]);

            let moods: Vec<Mood> = points.iter().map(|p| p.mood).collect();
            assert_eq!(moods, vec![Mood::Neutral, Mood::Negative, Mood::Positive]);
        }

        it "does not depend on input order apart from ties" {
            let forward = aggregate(&[entry(Mood::Positive, 1), entry(Mood::Negative, 2), entry(Mood::Neutral, 3)]);
            let shuffled = aggregate(&[entry(Mood::Neutral, 3), entry(Mood::Positive, 1), entry(Mood::Negative, 2)]);

            assert_eq!(forward, shuffled);
        }
    }

    describe "summarize" {
        it "has nothing to say about an empty history" {
            assert!(summarize(&[]).is_none());
        }

        it "notices an improving mood" {
            let summary = summarize(&[
                entry(Mood::Negative, 1),
                entry(Mood::Neutral, 2),
                entry(Mood::Positive, 3),
            ])
            .expect("summary");

            assert!(summary.mood_slope > 0.1);
            assert_eq!(summary.average_mood_score, 1.0);
            assert_eq!(summary.period.start, at(1));
            assert_eq!(summary.period.end, at(3));
            assert!(summary.insights.iter().any(|i| i.contains("improving")));
        }

        it "notices a declining mood" {
            let summary = summarize(&[entry(Mood::Positive, 1), entry(Mood::Negative, 2)])
                .expect("summary");

            assert!(summary.mood_slope < -0.1);
            assert!(summary.insights.iter().any(|i| i.contains("more down")));
        }

        it "stays quiet about a flat trend" {
            let summary = summarize(&[entry(Mood::Neutral, 1), entry(Mood::Neutral, 2)])
                .expect("summary");

            assert_eq!(summary.mood_slope, 0.0);
            assert!(summary.insights.is_empty());
        }

        it "calls out strong emotions and themes of the latest entry" {
            let mut latest = entry(Mood::Negative, 9);
            latest.sentiment_score = 0.91;
            latest.primary_emotion = Emotion::Fear;
            latest.key_themes = vec![
                "work stress".to_string(),
                "sleep".to_string(),
                "health".to_string(),
                "family".to_string(),
            ];

            let summary = summarize(&[latest, entry(Mood::Negative, 1)]).expect("summary");

            assert!(summary
                .insights
                .contains(&"You're experiencing strong fear emotions.".to_string()));
            assert!(summary
                .insights
                .contains(&"Recent entries focus on: work stress, sleep, health".to_string()));
        }
    }
}
