mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{SecondsFormat, SubsecRound, Utc};
use rusqlite::{types::Type, Connection, Row};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::*;
use crate::store::EntryStore;

const ENTRY_COLUMNS: &str = "id, user_id, title, content, mood, sentiment_score, primary_emotion,
     secondary_emotions, key_themes, recommendations, created_at";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&mut conn)
    }

    // ============================================================
    // Journal entry operations
    // ============================================================

    pub fn create_entry(&self, input: NewJournalEntry) -> Result<JournalEntry> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        // Stored at fixed microsecond width so text order matches time order
        let now = Utc::now().trunc_subsecs(6);

        conn.execute(
            "INSERT INTO journal_entries (id, user_id, title, content, mood, sentiment_score,
                 primary_emotion, secondary_emotions, key_themes, recommendations, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &input.user_id,
                &input.title,
                &input.content,
                input.mood.as_str(),
                input.sentiment_score,
                input.primary_emotion.as_str(),
                serde_json::to_string(&input.secondary_emotions)?,
                serde_json::to_string(&input.key_themes)?,
                serde_json::to_string(&input.recommendations)?,
                now.to_rfc3339_opts(SecondsFormat::Micros, true),
            ),
        )?;

        Ok(JournalEntry {
            id,
            user_id: input.user_id,
            title: input.title,
            content: input.content,
            mood: input.mood,
            sentiment_score: input.sentiment_score,
            primary_emotion: input.primary_emotion,
            secondary_emotions: input.secondary_emotions,
            key_themes: input.key_themes,
            recommendations: input.recommendations,
            created_at: now,
        })
    }

    /// Entries of a user, newest first.
    pub fn get_entries_by_user(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries
             WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
        ))?;

        let mut entries = Vec::new();
        for entry in stmt.query_map([user_id], entry_from_row)? {
            match entry {
                Ok(entry) => entries.push(entry),
                Err(e @ rusqlite::Error::FromSqlConversionFailure(..)) => {
                    tracing::warn!("Skipping unreadable journal entry of {}: {}", user_id, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(entries)
    }

    pub fn get_entry(&self, user_id: &str, id: Uuid) -> Result<Option<JournalEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE id = ? AND user_id = ?"
        ))?;

        let mut rows = stmt.query((id.to_string(), user_id))?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        match entry_from_row(row) {
            Ok(entry) => Ok(Some(entry)),
            Err(e @ rusqlite::Error::FromSqlConversionFailure(..)) => {
                tracing::warn!("Journal entry {} is unreadable: {}", id, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete_entry(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM journal_entries WHERE id = ? AND user_id = ?",
            (id.to_string(), user_id),
        )?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

impl EntryStore for Database {
    fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry, StoreError> {
        Ok(self.create_entry(entry)?)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self.get_entries_by_user(user_id)?)
    }

    fn get_by_id(&self, user_id: &str, id: Uuid) -> Result<JournalEntry, StoreError> {
        self.get_entry(user_id, id)?.ok_or(StoreError::NotFound)
    }

    fn delete_by_id(&self, user_id: &str, id: Uuid) -> Result<(), StoreError> {
        if self.delete_entry(user_id, id)? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// `$MOOD_JOURNAL_DB`, or `journal.db` in the platform data directory.
pub fn default_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("MOOD_JOURNAL_DB") {
        return Ok(PathBuf::from(path));
    }
    let dirs = directories::ProjectDirs::from("", "", "mood-journal")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("journal.db"))
}

/// Decode a stored entry. Values that no longer parse are reported as
/// conversion failures rather than replaced.
fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let sentiment_score: f64 = row.get(5)?;
    if !(0.0..=1.0).contains(&sentiment_score) {
        return Err(corrupt(5, format!("sentiment score {sentiment_score} out of range")));
    }

    Ok(JournalEntry {
        id: parse_column(row, 0, |s| Uuid::parse_str(s).ok())?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        mood: parse_column(row, 4, Mood::from_str)?,
        sentiment_score,
        primary_emotion: parse_column(row, 6, Emotion::from_str)?,
        secondary_emotions: parse_column(row, 7, |s| serde_json::from_str(s).ok())?,
        key_themes: parse_column(row, 8, |s| serde_json::from_str(s).ok())?,
        recommendations: parse_column(row, 9, |s| serde_json::from_str(s).ok())?,
        created_at: parse_column(row, 10, |s| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })?,
    })
}

fn parse_column<T>(
    row: &Row<'_>,
    idx: usize,
    parse: impl FnOnce(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| corrupt(idx, format!("unparseable value {raw:?}")))
}

fn corrupt(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}
