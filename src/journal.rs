//! Journal use cases: create, read and delete entries, and the read-side
//! views (trend, mood counts, insights) built from a user's history.

use std::sync::Arc;

use uuid::Uuid;

use crate::analysis::TextAnalyzer;
use crate::error::JournalError;
use crate::models::{
    AnalysisResult, JournalEntry, MoodCounts, NewJournalEntry, TrendPoint, TrendSummary,
};
use crate::store::EntryStore;
use crate::trend;

#[derive(Clone)]
pub struct JournalService {
    store: Arc<dyn EntryStore>,
    analyzer: TextAnalyzer,
}

impl JournalService {
    pub fn new(store: Arc<dyn EntryStore>, analyzer: TextAnalyzer) -> Self {
        Self { store, analyzer }
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    /// Analyze text without saving anything. Inference failures degrade to
    /// the safe default.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, JournalError> {
        Ok(self.analyzer.analyze_or_default(text).await?)
    }

    /// Analyze and persist a new entry.
    ///
    /// Input errors are returned before inference is attempted. When inference
    /// is unavailable the entry is still saved, with the neutral default
    /// assessment.
    pub async fn create_entry(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
    ) -> Result<JournalEntry, JournalError> {
        let analysis = self.analyzer.analyze_or_default(content).await?;
        if analysis.is_degraded() {
            tracing::warn!("Saving entry for {} with default analysis", user_id);
        }

        let entry = NewJournalEntry::from_analysis(user_id, title, content, analysis)?;
        let saved = self.store.save(entry)?;
        tracing::debug!("Created entry {} for {}", saved.id, user_id);
        Ok(saved)
    }

    pub fn list_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(self.store.list_by_user(user_id)?)
    }

    pub fn get_entry(&self, user_id: &str, id: Uuid) -> Result<JournalEntry, JournalError> {
        Ok(self.store.get_by_id(user_id, id)?)
    }

    pub fn delete_entry(&self, user_id: &str, id: Uuid) -> Result<(), JournalError> {
        self.store.delete_by_id(user_id, id)?;
        tracing::debug!("Deleted entry {} for {}", id, user_id);
        Ok(())
    }

    /// Oldest-first history, so entries sharing a timestamp keep their
    /// submission order through aggregation.
    fn history(&self, user_id: &str) -> Result<Vec<JournalEntry>, JournalError> {
        let mut entries = self.store.list_by_user(user_id)?;
        entries.reverse();
        Ok(entries)
    }

    pub fn trend(&self, user_id: &str) -> Result<Vec<TrendPoint>, JournalError> {
        Ok(trend::aggregate(&self.history(user_id)?))
    }

    pub fn mood_counts(&self, user_id: &str) -> Result<MoodCounts, JournalError> {
        Ok(MoodCounts::tally(&self.store.list_by_user(user_id)?))
    }

    /// `None` when the user has no entries yet.
    pub fn insights(&self, user_id: &str) -> Result<Option<TrendSummary>, JournalError> {
        Ok(trend::summarize(&self.history(user_id)?))
    }
}

impl std::fmt::Debug for JournalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalService")
            .field("analyzer", &self.analyzer)
            .finish_non_exhaustive()
    }
}
