//! Persistence seam for journal entries.
//!
//! The journal service only talks to this trait. [`crate::db::Database`] is
//! the SQLite implementation.

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{JournalEntry, NewJournalEntry};

pub trait EntryStore: Send + Sync {
    /// Persist a validated entry and return it with its identity.
    fn save(&self, entry: NewJournalEntry) -> Result<JournalEntry, StoreError>;

    /// All entries of a user, newest first.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<JournalEntry>, StoreError>;

    /// One entry, `NotFound` when it does not exist or belongs to someone else.
    fn get_by_id(&self, user_id: &str, id: Uuid) -> Result<JournalEntry, StoreError>;

    /// Delete one entry, `NotFound` when it does not exist or belongs to
    /// someone else.
    fn delete_by_id(&self, user_id: &str, id: Uuid) -> Result<(), StoreError>;
}
