//! Domain models for the mood journal.
//!
//! # Core Concepts
//!
//! ## Persistent Entities
//!
//! - [`JournalEntry`]: A user's writing plus its emotional assessment. Immutable
//!   after creation, deleted only by its owner.
//!
//! ## Transient Values
//!
//! - [`AnalysisResult`]: Output of the analyzer, mapped onto a [`NewJournalEntry`]
//!   through validation before anything is stored.
//! - [`TrendPoint`] / [`TrendSummary`]: Derived on read from a user's entries.
//!
//! ## Ephemeral State
//!
//! - Reflection sessions: the six-question guided flow. Lives in memory only;
//!   see [`crate::interactive`]. The shapes exposed to clients are here
//!   ([`Question`], [`SessionView`]).

mod analysis;
mod entry;
mod mood;
mod session;
mod trend;

pub use analysis::*;
pub use entry::*;
pub use mood::*;
pub use session::*;
pub use trend::*;
