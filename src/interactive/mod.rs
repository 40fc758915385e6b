//! Guided reflection: a six-question script that ends in a narrative reflection.
//!
//! [`InteractiveSession`] is the headless state machine; [`ReflectionSessions`]
//! keeps the in-flight sessions of a running server, keyed by session id.
//! Sessions are never persisted: a session lost before completion is simply
//! gone.

mod session;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

pub use session::{
    InteractiveSession, SubmitOutcome, Synthesis, EMOTION_QUESTION_ID, MAX_FREE_TEXT_CHARS,
    MOOD_QUESTION_ID, QUESTIONS,
};

use crate::analysis::TextAnalyzer;
use crate::error::SessionError;
use crate::models::SessionView;

/// Sessions older than this are dropped whenever a new one starts.
const SESSION_TTL_MINUTES: i64 = 60;

/// Registry of in-flight reflection sessions.
///
/// Each session belongs to the user who started it; other users see it as
/// missing. Sessions are only mutated under the registry lock, so concurrent
/// requests for different sessions never see each other's state. Feedback
/// generation happens outside the lock.
#[derive(Clone)]
pub struct ReflectionSessions {
    analyzer: TextAnalyzer,
    sessions: Arc<Mutex<HashMap<Uuid, OwnedSession>>>,
}

struct OwnedSession {
    owner: String,
    session: InteractiveSession,
}

fn owned_by<'a>(
    sessions: &'a mut HashMap<Uuid, OwnedSession>,
    owner: &str,
    id: Uuid,
) -> Result<&'a mut InteractiveSession, SessionError> {
    sessions
        .get_mut(&id)
        .filter(|s| s.owner == owner)
        .map(|s| &mut s.session)
        .ok_or(SessionError::NotFound)
}

impl ReflectionSessions {
    pub fn new(analyzer: TextAnalyzer) -> Self {
        Self {
            analyzer,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn start(&self, owner: &str) -> SessionView {
        let session = InteractiveSession::new();
        let view = session.view();

        let cutoff = Utc::now() - Duration::minutes(SESSION_TTL_MINUTES);
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.retain(|_, s| s.session.created_at() > cutoff);
        sessions.insert(
            session.id(),
            OwnedSession {
                owner: owner.to_string(),
                session,
            },
        );

        tracing::debug!("Started reflection session {} for {}", view.id, owner);
        view
    }

    /// Snapshot of a session. While the final answer's feedback is still
    /// being generated the session already reads as complete with no
    /// feedback; the submitting request receives the finished view.
    pub fn get(&self, owner: &str, id: Uuid) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        owned_by(&mut sessions, owner, id).map(|s| s.view())
    }

    /// Answer the current question of a session. The final answer triggers
    /// feedback generation; the returned view then carries the reflection.
    pub async fn submit(
        &self,
        owner: &str,
        id: Uuid,
        answer: &str,
    ) -> Result<SessionView, SessionError> {
        let synthesis = {
            let mut sessions = self.sessions.lock().expect("session lock poisoned");
            let session = owned_by(&mut sessions, owner, id)?;
            match session.submit_answer(answer)? {
                SubmitOutcome::Next(_) => return Ok(session.view()),
                SubmitOutcome::Complete(synthesis) => synthesis,
            }
        };

        tracing::info!(
            "Reflection session {} complete (mood hint: {}, emotion hint: {})",
            id,
            synthesis.mood_hint,
            synthesis.emotion_hint
        );
        let feedback = self
            .analyzer
            .feedback_or_fallback(
                &synthesis.composite_text,
                &synthesis.mood_hint,
                &synthesis.emotion_hint,
            )
            .await;

        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let session = owned_by(&mut sessions, owner, id)?;
        session.set_feedback(feedback);
        Ok(session.view())
    }

    /// Drop a session, finished or not.
    pub fn abandon(&self, owner: &str, id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        owned_by(&mut sessions, owner, id)?;
        sessions.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStage;

    #[test]
    fn start_registers_a_fresh_session() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());

        let view = sessions.start("alice");

        assert_eq!(view.stage, SessionStage::InProgress);
        assert_eq!(view.total_questions, QUESTIONS.len());
        assert_eq!(sessions.get("alice", view.id).unwrap().id, view.id);
    }

    #[test]
    fn submit_keeps_the_session_in_progress_until_the_last_answer() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let id = sessions.start("alice").id;

        let view = tokio_test::block_on(sessions.submit("alice", id, "okay")).unwrap();

        assert_eq!(view.stage, SessionStage::InProgress);
        assert_eq!(view.current_index, 1);
        assert_eq!(view.answers[0].answer, "Okay");
        assert!(view.feedback.is_none());
    }

    #[test]
    fn sessions_are_invisible_to_other_users() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let id = sessions.start("alice").id;

        assert_eq!(sessions.get("bob", id).unwrap_err(), SessionError::NotFound);
        assert_eq!(
            tokio_test::block_on(sessions.submit("bob", id, "Good")).unwrap_err(),
            SessionError::NotFound
        );
        assert_eq!(sessions.abandon("bob", id).unwrap_err(), SessionError::NotFound);

        let view = sessions.get("alice", id).unwrap();
        assert_eq!(view.current_index, 0);
    }
}
