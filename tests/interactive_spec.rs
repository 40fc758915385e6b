use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mood_journal::analysis::{
    analyze_text, AnalyzerSettings, InferenceEngine, TextAnalyzer, FEEDBACK_FALLBACK,
};
use mood_journal::error::{InferenceError, SessionError};
use mood_journal::interactive::*;
use mood_journal::models::*;
use speculate2::speculate;
use uuid::Uuid;

const ANSWERS: [&str; 6] = [
    "Bad",
    "Work",
    "My manager moved the deadline up again",
    "Anxious",
    "Rest",
    "My sister called",
];

/// Drive a session through the whole script, returning the synthesis.
fn complete(session: &mut InteractiveSession) -> Synthesis {
    for answer in &ANSWERS[..5] {
        assert!(matches!(
            session.submit_answer(answer),
            Ok(SubmitOutcome::Next(_))
        ));
    }
    match session.submit_answer(ANSWERS[5]) {
        Ok(SubmitOutcome::Complete(synthesis)) => synthesis,
        other => panic!("expected completion, got {:?}", other),
    }
}

speculate! {
    before {
        let mut session = InteractiveSession::new();
    }

    describe "a new session" {
        it "starts at the first question" {
            assert_eq!(session.stage(), SessionStage::InProgress);
            assert_eq!(session.current_index(), 0);
            assert_eq!(session.current_question().map(|q| q.id), Some("q1"));
        }

        it "has no answers or feedback" {
            assert!(session.answers().is_empty());
            assert!(session.feedback().is_none());
        }
    }

    describe "submit_answer" {
        it "advances one question per answer" {
            let next = session.submit_answer("Good").expect("valid answer");

            assert_eq!(next, SubmitOutcome::Next(QUESTIONS[1]));
            assert_eq!(session.current_index(), 1);
            assert_eq!(session.answer("q1"), Some("Good"));
        }

        it "rejects an answer outside the options and stays put" {
            let result = session.submit_answer("Fantastic");

            assert!(matches!(
                result,
                Err(SessionError::InvalidAnswer { question_id: "q1", .. })
            ));
            assert_eq!(session.current_index(), 0);
            assert!(session.answers().is_empty());
        }

        it "rejects blank free text" {
            session.submit_answer("Okay").unwrap();
            session.submit_answer("Self").unwrap();

            let result = session.submit_answer("   ");

            assert!(matches!(
                result,
                Err(SessionError::InvalidAnswer { question_id: "q3", .. })
            ));
            assert_eq!(session.current_index(), 2);
        }

        it "completes after the sixth answer" {
            complete(&mut session);

            assert_eq!(session.stage(), SessionStage::Complete);
            assert!(session.current_question().is_none());
            assert_eq!(session.answers().len(), QUESTIONS.len());
        }

        it "rejects answers once complete without touching the record" {
            complete(&mut session);
            let before = session.answers();

            assert_eq!(session.submit_answer("Good"), Err(SessionError::AlreadyComplete));
            assert_eq!(session.answers(), before);
            assert_eq!(session.stage(), SessionStage::Complete);
        }
    }

    describe "synthesis" {
        it "lowercases the mood and emotion answers into hints" {
            let synthesis = complete(&mut session);

            assert_eq!(synthesis.mood_hint, "bad");
            assert_eq!(synthesis.emotion_hint, "anxious");
        }

        it "pairs every prompt with its answer in order" {
            let synthesis = complete(&mut session);

            assert!(synthesis
                .composite_text
                .starts_with("Q: How was your day?\nA: Bad"));
            assert!(synthesis
                .composite_text
                .ends_with("Q: What are you grateful for today?\nA: My sister called"));
            assert_eq!(synthesis.composite_text.matches("Q: ").count(), 6);
        }
    }
}

// ============================================================
// Session registry
// ============================================================

/// Engine that records the hints it is asked for feedback with.
#[derive(Default)]
struct RecordingEngine {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl InferenceEngine for RecordingEngine {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, InferenceError> {
        Ok(analyze_text(text))
    }

    async fn feedback(
        &self,
        _composite_text: &str,
        mood_hint: &str,
        emotion_hint: &str,
    ) -> Result<String, InferenceError> {
        self.calls
            .lock()
            .unwrap()
            .push((mood_hint.to_string(), emotion_hint.to_string()));
        Ok(format!("You felt {} and {}.", mood_hint, emotion_hint))
    }
}

struct FailingEngine;

#[async_trait]
impl InferenceEngine for FailingEngine {
    async fn analyze(&self, _text: &str) -> Result<AnalysisResult, InferenceError> {
        Err(InferenceError::Status("500 Internal Server Error".to_string()))
    }

    async fn feedback(&self, _: &str, _: &str, _: &str) -> Result<String, InferenceError> {
        Err(InferenceError::Status("500 Internal Server Error".to_string()))
    }
}

const USER: &str = "alice";

fn registry(engine: Arc<dyn InferenceEngine>) -> ReflectionSessions {
    ReflectionSessions::new(TextAnalyzer::new(engine, AnalyzerSettings::default()))
}

async fn answer_all(sessions: &ReflectionSessions, id: Uuid) -> SessionView {
    let mut view = None;
    for answer in ANSWERS {
        view = Some(sessions.submit(USER, id, answer).await.expect("valid answer"));
    }
    view.unwrap()
}

mod reflection_sessions {
    use super::*;

    #[tokio::test]
    async fn completed_session_carries_feedback_from_hints() {
        let engine = Arc::new(RecordingEngine::default());
        let sessions = registry(engine.clone());
        let id = sessions.start(USER).id;

        let view = answer_all(&sessions, id).await;

        assert_eq!(view.stage, SessionStage::Complete);
        assert_eq!(view.feedback.as_deref(), Some("You felt bad and anxious."));
        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec![("bad".to_string(), "anxious".to_string())]
        );
    }

    #[tokio::test]
    async fn lexicon_feedback_is_non_empty() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let id = sessions.start(USER).id;

        let view = answer_all(&sessions, id).await;

        assert!(view.feedback.is_some_and(|f| !f.trim().is_empty()));
    }

    #[tokio::test]
    async fn failed_feedback_still_completes_with_fallback() {
        let sessions = registry(Arc::new(FailingEngine));
        let id = sessions.start(USER).id;

        let view = answer_all(&sessions, id).await;

        assert_eq!(view.stage, SessionStage::Complete);
        assert_eq!(view.feedback.as_deref(), Some(FEEDBACK_FALLBACK));
    }

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let first = sessions.start(USER).id;
        let second = sessions.start(USER).id;

        sessions.submit(USER, first, "Good").await.unwrap();
        sessions.submit(USER, first, "Family").await.unwrap();
        sessions.submit(USER, second, "Bad").await.unwrap();

        assert_eq!(sessions.get(USER, first).unwrap().current_index, 2);
        let second = sessions.get(USER, second).unwrap();
        assert_eq!(second.current_index, 1);
        assert_eq!(second.answers[0].answer, "Bad");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());

        assert_eq!(sessions.get(USER, Uuid::new_v4()).unwrap_err(), SessionError::NotFound);
        assert_eq!(
            sessions.submit(USER, Uuid::new_v4(), "Good").await.unwrap_err(),
            SessionError::NotFound
        );
    }

    #[tokio::test]
    async fn abandoned_session_is_gone() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let id = sessions.start(USER).id;

        sessions.abandon(USER, id).expect("abandon");

        assert_eq!(sessions.get(USER, id).unwrap_err(), SessionError::NotFound);
        assert_eq!(sessions.abandon(USER, id).unwrap_err(), SessionError::NotFound);
    }

    #[tokio::test]
    async fn completed_session_rejects_more_answers() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let id = sessions.start(USER).id;
        answer_all(&sessions, id).await;

        assert_eq!(
            sessions.submit(USER, id, "Good").await.unwrap_err(),
            SessionError::AlreadyComplete
        );
    }

    #[tokio::test]
    async fn another_user_cannot_touch_the_session() {
        let sessions = ReflectionSessions::new(TextAnalyzer::lexicon());
        let id = sessions.start(USER).id;
        sessions.submit(USER, id, "Good").await.unwrap();

        assert_eq!(sessions.get("mallory", id).unwrap_err(), SessionError::NotFound);
        assert_eq!(
            sessions.submit("mallory", id, "Family").await.unwrap_err(),
            SessionError::NotFound
        );
        assert_eq!(sessions.abandon("mallory", id).unwrap_err(), SessionError::NotFound);

        let view = sessions.get(USER, id).unwrap();
        assert_eq!(view.current_index, 1);
    }
}
