use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::{AnsweredQuestion, Question, QuestionKind, SessionStage, SessionView};

/// Id of "How was your day?", whose answer becomes the mood hint.
pub const MOOD_QUESTION_ID: &str = "q1";
/// Id of "How are you feeling right now?", whose answer becomes the emotion hint.
pub const EMOTION_QUESTION_ID: &str = "q4";

/// Upper bound for a single free-text answer, in characters.
pub const MAX_FREE_TEXT_CHARS: usize = 2_000;

/// The guided reflection script.
pub static QUESTIONS: [Question; 6] = [
    Question {
        id: "q1",
        kind: QuestionKind::MultipleChoice,
        prompt: "How was your day?",
        options: &["Good", "Okay", "Bad"],
    },
    Question {
        id: "q2",
        kind: QuestionKind::MultipleChoice,
        prompt: "Where did this feeling mostly come from?",
        options: &["Work", "Family", "Health", "Friends", "Self"],
    },
    Question {
        id: "q3",
        kind: QuestionKind::FreeText,
        prompt: "Can you describe what happened specifically?",
        options: &[],
    },
    Question {
        id: "q4",
        kind: QuestionKind::MultipleChoice,
        prompt: "How are you feeling right now?",
        options: &["Calm", "Tired", "Anxious", "Happy", "Low"],
    },
    Question {
        id: "q5",
        kind: QuestionKind::MultipleChoice,
        prompt: "What do you need the most right now?",
        options: &["Rest", "Motivation", "Connection", "Reflection"],
    },
    Question {
        id: "q6",
        kind: QuestionKind::FreeText,
        prompt: "What are you grateful for today?",
        options: &[],
    },
];

/// Everything the feedback generator needs once the script is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// Every `Q: prompt` / `A: answer` pair in question order.
    pub composite_text: String,
    pub mood_hint: String,
    pub emotion_hint: String,
}

/// Result of a successful answer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer was recorded; this question comes next.
    Next(Question),
    /// That was the last answer. The session is now complete.
    Complete(Synthesis),
}

/// A six-question reflection, driven one answer at a time.
///
/// States run `q1 .. q6` (in progress) and end in `Complete`, which is
/// terminal: a finished session never restarts, and further submissions are
/// rejected without touching the recorded answers.
#[derive(Debug, Clone)]
pub struct InteractiveSession {
    id: Uuid,
    current_index: usize,
    answers: HashMap<&'static str, String>,
    stage: SessionStage,
    feedback: Option<String>,
    created_at: DateTime<Utc>,
}

impl Default for InteractiveSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            current_index: 0,
            answers: HashMap::new(),
            stage: SessionStage::InProgress,
            feedback: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The question awaiting an answer, `None` once complete.
    pub fn current_question(&self) -> Option<&'static Question> {
        match self.stage {
            SessionStage::InProgress => QUESTIONS.get(self.current_index),
            SessionStage::Complete => None,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Recorded answers in question order.
    pub fn answers(&self) -> Vec<AnsweredQuestion> {
        QUESTIONS
            .iter()
            .filter_map(|q| {
                self.answers.get(q.id).map(|a| AnsweredQuestion {
                    question_id: q.id.to_string(),
                    prompt: q.prompt.to_string(),
                    answer: a.clone(),
                })
            })
            .collect()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn set_feedback(&mut self, feedback: String) {
        self.feedback = Some(feedback);
    }

    /// Record an answer to the current question and advance.
    pub fn submit_answer(&mut self, answer: &str) -> Result<SubmitOutcome, SessionError> {
        let question = self.current_question().ok_or(SessionError::AlreadyComplete)?;
        let answer = normalize_answer(question, answer)?;

        self.answers.insert(question.id, answer);
        self.current_index += 1;

        match QUESTIONS.get(self.current_index) {
            Some(next) => Ok(SubmitOutcome::Next(*next)),
            None => {
                self.stage = SessionStage::Complete;
                Ok(SubmitOutcome::Complete(self.synthesize()))
            }
        }
    }

    fn synthesize(&self) -> Synthesis {
        let composite_text = self
            .answers()
            .iter()
            .map(|a| format!("Q: {}\nA: {}", a.prompt, a.answer))
            .collect::<Vec<_>>()
            .join("\n\n");

        let hint = |id: &str| {
            self.answer(id)
                .map(str::to_lowercase)
                .unwrap_or_else(|| "neutral".to_string())
        };

        Synthesis {
            composite_text,
            mood_hint: hint(MOOD_QUESTION_ID),
            emotion_hint: hint(EMOTION_QUESTION_ID),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            stage: self.stage,
            current_index: self.current_index,
            total_questions: QUESTIONS.len(),
            current_question: self.current_question().copied(),
            answers: self.answers(),
            feedback: self.feedback.clone(),
            created_at: self.created_at,
        }
    }
}

/// Validate an answer against its question. Multiple-choice answers match
/// options case-insensitively and are stored in the option's own spelling.
fn normalize_answer(question: &Question, answer: &str) -> Result<String, SessionError> {
    let trimmed = answer.trim();
    match question.kind {
        QuestionKind::MultipleChoice => question
            .options
            .iter()
            .find(|opt| opt.eq_ignore_ascii_case(trimmed))
            .map(|opt| opt.to_string())
            .ok_or_else(|| SessionError::InvalidAnswer {
                question_id: question.id,
                reason: format!(
                    "'{}' is not one of: {}",
                    trimmed,
                    question.options.join(", ")
                ),
            }),
        QuestionKind::FreeText => {
            if trimmed.is_empty() {
                return Err(SessionError::InvalidAnswer {
                    question_id: question.id,
                    reason: "answer must not be empty".to_string(),
                });
            }
            if trimmed.chars().count() > MAX_FREE_TEXT_CHARS {
                return Err(SessionError::InvalidAnswer {
                    question_id: question.id,
                    reason: format!("answer is longer than {} characters", MAX_FREE_TEXT_CHARS),
                });
            }
            Ok(trimmed.to_string())
        }
    }
}
