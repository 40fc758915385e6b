use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question of the guided reflection script.
///
/// Questions are static configuration, not user data.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub kind: QuestionKind,
    pub prompt: &'static str,
    /// Declared choices. Empty for free-text questions.
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [&'static str],
}

fn has_no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

/// How a question expects to be answered.
///
/// - `MultipleChoice`: the answer must be one of the declared options
/// - `FreeText`: any non-blank answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    FreeText,
}

/// Where a reflection session is in its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    InProgress,
    Complete,
}

impl SessionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }
}

/// A recorded answer, in question order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question_id: String,
    pub prompt: String,
    pub answer: String,
}

/// Snapshot of a reflection session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub stage: SessionStage,
    pub current_index: usize,
    pub total_questions: usize,
    /// The question awaiting an answer, absent once complete.
    pub current_question: Option<Question>,
    pub answers: Vec<AnsweredQuestion>,
    /// Narrative reflection, present once the session is complete.
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for answering the current question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerInput {
    pub answer: String,
}

/// Input for generating feedback on an arbitrary composite text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractiveFeedbackInput {
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractiveFeedbackResponse {
    pub feedback: String,
}
