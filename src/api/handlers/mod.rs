use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, UserId};
use crate::error::{AnalysisError, JournalError, SessionError, StoreError};
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map a journal error onto a status code and a client-safe message.
///
/// Input and validation errors are exposed as-is. Store failures are logged
/// in full server-side and the client only sees a generic message.
fn error_response(e: impl Into<JournalError>) -> (StatusCode, String) {
    let e = e.into();
    let status = match &e {
        JournalError::Analysis(AnalysisError::EmptyInput)
        | JournalError::Analysis(AnalysisError::OversizedInput { .. })
        | JournalError::Session(SessionError::InvalidAnswer { .. }) => StatusCode::BAD_REQUEST,
        JournalError::Analysis(AnalysisError::InferenceUnavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        JournalError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JournalError::Session(SessionError::NotFound)
        | JournalError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        JournalError::Session(SessionError::AlreadyComplete) => StatusCode::CONFLICT,
        JournalError::Store(StoreError::Backend(_)) => return internal_error(&e),
    };

    tracing::warn!("Rejected request: {}", e);
    (status, e.to_string())
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Analysis
// ============================================================

pub async fn analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeInput>,
) -> Result<Json<AnalysisResult>, (StatusCode, String)> {
    state
        .journal
        .analyze(&input.text)
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================
// Entries
// ============================================================

/// Pagination over a user's entries, newest first.
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_entries(
    State(state): State<AppState>,
    user: UserId,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<Vec<JournalEntry>>, (StatusCode, String)> {
    let entries = state.journal.list_entries(&user.0).map_err(error_response)?;

    let entries = entries
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();

    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<AppState>,
    user: UserId,
    Json(input): Json<CreateEntryInput>,
) -> Result<(StatusCode, Json<JournalEntry>), (StatusCode, String)> {
    state
        .journal
        .create_entry(&user.0, &input.title, &input.content)
        .await
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(error_response)
}

pub async fn get_entry(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, (StatusCode, String)> {
    state
        .journal
        .get_entry(&user.0, id)
        .map(Json)
        .map_err(error_response)
}

pub async fn delete_entry(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .journal
        .delete_entry(&user.0, id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

// ============================================================
// Trends
// ============================================================

pub async fn get_trend(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<TrendPoint>>, (StatusCode, String)> {
    state.journal.trend(&user.0).map(Json).map_err(error_response)
}

pub async fn get_mood_counts(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<MoodCounts>, (StatusCode, String)> {
    state
        .journal
        .mood_counts(&user.0)
        .map(Json)
        .map_err(error_response)
}

pub async fn get_insights(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Option<TrendSummary>>, (StatusCode, String)> {
    state
        .journal
        .insights(&user.0)
        .map(Json)
        .map_err(error_response)
}

// ============================================================
// Reflection Sessions
// ============================================================

pub async fn start_session(
    State(state): State<AppState>,
    user: UserId,
) -> (StatusCode, Json<SessionView>) {
    (StatusCode::CREATED, Json(state.sessions.start(&user.0)))
}

pub async fn get_session(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    state
        .sessions
        .get(&user.0, id)
        .map(Json)
        .map_err(error_response)
}

pub async fn submit_answer(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
    Json(input): Json<SubmitAnswerInput>,
) -> Result<Json<SessionView>, (StatusCode, String)> {
    state
        .sessions
        .submit(&user.0, id, &input.answer)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn abandon_session(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .sessions
        .abandon(&user.0, id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

/// Feedback on a caller-assembled transcript. All three fields are required.
pub async fn interactive_feedback(
    State(state): State<AppState>,
    Json(input): Json<InteractiveFeedbackInput>,
) -> Result<Json<InteractiveFeedbackResponse>, (StatusCode, String)> {
    let required = |field: Option<String>| field.filter(|s| !s.trim().is_empty());

    let (Some(entry), Some(mood), Some(emotion)) = (
        required(input.entry),
        required(input.mood),
        required(input.emotion),
    ) else {
        tracing::warn!("Interactive feedback request with missing fields");
        return Err((
            StatusCode::BAD_REQUEST,
            "entry, mood and emotion are required".to_string(),
        ));
    };

    let analyzer = state.journal.analyzer();
    analyzer.check_input(&entry).map_err(error_response)?;

    let feedback = analyzer
        .feedback_or_fallback(&entry, &mood.to_lowercase(), &emotion.to_lowercase())
        .await;
    Ok(Json(InteractiveFeedbackResponse { feedback }))
}
