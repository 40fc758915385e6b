mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use middleware::{RateLimiter, SecurityConfig, UserId, USER_ID_HEADER};

use crate::analysis::TextAnalyzer;
use crate::interactive::ReflectionSessions;
use crate::journal::JournalService;
use crate::store::EntryStore;

/// Shared state of the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub journal: JournalService,
    pub sessions: ReflectionSessions,
}

impl AppState {
    pub fn new(store: Arc<dyn EntryStore>, analyzer: TextAnalyzer) -> Self {
        Self {
            journal: JournalService::new(store, analyzer.clone()),
            sessions: ReflectionSessions::new(analyzer),
        }
    }
}

/// Router without authentication or rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_config(state, SecurityConfig::disabled())
}

pub fn create_router_with_config(state: AppState, config: SecurityConfig) -> Router {
    let protected = Router::new()
        // Analysis
        .route("/analyze", post(handlers::analyze))
        // Entries
        .route(
            "/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/entries/stats/trend", get(handlers::get_trend))
        .route("/entries/stats/mood", get(handlers::get_mood_counts))
        .route(
            "/entries/{id}",
            get(handlers::get_entry).delete(handlers::delete_entry),
        )
        .route("/insights", get(handlers::get_insights))
        // Reflection sessions
        .route("/interactive/sessions", post(handlers::start_session))
        .route(
            "/interactive/sessions/{id}",
            get(handlers::get_session).delete(handlers::abandon_session),
        )
        .route(
            "/interactive/sessions/{id}/answers",
            post(handlers::submit_answer),
        )
        .route(
            "/ai/interactive-feedback",
            post(handlers::interactive_feedback),
        )
        .route_layer(from_fn_with_state(
            config.clone(),
            middleware::auth_middleware,
        ));

    let mut api = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected);

    if let Some(limiter) = config.rate_limiter.clone() {
        api = api.layer(from_fn_with_state(limiter, middleware::rate_limit_middleware));
    }

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}
