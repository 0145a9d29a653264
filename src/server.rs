//! HTTP surface.
//!
//! HTML-first: `GET /` serves the full page, and the interaction routes
//! (`/ask`, `/select/{id}`, `/reset`) return workspace fragments that HTMX
//! swaps in place. A small JSON API mirrors the same operations for
//! programmatic use.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::engine::GroundingSource;
use crate::session::{HistoryItem, Session, Submission};
use crate::ui;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %format!("http://{addr}"),
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages and fragments
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/select/{item_id}", post(select))
        .route("/reset", post(reset))
        // JSON API
        .route("/api/ask", post(api_ask))
        .route("/api/reset", post(api_reset))
        .route("/api/sessions", post(api_create_session))
        .route("/api/sessions/{id}/history", get(api_get_history))
        // Operational
        .route("/healthz", get(healthz))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Full page with a fresh session.
async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create();
    tracing::debug!(session_id = %session.id(), "Created page session");
    Html(ui::page(&session.snapshot()))
}

/// Form body shared by the fragment routes.
#[derive(Debug, Deserialize)]
struct SessionForm {
    session_id: String,
}

/// Form body for the ask route.
#[derive(Debug, Deserialize)]
struct AskForm {
    session_id: String,
    #[serde(default)]
    question: String,
}

/// POST /ask - Submit a question and return the updated workspace.
async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let session = state.sessions.get_or_create(&form.session_id);
    run_question(&state, &session, &form.question).await;
    Html(ui::workspace(&session.snapshot()))
}

/// POST /select/{item_id} - Re-display a history entry. No engine call.
async fn select(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Form(form): Form<SessionForm>,
) -> Html<String> {
    let session = state.sessions.get_or_create(&form.session_id);
    if !session.select(&item_id) {
        tracing::warn!(
            session_id = %session.id(),
            item_id = %item_id,
            "History entry not found"
        );
    }
    Html(ui::workspace(&session.snapshot()))
}

/// POST /reset - Clear the displayed query. History is untouched.
async fn reset(State(state): State<AppState>, Form(form): Form<SessionForm>) -> Html<String> {
    let session = state.sessions.get_or_create(&form.session_id);
    session.reset();
    Html(ui::workspace(&session.snapshot()))
}

/// Run one question through the engine, settling the session either way.
///
/// Declined submissions (empty input, question already in flight) leave the
/// session untouched and issue no upstream call.
async fn run_question(state: &AppState, session: &Session, question: &str) {
    match session.begin(question) {
        Submission::Started(question) => {
            tracing::info!(session_id = %session.id(), "Question admitted");
            match state.engine.ask(&question).await {
                Ok(answer) => {
                    tracing::info!(
                        session_id = %session.id(),
                        answer_length = answer.text.len(),
                        source_count = answer.sources.len(),
                        "Question answered"
                    );
                    session.complete(&question, answer);
                }
                Err(err) => session.fail(err.to_string()),
            }
        }
        Submission::Rejected => {
            tracing::debug!(session_id = %session.id(), "Empty question declined");
        }
        Submission::Busy => {
            tracing::debug!(session_id = %session.id(), "Question already in flight, declined");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for the ask API.
#[derive(Debug, Deserialize)]
struct ApiAskRequest {
    /// Optional session ID (creates new if not provided).
    #[serde(default)]
    session_id: Option<String>,
    question: String,
}

/// Response from the ask API.
#[derive(Debug, Serialize)]
struct ApiAskResponse {
    session_id: String,
    question: String,
    text: String,
    sources: Vec<GroundingSource>,
}

/// POST /api/ask - Ask a question, JSON in and out.
async fn api_ask(
    State(state): State<AppState>,
    Json(req): Json<ApiAskRequest>,
) -> Result<Json<ApiAskResponse>, (StatusCode, String)> {
    let session = match &req.session_id {
        Some(id) => state.sessions.get_or_create(id),
        None => state.sessions.create(),
    };

    match session.begin(&req.question) {
        Submission::Started(question) => match state.engine.ask(&question).await {
            Ok(answer) => {
                session.complete(&question, answer.clone());
                Ok(Json(ApiAskResponse {
                    session_id: session.id().to_string(),
                    question,
                    text: answer.text,
                    sources: answer.sources,
                }))
            }
            Err(err) => {
                let message = err.to_string();
                session.fail(message.clone());
                Err((StatusCode::BAD_GATEWAY, message))
            }
        },
        Submission::Rejected => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "question must not be empty".to_string(),
        )),
        Submission::Busy => Err((
            StatusCode::CONFLICT,
            "a question is already in flight".to_string(),
        )),
    }
}

/// Request body for the reset API.
#[derive(Debug, Deserialize)]
struct ApiResetRequest {
    session_id: String,
}

/// POST /api/reset - Clear the displayed query. History is untouched.
async fn api_reset(State(state): State<AppState>, Json(req): Json<ApiResetRequest>) -> StatusCode {
    match state.sessions.get(&req.session_id) {
        Some(session) => {
            session.reset();
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Session info returned by the session API.
#[derive(Debug, Serialize)]
struct SessionInfo {
    id: String,
    history_count: usize,
}

/// POST /api/sessions - Create a new session.
async fn api_create_session(State(state): State<AppState>) -> Json<SessionInfo> {
    let session = state.sessions.create();
    Json(SessionInfo {
        id: session.id().to_string(),
        history_count: session.history_len(),
    })
}

/// GET /api/sessions/{id}/history - History entries, newest first.
async fn api_get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryItem>>, StatusCode> {
    match state.sessions.get(&id) {
        Some(session) => Ok(Json(session.snapshot().history)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// GET /healthz - Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}
