//! Nexus QA
//!
//! A grounded question-answering web application: the user types a question,
//! the server forwards it to the Gemini API with web-search grounding
//! enabled, and the answer plus cited sources are rendered back. Prior
//! question/answer pairs are kept in an in-memory, session-scoped history.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server, HTML-first (HTMX + Alpine.js)
//! - **Engine**: Single-shot query service over the Gemini REST API
//! - **Session**: In-memory state controller and history per session
//! - **UI**: Server-rendered HTML fragments
//!
//! # Modules
//!
//! - [`engine`]: query service and Gemini backend
//! - [`format`]: markdown-subset renderer for answer text
//! - [`session`]: session state machine and store
//! - [`ui`]: stateless HTML renderers
//! - [`server`]: routes and handlers
//! - [`config`]: layered configuration

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod engine;
pub mod format;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use engine::AnswerEngine;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Query service for answering questions.
    pub engine: Arc<AnswerEngine>,
    /// Session store for per-client state and history.
    pub sessions: SessionStore,
}
