//! Query service over the Gemini generative-content API.
//!
//! The [`AnswerEngine`] issues exactly one upstream request per question and
//! normalizes whatever comes back into the strict [`Answer`] shape: display
//! text plus a deduplicated list of web citations. Shape deviations in the
//! upstream payload become the documented fallbacks, never a crash.
//!
//! The wire protocol lives behind the [`QueryBackend`] trait so tests can
//! substitute a canned backend; the production implementation is
//! [`GeminiBackend`].

pub mod gemini;

pub use gemini::GeminiBackend;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use gemini::GenerateContentResponse;

/// Default model identifier, overridable via `NEXUS_MODEL`.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default API root, overridable via `NEXUS_GEMINI_BASE_URL`.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Answer text used when the upstream returns no content.
pub const FALLBACK_ANSWER: &str = "I'm sorry, I couldn't generate a response.";

/// Title used for web sources that arrive without one.
const FALLBACK_SOURCE_TITLE: &str = "Source";

/// System instruction sent alongside every question.
pub(crate) const SYSTEM_INSTRUCTION: &str = "You are an advanced NLP-based Question Answering \
    assistant. Provide clear, concise, and accurate answers. Use markdown for formatting. \
    Always prioritize accuracy and cite your reasoning if complex.";

/// Connection and model settings for the upstream engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// API key, supplied via `GEMINI_API_KEY`.
    pub api_key: String,
    /// Model identifier (e.g. `gemini-3-flash-preview`).
    pub model: String,
    /// API root URL without trailing slash.
    pub base_url: String,
}

/// A web citation attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Absolute URL of the cited page.
    pub uri: String,
    /// Display title of the cited page.
    pub title: String,
}

/// A normalized answer: display text plus deduplicated citations.
///
/// Within one answer no two sources share a `uri`; the first occurrence wins
/// and declaration order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// Errors surfaced to callers of the engine.
///
/// Every upstream failure collapses into one user-displayable message; the
/// underlying cause is logged, never shown.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to get an answer from the NLP engine.")]
    Unavailable,
}

/// Trait for question-answering backends.
///
/// Implementations issue one request and return the raw wire response;
/// normalization happens in the engine.
#[async_trait::async_trait]
pub trait QueryBackend: Send + Sync {
    /// Send a single question upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the upstream answers with a
    /// non-success status, or the body cannot be decoded.
    async fn generate(&self, question: &str) -> anyhow::Result<GenerateContentResponse>;
}

/// Issues questions to a backend and normalizes the replies.
pub struct AnswerEngine {
    backend: Arc<dyn QueryBackend>,
}

impl std::fmt::Debug for AnswerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerEngine").finish()
    }
}

impl AnswerEngine {
    /// Create an engine backed by the Gemini REST API.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_backend(Arc::new(GeminiBackend::new(settings)))
    }

    /// Create an engine with a custom backend.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }

    /// Ask a single question. One upstream attempt, no retry.
    ///
    /// The caller enforces that `question` is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] on any upstream failure. The
    /// cause is logged for diagnostics and deliberately absent from the
    /// user-facing message.
    pub async fn ask(&self, question: &str) -> Result<Answer, EngineError> {
        let reply = match self.backend.generate(question).await {
            Ok(reply) => reply,
            Err(cause) => {
                tracing::error!(error = ?cause, "engine request failed");
                return Err(EngineError::Unavailable);
            }
        };

        Ok(normalize(reply))
    }
}

/// Collapse the wire response into the strict internal shape.
fn normalize(reply: GenerateContentResponse) -> Answer {
    let candidate = reply.candidates.unwrap_or_default().into_iter().next();

    let text = candidate
        .as_ref()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_ANSWER.to_string());

    let chunks = candidate
        .and_then(|c| c.grounding_metadata)
        .and_then(|metadata| metadata.grounding_chunks)
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for chunk in chunks {
        let Some(web) = chunk.web else { continue };
        let Some(uri) = web.uri.filter(|uri| !uri.is_empty()) else {
            continue;
        };
        if !seen.insert(uri.clone()) {
            continue;
        }
        let title = web
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| FALLBACK_SOURCE_TITLE.to_string());
        sources.push(GroundingSource { uri, title });
    }

    Answer { text, sources }
}
