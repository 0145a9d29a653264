//! Direct REST backend for the Gemini `generateContent` endpoint.
//!
//! Builds one request per question with the fixed system instruction and the
//! `google_search` tool enabled, and decodes the reply into the tolerant wire
//! shapes below. Absent fields are represented as `Option`/empty and resolved
//! to fallbacks during normalization.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EngineSettings, QueryBackend, SYSTEM_INSTRUCTION};

/// Backend that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiBackend {
    http: Client,
    settings: EngineSettings,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("model", &self.settings.model)
            .field("base_url", &self.settings.base_url)
            .finish()
    }
}

impl GeminiBackend {
    /// Create a new backend with the given settings.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    fn request_body(question: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: question.to_string(),
                }],
            }],
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            }),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

#[async_trait::async_trait]
impl QueryBackend for GeminiBackend {
    async fn generate(&self, question: &str) -> anyhow::Result<GenerateContentResponse> {
        let url = format!(
            "{base}/{model}:generateContent?key={key}",
            base = self.settings.base_url.trim_end_matches('/'),
            model = self.settings.model,
            key = self.settings.api_key,
        );

        let body = Self::request_body(question);
        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            anyhow::bail!("Gemini API returned {status}: {detail}");
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

/// Wire shape of a `generateContent` reply.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}
