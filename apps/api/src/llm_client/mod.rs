/// LLM Client: the single point of entry for all Gemini calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation service directly.
/// All model interactions MUST go through `TextGenerator`.
///
/// One call is one HTTP request: no retry, no streaming, no partial results.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

use prompts::SYSTEM_INSTRUCTION;

/// Low sampling temperature keeps the output close to the fixed document template.
pub const TEMPERATURE: f64 = 0.2;
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("LLM returned no text")]
    EmptyResponse,

    /// Network or service-level failure; carries the upstream message unchanged.
    #[error("{0}")]
    Transport(String),
}

/// Binary payload sent alongside the prompt (a PDF, in practice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub mime_type: String,
    /// Standard base64.
    pub data: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub system_instruction: SystemInstruction<'a>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'a str,
    pub parts: Vec<Part<'a>>,
}

/// Variant order is the wire order: inline data, when present, precedes the prompt.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: &'a Attachment,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
pub struct SystemInstruction<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Builds the single-turn payload. With an attachment the user turn holds exactly
/// two parts (inline data, then prompt); without, just the prompt.
pub fn build_request<'a>(
    prompt: &'a str,
    attachment: Option<&'a Attachment>,
) -> GenerateContentRequest<'a> {
    let mut parts = Vec::with_capacity(2);
    if let Some(inline_data) = attachment {
        parts.push(Part::InlineData { inline_data });
    }
    parts.push(Part::Text { text: prompt });

    GenerateContentRequest {
        contents: vec![Content { role: "user", parts }],
        system_instruction: SystemInstruction {
            parts: vec![Part::Text {
                text: SYSTEM_INSTRUCTION,
            }],
        },
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator seam
// ────────────────────────────────────────────────────────────────────────────

/// Text generation backend. Carried in `AppState` as `Arc<dyn TextGenerator>`
/// so the lesson pipeline can run against a stub in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
        model_id: &str,
    ) -> Result<String, GenerationError>;
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// `timeout_secs` bounds the whole request; expiry surfaces as `Transport`.
    pub fn new(api_key: String, base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
        model_id: &str,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model_id);
        let body = build_request(prompt, attachment);

        debug!(
            model = model_id,
            prompt_chars = prompt.chars().count(),
            attachment_bytes = attachment.map(|a| a.data.len()).unwrap_or(0),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Generation request failed: {e}");
                GenerationError::Transport(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        format!("Generation service returned {status}")
                    } else {
                        body
                    }
                });
            warn!("Generation service returned {}: {}", status, message);
            return Err(GenerationError::Transport(message));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationError::Transport(format!("Invalid response from generation service: {e}"))
        })?;

        let text = match parsed.text() {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => {
                let block_reason = parsed
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.as_deref());
                let finish_reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref());
                warn!(?block_reason, ?finish_reason, "Generation returned no text");
                return Err(GenerationError::EmptyResponse);
            }
        };

        info!(
            model = model_id,
            output_chars = text.chars().count(),
            "Generation succeeded"
        );

        Ok(text)
    }
}
