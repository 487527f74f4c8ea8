//! Generation-service seam. The pipeline only sees the [`GenerationClient`]
//! trait; the concrete client speaks the Gemini `generateContent` REST
//! endpoint with a per-request deadline.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation transport failed: {0}")]
    Transport(String),
    #[error("generation service returned status {status}")]
    Status { status: u16 },
    #[error("generation request exceeded its deadline")]
    DeadlineExceeded,
    #[error("generation response contained no candidate text")]
    EmptyResponse,
}

/// Everything one attempt needs besides the credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Executes one generation attempt with one credential. Any error is
    /// recoverable by rotating; the retry policy lives in the caller.
    async fn generate(
        &self,
        credential: &SecretString,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateContentBody<'a> {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(request_timeout: Duration) -> Result<Self, GenerationError> {
        Self::with_base_url(request_timeout, DEFAULT_BASE_URL.to_owned())
    }

    /// Base-url override for tests pointing at a local stub.
    pub fn with_base_url(
        request_timeout: Duration,
        base_url: String,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|error| GenerationError::Transport(error.to_string()))?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        credential: &SecretString,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            request.model
        );
        let body = GenerateContentBody {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: &request.system_instruction }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &request.prompt }],
            }],
        };

        let response = self
            .http
            .post(url)
            .query(&[("key", credential.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    GenerationError::DeadlineExceeded
                } else {
                    GenerationError::Transport(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status { status: status.as_u16() });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
