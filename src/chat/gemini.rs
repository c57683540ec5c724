// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Generative Language API client
//!
//! Speaks the `generateContent` / `streamGenerateContent` endpoints
//! directly. History is converted to Gemini's content format: user turns
//! keep the `user` role, assistant turns become `model`, and system
//! messages are folded into the request's `systemInstruction`. Gemini
//! reports key problems as 400s with a descriptive body, so upstream
//! errors are classified by message text, not only by status code.

use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error};

use super::types::{ChatError, ChatMessage, ChatRole};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PROVIDER: &str = "gemini";
const TEMPERATURE: f64 = 0.7;
const STREAM_CHANNEL_CAPACITY: usize = 32;

pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        // No overall timeout: streamed generations can legitimately run
        // for minutes. Connect attempts are still bounded.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Single-shot completion: returns the concatenated text parts of the
    /// first candidate.
    pub async fn generate(
        &self,
        model: &str,
        api_key: &str,
        conversation: Conversation,
    ) -> Result<String, ChatError> {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest::new(conversation))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let data: GenerateResponse = response.json().await.map_err(|e| ChatError::Provider {
            provider: PROVIDER.to_string(),
            message: format!("JSON parse error: {}", e),
        })?;

        Ok(data.text())
    }

    /// Streaming completion: each chunk's text is forwarded through the
    /// returned channel in arrival order. Errors that occur before the
    /// stream opens are returned directly; errors mid-stream arrive as an
    /// `Err` item and close the channel.
    pub async fn stream(
        &self,
        model: &str,
        api_key: &str,
        conversation: Conversation,
    ) -> Result<mpsc::Receiver<Result<String, ChatError>>, ChatError> {
        let url = format!(
            "{}/{}:streamGenerateContent?alt=sse&key={}",
            GEMINI_API_BASE, model, api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest::new(conversation))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let mut bytes = response.bytes_stream();

        tokio::spawn(async move {
            let mut buffer = String::new();
            let mut chunks = 0usize;

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let e = e.without_url();
                        error!(error = %e, "gemini stream interrupted");
                        let _ = tx
                            .send(Err(ChatError::Provider {
                                provider: PROVIDER.to_string(),
                                message: e.to_string(),
                            }))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));
                for payload in drain_sse_lines(&mut buffer) {
                    match serde_json::from_str::<GenerateResponse>(&payload) {
                        Ok(parsed) => {
                            let text = parsed.text();
                            if !text.is_empty() {
                                chunks += 1;
                                if tx.send(Ok(text)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            debug!(error = %e, "skipping unparseable stream event");
                        }
                    }
                }
            }

            debug!(chunks, "gemini stream completed");
        });

        Ok(rx)
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A converted conversation ready to send to Gemini.
pub struct Conversation {
    contents: Vec<Content>,
    system_instruction: Option<Content>,
}

impl Conversation {
    /// Map chat history onto Gemini roles and append `query` as the final
    /// user turn. System messages become `systemInstruction` parts.
    pub fn from_history(history: &[ChatMessage], query: &str) -> Self {
        let mut contents = Vec::with_capacity(history.len() + 1);
        let mut system_parts = Vec::new();

        for message in history {
            match message.role {
                ChatRole::User => contents.push(Content::user(&message.content)),
                ChatRole::Assistant => contents.push(Content::model(&message.content)),
                ChatRole::System => system_parts.push(Part {
                    text: message.content.clone(),
                }),
            }
        }
        contents.push(Content::user(query));

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: system_parts,
            })
        };

        Self {
            contents,
            system_instruction,
        }
    }
}

/// Pull complete lines out of `buffer` and return the payloads of
/// `data:` lines. Incomplete trailing data stays buffered for the next
/// network chunk.
fn drain_sse_lines(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        let line = line.trim_end();
        if let Some(data) = line.strip_prefix("data: ") {
            if !data.is_empty() {
                payloads.push(data.to_string());
            }
        }
    }
    payloads
}

fn request_error(e: reqwest::Error) -> ChatError {
    // Gemini URLs carry the API key as a query parameter; strip the URL
    // before the error is logged or echoed to the caller
    let e = e.without_url();
    if e.is_connect() || e.is_timeout() {
        error!(error = %e, "could not reach gemini");
        ChatError::Upstream
    } else {
        ChatError::Provider {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        }
    }
}

/// Classify an upstream error response.
///
/// Gemini flags a bad key as `400 INVALID_ARGUMENT` with "API key not
/// valid" in the body, so the body text participates in classification
/// alongside the status code.
fn classify_api_error(status: u16, body: &str) -> ChatError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    let lower = format!("{} {}", body, message).to_ascii_lowercase();

    if status == 401
        || status == 403
        || lower.contains("api key")
        || lower.contains("api_key_invalid")
        || lower.contains("permission_denied")
        || lower.contains("unauthenticated")
    {
        return ChatError::InvalidApiKey;
    }

    if status == 429
        || lower.contains("quota")
        || lower.contains("resource_exhausted")
        || lower.contains("rate limit")
    {
        return ChatError::RateLimited;
    }

    ChatError::Provider {
        provider: PROVIDER.to_string(),
        message,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn new(conversation: Conversation) -> Self {
        Self {
            contents: conversation.contents,
            system_instruction: conversation.system_instruction,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
