// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat proxy request, response and error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who authored a history message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One prior turn of the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A chat completion request proxied to the model provider.
///
/// The API key travels with the request and is forwarded as-is; it is
/// never stored or logged.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: String,
    pub api_key: String,
    #[serde(default)]
    pub stream: bool,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

fn default_provider() -> String {
    "gemini".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Chat proxy failures, classified for HTTP status mapping.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("Unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    #[error("Incorrect API Key provided. Please check your key and try again.")]
    InvalidApiKey,

    #[error("Rate limit or quota exceeded. Please try again later.")]
    RateLimited,

    /// The provider could not be reached at all
    #[error("Failed to connect to the model provider.")]
    Upstream,

    /// Anything the provider rejected for another reason
    #[error("Error generating response from {provider}: {message}")]
    Provider { provider: String, message: String },
}
