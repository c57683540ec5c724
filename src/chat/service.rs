// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider dispatch for chat completions

use tokio::sync::mpsc;
use tracing::info;

use super::gemini::{Conversation, GeminiClient};
use super::types::{ChatError, ChatRequest};

pub struct ChatService {
    gemini: GeminiClient,
}

impl ChatService {
    pub fn new() -> Self {
        Self {
            gemini: GeminiClient::new(),
        }
    }

    /// Single-shot completion for the request's provider.
    pub async fn generate(&self, request: &ChatRequest) -> Result<String, ChatError> {
        info!(
            provider = %request.provider,
            model = %request.model,
            history = request.history.len(),
            "chat request"
        );

        match request.provider.as_str() {
            "gemini" => {
                let conversation = Conversation::from_history(&request.history, &request.query);
                self.gemini
                    .generate(&request.model, &request.api_key, conversation)
                    .await
            }
            other => Err(ChatError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }

    /// Streaming completion; text chunks arrive through the returned
    /// channel as the provider produces them.
    pub async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<mpsc::Receiver<Result<String, ChatError>>, ChatError> {
        info!(
            provider = %request.provider,
            model = %request.model,
            history = request.history.len(),
            "chat stream request"
        );

        match request.provider.as_str() {
            "gemini" => {
                let conversation = Conversation::from_history(&request.history, &request.query);
                self.gemini
                    .stream(&request.model, &request.api_key, conversation)
                    .await
            }
            other => Err(ChatError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new()
    }
}
