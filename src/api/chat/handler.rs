// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API endpoint handler

use std::convert::Infallible;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{extract::State, Json};
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::chat::{ChatRequest, ChatResponse};

/// POST /api/chat - Proxy a chat completion to the model provider
///
/// With `stream: true` the response body is plain text, written chunk by
/// chunk as the provider produces tokens; otherwise a single JSON
/// `{response}` object.
///
/// # Errors
/// - 400 Bad Request: Missing fields or unsupported provider
/// - 401 Unauthorized: Provider rejected the API key
/// - 429 Too Many Requests: Provider quota exhausted
/// - 503 Service Unavailable: Provider unreachable
/// - 500 Internal Server Error: Provider failed mid-request
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    validate(&request)?;

    info!("Chat request [{}/{}]", request.provider, request.model);

    if request.stream {
        let receiver = state.chat.stream(&request).await?;

        // Mid-stream failures surface as trailing text, since the status
        // line is already gone
        let stream = ReceiverStream::new(receiver).map(|chunk| {
            Ok::<_, Infallible>(match chunk {
                Ok(text) => text,
                Err(e) => format!("Error: {}", e),
            })
        });

        Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            Body::from_stream(stream),
        )
            .into_response())
    } else {
        let response = state.chat.generate(&request).await?;
        Ok(Json(ChatResponse { response }).into_response())
    }
}

fn validate(request: &ChatRequest) -> Result<(), ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::Validation("query cannot be empty".to_string()));
    }
    if request.model.trim().is_empty() {
        return Err(ApiError::Validation("model cannot be empty".to_string()));
    }
    if request.api_key.trim().is_empty() {
        return Err(ApiError::Validation("api_key cannot be empty".to_string()));
    }
    Ok(())
}
