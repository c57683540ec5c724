// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP error surface
//!
//! Every failure leaves the API as `{error, error_msg, details?}` with a
//! status code derived from the variant. Domain errors convert in via
//! `From`, so handlers can use `?` throughout.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chat::ChatError;
use crate::search::{KeywordSearchError, SearchError};

/// Uniform error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error type tag, e.g. `"InvalidQuery"`
    pub error: String,
    pub error_msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Request shape rejected before any work was done
    Validation(String),
    /// The orchestrator rejected the query itself
    InvalidQuery(String),
    /// The batch outlived the global deadline
    SearchTimeout {
        message: String,
        timeout_secs: u64,
        query: String,
    },
    /// Caller picked a provider this node does not proxy
    UnsupportedProvider(String),
    InvalidApiKey(String),
    RateLimited(String),
    /// An upstream API failed; its status is passed through
    Upstream { status: u16, message: String },
    ServiceUnavailable(String),
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidQuery(_)
            | ApiError::UnsupportedProvider(_) => StatusCode::BAD_REQUEST,
            ApiError::SearchTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ApiError::InvalidApiKey(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, error_msg, details) = match self {
            ApiError::Validation(msg) => ("ValidationError", msg.clone(), None),
            ApiError::InvalidQuery(msg) => ("InvalidQuery", msg.clone(), None),
            ApiError::SearchTimeout {
                message,
                timeout_secs,
                query,
            } => (
                "SearchTimeout",
                message.clone(),
                Some(serde_json::json!({
                    "timeout": timeout_secs,
                    "query": query,
                })),
            ),
            ApiError::UnsupportedProvider(msg) => ("UnsupportedProvider", msg.clone(), None),
            ApiError::InvalidApiKey(msg) => ("InvalidAPIKey", msg.clone(), None),
            ApiError::RateLimited(msg) => ("RateLimitExceeded", msg.clone(), None),
            ApiError::Upstream { message, .. } => ("UpstreamError", message.clone(), None),
            ApiError::ServiceUnavailable(msg) => ("ServiceUnavailable", msg.clone(), None),
            ApiError::Internal { message, detail } => (
                "InternalServerError",
                message.clone(),
                detail
                    .as_ref()
                    .map(|d| serde_json::json!({ "error": d })),
            ),
        };

        ErrorResponse {
            error: error.to_string(),
            error_msg,
            details,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        let message = e.to_string();
        match e {
            SearchError::InvalidQuery { reason } => ApiError::InvalidQuery(reason),
            SearchError::Timeout {
                timeout_secs,
                query,
            } => ApiError::SearchTimeout {
                message,
                timeout_secs,
                query,
            },
            // The orchestrator degrades init failures into outcomes; this
            // arm only fires if one escapes anyway
            SearchError::ResourceInit { message: detail } => ApiError::Internal {
                message: "An unexpected error occurred during search".to_string(),
                detail: Some(detail),
            },
        }
    }
}

impl From<KeywordSearchError> for ApiError {
    fn from(e: KeywordSearchError) -> Self {
        let message = e.to_string();
        match e {
            KeywordSearchError::InvalidApiKey => ApiError::InvalidApiKey(message),
            KeywordSearchError::RateLimited => ApiError::RateLimited(message),
            KeywordSearchError::Upstream { status, .. } => {
                ApiError::Upstream { status, message }
            }
            KeywordSearchError::Connection => ApiError::ServiceUnavailable(message),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        let message = e.to_string();
        match e {
            ChatError::UnsupportedProvider { .. } => ApiError::UnsupportedProvider(message),
            ChatError::InvalidApiKey => ApiError::InvalidApiKey(message),
            ChatError::RateLimited => ApiError::RateLimited(message),
            ChatError::Upstream => ApiError::ServiceUnavailable(message),
            ChatError::Provider { .. } => ApiError::Internal {
                message,
                detail: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_response().error_msg)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidQuery("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::SearchTimeout {
                message: "t".into(),
                timeout_secs: 30,
                query: "q".into()
            }
            .status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            ApiError::InvalidApiKey("k".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::RateLimited("r".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::ServiceUnavailable("s".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal {
                message: "m".into(),
                detail: None
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let err = ApiError::Upstream {
            status: 418,
            message: "teapot".into(),
        };
        assert_eq!(err.status_code().as_u16(), 418);

        let invalid = ApiError::Upstream {
            status: 0,
            message: "parse".into(),
        };
        assert_eq!(invalid.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_body_carries_details() {
        let err: ApiError = SearchError::Timeout {
            timeout_secs: 30,
            query: "rust".to_string(),
        }
        .into();

        let body = err.to_response();
        assert_eq!(body.error, "SearchTimeout");
        assert_eq!(body.error_msg, "Search operation timed out after 30s");
        let details = body.details.unwrap();
        assert_eq!(details["timeout"], 30);
        assert_eq!(details["query"], "rust");
    }

    #[test]
    fn test_invalid_query_conversion() {
        let err: ApiError = SearchError::invalid_query("Search query cannot be empty").into();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.to_response();
        assert_eq!(body.error, "InvalidQuery");
        assert_eq!(body.error_msg, "Search query cannot be empty");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_keyword_error_conversions() {
        let auth: ApiError = KeywordSearchError::InvalidApiKey.into();
        assert_eq!(auth.status_code(), StatusCode::UNAUTHORIZED);

        let rate: ApiError = KeywordSearchError::RateLimited.into();
        assert_eq!(rate.status_code(), StatusCode::TOO_MANY_REQUESTS);

        let conn: ApiError = KeywordSearchError::Connection.into();
        assert_eq!(conn.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let upstream: ApiError = KeywordSearchError::Upstream {
            status: 502,
            message: "broken".into(),
        }
        .into();
        assert_eq!(upstream.status_code().as_u16(), 502);
    }

    #[test]
    fn test_chat_error_conversions() {
        let unsupported: ApiError = ChatError::UnsupportedProvider {
            provider: "openai".into(),
        }
        .into();
        assert_eq!(unsupported.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            unsupported.to_response().error_msg,
            "Unsupported provider: openai"
        );

        let provider: ApiError = ChatError::Provider {
            provider: "gemini".into(),
            message: "boom".into(),
        }
        .into();
        assert_eq!(provider.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            provider.to_response().error_msg,
            "Error generating response from gemini: boom"
        );
    }

    #[test]
    fn test_error_body_serialization_skips_empty_details() {
        let body = ApiError::Validation("Query cannot be empty".into()).to_response();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "ValidationError");
        assert_eq!(json["error_msg"], "Query cannot be empty");
        assert!(json.get("details").is_none());
    }
}
