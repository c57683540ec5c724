// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Errors surfaced by the search orchestrator.
//!
//! Only `InvalidQuery` and `Timeout` cross the orchestrator boundary; a
//! failed engine start is recovered into a `Failed` outcome and per-URL
//! fetch failures are folded into the outcome's error list.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Caller-input defect; never retried
    #[error("{reason}")]
    InvalidQuery {
        /// Why the query was rejected
        reason: String,
    },

    /// The global batch deadline elapsed; no partial outcome is returned
    #[error("Search operation timed out after {timeout_secs}s")]
    Timeout {
        /// Configured deadline in seconds
        timeout_secs: u64,
        /// Query the batch was running for
        query: String,
    },

    /// The fetch engine failed to start
    #[error("Failed to initialize web crawler: {message}")]
    ResourceInit {
        /// Underlying startup error text
        message: String,
    },
}

impl SearchError {
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        SearchError::InvalidQuery {
            reason: reason.into(),
        }
    }
}

/// Errors from the keyword search provider.
///
/// Display strings double as the client-facing messages, so they stay
/// stable: the HTTP layer maps the variants onto status codes.
#[derive(Debug, Clone, Error)]
pub enum KeywordSearchError {
    #[error("Incorrect Tavily API Key provided. Please check your key and try again.")]
    InvalidApiKey,

    #[error("Tavily API rate limit exceeded. Please try again later or check your quota.")]
    RateLimited,

    /// The provider answered with an unexpected status
    #[error("Tavily Search failed: {message}")]
    Upstream {
        /// HTTP status from the provider, 0 when the body never parsed
        status: u16,
        message: String,
    },

    #[error("Failed to connect to Tavily search service.")]
    Connection,
}
