// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API request types

use serde::{Deserialize, Serialize};
use url::Url;

/// Request body for POST /api/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchApiRequest {
    /// Search query string (required, max 500 chars)
    pub query: String,

    /// URLs to crawl (1-50, absolute http/https)
    pub urls: Vec<String>,

    /// Cap on how many of the URLs are fetched (1-50, default from config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl SearchApiRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Query cannot be empty".to_string());
        }
        if self.query.len() > 500 {
            return Err("Query too long (max 500 characters)".to_string());
        }
        if self.urls.is_empty() {
            return Err("At least one URL is required".to_string());
        }
        if self.urls.len() > 50 {
            return Err("Too many URLs (max 50)".to_string());
        }
        for url in &self.urls {
            if !is_absolute_http_url(url) {
                return Err(format!("Invalid URL: {}", url));
            }
        }
        if let Some(max_results) = self.max_results {
            if max_results < 1 {
                return Err("max_results must be at least 1".to_string());
            }
            if max_results > 50 {
                return Err("max_results cannot exceed 50".to_string());
            }
        }
        Ok(())
    }
}

fn is_absolute_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
