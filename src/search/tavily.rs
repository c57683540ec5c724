// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tavily keyword search client
//!
//! Thin client for the Tavily Search API. Callers bring their own API
//! key per request; nothing is stored server-side. Results are returned
//! both as structured entries and as a pre-rendered Markdown context
//! block suitable for prompt injection.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::error::KeywordSearchError;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// How deep Tavily should search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

/// One keyword search call
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordQuery {
    pub query: String,
    /// Tavily API key, supplied by the caller per request
    pub api_key: String,
    #[serde(default)]
    pub search_depth: SearchDepth,
    #[serde(default)]
    pub include_answer: bool,
}

/// One ranked result from the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSearchResponse {
    pub query: String,
    pub results: Vec<KeywordResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Markdown rendering of the answer and sources
    pub context: String,
}

pub struct TavilyClient {
    client: Client,
}

impl TavilyClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub async fn search(
        &self,
        request: &KeywordQuery,
    ) -> Result<KeywordSearchResponse, KeywordSearchError> {
        let payload = serde_json::json!({
            "api_key": request.api_key,
            "query": request.query,
            "search_depth": request.search_depth.as_str(),
            "include_answer": request.include_answer,
        });

        let response = self
            .client
            .post(TAVILY_API_URL)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "could not reach Tavily");
                KeywordSearchError::Connection
            })?;

        let status = response.status();

        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Tavily rejected the API key");
            return Err(KeywordSearchError::InvalidApiKey);
        }

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            warn!(body = %body, "Tavily rate limit reached");
            return Err(KeywordSearchError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), message = %message, "Tavily returned an error");
            return Err(KeywordSearchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let data: TavilyResponse =
            response
                .json()
                .await
                .map_err(|e| KeywordSearchError::Upstream {
                    status: 0,
                    message: format!("JSON parse error: {}", e),
                })?;

        Ok(build_response(&request.query, data))
    }
}

impl Default for TavilyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize the raw provider payload and render the Markdown context.
fn build_response(query: &str, data: TavilyResponse) -> KeywordSearchResponse {
    let mut context = format!("# Search Results for '{}'\n\n", query);

    if let Some(answer) = data.answer.as_deref().filter(|a| !a.is_empty()) {
        context.push_str(&format!("## Answer\n{}\n\n", answer));
    }

    context.push_str("## Sources\n");

    let results: Vec<KeywordResult> = data
        .results
        .into_iter()
        .map(|r| KeywordResult {
            title: r.title.unwrap_or_else(|| "No Title".to_string()),
            url: r.url.unwrap_or_else(|| "#".to_string()),
            content: r.content.unwrap_or_default(),
            score: r.score.unwrap_or(0.0),
        })
        .collect();

    for result in &results {
        context.push_str(&format!("### [{}]({})\n", result.title, result.url));
        context.push_str(&format!("{}\n\n", result.content));
    }

    KeywordSearchResponse {
        query: query.to_string(),
        results,
        answer: data.answer,
        context,
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    score: Option<f64>,
}
