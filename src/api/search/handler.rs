// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API endpoint handlers

use axum::{extract::State, Json};
use tracing::{info, warn};

use super::request::SearchApiRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::search::{KeywordQuery, KeywordSearchResponse, SearchOutcome};

/// POST /api/search - Crawl the given URLs and extract their content
///
/// # Errors
/// - 400 Bad Request: Invalid query or parameters
/// - 408 Request Timeout: Batch exceeded the global deadline
/// - 500 Internal Server Error: Search failed
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchApiRequest>,
) -> Result<Json<SearchOutcome>, ApiError> {
    if let Err(e) = request.validate() {
        warn!("Search validation failed: {}", e);
        return Err(ApiError::Validation(e));
    }

    info!(
        "Received search request: query='{}', urls={}",
        request.query,
        request.urls.len()
    );

    let outcome = state
        .orchestrator
        .search(&request.query, &request.urls, request.max_results)
        .await?;

    Ok(Json(outcome))
}

/// POST /api/search/keyword - Keyword search via the Tavily API
///
/// # Errors
/// - 400 Bad Request: Missing query or API key
/// - 401 Unauthorized: Provider rejected the API key
/// - 429 Too Many Requests: Provider rate limit hit
/// - 503 Service Unavailable: Provider unreachable
pub async fn keyword_search_handler(
    State(state): State<AppState>,
    Json(request): Json<KeywordQuery>,
) -> Result<Json<KeywordSearchResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::Validation("Query cannot be empty".to_string()));
    }
    if request.api_key.trim().is_empty() {
        return Err(ApiError::Validation("api_key cannot be empty".to_string()));
    }

    info!("Received keyword search request: query='{}'", request.query);

    let response = state.tavily.search(&request).await?;
    Ok(Json(response))
}
