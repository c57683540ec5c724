// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for batch web-page acquisition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a completed search batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// Every target produced a result (including the zero-target case)
    Success,
    /// Some targets produced results, some failed
    Partial,
    /// No target produced a result
    Failed,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Success => "success",
            SearchStatus::Partial => "partial",
            SearchStatus::Failed => "failed",
        }
    }
}

/// One URL queued for fetching, taken verbatim from the caller's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Absolute URL to fetch
    pub url: String,
}

impl CrawlTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build the target list for a batch: the first `cap` URLs in caller
    /// order. Entries beyond the cap are dropped and never fetched.
    pub fn from_urls(urls: &[String], cap: usize) -> Vec<CrawlTarget> {
        urls.iter().take(cap).map(CrawlTarget::new).collect()
    }
}

/// Normalized snapshot of one successfully fetched page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// Page title ("No title" when the page has none)
    pub title: String,
    /// Source URL the content was fetched from
    pub url: String,
    /// Meta description, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extracted main content, truncated to the configured maximum length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Meta keywords split on commas and trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<Vec<String>>,
    /// Number of links on the page (internal + external)
    pub links_count: usize,
    /// Number of images on the page
    pub images_count: usize,
    /// When the page was crawled (UTC)
    pub crawl_timestamp: DateTime<Utc>,
}

/// Why one URL's fetch did not produce a `PageResult`.
///
/// Never surfaced to the caller as an error; always folded into the
/// outcome's `errors`/`status` by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// The offending URL
    pub url: String,
    /// Human-readable reason
    pub reason: String,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

/// Per-target outcome collected by the concurrency gate
pub type TargetOutcome = Result<PageResult, FetchFailure>;

/// The aggregate, classified result of a full batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Original search query
    pub query: String,
    /// Successful page results, in completion order
    pub results: Vec<PageResult>,
    /// Number of entries in `results`
    pub total_results: usize,
    /// Overall batch classification
    pub status: SearchStatus,
    /// Seconds elapsed for the whole batch
    pub processing_time: f64,
    /// Human-readable failure summaries
    pub errors: Vec<String>,
    /// When the outcome was produced (UTC)
    pub timestamp: DateTime<Utc>,
}

impl SearchOutcome {
    /// The trivial outcome for a batch with no targets: immediate success,
    /// nothing fetched.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            total_results: 0,
            status: SearchStatus::Success,
            processing_time: 0.0,
            errors: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(url: &str) -> PageResult {
        PageResult {
            title: "Example".to_string(),
            url: url.to_string(),
            description: Some("An example page".to_string()),
            content: Some("Main content".to_string()),
            meta_keywords: Some(vec!["example".to_string(), "page".to_string()]),
            links_count: 10,
            images_count: 5,
            crawl_timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SearchStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&SearchStatus::Partial).unwrap(),
            "\"partial\""
        );
        assert_eq!(
            serde_json::to_string(&SearchStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(SearchStatus::Partial.as_str(), "partial");
    }

    #[test]
    fn test_targets_truncated_in_order() {
        let urls: Vec<String> = (0..10).map(|i| format!("https://site{}.test", i)).collect();
        let targets = CrawlTarget::from_urls(&urls, 3);

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].url, "https://site0.test");
        assert_eq!(targets[2].url, "https://site2.test");
    }

    #[test]
    fn test_targets_cap_larger_than_list() {
        let urls = vec!["https://a.test".to_string()];
        let targets = CrawlTarget::from_urls(&urls, 50);
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn test_page_result_serialization_skips_absent_fields() {
        let mut result = sample_result("https://example.com");
        result.description = None;
        result.meta_keywords = None;

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("meta_keywords"));
        assert!(json.contains("links_count"));
    }

    #[test]
    fn test_fetch_failure_display() {
        let failure = FetchFailure::new("https://a.test", "connection refused");
        assert_eq!(failure.to_string(), "https://a.test: connection refused");
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = SearchOutcome::empty("rust tutorials");

        assert_eq!(outcome.query, "rust tutorials");
        assert_eq!(outcome.status, SearchStatus::Success);
        assert_eq!(outcome.total_results, 0);
        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.processing_time, 0.0);
    }

    #[test]
    fn test_outcome_round_trip() {
        let outcome = SearchOutcome {
            query: "python tutorials".to_string(),
            results: vec![sample_result("https://a.test")],
            total_results: 1,
            status: SearchStatus::Partial,
            processing_time: 2.51,
            errors: vec!["Only 1/2 URLs crawled successfully".to_string()],
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&outcome).unwrap();
        let back: SearchOutcome = serde_json::from_str(&json).unwrap();

        assert_eq!(back.status, SearchStatus::Partial);
        assert_eq!(back.total_results, 1);
        assert_eq!(back.errors.len(), 1);
    }
}
