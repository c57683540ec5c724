// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-URL fetch and normalization
//!
//! Loads one page through the shared resource and reduces the engine's raw
//! bundle to a `PageResult`. Every way a fetch can go wrong — engine not
//! ready, unsuccessful load, transport error — is folded into the same
//! `FetchFailure` tag so the orchestrator treats them uniformly.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::extract::truncate_content;
use super::resource::CrawlerResource;
use super::types::{FetchFailure, PageResult, TargetOutcome};

pub struct PageFetcher {
    resource: Arc<CrawlerResource>,
    max_content_length: usize,
}

impl PageFetcher {
    pub fn new(resource: Arc<CrawlerResource>, max_content_length: usize) -> Self {
        Self {
            resource,
            max_content_length,
        }
    }

    /// Fetch one URL and normalize the result.
    ///
    /// Network I/O only; never mutates shared state.
    pub async fn fetch(&self, url: &str) -> TargetOutcome {
        let engine = match self.resource.engine().await {
            Some(engine) => engine,
            None => return Err(self.failure(url, "crawler resource is not ready")),
        };

        debug!(url = %url, "crawling url");

        let page = match engine.fetch(url).await {
            Ok(page) => page,
            Err(e) => return Err(self.failure(url, e.to_string())),
        };

        if !page.success {
            let reason = page
                .error_message
                .unwrap_or_else(|| "page load failed".to_string());
            return Err(self.failure(url, reason));
        }

        let meta_keywords = page.keywords.as_deref().and_then(parse_keywords);

        let result = PageResult {
            title: page.title.unwrap_or_else(|| "No title".to_string()),
            url: url.to_string(),
            description: page.description,
            content: page
                .content
                .map(|c| truncate_content(&c, self.max_content_length)),
            meta_keywords,
            links_count: page.internal_links + page.external_links,
            images_count: page.images,
            crawl_timestamp: Utc::now(),
        };

        debug!(url = %url, "successfully crawled url");
        Ok(result)
    }

    fn failure(&self, url: &str, reason: impl Into<String>) -> FetchFailure {
        let failure = FetchFailure::new(url, reason);
        warn!(url = %failure.url, reason = %failure.reason, "page fetch failed");
        failure
    }
}

/// Split raw meta keywords on commas, trimming entries and dropping blanks
fn parse_keywords(raw: &str) -> Option<Vec<String>> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(|kw| kw.trim().to_string())
        .filter(|kw| !kw.is_empty())
        .collect();

    if keywords.is_empty() {
        None
    } else {
        Some(keywords)
    }
}
