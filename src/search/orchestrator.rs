// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search pipeline orchestration
//!
//! Owns the crawler resource and drives a query through validation,
//! target capping, bounded concurrent fetching under the batch deadline,
//! and final aggregation. Only invalid queries and batch timeouts leave
//! this layer as errors; everything else is folded into the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, warn};

use super::aggregate::{elapsed_secs, ResultAggregator};
use super::config::SearchConfig;
use super::deadline::DeadlineGuard;
use super::engine::CrawlEngine;
use super::error::SearchError;
use super::fetcher::PageFetcher;
use super::gate::ConcurrencyGate;
use super::resource::CrawlerResource;
use super::types::{CrawlTarget, SearchOutcome, SearchStatus};

pub struct SearchOrchestrator {
    config: SearchConfig,
    resource: Arc<CrawlerResource>,
    fetcher: Arc<PageFetcher>,
    gate: ConcurrencyGate,
    deadline: DeadlineGuard,
}

impl SearchOrchestrator {
    pub fn new(config: SearchConfig, engine: Arc<dyn CrawlEngine>) -> Self {
        let resource = Arc::new(CrawlerResource::new(engine));
        let fetcher = Arc::new(PageFetcher::new(
            Arc::clone(&resource),
            config.max_content_length,
        ));
        let gate = ConcurrencyGate::new(config.max_concurrent_fetches);
        let deadline = DeadlineGuard::new(config.batch_timeout());

        Self {
            config,
            resource,
            fetcher,
            gate,
            deadline,
        }
    }

    /// Bring the crawler up before the first request. Idempotent; later
    /// calls are no-ops while the resource stays ready.
    pub async fn initialize(&self) -> Result<(), SearchError> {
        self.resource.ensure_ready().await?;
        info!("web crawler initialized and ready");
        Ok(())
    }

    /// Fetch and extract the given URLs for `query`.
    ///
    /// URLs beyond `max_results` (or the configured default; zero counts
    /// as unset) are dropped without being fetched. Fails only for an
    /// empty query or a batch that outlives the global deadline; per-URL
    /// failures and crawler startup problems degrade into the returned
    /// outcome instead.
    pub async fn search(
        &self,
        query: &str,
        urls: &[String],
        max_results: Option<usize>,
    ) -> Result<SearchOutcome, SearchError> {
        let started = Instant::now();

        if query.trim().is_empty() {
            return Err(SearchError::invalid_query("Search query cannot be empty"));
        }

        if urls.is_empty() {
            warn!(query = %query, "no URLs provided");
            return Ok(SearchOutcome::empty(query));
        }

        let cap = max_results
            .filter(|&n| n > 0)
            .unwrap_or(self.config.default_max_results);
        let targets = CrawlTarget::from_urls(urls, cap);
        let target_count = targets.len();

        info!(query = %query, targets = target_count, "starting search");

        if let Err(init_err) = self.resource.ensure_ready().await {
            error!(error = %init_err, "search aborted before any fetch was dispatched");
            return Ok(Self::failed_outcome(
                query,
                format!("Unexpected error during search: {}", init_err),
                started.elapsed(),
            ));
        }

        let fetcher = Arc::clone(&self.fetcher);
        let outcomes = self
            .deadline
            .run(query, move |cancel| self.gate.run(fetcher, targets, cancel))
            .await?;

        Ok(ResultAggregator::aggregate(
            query,
            target_count,
            outcomes,
            started.elapsed(),
        ))
    }

    /// Release the crawler. Idempotent; a later `search` reinitializes it.
    pub async fn shutdown(&self) {
        self.resource.shutdown().await;
    }

    fn failed_outcome(query: &str, message: String, elapsed: Duration) -> SearchOutcome {
        SearchOutcome {
            query: query.to_string(),
            results: Vec::new(),
            total_results: 0,
            status: SearchStatus::Failed,
            processing_time: elapsed_secs(elapsed),
            errors: vec![message],
            timestamp: Utc::now(),
        }
    }
}
