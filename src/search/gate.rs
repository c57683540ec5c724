// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded concurrent dispatch of fetch tasks
//!
//! Runs one task per target behind a counting semaphore so at most N
//! fetches are in flight at once. Failures stay per-target: a failed or
//! panicked fetch never aborts its siblings. Outcomes are collected in
//! completion order, not input order.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::fetcher::PageFetcher;
use super::types::{CrawlTarget, FetchFailure, TargetOutcome};

pub struct ConcurrencyGate {
    limit: usize,
}

impl ConcurrencyGate {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Fetch every target with at most `limit` in flight.
    ///
    /// Each task watches `cancel` at its suspension points (while queued
    /// for a permit and during the fetch itself) and unwinds into a
    /// `FetchFailure` when the batch is cancelled.
    pub async fn run(
        &self,
        fetcher: Arc<PageFetcher>,
        targets: Vec<CrawlTarget>,
        cancel: CancellationToken,
    ) -> Vec<TargetOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut tasks = JoinSet::new();
        let mut urls_by_task: HashMap<tokio::task::Id, String> = HashMap::new();

        debug!(targets = targets.len(), limit = self.limit, "dispatching fetch batch");

        for target in targets {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&fetcher);
            let cancel = cancel.clone();
            let url = target.url;
            let task_url = url.clone();

            let handle = tasks.spawn(async move {
                let _permit = tokio::select! {
                    _ = cancel.cancelled() => {
                        return Err(FetchFailure::new(&url, "fetch cancelled while queued"));
                    }
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => {
                            return Err(FetchFailure::new(&url, "concurrency gate closed"));
                        }
                    },
                };

                tokio::select! {
                    _ = cancel.cancelled() => {
                        Err(FetchFailure::new(&url, "fetch cancelled"))
                    }
                    outcome = fetcher.fetch(&url) => outcome,
                }
            });
            urls_by_task.insert(handle.id(), task_url);
        }

        let mut outcomes = Vec::with_capacity(urls_by_task.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_id, outcome)) => outcomes.push(outcome),
                Err(join_err) => {
                    // A panicked task still yields an outcome for its URL
                    let url = urls_by_task
                        .get(&join_err.id())
                        .cloned()
                        .unwrap_or_default();
                    outcomes.push(Err(FetchFailure::new(
                        url,
                        format!("fetch task failed: {}", join_err),
                    )));
                }
            }
        }

        outcomes
    }
}
