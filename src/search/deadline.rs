// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Global deadline enforcement for a fetch batch
//!
//! One timer covers the whole batch. When it fires, in-flight work is
//! cancelled through a [`CancellationToken`], awaited until it unwinds,
//! and every partial outcome is discarded in favor of a timeout error.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::error;

use super::error::SearchError;

pub struct DeadlineGuard {
    timeout: Duration,
}

impl DeadlineGuard {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Run `work` under the batch deadline.
    ///
    /// The closure receives a token it must watch at its suspension
    /// points. If the deadline fires first, the token is cancelled, the
    /// work is awaited so tasks release their resources, and the result
    /// is dropped. Timeout always wins over partial progress.
    pub async fn run<F, Fut, T>(&self, query: &str, work: F) -> Result<T, SearchError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
    {
        let cancel = CancellationToken::new();
        let work = work(cancel.clone());
        tokio::pin!(work);

        tokio::select! {
            result = &mut work => Ok(result),
            _ = tokio::time::sleep(self.timeout) => {
                error!(
                    query = %query,
                    timeout_secs = self.timeout_secs(),
                    "batch deadline exceeded, cancelling in-flight fetches"
                );
                cancel.cancel();
                // Let tasks unwind and release permits; outcomes are discarded
                work.await;
                Err(SearchError::Timeout {
                    timeout_secs: self.timeout_secs(),
                    query: query.to_string(),
                })
            }
        }
    }
}
