// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lazy lifecycle management for the shared fetch engine
//!
//! One `CrawlerResource` is shared by every request in the process. The
//! engine starts on first use, stays up across requests, and is torn down
//! at service shutdown. State transitions are serialized through a single
//! lock; fetches through the ready engine need no extra locking.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::engine::CrawlEngine;
use super::error::SearchError;

/// Lifecycle state of the shared engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Uninitialized,
    Ready,
    Closed,
}

pub struct CrawlerResource {
    engine: Arc<dyn CrawlEngine>,
    state: RwLock<ResourceState>,
}

impl CrawlerResource {
    pub fn new(engine: Arc<dyn CrawlEngine>) -> Self {
        Self {
            engine,
            state: RwLock::new(ResourceState::Uninitialized),
        }
    }

    /// Start the engine if it is not already running.
    ///
    /// Idempotent. Racing callers serialize on the write lock and re-check
    /// state before starting, so the engine starts at most once. A `Closed`
    /// resource may be reopened. On startup failure the state is left
    /// untouched and a later call may retry.
    pub async fn ensure_ready(&self) -> Result<(), SearchError> {
        if *self.state.read().await == ResourceState::Ready {
            return Ok(());
        }

        let mut state = self.state.write().await;
        // Re-check: another caller may have initialized while we waited
        if *state == ResourceState::Ready {
            return Ok(());
        }

        info!("Initializing web crawler engine");
        match self.engine.start().await {
            Ok(()) => {
                *state = ResourceState::Ready;
                info!("Web crawler engine ready");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize web crawler engine");
                Err(SearchError::ResourceInit {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Stop the engine if it is running.
    ///
    /// Idempotent; calling on an `Uninitialized` or `Closed` resource is a
    /// no-op. Teardown errors are logged, not propagated, and the resource
    /// still transitions to `Closed`.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        if *state != ResourceState::Ready {
            return;
        }

        if let Err(e) = self.engine.stop().await {
            warn!(error = %e, "Error during crawler engine teardown");
        }
        *state = ResourceState::Closed;
        info!("Web crawler engine closed");
    }

    /// The running engine, or `None` while not `Ready`
    pub async fn engine(&self) -> Option<Arc<dyn CrawlEngine>> {
        if *self.state.read().await == ResourceState::Ready {
            Some(Arc::clone(&self.engine))
        } else {
            None
        }
    }

    pub async fn state(&self) -> ResourceState {
        *self.state.read().await
    }
}
