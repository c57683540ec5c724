// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP-backed page-fetch engine
//!
//! Production `CrawlEngine` implementation: plain HTTP GET plus HTML
//! extraction. The reqwest client is created on `start` and dropped on
//! `stop`, so a stopped engine refuses fetches until restarted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::debug;

use super::config::SearchConfig;
use super::engine::{CrawlEngine, EngineError, PageContent};
use super::extract;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; WebSearchBot/1.0)";

pub struct HttpCrawlEngine {
    client: RwLock<Option<Client>>,
    request_timeout: Duration,
}

impl HttpCrawlEngine {
    /// Create a stopped engine. The per-request timeout matches the batch
    /// deadline, so a single slow page cannot outlive the batch.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: RwLock::new(None),
            request_timeout: config.batch_timeout(),
        }
    }
}

#[async_trait]
impl CrawlEngine for HttpCrawlEngine {
    async fn start(&self) -> Result<(), EngineError> {
        let mut guard = self.client.write().await;
        if guard.is_some() {
            debug!("HTTP crawl engine already started");
            return Ok(());
        }

        let client = Client::builder()
            .timeout(self.request_timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| EngineError::Startup(e.to_string()))?;

        *guard = Some(client);
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        self.client.write().await.take();
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<PageContent, EngineError> {
        let client = self
            .client
            .read()
            .await
            .clone()
            .ok_or(EngineError::NotStarted)?;

        debug!(url = %url, "fetching page");

        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Request(format!("timed out fetching {}", url))
            } else {
                EngineError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            // The load itself answered; report non-success in-band
            return Ok(PageContent::failed(format!("HTTP {}", status.as_u16())));
        }

        let html = response
            .text()
            .await
            .map_err(|e| EngineError::Request(e.to_string()))?;

        Ok(extract::extract_page(&html, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_before_start_is_rejected() {
        let engine = HttpCrawlEngine::new(&SearchConfig::default());

        let err = engine.fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, EngineError::NotStarted));
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let engine = HttpCrawlEngine::new(&SearchConfig::default());
        engine.start().await.unwrap();
        engine.start().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_clears_client() {
        let engine = HttpCrawlEngine::new(&SearchConfig::default());
        engine.start().await.unwrap();
        engine.stop().await.unwrap();

        let err = engine.fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, EngineError::NotStarted));
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let engine = HttpCrawlEngine::new(&SearchConfig::default());
        engine.start().await.unwrap();
        engine.stop().await.unwrap();
        engine.start().await.unwrap();

        assert!(engine.client.read().await.is_some());
    }
}
