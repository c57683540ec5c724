// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page-fetch engine trait definition
//!
//! The acquisition core consumes this capability; it never implements page
//! loading itself. `CrawlerResource` wraps the lifecycle hooks, and once
//! started the engine must be safe for concurrent `fetch` calls.

use async_trait::async_trait;
use thiserror::Error;

/// Raw content bundle produced by one page load
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Whether the load itself succeeded
    pub success: bool,
    /// Engine-supplied error text when `success` is false
    pub error_message: Option<String>,
    /// Page title metadata
    pub title: Option<String>,
    /// Meta description
    pub description: Option<String>,
    /// Raw comma-separated meta keywords
    pub keywords: Option<String>,
    /// Rendered page text
    pub content: Option<String>,
    /// Links pointing within the page's own host
    pub internal_links: usize,
    /// Links pointing to other hosts
    pub external_links: usize,
    /// Number of images on the page
    pub images: usize,
}

impl PageContent {
    /// An unsuccessful load carrying only the engine's error text
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }
}

/// Errors raised by a page-fetch engine
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Engine startup failed; the resource stays uninitialized
    #[error("engine startup failed: {0}")]
    Startup(String),

    /// `fetch` was called while the engine is not running
    #[error("engine not started")]
    NotStarted,

    /// The page request itself failed (connect, timeout, protocol)
    #[error("request failed: {0}")]
    Request(String),
}

/// A page loading/extraction engine.
///
/// `start`/`stop` are the lifecycle hooks `CrawlerResource` serializes;
/// `fetch` may be called concurrently once the engine is running.
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    /// Start the engine and allocate its connections
    async fn start(&self) -> Result<(), EngineError>;

    /// Stop the engine and release its connections
    async fn stop(&self) -> Result<(), EngineError>;

    /// Load one page and return its raw content bundle.
    ///
    /// A page that loads but reports failure comes back as
    /// `Ok(PageContent { success: false, .. })`; transport-level problems
    /// come back as `Err(EngineError)`.
    async fn fetch(&self, url: &str) -> Result<PageContent, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine;

    #[async_trait]
    impl CrawlEngine for FixedEngine {
        async fn start(&self) -> Result<(), EngineError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), EngineError> {
            Ok(())
        }

        async fn fetch(&self, url: &str) -> Result<PageContent, EngineError> {
            Ok(PageContent {
                success: true,
                title: Some(format!("Page at {}", url)),
                content: Some("body text".to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_engine_trait_object_fetch() {
        let engine: Box<dyn CrawlEngine> = Box::new(FixedEngine);
        engine.start().await.unwrap();

        let page = engine.fetch("https://example.com").await.unwrap();
        assert!(page.success);
        assert!(page.title.unwrap().contains("example.com"));

        engine.stop().await.unwrap();
    }

    #[test]
    fn test_failed_page_content() {
        let page = PageContent::failed("HTTP 404");
        assert!(!page.success);
        assert_eq!(page.error_message.as_deref(), Some("HTTP 404"));
        assert!(page.title.is_none());
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::Startup("no browser binary".to_string());
        assert!(err.to_string().contains("no browser binary"));

        assert_eq!(EngineError::NotStarted.to_string(), "engine not started");
    }
}
