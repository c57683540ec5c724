// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search subsystem
//!
//! Two independent search paths live here:
//! - Crawler search: caller supplies the URLs, we fetch them concurrently
//!   under a global deadline and extract page content
//!   (`SearchOrchestrator`)
//! - Keyword search: the query is forwarded to the Tavily API with the
//!   caller's own key (`TavilyClient`)
//!
//! The crawler path is built from small pieces: `CrawlerResource` guards
//! engine lifecycle, `PageFetcher` normalizes single pages,
//! `ConcurrencyGate` bounds parallelism, `DeadlineGuard` enforces the
//! batch timeout and `ResultAggregator` classifies the outcome.

pub mod aggregate;
pub mod config;
pub mod deadline;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod gate;
pub mod http_engine;
pub mod orchestrator;
pub mod resource;
pub mod tavily;
pub mod types;

// Re-export commonly used types
pub use config::SearchConfig;
pub use engine::{CrawlEngine, EngineError, PageContent};
pub use error::{KeywordSearchError, SearchError};
pub use http_engine::HttpCrawlEngine;
pub use orchestrator::SearchOrchestrator;
pub use tavily::{KeywordQuery, KeywordSearchResponse, TavilyClient};
pub use types::{FetchFailure, PageResult, SearchOutcome, SearchStatus};
