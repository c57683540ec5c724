// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the batch acquisition core

use std::env;
use std::time::Duration;

/// Configuration for batch web-page acquisition
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Upper bound on simultaneous in-flight fetches (default: 5)
    pub max_concurrent_fetches: usize,
    /// Seconds before the whole batch is cancelled (default: 30)
    pub global_batch_timeout_secs: u64,
    /// Truncation length for extracted page content (default: 5000)
    pub max_content_length: usize,
    /// URL cap applied when the caller omits `max_results` (default: 10)
    pub default_max_results: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            max_concurrent_fetches: env::var("WEB_SEARCH_MAX_CONCURRENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            global_batch_timeout_secs: env::var("WEB_SEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_content_length: env::var("WEB_SEARCH_MAX_CONTENT_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            default_max_results: env::var("WEB_SEARCH_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_fetches == 0 {
            return Err("max_concurrent_fetches must be at least 1".to_string());
        }
        if self.global_batch_timeout_secs == 0 {
            return Err("global_batch_timeout_secs must be at least 1".to_string());
        }
        if self.max_content_length < 100 {
            return Err("max_content_length must be at least 100".to_string());
        }
        if self.default_max_results == 0 || self.default_max_results > 50 {
            return Err("default_max_results must be between 1 and 50".to_string());
        }
        Ok(())
    }

    /// The global batch deadline as a `Duration`
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.global_batch_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 5,
            global_batch_timeout_secs: 30,
            max_content_length: 5000,
            default_max_results: 10,
        }
    }
}
