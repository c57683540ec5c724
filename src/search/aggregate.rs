// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch outcome classification
//!
//! Reduces the per-target outcomes of a completed batch into one
//! [`SearchOutcome`]. Pure counting: it never fails, and individual
//! failure reasons are logged rather than returned to the caller.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::types::{SearchOutcome, SearchStatus, TargetOutcome};

/// Round elapsed time to hundredths of a second for the outcome payload.
pub fn elapsed_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

pub struct ResultAggregator;

impl ResultAggregator {
    /// Classify a finished batch of `target_count` dispatched targets.
    ///
    /// Every target succeeded: `Success` with no errors. Some succeeded:
    /// `Partial` with a summary naming the m/k split. None succeeded:
    /// `Failed`. A batch with zero targets counts as trivially successful.
    pub fn aggregate(
        query: &str,
        target_count: usize,
        outcomes: Vec<TargetOutcome>,
        elapsed: Duration,
    ) -> SearchOutcome {
        let mut results = Vec::new();
        let mut failed = 0usize;

        for outcome in outcomes {
            match outcome {
                Ok(page) => results.push(page),
                Err(failure) => {
                    debug!(url = %failure.url, reason = %failure.reason, "target excluded from results");
                    failed += 1;
                }
            }
        }

        let succeeded = results.len();
        let mut errors = Vec::new();
        let status = if succeeded == target_count {
            SearchStatus::Success
        } else if succeeded > 0 {
            errors.push(format!(
                "Only {}/{} URLs crawled successfully",
                succeeded, target_count
            ));
            SearchStatus::Partial
        } else {
            errors.push("No results could be extracted from the provided URLs".to_string());
            SearchStatus::Failed
        };

        info!(
            query = %query,
            results = succeeded,
            failed,
            status = status.as_str(),
            "aggregated fetch batch"
        );

        SearchOutcome {
            query: query.to_string(),
            total_results: results.len(),
            results,
            status,
            processing_time: elapsed_secs(elapsed),
            errors,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::types::{FetchFailure, PageResult};

    fn page(url: &str) -> PageResult {
        PageResult {
            title: "A page".to_string(),
            url: url.to_string(),
            description: None,
            content: Some("text".to_string()),
            meta_keywords: None,
            links_count: 0,
            images_count: 0,
            crawl_timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_all_targets_succeeded() {
        let outcomes = vec![Ok(page("https://a.test")), Ok(page("https://b.test"))];
        let outcome =
            ResultAggregator::aggregate("rust", 2, outcomes, Duration::from_millis(1234));

        assert_eq!(outcome.status, SearchStatus::Success);
        assert_eq!(outcome.total_results, 2);
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.processing_time, 1.23);
    }

    #[test]
    fn test_partial_batch_names_the_split() {
        let outcomes = vec![
            Ok(page("https://a.test")),
            Err(FetchFailure::new("https://b.test", "HTTP 500")),
            Err(FetchFailure::new("https://c.test", "timed out")),
        ];
        let outcome = ResultAggregator::aggregate("rust", 3, outcomes, Duration::from_secs(2));

        assert_eq!(outcome.status, SearchStatus::Partial);
        assert_eq!(outcome.total_results, 1);
        assert_eq!(
            outcome.errors,
            vec!["Only 1/3 URLs crawled successfully".to_string()]
        );
    }

    #[test]
    fn test_fully_failed_batch() {
        let outcomes = vec![
            Err(FetchFailure::new("https://a.test", "HTTP 404")),
            Err(FetchFailure::new("https://b.test", "connection refused")),
        ];
        let outcome = ResultAggregator::aggregate("rust", 2, outcomes, Duration::from_secs(1));

        assert_eq!(outcome.status, SearchStatus::Failed);
        assert_eq!(outcome.total_results, 0);
        assert!(outcome.results.is_empty());
        assert_eq!(
            outcome.errors,
            vec!["No results could be extracted from the provided URLs".to_string()]
        );
    }

    #[test]
    fn test_zero_targets_is_trivial_success() {
        let outcome = ResultAggregator::aggregate("rust", 0, Vec::new(), Duration::ZERO);

        assert_eq!(outcome.status, SearchStatus::Success);
        assert_eq!(outcome.total_results, 0);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_results_keep_completion_order() {
        let outcomes = vec![
            Ok(page("https://third-submitted.test")),
            Ok(page("https://first-submitted.test")),
        ];
        let outcome = ResultAggregator::aggregate("rust", 2, outcomes, Duration::from_secs(1));

        assert_eq!(outcome.results[0].url, "https://third-submitted.test");
        assert_eq!(outcome.results[1].url, "https://first-submitted.test");
    }

    #[test]
    fn test_processing_time_rounds_to_hundredths() {
        assert_eq!(elapsed_secs(Duration::from_millis(1996)), 2.0);
        assert_eq!(elapsed_secs(Duration::from_millis(125)), 0.13);
        assert_eq!(elapsed_secs(Duration::ZERO), 0.0);
    }
}
