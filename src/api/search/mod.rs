// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search API endpoints
//!
//! `/api/search` drives the crawler pipeline over caller-supplied URLs;
//! `/api/search/keyword` proxies the query to Tavily.

pub mod handler;
pub mod request;

pub use handler::{keyword_search_handler, search_handler};
pub use request::SearchApiRequest;
