// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Web search and chat backend.
//!
//! The crate exposes two search paths over HTTP: a crawler-backed path
//! that fetches caller-supplied URLs under a concurrency cap and a global
//! deadline, and a keyword path proxied to the Tavily API. A chat service
//! relays conversations to Gemini with optional streaming.

pub mod api;
pub mod chat;
pub mod config;
pub mod search;

pub use api::{create_app, start_server, ApiError, AppState};
pub use chat::{ChatRequest, ChatResponse, ChatService};
pub use config::Settings;
pub use search::{
    HttpCrawlEngine, SearchConfig, SearchOrchestrator, SearchOutcome, TavilyClient,
};
