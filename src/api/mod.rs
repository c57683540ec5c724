// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chat;
pub mod errors;
pub mod http_server;
pub mod middleware;
pub mod search;

pub use chat::chat_handler;
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
pub use search::{keyword_search_handler, search_handler, SearchApiRequest};
