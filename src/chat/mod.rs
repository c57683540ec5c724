// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat completion proxy
//!
//! Forwards chat requests to a model provider with the caller's own API
//! key. Gemini is the only wired provider; requests naming anything else
//! are rejected up front.

pub mod gemini;
pub mod service;
pub mod types;

pub use gemini::GeminiClient;
pub use service::ChatService;
pub use types::{ChatError, ChatMessage, ChatRequest, ChatResponse, ChatRole};
