// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API endpoint
//!
//! Provides the `/api/chat` HTTP endpoint for proxied chat completions.

pub mod handler;

pub use handler::chat_handler;
