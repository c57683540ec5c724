// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server assembly
//!
//! `create_app` builds the full router against an [`AppState`] so tests
//! can drive it without a socket; `start_server` binds and serves it with
//! graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::response::IntoResponse;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::{error, info};

use crate::chat::ChatService;
use crate::config::Settings;
use crate::search::{SearchOrchestrator, TavilyClient};

use super::chat::chat_handler;
use super::middleware::log_requests;
use super::search::{keyword_search_handler, search_handler};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub orchestrator: Arc<SearchOrchestrator>,
    pub chat: Arc<ChatService>,
    pub tavily: Arc<TavilyClient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
}

pub fn create_app(state: AppState) -> Router {
    let cors = build_cors(&state.settings);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/search", post(search_handler))
        .route("/api/search/keyword", post(keyword_search_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = state.settings.bind_address().parse()?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials rule out wildcard methods/headers; mirror the request
    // instead, which is what "allow everything" means with cookies on
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.settings.app_name,
        "version": state.settings.app_version,
        "health": "/api/health",
    }))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.to_string(),
    })
}
