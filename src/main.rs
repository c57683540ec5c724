// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::{env, sync::Arc};
use websearch_node::{
    api::{start_server, AppState},
    chat::ChatService,
    config::Settings,
    search::{HttpCrawlEngine, SearchConfig, SearchOrchestrator, TavilyClient},
};

/// Web search and chat backend
#[derive(Parser, Debug)]
#[command(name = "websearch-node")]
#[command(version)]
#[command(about = "HTTP backend for crawler and keyword web search", long_about = None)]
struct Args {
    /// Bind address, overrides the HOST environment variable
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides the PORT environment variable
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // .env must be loaded before any settings are read
    dotenv::dotenv().ok();

    let mut settings = Settings::from_env();
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid settings: {}", e))?;

    // RUST_LOG wins over the configured log level when both are set
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", &settings.log_level);
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!(
        "🚀 Starting {} v{}...",
        settings.app_name, settings.app_version
    );
    println!("   Environment: {}", settings.environment);
    println!("   Debug: {}", settings.debug);

    let search_config = SearchConfig::from_env();
    search_config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid search config: {}", e))?;
    println!(
        "   Crawler: {} concurrent fetches, {}s timeout",
        search_config.max_concurrent_fetches, search_config.global_batch_timeout_secs
    );

    let engine = Arc::new(HttpCrawlEngine::new(&search_config));
    let orchestrator = Arc::new(SearchOrchestrator::new(search_config, engine));

    // Warm the crawler so the first request does not pay the startup cost.
    // A failure here is not fatal; ensure_ready retries on the next search.
    println!("🔍 Initializing web crawler...");
    match orchestrator.initialize().await {
        Ok(()) => println!("✅ Web crawler ready"),
        Err(e) => {
            println!("⚠️  Crawler warm-up failed: {}", e);
            println!("   Initialization will be retried on the first search");
        }
    }

    let bind = settings.bind_address();
    let state = AppState {
        settings: Arc::new(settings),
        orchestrator: orchestrator.clone(),
        chat: Arc::new(ChatService::new()),
        tavily: Arc::new(TavilyClient::new()),
    };

    println!("\nAPI Endpoints:");
    println!("  Health:         GET  http://{}/api/health", bind);
    println!("  Crawler search: POST http://{}/api/search", bind);
    println!("  Keyword search: POST http://{}/api/search/keyword", bind);
    println!("  Chat:           POST http://{}/api/chat", bind);
    println!("\nPress Ctrl+C to shutdown...\n");

    start_server(state)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    println!("\n⏹️  Shutting down...");
    orchestrator.shutdown().await;

    println!("👋 Goodbye!");
    Ok(())
}
