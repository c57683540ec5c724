// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request logging middleware
//!
//! Tags each request with a short id, logs the method/path pair on the
//! way in and the status plus elapsed time on the way out, and stamps the
//! response with an `X-Process-Time` header in seconds.

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;
use uuid::Uuid;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4();

    info!("[{}] {} {}", request_id, method, path);

    let mut response = next.run(request).await;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        "[{}] {} {} - {} ({:.3}s)",
        request_id,
        method,
        path,
        response.status().as_u16(),
        elapsed
    );

    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    response
}
