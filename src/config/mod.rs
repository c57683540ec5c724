// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Application settings
//!
//! Loaded from environment variables with sensible development defaults.
//! The crate version is always taken from Cargo, never from the
//! environment.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Deployment environment the server believes it is running in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// Comma-separated CORS origins; use `cors_origins()` for the parsed list
    pub allowed_origins: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "websearch-node".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            debug: true,
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: "http://localhost:3000,http://localhost:8000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            app_version: defaults.app_version,
            environment: env::var("ENVIRONMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.environment),
            debug: env::var("DEBUG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.debug),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            allowed_origins: env::var("ALLOWED_ORIGINS").unwrap_or(defaults.allowed_origins),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cors_origins().is_empty() {
            return Err("allowed_origins cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be nonzero".to_string());
        }
        Ok(())
    }

    /// Parsed CORS origins, trimmed with empty entries dropped
    pub fn cors_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
