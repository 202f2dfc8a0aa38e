//! Configuration module for the date backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use rand::{distributions::Alphanumeric, Rng};

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC secret used to sign session tokens
    pub jwt_secret: String,
    /// Whether `jwt_secret` was generated because none was configured
    pub jwt_secret_generated: bool,
    /// Lifetime of issued tokens, in hours
    pub token_ttl_hours: i64,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let (jwt_secret, jwt_secret_generated) = match env::var("DATE_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => (secret, false),
            _ => (random_secret(), true),
        };

        let token_ttl_hours = env::var("DATE_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or_else(|| {
                AppError::Config("DATE_TOKEN_TTL_HOURS must be a positive integer".to_string())
            })?;

        let db_path = env::var("DATE_DB_PATH")
            .unwrap_or_else(|_| "./data/date.sqlite".to_string())
            .into();

        let bind_addr = env::var("DATE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid DATE_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("DATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            jwt_secret,
            jwt_secret_generated,
            token_ttl_hours,
            db_path,
            bind_addr,
            log_level,
        })
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
