//! Configuration management for the auth service
//!
//! Settings come from environment variables, with a `.env` file loaded in
//! development builds. The host process loads settings once at startup and
//! hands the relevant sections to the components that need them; in
//! particular the token signing secret is read here exactly once and is
//! immutable afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub token: TokenSettings,
    pub email: EmailSettings,
}

impl Settings {
    /// Load settings from environment variables (and `.env` in development).
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            database: DatabaseSettings::from_env()?,
            token: TokenSettings::from_env()?,
            email: EmailSettings::from_env()?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("Invalid DATABASE_MIN_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
        })
    }
}

/// Bearer-token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Process-wide signing secret. Rotating it invalidates every
    /// outstanding token implicitly.
    pub secret: String,
    pub validity_days: i64,
}

impl TokenSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set")?,
            validity_days: env::var("TOKEN_VALIDITY_DAYS")
                .unwrap_or_else(|_| "90".to_string())
                .parse()
                .context("Invalid TOKEN_VALIDITY_DAYS")?,
        })
    }
}

/// Email (SMTP) settings for the forgot-password notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub use_starttls: bool,
}

impl EmailSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "no-reply@theknow.dev".to_string()),
            use_starttls: env::var("SMTP_USE_STARTTLS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}
