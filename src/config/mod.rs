//! Configuration module for the storefront.
//!
//! Runtime settings come from environment variables with sensible defaults.
//! The dealer's phone number and passcode are fixed at build time.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Outbound WhatsApp number for enquiries.
pub const DEALER_PHONE: &str = match option_env!("KBJ_DEALER_PHONE") {
    Some(phone) => phone,
    None => "2348079387611",
};

/// Shared dealer passcode. Shipped inside the build, so it is not a secret.
pub const DEALER_PASSCODE: &str = match option_env!("KBJ_DEALER_PASSCODE") {
    Some(code) => code,
    None => "2026",
};

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted backend; `None` selects the local SQLite + disk backend
    pub supabase: Option<SupabaseConfig>,
    /// Listing table name
    pub table: String,
    /// Photo bucket name
    pub bucket: String,
    /// Path to the local SQLite database file
    pub db_path: PathBuf,
    /// Directory backing the local photo bucket
    pub media_dir: PathBuf,
    /// Prefix for public URLs of locally stored photos
    pub public_base_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Optional "verifying" pause on login
    pub verify_delay: Duration,
    /// Sessions idle longer than this are dropped
    pub session_idle: Duration,
    /// Upper bound on live sessions
    pub max_sessions: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let supabase = match (lookup("KBJ_SUPABASE_URL"), lookup("KBJ_SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                key,
            }),
            (Some(_), None) => {
                return Err(AppError::Config(
                    "KBJ_SUPABASE_KEY is required when KBJ_SUPABASE_URL is set".to_string(),
                ))
            }
            _ => None,
        };

        let bind_addr = var("KBJ_BIND_ADDR", "127.0.0.1:8080")
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid KBJ_BIND_ADDR: {}", e)))?;

        let verify_delay_ms: u64 = var("KBJ_VERIFY_DELAY_MS", "0")
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid KBJ_VERIFY_DELAY_MS: {}", e)))?;

        let session_idle_secs: u64 = var("KBJ_SESSION_IDLE_SECS", "43200")
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid KBJ_SESSION_IDLE_SECS: {}", e)))?;

        let max_sessions: usize = var("KBJ_MAX_SESSIONS", "10000")
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid KBJ_MAX_SESSIONS: {}", e)))?;

        Ok(Self {
            supabase,
            table: var("KBJ_TABLE", "cars"),
            bucket: var("KBJ_BUCKET", "car-images"),
            db_path: var("KBJ_DB_PATH", "./data/kbj.sqlite").into(),
            media_dir: var("KBJ_MEDIA_DIR", "./data/media").into(),
            public_base_url: var("KBJ_PUBLIC_BASE_URL", "")
                .trim_end_matches('/')
                .to_string(),
            bind_addr,
            log_level: var("KBJ_LOG_LEVEL", "info"),
            verify_delay: Duration::from_millis(verify_delay_ms),
            session_idle: Duration::from_secs(session_idle_secs),
            max_sessions,
        })
    }
}
