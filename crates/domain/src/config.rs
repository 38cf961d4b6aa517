//! Application configuration structures
//!
//! Plain serde structs; loading (environment variables, file probing) lives
//! in the infrastructure crate.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMPLETION_THRESHOLD, DEFAULT_SESSION_TTL_HOURS, REMINDER_POLL_INTERVAL_SECS,
};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "learnarc.db".to_string(), pool_size: 8 }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".to_string() }
    }
}

/// Progress bookkeeping settings
///
/// `completion_threshold` is the fraction of the reported duration at which
/// a video counts as completed. The product never settled between 0.90 and
/// 0.95; it is configurable with 0.90 as the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub completion_threshold: f64,
    pub reminder_poll_interval_secs: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            reminder_poll_interval_secs: REMINDER_POLL_INTERVAL_SECS,
        }
    }
}

/// Video catalog provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }
}

/// Text-generation provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

/// OAuth sign-in settings (single provider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorization_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            redirect_uri: "http://127.0.0.1:8080/auth/callback".to_string(),
            authorization_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }
}
