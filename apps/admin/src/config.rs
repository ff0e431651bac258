use anyhow::{Context, Result};

const DEFAULT_SESSION_FILE: &str = ".portfolio-admin-session.json";

/// Admin client configuration loaded from environment variables.
/// Resolved once at startup; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub session_file: String,
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: normalize_base_url(&require_env("API_URL")?),
            admin_username: require_env("ADMIN_USERNAME")?,
            admin_password: require_env("ADMIN_PASSWORD")?,
            session_file: std::env::var("ADMIN_SESSION_FILE")
                .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Endpoint paths are appended with a leading `/`, so the base must not end in one.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
