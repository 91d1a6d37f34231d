use serde::Deserialize;

use crate::errors::ConsoleError;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:9400";
pub const DEFAULT_LOG_LINES: usize = 20;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the Iamus backend. Each session starts with this and may change it.
    pub server_url: String,
    /// Port the web console binds to.
    pub port: u16,
    /// Number of lines the per-session console log keeps.
    pub log_lines: usize,
    /// Total timeout for a single backend request, in seconds.
    pub request_timeout_secs: u64,
    /// Web console sessions unused for this long are dropped.
    pub session_idle_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            port: 8080,
            log_lines: DEFAULT_LOG_LINES,
            request_timeout_secs: 30,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let defaults = Config::default();

    let server_url = match std::env::var("ICONSOLE_SERVER_URL") {
        Ok(raw) => normalize_server_url(&raw)
            .map_err(|e| anyhow::anyhow!("ICONSOLE_SERVER_URL: {}", e))?,
        Err(_) => defaults.server_url,
    };

    Ok(Config {
        server_url,
        port: std::env::var("ICONSOLE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port),
        log_lines: std::env::var("ICONSOLE_LOG_LINES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.log_lines),
        request_timeout_secs: std::env::var("ICONSOLE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs),
        session_idle_secs: std::env::var("ICONSOLE_SESSION_IDLE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &u64| *n > 0)
            .unwrap_or(defaults.session_idle_secs),
    })
}

/// Check that `raw` is an absolute http(s) URL and strip trailing slashes.
pub fn normalize_server_url(raw: &str) -> Result<String, ConsoleError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ConsoleError::InvalidInput(format!("invalid server URL '{}': {}", trimmed, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConsoleError::InvalidInput(format!(
            "server URL must be http or https: {}",
            trimmed
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
