// ============================
// carebridge-backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// HMAC secret for signing session tokens
    pub token_secret: String,
    /// Access token lifetime in seconds
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_secs: u64,
    /// Rate limiting for credential endpoints
    pub rate_limit: RateLimitSettings,
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().expect("static addr"),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            token_secret: "change-me".to_string(),
            access_ttl_secs: 60 * 60,           // 60 minutes
            refresh_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from `carebridge.toml` and `CAREBRIDGE_`-prefixed
    /// environment variables, on top of the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("carebridge.toml")
    }

    /// Load settings from an explicit config file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("CAREBRIDGE_").split("__"))
            .extract()?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_token_lifetimes() {
        let settings = Settings::default();
        assert_eq!(settings.access_ttl_secs, 3600);
        assert_eq!(settings.refresh_ttl_secs, 604_800);
        assert_eq!(settings.rate_limit.window_secs, 60);
    }

    #[test]
    fn load_without_config_file_falls_back_to_defaults() {
        let settings = Settings::load_from("does-not-exist.toml").unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(settings.log_level, "info");
    }
}
