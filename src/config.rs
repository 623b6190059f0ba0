//! Configuration management for Prensa Server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::render::PoolConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub pool: PoolSettings,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// How the Chromium engine gets launched
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Explicit Chromium binary path; auto-detected when unset
    pub executable: Option<PathBuf>,
    /// Additional launch arguments
    pub extra_args: Vec<String>,
    /// Accept invalid TLS certificates on URL fetches (self-signed
    /// storage endpoints)
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Recycle the engine after this many requests; 0 disables
    pub recycle_after: u32,
    /// Default per-request deadline in seconds
    pub deadline_secs: u64,
}

impl PoolSettings {
    pub fn to_pool_config(&self) -> PoolConfig {
        PoolConfig {
            recycle_after: self.recycle_after,
            default_deadline: Duration::from_secs(self.deadline_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            engine: EngineConfig {
                executable: None,
                extra_args: Vec::new(),
                accept_invalid_certs: false,
            },
            pool: PoolSettings {
                recycle_after: 25,
                deadline_secs: 90,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            engine: EngineConfig {
                executable: env::var("CHROME_PATH").ok().map(PathBuf::from),
                extra_args: env::var("CHROME_EXTRA_ARGS")
                    .map(|v| v.split_whitespace().map(String::from).collect())
                    .unwrap_or_default(),
                accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            },
            pool: PoolSettings {
                recycle_after: env::var("ENGINE_RECYCLE_AFTER")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
                    // Negative values disable recycling, same as 0
                    .map(|n| n.max(0) as u32)
                    .unwrap_or(defaults.pool.recycle_after),
                deadline_secs: env::var("RENDER_DEADLINE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.pool.deadline_secs),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.pool.recycle_after, 25);
        assert_eq!(config.pool.deadline_secs, 90);
        assert_eq!(config.server.port, 3000);
        assert!(!config.engine.accept_invalid_certs);
    }

    #[test]
    fn pool_settings_convert_to_pool_config() {
        let settings = PoolSettings {
            recycle_after: 10,
            deadline_secs: 30,
        };
        let config = settings.to_pool_config();
        assert_eq!(config.recycle_after, 10);
        assert_eq!(config.default_deadline, Duration::from_secs(30));
    }
}
