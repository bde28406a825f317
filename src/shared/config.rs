use std::fs;
use std::path::Path;
use toml;
use crate::shared::types::WatcherConfig;
use crate::shared::errors::AppError;

/// HTTP endpoint override, same variable the dotenv setup used
pub const HTTP_ENDPOINT_ENV: &str = "SOLANA_HTTP_ENDPOINT";
/// WebSocket endpoint override
pub const WSS_ENDPOINT_ENV: &str = "SOLANA_WSS_ENDPOINT";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file, or defaults when no path is given,
    /// then apply endpoint overrides from the environment
    pub fn load_config(path: Option<&Path>) -> Result<WatcherConfig, AppError> {
        let config = match path {
            Some(path) => {
                let config_content = fs::read_to_string(path)
                    .map_err(|e| AppError::ConfigError(format!("Failed to read config file: {}", e)))?;
                Self::parse(&config_content)?
            }
            None => WatcherConfig::default(),
        };

        Ok(Self::with_endpoints(
            config,
            std::env::var(HTTP_ENDPOINT_ENV).ok(),
            std::env::var(WSS_ENDPOINT_ENV).ok(),
        ))
    }

    /// Parse configuration text; missing sections fall back to defaults
    pub fn parse(config_content: &str) -> Result<WatcherConfig, AppError> {
        toml::from_str(config_content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Replace endpoints with non-empty overrides
    pub fn with_endpoints(
        mut config: WatcherConfig,
        rpc_url: Option<String>,
        ws_url: Option<String>,
    ) -> WatcherConfig {
        if let Some(url) = rpc_url.filter(|u| !u.trim().is_empty()) {
            config.network.rpc_url = url;
        }
        if let Some(url) = ws_url.filter(|u| !u.trim().is_empty()) {
            config.network.ws_url = url;
        }
        config
    }
}
