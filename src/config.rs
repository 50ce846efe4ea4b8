use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/bridgechat.json";
pub const API_URL_ENV: &str = "BRIDGECHAT_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_url: Option<String>,
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// Pick the backend base URL: CLI flag over environment over config file.
/// A missing URL is reported by the caller, not fatal here.
pub fn resolve_api_url(
    cli: Option<String>,
    env: Option<String>,
    config: &AppConfig,
) -> Option<String> {
    cli.or(env)
        .or_else(|| config.api_url.clone())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
