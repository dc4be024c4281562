use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::page::PlayerOptions;
use crate::relay::RelayConfig;

const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 1000;

/// Keys accepted in `pixeltv.toml`. The relay port is never configurable.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub autoplay: Option<bool>,
    pub shutdown_timeout_ms: Option<u64>,
}

#[derive(Debug)]
pub struct Config {
    pub video: Option<String>,
    pub autoplay: bool,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn resolve(file: Option<FileConfig>, args: &crate::cli::Args) -> Self {
        let file = file.unwrap_or_default();
        let autoplay = if args.no_autoplay {
            false
        } else {
            file.autoplay.unwrap_or(true)
        };
        let timeout_ms = args
            .shutdown_timeout_ms
            .or(file.shutdown_timeout_ms)
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_MS);
        Config {
            video: args.video.clone(),
            autoplay,
            shutdown_timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            player: PlayerOptions { autoplay: self.autoplay },
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    let cwd_config = PathBuf::from("pixeltv.toml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }
    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("pixeltv").join("config.toml");
        if xdg_config.exists() {
            return Some(xdg_config);
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}
