pub mod types;

pub use types::{Config, LlmConfig, OutputConfig, PromptConfig, ScanConfig};

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "dockerfile-generator";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from file or use defaults.
///
/// An explicit path must exist and parse. Without one, the per-user
/// config file is read when present.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::InvalidFile(format!(
                    "{} does not exist",
                    path.display()
                ))
                .into());
            }
            parse_config_file(path)
        }
        None => match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Using configuration from {}", path.display());
                parse_config_file(&path)
            }
            _ => Ok(Config::default()),
        },
    }
}

/// `<config dir>/dockerfile-generator/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::InvalidFile(format!("{}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&content)
        .map_err(|e| ConfigError::ParsingFailed(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}
