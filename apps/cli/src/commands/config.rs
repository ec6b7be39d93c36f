//! # Config Commands
//!
//! Prints the effective configuration, or writes it out as a starting file.

use rocketshoes_store::StoreConfig;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Renders the effective configuration as TOML.
pub fn show_config(config: &StoreConfig) -> CliResult<String> {
    debug!("config command");
    Ok(config.to_toml()?)
}

/// Saves the effective configuration and returns the path written.
pub fn save_config(config: &StoreConfig, path: Option<PathBuf>) -> CliResult<PathBuf> {
    let path = path
        .or_else(StoreConfig::default_config_path)
        .ok_or_else(|| CliError::internal("No config path available"))?;

    config.save(Some(path.clone()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_config() {
        let rendered = show_config(&StoreConfig::default()).unwrap();
        assert!(rendered.contains("base_url = \"http://localhost:3333\""));
        assert!(rendered.contains("cart_key = \"@RocketShoes:cart\""));
    }

    #[test]
    fn test_save_config() {
        let path = std::env::temp_dir()
            .join(format!("rocketshoes-cli-{}", std::process::id()))
            .join("config.toml");

        let written = save_config(&StoreConfig::default(), Some(path.clone())).unwrap();

        assert_eq!(written, path);
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
