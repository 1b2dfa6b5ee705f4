//! The `$HOME/.vantage/` dotfolder: config storage and initialization.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use vantage_types::config::AppConfig;

/// Dotfolder name under `$HOME`.
const DOTFOLDER: &str = ".vantage";

/// Resolve the root path: `$HOME/.vantage/`.
pub fn root_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DOTFOLDER))
}

/// Ensure the dotfolder exists and holds a config. Idempotent — safe to
/// call on every launch.
///
/// ```text
/// $HOME/.vantage/
/// └── config.toml
/// ```
pub fn init_workspace() -> Result<()> {
    let root = root_dir()?;

    if !root.exists() {
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;
        info!("created directory: {}", root.display());
    }

    let config_path = root.join("config.toml");
    if !config_path.exists() {
        let default_config = AppConfig::default();
        let toml_str = default_config
            .to_toml_string()
            .context("Failed to serialize default config")?;
        fs::write(&config_path, &toml_str)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        info!("created default config: {}", config_path.display());
    }

    Ok(())
}

/// Load the config from disk. If the schema is outdated (missing or
/// renamed fields), regenerate with defaults while preserving the wallet
/// list — losing the monitored wallets on upgrade would be hostile.
pub fn load_config() -> Result<AppConfig> {
    let config_path = root_dir()?.join("config.toml");
    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match AppConfig::from_toml_str(&raw) {
        Ok(config) => Ok(config),
        Err(_) => {
            info!("config.toml outdated, migrating to new schema");
            let mut new_config = AppConfig::default();

            if let Ok(old) = raw.parse::<toml::Table>() {
                if let Some(wallets) = old.get("wallets").and_then(|v| v.as_array()) {
                    new_config.wallets = wallets
                        .iter()
                        .filter_map(|w| w.as_str().map(str::to_string))
                        .collect();
                }
            }

            save_config(&new_config)?;
            info!("config migrated successfully");
            Ok(new_config)
        }
    }
}

/// Write the config back to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    let config_path = root_dir()?.join("config.toml");
    let toml_str = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    fs::write(&config_path, &toml_str)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(())
}
