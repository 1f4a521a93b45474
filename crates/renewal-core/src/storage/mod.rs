mod config;
pub mod migrations;
pub mod store;

pub use config::{Config, DeletionConfig, LogConfig, RemindersConfig, StorageConfig};
pub use store::Store;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding the config file and the default database.
///
/// `RENEWAL_HOME` wins when set. Otherwise `~/.config/renewal-tracker[-dev]/`
/// based on `RENEWAL_ENV` (set `RENEWAL_ENV=dev` for a development copy).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("RENEWAL_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("RENEWAL_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("renewal-tracker-dev")
            } else {
                base_dir.join("renewal-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
