use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::common::error::NeoxError;
use crate::common::result::NeoxResult;
use crate::common::templates::get_config_template;
use crate::domain::entities::neox_config::{NeoxConfig, CONFIG_FILE_NAME};

/// Reads and writes the `neoX.config.json` file
#[derive(Debug, Clone, Default)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new config store
    pub fn new() -> Self {
        Self
    }

    /// Default location of the config file below `root`
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Load and parse the config file
    ///
    /// A file that is absent, unreadable or not valid JSON is reported as
    /// `ConfigMissing`; a config without any `shared` entry is `InvalidConfig`.
    pub async fn load<P: AsRef<Path>>(&self, config_path: P) -> NeoxResult<NeoxConfig> {
        let config_path = config_path.as_ref();
        debug!("Loading config from {}", config_path.display());

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|e| NeoxError::config_missing_with_source(config_path, e))?;

        let config: NeoxConfig = serde_json::from_str(&contents)
            .map_err(|e| NeoxError::config_missing_with_source(config_path, e))?;

        config.ensure_has_sources()?;

        info!(
            "Loaded {} shared source(s) from {}",
            config.shared.len(),
            config_path.display()
        );
        Ok(config)
    }

    /// Write the starter template, refusing to overwrite an existing file
    pub async fn write_template<P: AsRef<Path>>(&self, config_path: P) -> NeoxResult<()> {
        let config_path = config_path.as_ref();

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    NeoxError::filesystem_error_with_source(
                        "Failed to create config directory",
                        Some(parent.to_path_buf()),
                        e,
                    )
                })?;
            }
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(config_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => NeoxError::config_exists(config_path),
                _ => NeoxError::filesystem_error_with_source(
                    "Failed to create config file",
                    Some(config_path.to_path_buf()),
                    e,
                ),
            })?;

        file.write_all(get_config_template().as_bytes())
            .await
            .map_err(|e| {
                NeoxError::filesystem_error_with_source(
                    "Failed to write config file",
                    Some(config_path.to_path_buf()),
                    e,
                )
            })?;
        file.flush().await?;

        info!("Created {}", config_path.display());
        Ok(())
    }
}
