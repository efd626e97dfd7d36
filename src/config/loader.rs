//! `.ts-catalog.json` lookup next to the translation files.

use std::path::Path;

use super::{
    CatalogSettings,
    ConfigError,
};

/// Settings file looked up in the translations root.
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

impl CatalogSettings {
    /// Settings for the translations under `root`.
    ///
    /// Reads `root/.ts-catalog.json` when it exists and uses the defaults
    /// otherwise. Either way the result is validated before it is returned.
    ///
    /// # Errors
    /// - [`ConfigError::IoError`] if the file exists but cannot be read
    /// - [`ConfigError::ParseError`] if it is not valid settings JSON
    /// - [`ConfigError::ValidationErrors`] if a field is rejected by [`CatalogSettings::validate`]
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let settings = read_config_file(root)?.unwrap_or_default();
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(root = %root.display(), ?settings, "Catalog settings ready");
        Ok(settings)
    }
}

/// Parses `root/.ts-catalog.json`, or returns `None` if there is no such file.
fn read_config_file(root: &Path) -> Result<Option<CatalogSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        tracing::debug!(path = %config_path.display(), "No settings file, using defaults");
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)?;
    let settings = serde_json::from_str(&content)?;
    tracing::debug!(path = %config_path.display(), "Loaded settings file");
    Ok(Some(settings))
}
