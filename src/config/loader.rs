//! Settings file loading

use std::path::Path;

use super::{
    ConfigError,
    Settings,
};

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = ".transmerge.json";

/// Reads settings from `dir/.transmerge.json`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: no settings file
/// - `Err(ConfigError)`: read or parse failure
fn load_from_directory(dir: &Path) -> Result<Option<Settings>, ConfigError> {
    let config_path = dir.join(SETTINGS_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Settings file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_file(&config_path).map(Some)
}

fn load_from_file(path: &Path) -> Result<Settings, ConfigError> {
    tracing::debug!("Loading settings from: {:?}", path);

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    Ok(settings)
}

/// Resolves the effective settings.
///
/// An explicitly named file must exist. Otherwise `.transmerge.json` in `dir` is
/// used when present, and defaults when not. The result is validated.
///
/// # Errors
/// - File read error
/// - JSON parse error
/// - Validation error
pub fn resolve_settings(explicit: Option<&Path>, dir: &Path) -> Result<Settings, ConfigError> {
    let settings = match explicit {
        Some(path) => load_from_file(path)?,
        None => load_from_directory(dir)?.unwrap_or_default(),
    };

    settings.validate().map_err(ConfigError::ValidationErrors)?;
    tracing::debug!("Effective settings: {:?}", settings);

    Ok(settings)
}
