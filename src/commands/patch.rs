use crate::config::{
    ConfigError,
    PatchConfig,
    Settings,
};
use crate::error::TransmergeError;
use crate::patch::patch;
use crate::resource::{
    load_resource,
    write_resource,
};

/// Counts of one patch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchSummary {
    pub base: usize,
    pub patched: usize,
    pub replaced: usize,
}

/// Patches the base named in `config` and writes the updated base.
///
/// Nothing is written when the patch names an id unknown to base.
///
/// # Errors
/// - Invalid path combination
/// - Input cannot be read or parsed
/// - [`TransmergeError::UnknownIdentifier`]
/// - Output cannot be written
pub fn run_patch(config: &PatchConfig, settings: &Settings) -> Result<PatchSummary, TransmergeError> {
    config.validate().map_err(ConfigError::ValidationErrors)?;
    let key = settings.metadata_key.as_str();

    let base = load_resource(&config.base, key)?;
    let patch_set = load_resource(&config.patch, key)?;

    let base_len = base.len();
    let outcome = patch(base, &patch_set)?;

    tracing::info!("Writing patched localisation to {}", config.updated.display());
    write_resource(&outcome.updated, &config.updated, &settings.indent)?;

    Ok(PatchSummary { base: base_len, patched: patch_set.len(), replaced: outcome.replaced })
}
