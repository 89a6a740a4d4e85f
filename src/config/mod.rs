//! Settings and per-command configuration records
/// Settings file loader
mod loader;
/// Configuration types and validation
mod types;

pub use loader::{
    SETTINGS_FILE_NAME,
    resolve_settings,
};
pub use types::{
    ConfigError,
    OutputNames,
    PatchConfig,
    Settings,
    SieveConfig,
    ValidationError,
};
