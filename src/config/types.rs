use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::resource::{
    DEFAULT_METADATA_KEY,
    STDIO_PATH,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// Name of the offending field or argument (e.g., "outputs.added", "--changed")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load settings file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings shared by all commands, read from `.transmerge.json`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Reserved key carried through verbatim.
    pub metadata_key: String,

    /// Indentation written per nesting level.
    pub indent: String,

    /// File names used when the command line does not name the sieve outputs.
    pub outputs: OutputNames,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputNames {
    pub added: PathBuf,
    pub changed: PathBuf,
    pub dropped: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
            indent: "\t".to_string(),
            outputs: OutputNames::default(),
        }
    }
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            added: PathBuf::from("added.json"),
            changed: PathBuf::from("changed.json"),
            dropped: PathBuf::from("dropped.json"),
        }
    }
}

impl Settings {
    /// # Errors
    /// - Empty metadata key
    /// - Empty or non-whitespace indent
    /// - Empty output file name
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.metadata_key.is_empty() {
            errors.push(ValidationError::new(
                "metadataKey",
                "The metadata key cannot be empty. Example: \"@metadata\"",
            ));
        }

        if self.indent.is_empty() {
            errors.push(ValidationError::new(
                "indent",
                "The indent cannot be empty. Example: \"\\t\" or \"  \"",
            ));
        } else if !self.indent.chars().all(char::is_whitespace) {
            errors.push(ValidationError::new(
                "indent",
                format!("The indent must consist of whitespace only, got {:?}", self.indent),
            ));
        }

        for (field, path) in [
            ("outputs.added", &self.outputs.added),
            ("outputs.changed", &self.outputs.changed),
            ("outputs.dropped", &self.outputs.dropped),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::new(field, "The file name cannot be empty"));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Named inputs and outputs of one sieve run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SieveConfig {
    pub base: PathBuf,
    pub updated: PathBuf,
    pub catalogue: PathBuf,
    pub old_catalogue: PathBuf,
    /// Currently used strings; entries absent from it are left out of the outputs.
    pub upstream: Option<PathBuf>,
    pub added: PathBuf,
    pub changed: PathBuf,
    pub dropped: PathBuf,
}

impl SieveConfig {
    /// # Errors
    /// - An output path equals an input path
    /// - Two outputs share a path
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut inputs = vec![
            ("BASE", self.base.as_path()),
            ("--catalogue", self.catalogue.as_path()),
            ("--old-catalogue", self.old_catalogue.as_path()),
        ];
        if let Some(upstream) = &self.upstream {
            inputs.push(("--upstream", upstream.as_path()));
        }
        let outputs = [
            ("UPDATED", self.updated.as_path()),
            ("--added", self.added.as_path()),
            ("--changed", self.changed.as_path()),
            ("--dropped", self.dropped.as_path()),
        ];

        let errors = check_paths(&inputs, &outputs);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Named inputs and output of one patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    pub base: PathBuf,
    pub updated: PathBuf,
    pub patch: PathBuf,
}

impl PatchConfig {
    /// # Errors
    /// The output path equals an input path.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let inputs = [("BASE", self.base.as_path()), ("--patch", self.patch.as_path())];
        let outputs = [("UPDATED", self.updated.as_path())];

        let errors = check_paths(&inputs, &outputs);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Inputs are never overwritten, and no two outputs share a destination.
///
/// `-` as an input means standard input, so it never collides with an output.
fn check_paths(inputs: &[(&str, &Path)], outputs: &[(&str, &Path)]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (index, (name, output)) in outputs.iter().enumerate() {
        if output.as_os_str().is_empty() {
            errors.push(ValidationError::new(*name, "The path cannot be empty"));
            continue;
        }

        if output.as_os_str() != STDIO_PATH {
            for (input_name, input) in inputs {
                if input == output {
                    errors.push(ValidationError::new(
                        *name,
                        format!(
                            "'{}' is also given as {input_name}; inputs are never overwritten",
                            output.display()
                        ),
                    ));
                }
            }
        }

        if let Some((other, _)) = outputs.iter().take(index).find(|(_, earlier)| earlier == output) {
            errors.push(ValidationError::new(
                *name,
                format!("'{}' is already used for {other}", output.display()),
            ));
        }
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn sieve_config() -> SieveConfig {
        SieveConfig {
            base: PathBuf::from("ar.json"),
            updated: PathBuf::from("ar.updated.json"),
            catalogue: PathBuf::from("en.json"),
            old_catalogue: PathBuf::from("en.old.json"),
            upstream: None,
            added: PathBuf::from("added.json"),
            changed: PathBuf::from("changed.json"),
            dropped: PathBuf::from("dropped.json"),
        }
    }

    #[rstest]
    fn validate_default_settings() {
        let settings = Settings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"indent": "  ", "outputs": {"added": "plus.json"}}"#;

        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_that!(settings.indent, eq("  "));
        assert_that!(settings.metadata_key, eq("@metadata"));
        assert_that!(settings.outputs.added, eq(&PathBuf::from("plus.json")));
        assert_that!(settings.outputs.changed, eq(&PathBuf::from("changed.json")));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&Settings::default()));
    }

    #[rstest]
    #[case::empty("", "cannot be empty")]
    #[case::not_whitespace("--", "whitespace only")]
    fn validate_invalid_indent(#[case] indent: &str, #[case] message: &str) {
        let settings = Settings { indent: indent.to_string(), ..Settings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("indent")),
                field!(ValidationError.message, contains_substring(message))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = Settings {
            metadata_key: String::new(),
            outputs: OutputNames { dropped: PathBuf::new(), ..OutputNames::default() },
            ..Settings::default()
        };

        let errors = settings.validate().unwrap_err();
        let error_message = ConfigError::ValidationErrors(errors).to_string();

        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. metadataKey"));
        assert_that!(error_message, contains_substring("2. outputs.dropped"));
    }

    #[rstest]
    fn validate_sieve_config(sieve_config: SieveConfig) {
        assert_that!(sieve_config.validate(), ok(anything()));
    }

    #[rstest]
    fn sieve_output_may_not_overwrite_input(sieve_config: SieveConfig) {
        let config = SieveConfig { dropped: PathBuf::from("ar.json"), ..sieve_config };

        assert_that!(
            config.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("--dropped")),
                field!(ValidationError.message, contains_substring("BASE"))
            ]])
        );
    }

    #[rstest]
    fn sieve_outputs_must_be_distinct(sieve_config: SieveConfig) {
        let config = SieveConfig { changed: PathBuf::from("added.json"), ..sieve_config };

        assert_that!(
            config.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("--changed")),
                field!(ValidationError.message, contains_substring("--added"))
            ]])
        );
    }

    #[rstest]
    fn stdio_is_allowed_once_among_outputs(sieve_config: SieveConfig) {
        let config = SieveConfig {
            base: PathBuf::from("-"),
            updated: PathBuf::from("-"),
            ..sieve_config.clone()
        };
        assert_that!(config.validate(), ok(anything()));

        let config =
            SieveConfig { updated: PathBuf::from("-"), added: PathBuf::from("-"), ..sieve_config };
        assert_that!(config.validate(), err(len(eq(1))));
    }

    #[rstest]
    fn patch_output_may_not_overwrite_patch() {
        let config = PatchConfig {
            base: PathBuf::from("ar.json"),
            updated: PathBuf::from("added.json"),
            patch: PathBuf::from("added.json"),
        };

        assert_that!(
            config.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("UPDATED"))])
        );
    }
}
