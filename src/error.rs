//! Error and anomaly kinds.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal errors. Any of these aborts the run before output is written.
#[derive(Error, Debug)]
pub enum TransmergeError {
    /// Input is not a JSON object of string entries.
    #[error("Malformed document '{document}': {reason}")]
    MalformedDocument {
        /// Document name (path, or `-` for standard input)
        document: String,
        /// What was wrong with it
        reason: String,
    },

    /// A patch entry whose identifier does not exist in base.
    #[error("The patch contains a string with id '{id}' which does not exist in base")]
    UnknownIdentifier {
        /// Offending identifier
        id: String,
    },

    /// Failed to read or write a document.
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        /// Path of the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings or paths.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TransmergeError {
    pub(crate) fn malformed(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument { document: document.into(), reason: reason.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Inconsistencies between the sieve inputs.
///
/// These are tolerated: they are logged and recorded, never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Base has no metadata entry.
    #[error("{document} contains no metadata")]
    MissingMetadata {
        /// Which input lacked it
        document: String,
    },

    /// The old catalogue has the string under `old_id` (equal to `id` when the id did not
    /// change), but base holds no translation under it. The string is treated as new.
    #[error("String '{id}' is in the old catalogue as '{old_id}', which is missing from base")]
    StaleReference {
        /// Identifier in the catalogue
        id: String,
        /// Identifier in the old catalogue: the same id, or the one with identical content
        old_id: String,
    },
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn unknown_identifier_names_the_id() {
        let error = TransmergeError::UnknownIdentifier { id: "Z".to_string() };

        assert_that!(error.to_string(), contains_substring("'Z'"));
    }

    #[rstest]
    fn stale_reference_names_both_ids() {
        let anomaly = Anomaly::StaleReference { id: "new-id".to_string(), old_id: "old-id".to_string() };

        assert_that!(
            anomaly.to_string(),
            all![contains_substring("'new-id'"), contains_substring("'old-id'")]
        );
    }
}
