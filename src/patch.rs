//! Overlay of translated strings onto an existing base.
//!
//! Patching never inserts ids: every id of the patch must already be in base, usually
//! as an untranslated placeholder left by a sieve run. This keeps the base order intact.

use crate::error::TransmergeError;
use crate::resource::Resource;

/// Result of [`patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub updated: Resource,
    /// Entries whose content actually changed.
    pub replaced: usize,
}

/// Replaces the content of every base entry named by `patch_set`.
///
/// All ids are checked before anything is replaced, so a failure leaves no partial
/// result. The metadata entry of `patch_set`, if any, is ignored.
///
/// # Errors
/// [`TransmergeError::UnknownIdentifier`] for the first id (in patch order) that is
/// not in base.
pub fn patch(base: Resource, patch_set: &Resource) -> Result<PatchOutcome, TransmergeError> {
    if let Some(id) = patch_set.ids().find(|id| !base.contains(id)) {
        return Err(TransmergeError::UnknownIdentifier { id: id.to_string() });
    }

    if patch_set.metadata().is_some() {
        tracing::debug!("Ignoring metadata of patch");
    }

    let mut updated = base;
    let mut replaced = 0;
    for (id, content) in patch_set.iter() {
        if updated.replace(id, content).is_some_and(|previous| previous != content) {
            replaced += 1;
        }
    }

    tracing::info!(patched = patch_set.len(), replaced, "Patching completed");
    Ok(PatchOutcome { updated, replaced })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::resource::DEFAULT_METADATA_KEY;

    #[googletest::test]
    fn rejects_unknown_identifier() {
        let base = Resource::from_entries([("A", "1")]);
        let patch_set = Resource::from_entries([("Z", "2")]);

        let error = patch(base, &patch_set).unwrap_err();

        expect_that!(error.to_string(), contains_substring("'Z'"));
        expect_that!(
            matches!(error, TransmergeError::UnknownIdentifier { ref id } if id == "Z"),
            eq(true)
        );
    }

    #[rstest]
    fn rejects_whole_patch_when_any_id_is_unknown() {
        let base = Resource::from_entries([("A", "1"), ("B", "2")]);
        let patch_set = Resource::from_entries([("A", "9"), ("Y", "0"), ("Z", "0")]);

        let result = patch(base, &patch_set);

        assert!(matches!(result, Err(TransmergeError::UnknownIdentifier { id }) if id == "Y"));
    }

    #[rstest]
    fn keeps_order_and_untouched_entries() {
        let base = Resource::from_entries([("A", "1"), ("B", "2")]);
        let patch_set = Resource::from_entries([("A", "9")]);

        let outcome = patch(base, &patch_set).unwrap();

        assert_eq!(outcome.updated.iter().collect::<Vec<_>>(), [("A", "9"), ("B", "2")]);
        assert_eq!(outcome.replaced, 1);
    }

    #[rstest]
    fn patch_order_does_not_reorder_base() {
        let base = Resource::from_entries([("a", "1"), ("b", "2"), ("c", "3")]);
        let patch_set = Resource::from_entries([("c", "30"), ("a", "10")]);

        let outcome = patch(base, &patch_set).unwrap();

        assert_eq!(outcome.updated.ids().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(outcome.updated.get("c"), Some("30"));
    }

    #[rstest]
    fn identical_content_is_not_counted() {
        let base = Resource::from_entries([("a", "same")]);

        let outcome = patch(base.clone(), &base).unwrap();

        assert_eq!(outcome.updated, base);
        assert_eq!(outcome.replaced, 0);
    }

    #[googletest::test]
    fn base_metadata_survives_and_patch_metadata_is_ignored() {
        let base = Resource::from_entries([("a", "1")])
            .with_metadata(DEFAULT_METADATA_KEY, json!({"authors": ["base"]}));
        let patch_set = Resource::from_entries([("a", "2")])
            .with_metadata(DEFAULT_METADATA_KEY, json!({"authors": ["patch"]}));

        let outcome = patch(base, &patch_set).unwrap();

        expect_that!(
            outcome.updated.metadata().map(|m| &m.value),
            some(eq(&json!({"authors": ["base"]})))
        );
        expect_that!(outcome.updated.get("a"), some(eq("2")));
    }
}
