//! Three-way reconciliation of a translated base against an updated catalogue.
//!
//! Given the base translation, the new source catalogue and the old source catalogue
//! the base was derived from, `sieve` produces:
//!
//! - an updated base, in catalogue order, with translations carried over (also
//!   across renamed ids) and new strings inserted untranslated
//! - the added strings, to be translated
//! - the changed strings, whose source text differs from the old catalogue
//! - the dropped strings, which the catalogue no longer references

use crate::error::Anomaly;
use crate::resource::Resource;

/// A translation carried over from `old_id` to `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub old_id: String,
    pub id: String,
}

/// Result of [`sieve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SieveOutcome {
    /// Base metadata first, then one entry per catalogue string.
    pub updated: Resource,
    /// New strings, in the source language.
    pub added: Resource,
    /// Catalogue strings whose content changed since the old catalogue.
    pub changed: Resource,
    /// Base entries not carried over under any id.
    pub dropped: Resource,
    pub renamed: Vec<Rename>,
    pub anomalies: Vec<Anomaly>,
    /// Entries left out of the updated base by the upstream filter.
    pub filtered: usize,
}

impl SieveOutcome {
    fn note(&mut self, anomaly: Anomaly) {
        match &anomaly {
            Anomaly::MissingMetadata { .. } => tracing::info!("{anomaly}"),
            Anomaly::StaleReference { .. } => tracing::warn!("{anomaly}"),
        }
        self.anomalies.push(anomaly);
    }

    fn add_new(&mut self, id: &str, content: &str) {
        tracing::info!(id, "Found newly introduced string");
        self.updated.insert(id, content);
        self.added.insert(id, content);
    }

    /// Removes every entry unknown to `upstream` from all outputs but `dropped`.
    fn retain_upstream(&mut self, upstream: &Resource) {
        let mut keep = |id: &str, _: &str| {
            let known = upstream.contains(id);
            if !known {
                tracing::debug!(id, "Omitting string");
            }
            known
        };
        self.filtered = self.updated.retain(&mut keep);
        self.added.retain(&mut keep);
        self.changed.retain(&mut keep);
    }
}

/// Where a catalogue id missing from base came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin<'a> {
    /// The old catalogue has the same id, so base simply lacks it.
    SameId,
    /// The old catalogue has the same content under this id, which the catalogue no
    /// longer uses.
    Renamed(&'a str),
    Unknown,
}

/// Looks `id` up in the old catalogue, by id first, then by content.
///
/// The first content match in old catalogue order wins. Old ids still present in the
/// catalogue are skipped, since their translation belongs to that string.
fn find_origin<'a>(
    id: &str,
    content: &str,
    catalogue: &Resource,
    old_catalogue: &'a Resource,
) -> Origin<'a> {
    if old_catalogue.contains(id) {
        return Origin::SameId;
    }

    old_catalogue
        .iter()
        .find(|&(old_id, old_content)| old_content == content && !catalogue.contains(old_id))
        .map_or(Origin::Unknown, |(old_id, _)| Origin::Renamed(old_id))
}

/// Reconciles `base` against `catalogue`, using `old_catalogue` to detect renamed ids
/// and changed content.
///
/// `base` is consumed: whatever is not carried over becomes
/// [`SieveOutcome::dropped`]. When `upstream` is given, ids absent from it are removed
/// from the updated, added and changed outputs.
///
/// Inconsistencies between the inputs never fail; they are logged and listed in
/// [`SieveOutcome::anomalies`].
#[must_use]
pub fn sieve(
    base: Resource,
    catalogue: &Resource,
    old_catalogue: &Resource,
    upstream: Option<&Resource>,
) -> SieveOutcome {
    let mut remaining = base;
    let mut outcome = SieveOutcome::default();

    match remaining.take_metadata() {
        Some(metadata) => {
            tracing::debug!(key = %metadata.key, "Copying metadata from base");
            outcome.updated.set_metadata(metadata);
        }
        None => outcome.note(Anomaly::MissingMetadata { document: "base".to_string() }),
    }
    if catalogue.metadata().is_none() {
        tracing::debug!("Catalogue contains no metadata");
    }

    tracing::info!("Sieving strings");

    for (id, content) in catalogue.iter() {
        if let Some(translation) = remaining.take(id) {
            outcome.updated.insert(id, translation);

            if old_catalogue.get(id).is_some_and(|old| old != content) {
                tracing::info!(id, "String was changed in source");
                outcome.changed.insert(id, content);
            }
            continue;
        }

        match find_origin(id, content, catalogue, old_catalogue) {
            Origin::SameId => {
                outcome.note(Anomaly::StaleReference { id: id.to_string(), old_id: id.to_string() });
                outcome.add_new(id, content);
            }
            Origin::Unknown => outcome.add_new(id, content),
            Origin::Renamed(old_id) => {
                tracing::info!(old_id, id, "A string is found with different id");
                if let Some(translation) = remaining.take(old_id) {
                    outcome.updated.insert(id, translation);
                    outcome.renamed.push(Rename { old_id: old_id.to_string(), id: id.to_string() });
                } else {
                    outcome.note(Anomaly::StaleReference {
                        id: id.to_string(),
                        old_id: old_id.to_string(),
                    });
                    outcome.add_new(id, content);
                }
            }
        }
    }

    outcome.dropped = remaining;

    if let Some(upstream) = upstream {
        tracing::info!("Filtering outputs against upstream localisation");
        outcome.retain_upstream(upstream);
    }

    tracing::info!(
        updated = outcome.updated.len(),
        added = outcome.added.len(),
        changed = outcome.changed.len(),
        dropped = outcome.dropped.len(),
        renamed = outcome.renamed.len(),
        "Sieving strings completed"
    );

    outcome
}
