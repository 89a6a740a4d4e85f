use std::path::Path;

use crate::config::{
    ConfigError,
    Settings,
    SieveConfig,
};
use crate::error::{
    Anomaly,
    TransmergeError,
};
use crate::resource::{
    Resource,
    check_destination,
    load_resource,
    render_resource,
    write_document,
};
use crate::sieve::sieve;

/// Counts of one sieve run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SieveSummary {
    pub base: usize,
    pub catalogue: usize,
    pub old_catalogue: usize,
    pub upstream: Option<usize>,
    pub updated: usize,
    pub added: usize,
    pub changed: usize,
    pub dropped: usize,
    pub renamed: usize,
    pub filtered: usize,
    pub anomalies: Vec<Anomaly>,
}

/// Runs a sieve over the documents named in `config` and writes the four outputs.
///
/// # Errors
/// - Invalid path combination
/// - Input cannot be read or parsed
/// - Output cannot be written
pub fn run_sieve(config: &SieveConfig, settings: &Settings) -> Result<SieveSummary, TransmergeError> {
    config.validate().map_err(ConfigError::ValidationErrors)?;
    let key = settings.metadata_key.as_str();

    let catalogue = load_resource(&config.catalogue, key)?;
    let base = load_resource(&config.base, key)?;
    let old_catalogue = load_resource(&config.old_catalogue, key)?;
    let upstream = config.upstream.as_deref().map(|path| load_resource(path, key)).transpose()?;
    tracing::info!("Reading of inputs completed");

    let base_len = base.len();
    let outcome = sieve(base, &catalogue, &old_catalogue, upstream.as_ref());

    write_outputs(
        [
            ("carried-over and added", &outcome.updated, config.updated.as_path()),
            ("newly added", &outcome.added, config.added.as_path()),
            ("changed catalogue", &outcome.changed, config.changed.as_path()),
            ("dropped (or refactored)", &outcome.dropped, config.dropped.as_path()),
        ],
        &settings.indent,
    )?;

    Ok(SieveSummary {
        base: base_len,
        catalogue: catalogue.len(),
        old_catalogue: old_catalogue.len(),
        upstream: upstream.as_ref().map(Resource::len),
        updated: outcome.updated.len(),
        added: outcome.added.len(),
        changed: outcome.changed.len(),
        dropped: outcome.dropped.len(),
        renamed: outcome.renamed.len(),
        filtered: outcome.filtered,
        anomalies: outcome.anomalies,
    })
}

/// Renders every output and checks every destination before the first write.
///
/// Only an I/O failure during the writes themselves can leave earlier outputs behind.
fn write_outputs(
    outputs: [(&str, &Resource, &Path); 4],
    indent: &str,
) -> Result<(), TransmergeError> {
    let mut documents = Vec::with_capacity(outputs.len());
    for (what, resource, path) in outputs {
        check_destination(path)?;
        documents.push((what, resource.len(), path, render_resource(resource, path, indent)?));
    }

    for (what, count, path, text) in documents {
        tracing::info!("Writing {count} {what} strings to {}", path.display());
        write_document(&text, path)?;
    }
    Ok(())
}
