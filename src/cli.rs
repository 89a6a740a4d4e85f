//! Command line arguments

use std::path::PathBuf;

use clap::{
    Args,
    Parser,
    Subcommand,
};

use crate::config::{
    PatchConfig,
    Settings,
    SieveConfig,
};

/// Verbose description of the programme, shown by `--long-story` and `--help`.
pub const LONG_STORY: &str = "\
Maintains a base localisation resource with regard to an updated catalogue obtained from upstream.
All inputs are JSON objects of string id to string content. One entry, named \"@metadata\" by
default, is preserved as is.

Terminology:
  * Base translation: the localisation resource that is maintained separately from upstream.
  * Source catalogue: the upstream resource in the source language, possibly containing changes,
    additions and omissions in the strings, as well as changes in the string ids.
  * Old source catalogue: the version of the catalogue from which the base translation is derived.
  * Upstream localisation: optional; the upstream translation of the same version as the
    catalogue. When given, it filters all outputs except dropped strings, so that only strings
    currently in use end up in the updated base.

The procedure has two steps.

Step one, sieve, reads base, catalogue and old catalogue and writes:
  * the updated base: the base in catalogue order, with translations carried over (also for
    strings whose id changed) and newly introduced strings inserted untranslated;
  * added strings: only the newly introduced strings, to be translated;
  * changed strings: catalogue strings whose content differs from the old catalogue, to be
    reviewed;
  * dropped strings: base strings no longer in the catalogue, kept aside for review.

Step two, patch, overwrites strings of a base with those of another resource, typically the
added or changed strings once translated. No new ids are ever inserted: every id of the patch
must already be in the base, which keeps the order of strings intact.";

#[derive(Debug, Parser)]
#[command(
    name = "transmerge",
    version,
    about = "A tool to maintain a base localisation, with regard to an updated catalogue obtained from upstream.",
    long_about = LONG_STORY,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print verbose description of the programme.
    #[arg(long)]
    pub long_story: bool,

    /// Do not print progress messages.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print debug messages.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Settings file. Defaults to `.transmerge.json` in the current directory, if present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sieves a base localisation against a catalogue in order to produce an updated base, added,
    /// changed and dropped strings.
    Sieve(SieveArgs),
    /// Merges strings from a localisation resource into another. The ids of the patch must
    /// already exist in the base.
    Patch(PatchArgs),
}

/// Arguments shared by all commands.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// File to read the base translation from (`-` for standard input). It is not modified.
    #[arg(value_name = "BASE")]
    pub base: PathBuf,

    /// File to write the updated base to (`-` for standard output).
    #[arg(value_name = "UPDATED")]
    pub updated: PathBuf,
}

#[derive(Debug, Args)]
pub struct SieveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Upstream localisation of the catalogue's version, used to filter the outputs.
    #[arg(long, value_name = "FILE")]
    pub upstream: Option<PathBuf>,

    /// New version of the upstream source catalogue.
    #[arg(long, value_name = "FILE")]
    pub catalogue: PathBuf,

    /// Older version of the upstream source catalogue, from which base is derived.
    #[arg(long, value_name = "FILE")]
    pub old_catalogue: PathBuf,

    /// File to save newly introduced strings to [default: added.json]
    #[arg(long, value_name = "FILE")]
    pub added: Option<PathBuf>,

    /// File to save strings changed between revisions of the catalogue to [default: changed.json]
    #[arg(long, value_name = "FILE")]
    pub changed: Option<PathBuf>,

    /// File to save strings dropped from the catalogue to [default: dropped.json]
    #[arg(long, value_name = "FILE")]
    pub dropped: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PatchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Resource to patch the base with. It is not modified.
    #[arg(long, value_name = "FILE")]
    pub patch: PathBuf,
}

impl SieveArgs {
    /// Fills unnamed outputs from `settings`.
    #[must_use]
    pub fn into_config(self, settings: &Settings) -> SieveConfig {
        SieveConfig {
            base: self.common.base,
            updated: self.common.updated,
            catalogue: self.catalogue,
            old_catalogue: self.old_catalogue,
            upstream: self.upstream,
            added: self.added.unwrap_or_else(|| settings.outputs.added.clone()),
            changed: self.changed.unwrap_or_else(|| settings.outputs.changed.clone()),
            dropped: self.dropped.unwrap_or_else(|| settings.outputs.dropped.clone()),
        }
    }
}

impl PatchArgs {
    #[must_use]
    pub fn into_config(self) -> PatchConfig {
        PatchConfig { base: self.common.base, updated: self.common.updated, patch: self.patch }
    }
}
