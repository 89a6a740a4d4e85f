//! Command execution
//!
//! Each command reads every input document first, so an unreadable or malformed
//! document aborts the run before any output is written.

/// `patch` command
mod patch;
/// `sieve` command
mod sieve;

pub use patch::{
    PatchSummary,
    run_patch,
};
pub use sieve::{
    SieveSummary,
    run_sieve,
};
