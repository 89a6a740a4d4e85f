//! transmerge
//!
//! Maintains a translated localisation resource against new releases of its
//! upstream source catalogue: `sieve` reconciles the three versions, `patch`
//! folds translated strings back in.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod patch;
pub mod resource;
pub mod sieve;

pub use error::{
    Anomaly,
    TransmergeError,
};
pub use patch::patch;
pub use resource::Resource;
pub use sieve::sieve;
