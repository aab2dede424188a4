//! citecorpus-store: DuckDB-backed paper corpus
//!
//! Builds a write-once store from JSONL paper records and opens it as an
//! in-memory [`Corpus`] snapshot, chronologically partitioned into
//! train/validation/test id sets.

mod builder;
mod config;
mod error;
pub mod hash;
pub mod reader;
mod snapshot;
pub mod split;
pub mod sql;

pub use builder::{BuildSummary, build, build_with_progress};
pub use config::{BuildConfig, DEFAULT_TRAIN_FRAC, OpenConfig};
pub use reader::{BuildInfo, StoreReader};
pub use snapshot::Corpus;
pub use split::{Split, SplitBounds};

use std::path::Path;

use citecorpus_core::Result;

/// Open the store at `target` as a snapshot.
pub fn open(target: &Path, train_frac: f64) -> Result<Corpus> {
    Corpus::open(target, train_frac)
}
