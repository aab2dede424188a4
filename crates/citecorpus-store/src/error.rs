//! Attaching context to DuckDB errors

use citecorpus_core::{CorpusError, Result};

/// `anyhow::Context`-style helper mapping engine errors into
/// [`CorpusError::Store`].
pub(crate) trait StoreContext<T> {
    fn store_context(self, context: &str) -> Result<T>;

    fn with_store_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, duckdb::Error> {
    fn store_context(self, context: &str) -> Result<T> {
        self.map_err(|e| CorpusError::Store {
            context: context.to_string(),
            source: Box::new(e),
        })
    }

    fn with_store_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| CorpusError::Store {
            context: f(),
            source: Box::new(e),
        })
    }
}
