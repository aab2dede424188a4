use citecorpus_core::{CorpusError, DEFAULT_BATCH_SIZE, Result};

/// Fraction of the chronologically ordered corpus used for training.
pub const DEFAULT_TRAIN_FRAC: f64 = 0.80;

/// Configuration for building a store.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Documents appended per batch
    pub batch_size: usize,
    /// DuckDB memory limit (e.g. "4GB")
    pub memory_limit: String,
    /// DuckDB worker threads
    pub threads: usize,
    /// WAL size before DuckDB checkpoints (e.g. "1GB")
    pub checkpoint_threshold: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            memory_limit: "4GB".to_string(),
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            checkpoint_threshold: "1GB".to_string(),
        }
    }
}

/// Configuration for opening a snapshot.
#[derive(Debug, Clone)]
pub struct OpenConfig {
    /// Must lie in `[0, 1]`
    pub train_frac: f64,
    /// Rows decoded per parallel chunk during materialization
    pub decode_chunk: usize,
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            train_frac: DEFAULT_TRAIN_FRAC,
            decode_chunk: 8192,
        }
    }
}

impl OpenConfig {
    pub fn with_train_frac(train_frac: f64) -> Self {
        Self {
            train_frac,
            ..Self::default()
        }
    }

    /// Reject out-of-range arguments before any I/O happens.
    pub fn validate(&self) -> Result<()> {
        if !self.train_frac.is_finite() || !(0.0..=1.0).contains(&self.train_frac) {
            return Err(CorpusError::Precondition(format!(
                "train_frac must be in [0, 1], got {}",
                self.train_frac
            )));
        }
        if self.decode_chunk == 0 {
            return Err(CorpusError::Precondition(
                "decode_chunk must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
