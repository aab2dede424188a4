//! citecorpus-core - Records, documents, and ingestion plumbing
//!
//! Provides the canonical [`Document`], its binary payload codec, the
//! source-record normalizer, and the streaming/batching infrastructure used
//! to build a corpus store.

pub mod batch;
pub mod document;
pub mod error;
pub mod logging;
pub mod progress;
pub mod record;
pub mod source;

// Re-exports for convenience
pub use batch::{BatchExt, Batches, DEFAULT_BATCH_SIZE};
pub use document::{DEFAULT_YEAR, Document, decode_document, encode_document};
pub use error::{CorpusError, Result};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use record::{AuthorField, Normalized, RawRecord, normalize, parse_record};
pub use source::{ByteCounter, RecordStream, SourceReader, StreamStats, open_source};
