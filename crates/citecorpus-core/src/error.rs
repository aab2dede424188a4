//! Error type shared by ingestion, the store, and the snapshot

use std::path::PathBuf;

/// Error from building, opening, or querying a corpus.
///
/// Every failure is surfaced to the caller of the operation that detected it.
/// Only [`CorpusError::KeyNotFound`] is expected during normal query
/// workflows; the rest are fatal for the operation that raised them.
#[derive(Debug)]
pub enum CorpusError {
    /// A source record is missing a required field or is not valid JSON.
    MalformedRecord { line: usize, reason: String },
    /// Source unreadable or target unwritable.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The store path does not exist.
    StoreNotFound(PathBuf),
    /// The path exists but is not a complete, consistent store.
    StoreCorrupt { path: PathBuf, reason: String },
    /// Caller passed an argument outside its valid range.
    Precondition(String),
    /// `get` on an id that is not in the corpus.
    KeyNotFound(String),
    /// Storage engine failure.
    Store {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Payload could not be encoded or decoded.
    Codec(bincode::Error),
}

pub type Result<T, E = CorpusError> = std::result::Result<T, E>;

impl std::fmt::Display for CorpusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRecord { line, reason } => {
                write!(f, "malformed record at line {line}: {reason}")
            }
            Self::Io { path, source } => write!(f, "IO: {}: {source}", path.display()),
            Self::StoreNotFound(path) => write!(f, "store not found: {}", path.display()),
            Self::StoreCorrupt { path, reason } => {
                write!(f, "invalid store {}: {reason}", path.display())
            }
            Self::Precondition(msg) => write!(f, "precondition violated: {msg}"),
            Self::KeyNotFound(id) => write!(f, "document not found: {id}"),
            Self::Store { context, source } => write!(f, "{context}: {source}"),
            Self::Codec(e) => write!(f, "payload codec: {e}"),
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Store { source, .. } => Some(source.as_ref()),
            Self::Codec(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<bincode::Error> for CorpusError {
    fn from(e: bincode::Error) -> Self {
        Self::Codec(e)
    }
}

impl CorpusError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StoreCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the snapshot that raised this error is still usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::ErrorKind;

    #[test]
    fn display_malformed_includes_line() {
        let err = CorpusError::malformed(42, "missing field 'title'");
        let msg = format!("{err}");
        assert!(msg.contains("line 42"));
        assert!(msg.contains("title"));
    }

    #[test]
    fn display_io_includes_path() {
        let err = CorpusError::io(
            "/nope/papers.jsonl",
            std::io::Error::new(ErrorKind::NotFound, "not found"),
        );
        let msg = format!("{err}");
        assert!(msg.starts_with("IO:"));
        assert!(msg.contains("/nope/papers.jsonl"));
    }

    #[test]
    fn io_exposes_source() {
        let err = CorpusError::io("x", std::io::Error::other("boom"));
        assert!(err.source().is_some());
    }

    #[test]
    fn key_not_found_is_recoverable() {
        assert!(CorpusError::KeyNotFound("p1".into()).is_recoverable());
    }

    #[test]
    fn store_errors_not_recoverable() {
        assert!(!CorpusError::StoreNotFound("db".into()).is_recoverable());
        assert!(!CorpusError::corrupt("db", "no build_info").is_recoverable());
        assert!(!CorpusError::Precondition("train_frac".into()).is_recoverable());
    }
}
