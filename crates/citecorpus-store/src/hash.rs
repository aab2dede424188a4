//! Blake3 fingerprint of the source a store was built from

use std::path::Path;

use citecorpus_core::{CorpusError, Result};

/// Hash a source file's contents with blake3 (full hex digest).
pub fn hash_source(path: &Path) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_mmap(path)
        .map_err(|e| CorpusError::io(path, e))?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// First 8 hex characters of a digest, for display.
pub fn short_hash(hex: &str) -> &str {
    hex.get(..8).unwrap_or(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_source_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.jsonl");
        std::fs::write(&path, b"{\"paper_id\":\"1\"}\n").unwrap();
        let h = hash_source(&path).unwrap();
        assert_eq!(h, blake3::hash(b"{\"paper_id\":\"1\"}\n").to_hex().to_string());
    }

    #[test]
    fn hash_source_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = hash_source(&dir.path().join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn short_hash_length() {
        let h = blake3::hash(b"test").to_hex().to_string();
        assert_eq!(short_hash(&h).len(), 8);
        assert_eq!(short_hash("abc"), "abc");
    }
}
