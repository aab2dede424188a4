//! Canonical paper record and its binary payload encoding
//!
//! Payloads are bincode-encoded [`Document`] values. The field order of the
//! struct is the wire layout, so fields must only ever be appended.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Year assigned to records that do not carry one.
///
/// Affects chronological ordering and therefore partition membership.
pub const DEFAULT_YEAR: i32 = 2017;

/// One paper as stored in the corpus.
///
/// `citations` is deduplicated, sorted, and never contains `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub citations: Vec<String>,
    pub year: i32,
    pub venue: Option<String>,
}

impl Document {
    /// Whether `id` is among this document's outbound citations.
    pub fn cites(&self, id: &str) -> bool {
        self.citations
            .binary_search_by(|c| c.as_str().cmp(id))
            .is_ok()
    }
}

/// Serialize a document into its stored payload bytes.
pub fn encode_document(doc: &Document) -> Result<Vec<u8>> {
    Ok(bincode::serialize(doc)?)
}

/// Deserialize stored payload bytes.
pub fn decode_document(bytes: &[u8]) -> Result<Document> {
    Ok(bincode::deserialize(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorpusError;

    fn sample() -> Document {
        Document {
            id: "p1".to_string(),
            title: "Attention Is All You Need".to_string(),
            abstract_text: "The dominant sequence transduction models...".to_string(),
            authors: vec!["Vaswani".to_string(), "Shazeer".to_string()],
            citations: vec!["p0".to_string(), "p7".to_string()],
            year: 2017,
            venue: Some("NeurIPS".to_string()),
        }
    }

    #[test]
    fn payload_roundtrip() {
        let doc = sample();
        let bytes = encode_document(&doc).unwrap();
        assert_eq!(decode_document(&bytes).unwrap(), doc);
    }

    #[test]
    fn payload_roundtrip_empty_fields() {
        let doc = Document {
            id: "x".to_string(),
            title: String::new(),
            abstract_text: String::new(),
            authors: vec![],
            citations: vec![],
            year: DEFAULT_YEAR,
            venue: None,
        };
        let bytes = encode_document(&doc).unwrap();
        assert_eq!(decode_document(&bytes).unwrap(), doc);
    }

    #[test]
    fn author_order_preserved() {
        let mut doc = sample();
        doc.authors = vec!["Zed".into(), "Abe".into(), "Mia".into()];
        let back = decode_document(&encode_document(&doc).unwrap()).unwrap();
        assert_eq!(back.authors, vec!["Zed", "Abe", "Mia"]);
    }

    #[test]
    fn decode_garbage_is_codec_error() {
        let err = decode_document(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, CorpusError::Codec(_)));
    }

    #[test]
    fn cites_uses_sorted_citations() {
        let doc = sample();
        assert!(doc.cites("p0"));
        assert!(doc.cites("p7"));
        assert!(!doc.cites("p1"));
    }
}
