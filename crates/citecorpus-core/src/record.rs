//! Raw source records and their normalization into [`Document`]

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::document::{DEFAULT_YEAR, Document};
use crate::error::{CorpusError, Result};

/// One line of the source, as found on disk.
///
/// Required fields are `Option` so that absence is reported as a
/// [`CorpusError::MalformedRecord`] naming the field instead of a generic
/// parse failure. Semantic Scholar corpus dumps use camelCase names, accepted
/// as aliases. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "id", alias = "paperId")]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract", alias = "paperAbstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<AuthorField>>,
    #[serde(default, alias = "outCitations")]
    pub out_citations: Option<Vec<String>>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// Author as either a bare name or an object with a `name` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    Name(String),
    Entry { name: String },
}

impl AuthorField {
    pub fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Entry { name } => name,
        }
    }
}

/// Result of normalizing one record.
#[derive(Debug)]
pub struct Normalized {
    pub document: Document,
    /// The record listed its own id among its citations.
    pub dropped_self_citation: bool,
}

fn required<T>(value: Option<T>, field: &str, line: usize) -> Result<T> {
    value.ok_or_else(|| CorpusError::malformed(line, format!("missing field '{field}'")))
}

/// Parse one JSON line into a [`RawRecord`].
pub fn parse_record(json: &str, line: usize) -> Result<RawRecord> {
    sonic_rs::from_str(json).map_err(|e| CorpusError::malformed(line, e.to_string()))
}

/// Convert a raw record into its canonical document.
///
/// Citations collapse to a sorted set with the record's own id removed.
/// A missing `year` becomes [`DEFAULT_YEAR`].
pub fn normalize(raw: RawRecord, line: usize) -> Result<Normalized> {
    let id = required(raw.paper_id, "paper_id", line)?;
    let title = required(raw.title, "title", line)?;
    let abstract_text = required(raw.abstract_text, "abstract", line)?;
    let authors = required(raw.authors, "authors", line)?;
    let out_citations = required(raw.out_citations, "out_citations", line)?;

    let mut citations: BTreeSet<String> = out_citations.into_iter().collect();
    let dropped_self_citation = citations.remove(&id);

    Ok(Normalized {
        document: Document {
            title,
            abstract_text,
            authors: authors.into_iter().map(AuthorField::into_name).collect(),
            citations: citations.into_iter().collect(),
            year: raw.year.unwrap_or(DEFAULT_YEAR),
            venue: raw.venue,
            id,
        },
        dropped_self_citation,
    })
}
