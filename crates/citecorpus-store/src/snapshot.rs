//! Fully materialized, read-only view of a corpus store.
//!
//! Opening runs two passes over the store: the ordered id scan, then the
//! payload scan in the same order, decoded in parallel chunks. After that the
//! store handle is released; every query is answered from memory.

use std::collections::HashSet;
use std::hash::BuildHasher;
use std::path::Path;
use std::time::Instant;

use citecorpus_core::{CorpusError, Document, ProgressContext, Result, decode_document, fmt_num};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::OpenConfig;
use crate::reader::{BuildInfo, StoreReader};
use crate::split::{Split, SplitBounds};

/// In-memory corpus with chronological train/valid/test partitions.
///
/// `documents[i].id == all_ids[i]` for every position, and the order is
/// ascending by `(year, id)`. No operation mutates a snapshot, so it can be
/// shared freely between threads.
#[derive(Debug)]
pub struct Corpus {
    all_ids: Vec<String>,
    documents: Vec<Document>,
    id_index: FxHashMap<String, usize>,
    bounds: SplitBounds,
    train_frac: f64,
    info: BuildInfo,
}

impl Corpus {
    /// Open `path` with the given training fraction.
    pub fn open(path: &Path, train_frac: f64) -> Result<Self> {
        Self::open_with(path, &OpenConfig::with_train_frac(train_frac))
    }

    pub fn open_with(path: &Path, config: &OpenConfig) -> Result<Self> {
        Self::open_with_progress(path, config, &ProgressContext::hidden())
    }

    pub fn open_with_progress(
        path: &Path,
        config: &OpenConfig,
        progress: &ProgressContext,
    ) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        // Dropped on every return path below, including partial loads.
        let reader = StoreReader::open(path)?;
        let pb = progress.stage_line("load");

        pb.set_message("scanning ids");
        let all_ids = reader.ordered_ids()?;
        let n = all_ids.len();
        log::info!("Loaded {} ids from {}", fmt_num(n), path.display());

        let mut id_index: FxHashMap<String, usize> =
            FxHashMap::with_capacity_and_hasher(n, Default::default());
        for (pos, id) in all_ids.iter().enumerate() {
            if id_index.insert(id.clone(), pos).is_some() {
                return Err(CorpusError::corrupt(path, format!("duplicate id {id}")));
            }
        }

        log::info!("Loading documents into memory");
        let mut documents: Vec<Document> = Vec::with_capacity(n);
        reader.for_each_payload_chunk(config.decode_chunk, |rows| {
            let decoded = rows
                .par_iter()
                .map(|(_, payload)| decode_document(payload))
                .collect::<Result<Vec<_>>>()?;
            for ((row_id, _), doc) in rows.iter().zip(decoded) {
                let pos = documents.len();
                if all_ids.get(pos) != Some(row_id) || doc.id != *row_id {
                    return Err(CorpusError::corrupt(
                        path,
                        format!("payload for {row_id} out of order at position {pos}"),
                    ));
                }
                documents.push(doc);
            }
            pb.set_message(format!("{} / {} documents", fmt_num(documents.len()), fmt_num(n)));
            Ok(())
        })?;

        if documents.len() != n {
            return Err(CorpusError::corrupt(
                path,
                format!("{} payloads for {n} ids", documents.len()),
            ));
        }
        let info = reader.build_info().clone();
        drop(reader);
        pb.finish_and_clear();

        let bounds = SplitBounds::new(n, config.train_frac);
        log::info!("{} training docs", fmt_num(bounds.n_train));
        log::info!("{} validation docs", fmt_num(bounds.n_valid));
        log::info!("{} testing docs", fmt_num(bounds.n_test));
        log::info!("Corpus ready in {:.1}s", start.elapsed().as_secs_f64());

        Ok(Self {
            all_ids,
            documents,
            id_index,
            bounds,
            train_frac: config.train_frac,
            info,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn train_frac(&self) -> f64 {
        self.train_frac
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.info
    }

    pub fn bounds(&self) -> SplitBounds {
        self.bounds
    }

    /// Every id in stored order.
    pub fn all_ids(&self) -> &[String] {
        &self.all_ids
    }

    pub fn train_ids(&self) -> &[String] {
        self.split_ids(Split::Train)
    }

    pub fn valid_ids(&self) -> &[String] {
        self.split_ids(Split::Valid)
    }

    pub fn test_ids(&self) -> &[String] {
        self.split_ids(Split::Test)
    }

    pub fn split_ids(&self, split: Split) -> &[String] {
        &self.all_ids[self.bounds.range(split)]
    }

    pub fn split_documents(&self, split: Split) -> &[Document] {
        &self.documents[self.bounds.range(split)]
    }

    /// Partition containing `id`, if it is in the corpus.
    pub fn split_of(&self, id: &str) -> Option<Split> {
        self.position(id).and_then(|pos| self.bounds.split_of(pos))
    }

    /// Restartable iteration over documents in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Result<&Document> {
        self.position(id)
            .map(|pos| &self.documents[pos])
            .ok_or_else(|| CorpusError::KeyNotFound(id.to_string()))
    }

    /// Lazily yield `(id, document)` for each document whose id is in `ids`,
    /// in stored order.
    pub fn select<'a, S: BuildHasher>(
        &'a self,
        ids: &'a HashSet<String, S>,
    ) -> impl Iterator<Item = (&'a str, &'a Document)> + 'a {
        self.documents
            .iter()
            .filter(move |doc| ids.contains(doc.id.as_str()))
            .map(|doc| (doc.id.as_str(), doc))
    }

    /// The subset of `ids` present in the corpus.
    pub fn filter<S: BuildHasher>(&self, ids: &HashSet<String, S>) -> FxHashSet<String> {
        ids.iter()
            .filter(|id| self.contains(id))
            .cloned()
            .collect()
    }

    /// Smallest and largest publication year.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.documents.first()?.year;
        let last = self.documents.last()?.year;
        Some((first, last))
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
