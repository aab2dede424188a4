//! One-shot bulk build of a corpus store from a JSONL source.
//!
//! Tables are recreated in autocommit mode and every row is appended inside a
//! single transaction. Indexes are built over the committed rows, then the
//! `build_info` marker is written last. A failure at any step leaves a store
//! without a marker, which [`crate::reader::StoreReader`] refuses to open.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use citecorpus_core::{
    BatchExt, CorpusError, Document, ProgressContext, RecordStream, Result, encode_document,
    fmt_num,
};
use duckdb::{Appender, Connection, params};
use rustc_hash::FxHashSet;

use crate::config::BuildConfig;
use crate::error::StoreContext;
use crate::hash::hash_source;
use crate::sql;

/// Statistics from a completed build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub lines_scanned: usize,
    pub documents_written: usize,
    /// Records skipped because their id was already written
    pub duplicates: usize,
    /// Records whose own id appeared in their citations
    pub self_citations_removed: usize,
    pub batches: usize,
    pub source_hash: String,
    pub elapsed: Duration,
}

/// Appends batches to both data tables through DuckDB appenders.
struct BatchWriter<'conn> {
    ids: Appender<'conn>,
    documents: Appender<'conn>,
}

impl<'conn> BatchWriter<'conn> {
    fn new(conn: &'conn Connection) -> Result<Self> {
        Ok(Self {
            ids: conn
                .appender(sql::IDS_TABLE)
                .store_context("Failed to create ids appender")?,
            documents: conn
                .appender(sql::DOCUMENTS_TABLE)
                .store_context("Failed to create documents appender")?,
        })
    }

    /// Write one batch to both tables. Payloads are encoded up front so an
    /// encoding failure never leaves a row in only one table.
    fn write(&mut self, docs: &[Document]) -> Result<()> {
        let payloads = docs
            .iter()
            .map(encode_document)
            .collect::<Result<Vec<_>>>()?;

        for (doc, payload) in docs.iter().zip(&payloads) {
            self.ids
                .append_row(params![doc.id, doc.year])
                .store_context("Failed to append id row")?;
            self.documents
                .append_row(params![doc.id, payload])
                .store_context("Failed to append document row")?;
        }
        self.ids.flush().store_context("Failed to flush ids")?;
        self.documents
            .flush()
            .store_context("Failed to flush documents")?;
        Ok(())
    }
}

/// Build a store at `target` from the records in `source`.
///
/// Existing tables at `target` are replaced.
pub fn build(target: &Path, source: &Path, config: &BuildConfig) -> Result<BuildSummary> {
    build_with_progress(target, source, config, &ProgressContext::hidden())
}

/// [`build`] with a progress bar over the source bytes.
pub fn build_with_progress(
    target: &Path,
    source: &Path,
    config: &BuildConfig,
    progress: &ProgressContext,
) -> Result<BuildSummary> {
    let start = Instant::now();
    log::info!(
        "Building corpus store {} from {}",
        target.display(),
        source.display()
    );

    let source_hash = hash_source(source)?;
    let (mut records, counter, total_bytes) = RecordStream::open(source)?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CorpusError::io(parent, e))?;
    }

    if target.exists() {
        std::fs::OpenOptions::new()
            .write(true)
            .open(target)
            .map_err(|e| CorpusError::io(target, e))?;
    }
    let mut conn = Connection::open(target)
        .map_err(|e| CorpusError::io(target, std::io::Error::other(e)))?;
    conn.execute_batch(&sql::configure_build(
        &config.memory_limit,
        config.threads,
        &config.checkpoint_threshold,
    ))
    .store_context("Failed to configure DuckDB")?;
    conn.execute_batch(sql::drop_tables())
        .store_context("Failed to drop previous tables")?;
    conn.execute_batch(sql::create_tables())
        .store_context("Failed to create tables")?;

    let pb = progress.source_bar("ingest", total_bytes);
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut documents_written = 0usize;
    let mut duplicates = 0usize;
    let mut batches = 0usize;

    let tx = conn
        .transaction()
        .store_context("Failed to begin load transaction")?;
    {
        let mut writer = BatchWriter::new(&tx)?;
        for batch in records.by_ref().batches(config.batch_size) {
            let mut docs: Vec<Document> = Vec::with_capacity(config.batch_size);
            for normalized in batch? {
                let doc = normalized.document;
                if seen.insert(doc.id.clone()) {
                    docs.push(doc);
                } else {
                    log::debug!("Skipping duplicate paper id {}", doc.id);
                    duplicates += 1;
                }
            }
            writer.write(&docs)?;
            documents_written += docs.len();
            batches += 1;

            pb.set_position(counter.load(Ordering::Relaxed));
            pb.set_message(format!("{} docs", fmt_num(documents_written)));
            log::debug!(
                "Batch {batches}: {} docs ({} total)",
                docs.len(),
                fmt_num(documents_written)
            );
        }
    }

    tx.commit().store_context("Failed to commit load transaction")?;

    log::info!("Indexing {} docs", fmt_num(documents_written));
    conn.execute_batch(sql::create_indexes())
        .store_context("Failed to create indexes")?;
    conn.execute(
        sql::insert_build_info(),
        params![
            sql::FORMAT_VERSION,
            documents_written as i64,
            duplicates as i64,
            source_hash,
            chrono::Utc::now().to_rfc3339(),
        ],
    )
    .store_context("Failed to write build_info")?;
    conn.execute_batch("CHECKPOINT")
        .store_context("Failed to checkpoint store")?;
    pb.finish_and_clear();

    let stats = records.stats();
    let summary = BuildSummary {
        lines_scanned: stats.lines_scanned,
        documents_written,
        duplicates,
        self_citations_removed: stats.self_citations_removed,
        batches,
        source_hash,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Build complete: {} docs in {} batches, {} duplicates skipped, {} self-citations removed ({:.1}s)",
        fmt_num(summary.documents_written),
        summary.batches,
        summary.duplicates,
        summary.self_citations_removed,
        summary.elapsed.as_secs_f64(),
    );
    Ok(summary)
}
