//! Read-only access to a built store.

use std::path::{Path, PathBuf};

use citecorpus_core::{CorpusError, Document, Result, decode_document};
use duckdb::{AccessMode, Config, Connection, OptionalExt, params};

use crate::error::StoreContext;
use crate::sql;

/// Contents of the `build_info` marker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub format_version: i32,
    pub n_docs: u64,
    pub n_duplicates: u64,
    pub source_hash: String,
    pub built_at: String,
}

/// Read-only handle on a store file.
///
/// The connection is opened with `AccessMode::ReadOnly`, so no statement
/// issued through it can write. It is closed when the reader is dropped.
pub struct StoreReader {
    conn: Connection,
    path: PathBuf,
    info: BuildInfo,
}

impl std::fmt::Debug for StoreReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreReader")
            .field("path", &self.path)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl StoreReader {
    /// Open and validate a store.
    ///
    /// Fails with `StoreNotFound` if `path` does not exist and `StoreCorrupt`
    /// if it is not a DuckDB file, lacks the corpus tables, was left behind
    /// by an unfinished build, or its two data tables disagree on row count or
    /// id set.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CorpusError::StoreNotFound(path.to_path_buf()));
        }

        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .store_context("Failed to build read-only config")?;
        let conn = Connection::open_with_flags(path, config)
            .map_err(|e| CorpusError::corrupt(path, format!("cannot open as DuckDB: {e}")))?;

        let tables: i64 = conn
            .query_row(sql::count_store_tables(), [], |row| row.get(0))
            .store_context("Failed to inspect store tables")?;
        if tables != 3 {
            return Err(CorpusError::corrupt(path, "missing corpus tables"));
        }

        let info = conn
            .query_row(sql::select_build_info(), [], |row| {
                Ok(BuildInfo {
                    format_version: row.get(0)?,
                    n_docs: row.get::<_, i64>(1)? as u64,
                    n_duplicates: row.get::<_, i64>(2)? as u64,
                    source_hash: row.get(3)?,
                    built_at: row.get(4)?,
                })
            })
            .optional()
            .store_context("Failed to read build_info")?
            .ok_or_else(|| CorpusError::corrupt(path, "build did not complete"))?;

        if info.format_version != sql::FORMAT_VERSION {
            return Err(CorpusError::corrupt(
                path,
                format!(
                    "format_version {} != supported {}",
                    info.format_version,
                    sql::FORMAT_VERSION
                ),
            ));
        }

        let reader = Self {
            conn,
            path: path.to_path_buf(),
            info,
        };
        let (n_ids, n_documents) = (reader.count_ids()?, reader.count_documents()?);
        if n_ids != n_documents || n_ids != reader.info.n_docs {
            return Err(CorpusError::corrupt(
                path,
                format!(
                    "row counts disagree: ids={n_ids} documents={n_documents} build_info={}",
                    reader.info.n_docs
                ),
            ));
        }
        let mismatches = reader.id_mismatches()?;
        if mismatches > 0 {
            return Err(CorpusError::corrupt(
                path,
                format!("{mismatches} ids present in only one of ids/documents"),
            ));
        }
        Ok(reader)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.info
    }

    pub fn count_ids(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row(sql::count_ids(), [], |row| row.get(0))
            .store_context("Failed to count ids")?;
        Ok(n as u64)
    }

    pub fn count_documents(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row(sql::count_documents(), [], |row| row.get(0))
            .store_context("Failed to count documents")?;
        Ok(n as u64)
    }

    /// Number of ids present in only one of the two data tables.
    pub fn id_mismatches(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row(sql::count_id_mismatches(), [], |row| row.get(0))
            .store_context("Failed to compare id sets")?;
        Ok(n as u64)
    }

    /// Smallest and largest year, `None` for an empty store.
    pub fn year_range(&self) -> Result<Option<(i32, i32)>> {
        let (lo, hi): (Option<i32>, Option<i32>) = self
            .conn
            .query_row(sql::year_range(), [], |row| Ok((row.get(0)?, row.get(1)?)))
            .store_context("Failed to read year range")?;
        Ok(lo.zip(hi))
    }

    /// All ids ordered by `(year, id)`.
    pub fn ordered_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(sql::select_ordered_ids())
            .store_context("Failed to prepare id scan")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .store_context("Failed to scan ids")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to read id row")?;
        Ok(ids)
    }

    /// Stream `(id, payload)` rows in [`Self::ordered_ids`] order, handing
    /// them to `sink` in chunks of at most `chunk` rows.
    pub fn for_each_payload_chunk(
        &self,
        chunk: usize,
        mut sink: impl FnMut(Vec<(String, Vec<u8>)>) -> Result<()>,
    ) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare(sql::select_ordered_payloads())
            .store_context("Failed to prepare payload scan")?;
        let mut rows = stmt.query([]).store_context("Failed to scan payloads")?;

        let mut buf = Vec::with_capacity(chunk);
        while let Some(row) = rows.next().store_context("Failed to read payload row")? {
            let id: String = row.get(0).store_context("Failed to read payload id")?;
            let payload: Vec<u8> = row.get(1).store_context("Failed to read payload")?;
            buf.push((id, payload));
            if buf.len() >= chunk {
                sink(std::mem::replace(&mut buf, Vec::with_capacity(chunk)))?;
            }
        }
        if !buf.is_empty() {
            sink(buf)?;
        }
        Ok(())
    }

    /// Point lookup of one document without materializing the corpus.
    pub fn fetch(&self, id: &str) -> Result<Document> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(sql::select_payload(), params![id], |row| row.get(0))
            .optional()
            .with_store_context(|| format!("Failed to look up {id}"))?;
        match payload {
            Some(bytes) => decode_document(&bytes),
            None => Err(CorpusError::KeyNotFound(id.to_string())),
        }
    }
}
