//! SQL for the corpus store.
//!
//! Layout:
//! - `ids(id, year)`: lightweight metadata index, scanned in year order
//! - `documents(id, payload)`: bincode payloads, point lookup by id
//! - `build_info`: one row written at the end of a successful build
//!
//! Both data tables are filled from the same batches, so their id sets are
//! equal; nothing in the schema enforces it.

/// Bumped whenever the table layout or payload encoding changes.
pub const FORMAT_VERSION: i32 = 1;

pub const IDS_TABLE: &str = "ids";
pub const DOCUMENTS_TABLE: &str = "documents";

/// Drop any previous build at the target.
pub fn drop_tables() -> &'static str {
    "DROP TABLE IF EXISTS build_info;
     DROP TABLE IF EXISTS documents;
     DROP TABLE IF EXISTS ids;"
}

/// Create data tables and the build marker table.
pub fn create_tables() -> &'static str {
    "CREATE TABLE IF NOT EXISTS ids (id VARCHAR, year INTEGER);
     CREATE TABLE IF NOT EXISTS documents (id VARCHAR, payload BLOB);
     CREATE TABLE IF NOT EXISTS build_info (
       format_version INTEGER,
       n_docs BIGINT,
       n_duplicates BIGINT,
       source_hash VARCHAR,
       built_at VARCHAR
     );"
}

/// Secondary indexes, built once the load transaction has committed.
pub fn create_indexes() -> &'static str {
    "CREATE INDEX IF NOT EXISTS year_idx ON ids (year);
     CREATE INDEX IF NOT EXISTS id_idx ON ids (id);
     CREATE INDEX IF NOT EXISTS id_doc_idx ON documents (id);"
}

pub fn insert_build_info() -> &'static str {
    "INSERT INTO build_info (format_version, n_docs, n_duplicates, source_hash, built_at)
     VALUES (?, ?, ?, ?, ?)"
}

/// Tables a valid store must contain.
pub fn count_store_tables() -> &'static str {
    "SELECT COUNT(*) FROM information_schema.tables
     WHERE table_name IN ('ids', 'documents', 'build_info')"
}

pub fn select_build_info() -> &'static str {
    "SELECT format_version, n_docs, n_duplicates, source_hash, built_at FROM build_info"
}

pub fn count_ids() -> &'static str {
    "SELECT COUNT(*) FROM ids"
}

pub fn count_documents() -> &'static str {
    "SELECT COUNT(*) FROM documents"
}

/// Pass 1: the chronological id order. `id` breaks ties within a year so the
/// order does not depend on physical row layout.
pub fn select_ordered_ids() -> &'static str {
    "SELECT id FROM ids ORDER BY year, id"
}

/// Pass 2: payloads in the same order as [`select_ordered_ids`].
pub fn select_ordered_payloads() -> &'static str {
    "SELECT d.id, d.payload
     FROM documents d
     JOIN ids i ON d.id = i.id
     ORDER BY i.year, i.id"
}

/// Point lookup of one payload.
pub fn select_payload() -> &'static str {
    "SELECT payload FROM documents WHERE id = ?"
}

/// Ids present in exactly one of the two data tables.
pub fn count_id_mismatches() -> &'static str {
    "SELECT COUNT(*) FROM (
       (SELECT id FROM ids EXCEPT SELECT id FROM documents)
       UNION ALL
       (SELECT id FROM documents EXCEPT SELECT id FROM ids)
     )"
}

pub fn year_range() -> &'static str {
    "SELECT MIN(year), MAX(year) FROM ids"
}

/// Build-time settings. `checkpoint_threshold` defers WAL checkpoints so the
/// bulk load is not fsync-bound.
pub fn configure_build(memory_limit: &str, threads: usize, checkpoint_threshold: &str) -> String {
    format!(
        "SET memory_limit = '{memory_limit}';
         SET threads = {threads};
         SET checkpoint_threshold = '{checkpoint_threshold}';
         SET preserve_insertion_order = true;"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_build_interpolates() {
        let sql = configure_build("4GB", 8, "1GB");
        assert!(sql.contains("memory_limit = '4GB'"));
        assert!(sql.contains("threads = 8"));
        assert!(sql.contains("checkpoint_threshold = '1GB'"));
    }

    #[test]
    fn ordered_queries_share_order() {
        assert!(select_ordered_ids().ends_with("ORDER BY year, id"));
        assert!(select_ordered_payloads().ends_with("ORDER BY i.year, i.id"));
    }
}
