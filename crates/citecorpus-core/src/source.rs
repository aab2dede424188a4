//! Line-oriented record source: local JSONL file, optionally gzip-compressed.
//!
//! [`RecordStream`] is single-pass. It owns the reader and yields one
//! normalized document per non-blank line; once drained it cannot be rewound.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::read::MultiGzDecoder;

use crate::error::{CorpusError, Result};
use crate::record::{Normalized, normalize, parse_record};

/// Buffer size for the source reader (256KB)
const SOURCE_BUF_SIZE: usize = 256 * 1024;

/// Initial capacity for per-line JSON read buffer
const LINE_BUF_CAPACITY: usize = 4096;

/// Shared byte counter for progress tracking (counts on-disk bytes)
pub type ByteCounter = Arc<AtomicU64>;

/// Buffered reader over a plain or gzipped source file
pub type SourceReader = BufReader<Box<dyn Read + Send>>;

/// Reader wrapper that tracks bytes read
pub struct CountingReader<R> {
    inner: R,
    count: ByteCounter,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a source file → (reader, byte_counter, total_bytes)
///
/// Files ending in `.gz` are decompressed transparently; the counter tracks
/// compressed bytes so it can be compared against `total_bytes`.
pub fn open_source(path: &Path) -> Result<(SourceReader, ByteCounter, u64)> {
    let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
    let total_bytes = file.metadata().map_err(|e| CorpusError::io(path, e))?.len();

    let counter = Arc::new(AtomicU64::new(0));
    let counting = CountingReader {
        inner: file,
        count: counter.clone(),
    };
    let inner: Box<dyn Read + Send> = if is_gzip(path) {
        Box::new(MultiGzDecoder::new(counting))
    } else {
        Box::new(counting)
    };
    Ok((
        BufReader::with_capacity(SOURCE_BUF_SIZE, inner),
        counter,
        total_bytes,
    ))
}

/// Running counters for a [`RecordStream`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamStats {
    /// Lines read, including blank ones.
    pub lines_scanned: usize,
    pub records: usize,
    pub self_citations_removed: usize,
}

/// One-shot iterator of normalized documents over a source reader.
///
/// Yields `Err` for the first malformed line or read failure and then
/// stops; callers abort ingestion on error.
pub struct RecordStream<R> {
    reader: R,
    path: PathBuf,
    buf: String,
    stats: StreamStats,
    done: bool,
}

impl RecordStream<SourceReader> {
    /// Open `path` and stream its records.
    pub fn open(path: &Path) -> Result<(Self, ByteCounter, u64)> {
        let (reader, counter, total) = open_source(path)?;
        Ok((Self::new(reader, path), counter, total))
    }
}

impl<R: BufRead> RecordStream<R> {
    pub fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            buf: String::with_capacity(LINE_BUF_CAPACITY),
            stats: StreamStats::default(),
            done: false,
        }
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    fn next_record(&mut self) -> Result<Option<Normalized>> {
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf).map_err(|e| {
                if e.kind() == io::ErrorKind::InvalidData {
                    CorpusError::malformed(self.stats.lines_scanned + 1, e.to_string())
                } else {
                    CorpusError::io(&self.path, e)
                }
            })?;
            if n == 0 {
                return Ok(None);
            }
            self.stats.lines_scanned += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            let raw = parse_record(line, self.stats.lines_scanned)?;
            let normalized = normalize(raw, self.stats.lines_scanned)?;
            self.stats.records += 1;
            if normalized.dropped_self_citation {
                self.stats.self_citations_removed += 1;
            }
            return Ok(Some(normalized));
        }
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = Result<Normalized>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(n)) => Some(Ok(n)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;

    const TWO_RECORDS: &str = concat!(
        r#"{"paper_id":"a","title":"A","abstract":"","authors":[],"out_citations":["a","b"]}"#,
        "\n\n",
        r#"{"paper_id":"b","title":"B","abstract":"","authors":[],"out_citations":["a"],"year":1999}"#,
        "\n",
    );

    fn stream(text: &str) -> RecordStream<Cursor<Vec<u8>>> {
        RecordStream::new(Cursor::new(text.as_bytes().to_vec()), Path::new("mem"))
    }

    #[test]
    fn yields_records_and_skips_blank_lines() {
        let mut s = stream(TWO_RECORDS);
        let docs: Vec<_> = s.by_ref().map(|r| r.unwrap().document).collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a");
        assert_eq!(docs[0].citations, vec!["b"]);
        assert_eq!(docs[1].year, 1999);

        let stats = s.stats();
        assert_eq!(stats.lines_scanned, 3);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.self_citations_removed, 1);
    }

    #[test]
    fn stops_after_first_error() {
        let text = "{\"paper_id\":\"a\"}\n{\"paper_id\":\"b\",\"title\":\"\",\"abstract\":\"\",\"authors\":[],\"out_citations\":[]}\n";
        let mut s = stream(text);
        match s.next() {
            Some(Err(CorpusError::MalformedRecord { line, .. })) => assert_eq!(line, 1),
            other => panic!("expected malformed record, got {other:?}"),
        }
        assert!(s.next().is_none());
    }

    #[test]
    fn invalid_utf8_line_is_malformed() {
        let mut bytes = TWO_RECORDS.as_bytes().to_vec();
        bytes.extend_from_slice(b"{\"paper_id\":\"\xff\xfe\"}\n");
        let mut s = RecordStream::new(Cursor::new(bytes), Path::new("mem"));
        assert_eq!(s.by_ref().take(2).filter(|r| r.is_ok()).count(), 2);
        match s.next() {
            Some(Err(CorpusError::MalformedRecord { line, .. })) => assert_eq!(line, 4),
            other => panic!("expected malformed record, got {other:?}"),
        }
        assert!(s.next().is_none());
    }

    #[test]
    fn exhausted_stream_stays_exhausted() {
        let mut s = stream(TWO_RECORDS);
        assert_eq!(s.by_ref().count(), 2);
        assert!(s.next().is_none());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_source(&dir.path().join("missing.jsonl")).err().unwrap();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn open_plain_file_counts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.jsonl");
        std::fs::write(&path, TWO_RECORDS).unwrap();

        let (s, counter, total) = RecordStream::open(&path).unwrap();
        assert_eq!(s.count(), 2);
        assert_eq!(total, TWO_RECORDS.len() as u64);
        assert_eq!(counter.load(Ordering::Relaxed), total);
    }

    #[test]
    fn open_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.jsonl.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(TWO_RECORDS.as_bytes()).unwrap();
        enc.finish().unwrap();

        let (s, _, _) = RecordStream::open(&path).unwrap();
        let ids: Vec<_> = s.map(|r| r.unwrap().document.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
