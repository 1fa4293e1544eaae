//! # rdbstat
//!
//! Streaming memory analyzer for decoded database dump records.
//!
//! An external decoder walks a binary dump (e.g. a Redis RDB file) and yields
//! [`Record`] values; this crate consumes them in a single pass and produces
//! aggregate statistics:
//!
//! - total key count and memory footprint
//! - per-type count/memory breakdown
//! - an expiration-age histogram over nine fixed buckets
//! - the 500 largest keys and the 500 largest key-name prefixes, selected in
//!   bounded memory by a fixed-capacity min-heap
//!
//! The crate never opens dump files itself: the record sequence, the file
//! dialog, and any presentation layer are external collaborators. Results are
//! kept in an [`Analyzer`] store keyed by an opaque source identifier.
//!
//! ## Usage
//!
//! ```
//! use rdbstat::{Analyzer, Record};
//!
//! let mut analyzer = Analyzer::new();
//! let records = vec![Ok(Record {
//!     db: 0,
//!     key: "user:1:profile".into(),
//!     type_tag: "hash".into(),
//!     size: 1024,
//!     elements: 8,
//!     expiration: None,
//! })];
//! let result = analyzer.analyze_source("dump.rdb", records)?;
//! assert_eq!(result.total_keys, 1);
//! assert_eq!(result.total_memory_readable, "1.00 KB");
//! # Ok::<(), rdbstat::AnalysisError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod analysis;
pub mod record;
pub mod stats;
pub mod util;

pub use analysis::{AnalysisAggregator, AnalysisResult, TOP_CAPACITY};
pub use record::{DecodeError, Record, RecordKind};
pub use stats::{BoundedTopN, ExpireBucket, KeyInfo, Sizeable, TypeStat};

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

/// Errors that abort an analysis pass.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The record source produced a malformed record mid-stream. The partial
    /// pass is discarded; nothing is stored for the source.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The underlying source could not be opened or read at all, before any
    /// accumulation began.
    #[error("source unavailable: {path}")]
    SourceUnavailable {
        /// Path or identifier of the source that failed to open.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Analysis front door: runs passes and stores their results.
///
/// One result per source identifier, written exactly once on successful
/// finalization and never implicitly evicted. A failed pass leaves no trace;
/// querying an unanalyzed source is a `None`, not an error.
#[derive(Debug, Default)]
pub struct Analyzer {
    results: HashMap<String, AnalysisResult>,
}

impl Analyzer {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one full single-threaded pass over `records` and store the result
    /// under `source_id`.
    ///
    /// The sequence yields `Result` items so a decoder can fail mid-stream;
    /// the first `Err` aborts the pass and the partially accumulated state is
    /// dropped rather than published. A successful pass replaces any earlier
    /// result for the same identifier.
    pub fn analyze_source<I>(
        &mut self,
        source_id: &str,
        records: I,
    ) -> Result<&AnalysisResult, AnalysisError>
    where
        I: IntoIterator<Item = Result<Record, DecodeError>>,
    {
        debug!(source_id, "analysis pass started");
        let mut aggregator = AnalysisAggregator::new(source_id);
        for record in records {
            aggregator.record(&record?);
        }
        let result = aggregator.finalize();
        self.results.insert(source_id.to_string(), result);
        Ok(&self.results[source_id])
    }

    /// Look up the stored result for a source. `None` when the source was
    /// never analyzed or its analysis failed.
    pub fn result(&self, source_id: &str) -> Option<&AnalysisResult> {
        self.results.get(source_id)
    }

    /// Identifiers of every successfully analyzed source.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_record(key: &str, size: u64) -> Result<Record, DecodeError> {
        Ok(Record {
            db: 0,
            key: key.into(),
            type_tag: "string".into(),
            size,
            elements: 1,
            expiration: None,
        })
    }

    #[test]
    fn successful_pass_is_stored_and_queryable() {
        let mut analyzer = Analyzer::new();
        analyzer
            .analyze_source("dump.rdb", vec![ok_record("a:1", 10)])
            .unwrap();
        let result = analyzer.result("dump.rdb").unwrap();
        assert_eq!(result.total_keys, 1);
        assert_eq!(result.source_id, "dump.rdb");
    }

    #[test]
    fn decode_failure_publishes_nothing() {
        let mut analyzer = Analyzer::new();
        let records = vec![
            ok_record("a:1", 10),
            Err(DecodeError::new("truncated payload")),
            ok_record("b:1", 20),
        ];
        let err = analyzer.analyze_source("broken.rdb", records).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
        assert!(analyzer.result("broken.rdb").is_none());
    }

    #[test]
    fn unknown_source_is_none_not_an_error() {
        let analyzer = Analyzer::new();
        assert!(analyzer.result("never-seen.rdb").is_none());
    }
}
