//! Single-pass aggregation
//!
//! One [`AnalysisAggregator`] owns every accumulator for one source. Records
//! are folded in one at a time; `finalize` consumes the aggregator and
//! materializes the immutable [`AnalysisResult`], so nothing can be added
//! after finalization by construction.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::analysis::AnalysisResult;
use crate::record::Record;
use crate::stats::{
    BoundedTopN, ExpirationBucketer, KeyInfo, PrefixAggregator, TypeStatsAccumulator,
};
use crate::util::format_bytes;

/// Capacity of both top-N selectors (largest keys, largest prefixes).
pub const TOP_CAPACITY: usize = 500;

/// Accumulator set for one in-progress analysis pass.
///
/// `now` is sampled once at construction and used for every expiration
/// classification in the pass, so a long pass stays internally consistent.
#[derive(Debug)]
pub struct AnalysisAggregator {
    source_id: String,
    total_memory: u64,
    total_keys: u64,
    type_stats: TypeStatsAccumulator,
    expire_stats: ExpirationBucketer,
    prefixes: PrefixAggregator,
    top_keys: BoundedTopN<KeyInfo>,
}

impl AnalysisAggregator {
    /// Start a pass for `source_id`, classifying expirations against the
    /// current wall clock.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self::with_now(source_id, Utc::now())
    }

    /// Start a pass with an explicit reference instant. Used by tests that
    /// need deterministic bucket classification.
    pub fn with_now(source_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            source_id: source_id.into(),
            total_memory: 0,
            total_keys: 0,
            type_stats: TypeStatsAccumulator::new(),
            expire_stats: ExpirationBucketer::new(now),
            prefixes: PrefixAggregator::new(),
            top_keys: BoundedTopN::new(TOP_CAPACITY),
        }
    }

    /// Fold one record into every accumulator.
    ///
    /// The accumulators are independent; each record visits all of them
    /// exactly once.
    pub fn record(&mut self, record: &Record) {
        self.total_keys += 1;
        self.total_memory += record.size;
        self.type_stats.record(record);
        self.expire_stats.record(record);
        self.prefixes.record(record);
        self.top_keys.add(KeyInfo::from_record(record));
    }

    /// Records folded in so far.
    pub fn total_keys(&self) -> u64 {
        self.total_keys
    }

    /// End the pass: drain both selectors and settle the result.
    pub fn finalize(self) -> AnalysisResult {
        let (top_prefixes, prefix_totals) = self.prefixes.finalize(TOP_CAPACITY);
        let result = AnalysisResult {
            source_id: self.source_id,
            total_memory: self.total_memory,
            total_memory_readable: format_bytes(self.total_memory),
            total_keys: self.total_keys,
            type_stats: self.type_stats.into_stats(),
            expire_stats: self.expire_stats.into_stats(),
            top_keys: self.top_keys.into_sorted_desc(),
            top_prefixes,
            prefix_totals,
        };
        debug!(
            source_id = %result.source_id,
            total_keys = result.total_keys,
            total_memory = result.total_memory,
            prefixes = result.prefix_totals.len(),
            "analysis finalized"
        );
        result
    }
}
