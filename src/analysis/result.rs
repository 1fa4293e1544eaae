//! Finalized analysis output.

use std::collections::HashMap;

use crate::record::RecordKind;
use crate::stats::{ExpireBucket, KeyInfo, TypeStat};

/// Immutable outcome of one full analysis pass over a source.
///
/// Produced only by [`crate::analysis::AnalysisAggregator::finalize`]; all
/// fields are settled at that point and never mutated again. Every known
/// type kind and expiration bucket is present in its map even when zero.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnalysisResult {
    /// Opaque identifier of the analyzed source (e.g. a file path).
    pub source_id: String,
    /// Sum of all record sizes, in bytes.
    pub total_memory: u64,
    /// Human-readable rendering of `total_memory`.
    pub total_memory_readable: String,
    /// Number of records processed.
    pub total_keys: u64,
    /// Count/memory per recognized type tag.
    pub type_stats: HashMap<RecordKind, TypeStat>,
    /// Count/memory per expiration-age bucket.
    pub expire_stats: HashMap<ExpireBucket, TypeStat>,
    /// Largest individual keys, size-descending, at most the selector
    /// capacity.
    pub top_keys: Vec<KeyInfo>,
    /// Largest aggregated prefixes, size-descending, at most the selector
    /// capacity.
    pub top_prefixes: Vec<KeyInfo>,
    /// Full per-prefix accumulation map the top list was drawn from.
    pub prefix_totals: HashMap<String, KeyInfo>,
}

impl AnalysisResult {
    /// Stats for one type kind. Always present.
    pub fn type_stat(&self, kind: RecordKind) -> TypeStat {
        self.type_stats.get(&kind).copied().unwrap_or_default()
    }

    /// Stats for one expiration bucket. Always present.
    pub fn expire_stat(&self, bucket: ExpireBucket) -> TypeStat {
        self.expire_stats.get(&bucket).copied().unwrap_or_default()
    }
}
