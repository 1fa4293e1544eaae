//! Per-type count/memory accumulation.

use std::collections::HashMap;

use crate::record::{Record, RecordKind};

/// Running count and memory total for one classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeStat {
    /// Number of keys seen.
    pub count: u64,
    /// Accumulated size in bytes.
    pub memory: u64,
}

impl TypeStat {
    /// Fold one record-sized contribution in.
    pub fn observe(&mut self, size: u64) {
        self.count += 1;
        self.memory += size;
    }
}

/// Accumulates count/memory per recognized type tag.
///
/// Records whose tag is not one of the five known kinds are silently skipped
/// here; they still count toward the analysis-wide totals. All five kinds are
/// pre-populated so consumers never observe a missing key.
#[derive(Debug, Clone)]
pub struct TypeStatsAccumulator {
    stats: HashMap<RecordKind, TypeStat>,
}

impl TypeStatsAccumulator {
    /// Create an accumulator with every known kind zeroed.
    pub fn new() -> Self {
        let stats = RecordKind::ALL
            .iter()
            .map(|&kind| (kind, TypeStat::default()))
            .collect();
        Self { stats }
    }

    /// Fold one record into the breakdown, if its tag is recognized.
    pub fn record(&mut self, record: &Record) {
        if let Some(kind) = RecordKind::from_tag(&record.type_tag) {
            self.stats.entry(kind).or_default().observe(record.size);
        }
    }

    /// Stats for one kind.
    pub fn get(&self, kind: RecordKind) -> TypeStat {
        self.stats.get(&kind).copied().unwrap_or_default()
    }

    /// Release the finished breakdown.
    pub fn into_stats(self) -> HashMap<RecordKind, TypeStat> {
        self.stats
    }
}

impl Default for TypeStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
