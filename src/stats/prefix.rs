//! Hierarchical prefix grouping
//!
//! Key names like `user:1:profile` carry an implicit hierarchy. This module
//! derives up to three prefix levels per key (`user`, `user:1`,
//! `user:1:profile`), accumulates size/element totals per prefix across the
//! whole stream, and surfaces the largest groups at finalization.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::record::Record;
use crate::stats::key_info::KeyInfo;
use crate::stats::topn::BoundedTopN;
use crate::util::format_bytes;

/// Candidate delimiters, in tie-break priority order.
pub const PREFIX_DELIMITERS: [char; 5] = [':', '|', '.', '_', '-'];

/// Deepest prefix level derived per key.
pub const MAX_PREFIX_LEVELS: usize = 3;

/// Pick the delimiter for a key: the candidate occurring at the earliest
/// index wins, with ties at the same index resolved by position in
/// [`PREFIX_DELIMITERS`] (only a strictly smaller index replaces the current
/// best).
pub fn pick_delimiter(key: &str) -> Option<char> {
    let mut best: Option<(usize, char)> = None;
    for candidate in PREFIX_DELIMITERS {
        if let Some(index) = key.find(candidate) {
            if best.map_or(true, |(best_index, _)| index < best_index) {
                best = Some((index, candidate));
            }
        }
    }
    best.map(|(_, delimiter)| delimiter)
}

/// Derive the level-`level` prefix of a key: its first `level` segments
/// rejoined with the chosen delimiter.
///
/// Returns `None` when the key contains no delimiter, has fewer than `level`
/// segments, or the joined prefix would be empty (key starting with its own
/// delimiter).
pub fn prefix_at_level(key: &str, level: usize) -> Option<String> {
    let delimiter = pick_delimiter(key)?;
    let segments: Vec<&str> = key.split(delimiter).collect();
    if segments.len() < level {
        return None;
    }
    let prefix = segments[..level].join(&delimiter.to_string());
    if prefix.is_empty() {
        return None;
    }
    Some(prefix)
}

/// Accumulates per-prefix size/element totals across one analysis pass.
///
/// The first record to touch a prefix fixes its db and type tag as display
/// metadata; every later record only adds size and elements.
#[derive(Debug, Clone, Default)]
pub struct PrefixAggregator {
    totals: HashMap<String, KeyInfo>,
}

impl PrefixAggregator {
    /// Empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into all of its derivable prefix levels.
    pub fn record(&mut self, record: &Record) {
        for level in 1..=MAX_PREFIX_LEVELS {
            let Some(prefix) = prefix_at_level(&record.key, level) else {
                continue;
            };
            match self.totals.entry(prefix) {
                Entry::Occupied(mut entry) => {
                    let info = entry.get_mut();
                    info.size += record.size;
                    info.elements += record.elements;
                }
                Entry::Vacant(entry) => {
                    let key = entry.key().clone();
                    entry.insert(KeyInfo {
                        db: record.db,
                        key,
                        type_tag: record.type_tag.clone(),
                        size: record.size,
                        readable_size: String::new(),
                        elements: record.elements,
                        expire: String::new(),
                    });
                }
            }
        }
    }

    /// Number of distinct prefixes accumulated so far.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// True when no prefix has been seen.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Accumulated totals for one prefix.
    pub fn get(&self, prefix: &str) -> Option<&KeyInfo> {
        self.totals.get(prefix)
    }

    /// Finish the pass: fill in readable sizes, rank every prefix through a
    /// bounded selector, and return the descending top list together with the
    /// full totals map.
    pub fn finalize(mut self, capacity: usize) -> (Vec<KeyInfo>, HashMap<String, KeyInfo>) {
        let mut top = BoundedTopN::new(capacity);
        for info in self.totals.values_mut() {
            info.readable_size = format_bytes(info.size);
            top.add(info.clone());
        }
        (top.into_sorted_desc(), self.totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, size: u64, elements: u64) -> Record {
        Record {
            db: 1,
            key: key.into(),
            type_tag: "string".into(),
            size,
            elements,
            expiration: None,
        }
    }

    #[test]
    fn earliest_delimiter_wins() {
        assert_eq!(pick_delimiter("a:b.c"), Some(':'));
        assert_eq!(pick_delimiter("a.b:c"), Some('.'));
        assert_eq!(pick_delimiter("plain"), None);
    }

    #[test]
    fn same_index_ties_go_to_list_order() {
        // Both ':' and '.' first occur at index 1; ':' precedes '.' in the
        // candidate list and a tie never replaces the current best.
        assert_eq!(pick_delimiter("a:b"), Some(':'));
        assert_eq!(pick_delimiter("x_y-z"), Some('_'));
    }

    #[test]
    fn levels_rejoin_with_the_chosen_delimiter() {
        assert_eq!(prefix_at_level("user:1:profile", 1).as_deref(), Some("user"));
        assert_eq!(prefix_at_level("user:1:profile", 2).as_deref(), Some("user:1"));
        assert_eq!(
            prefix_at_level("user:1:profile", 3).as_deref(),
            Some("user:1:profile")
        );
    }

    #[test]
    fn short_keys_yield_no_deep_levels() {
        assert_eq!(prefix_at_level("order.2024", 2).as_deref(), Some("order.2024"));
        assert_eq!(prefix_at_level("order.2024", 3), None);
        assert_eq!(prefix_at_level("noseparatorkey", 1), None);
    }

    #[test]
    fn leading_delimiter_yields_no_level_one() {
        assert_eq!(prefix_at_level(":orphan:key", 1), None);
        assert_eq!(prefix_at_level(":orphan:key", 2).as_deref(), Some(":orphan"));
    }

    #[test]
    fn levels_nest() {
        let key = "a:b:c:d";
        let l1 = prefix_at_level(key, 1).unwrap();
        let l2 = prefix_at_level(key, 2).unwrap();
        let l3 = prefix_at_level(key, 3).unwrap();
        assert!(l3.starts_with(&l2) && l3.len() > l2.len());
        assert!(l2.starts_with(&l1) && l2.len() > l1.len());
    }

    #[test]
    fn accumulation_sums_and_keeps_first_metadata() {
        let mut agg = PrefixAggregator::new();
        agg.record(&record("user:1:profile", 100, 3));
        agg.record(&record("user:1:settings", 50, 2));
        agg.record(&record("order.2024", 30, 1));
        agg.record(&record("noseparatorkey", 10, 1));

        let user = agg.get("user").unwrap();
        assert_eq!(user.size, 150);
        assert_eq!(user.elements, 5);
        assert_eq!(agg.get("user:1").unwrap().size, 150);
        assert_eq!(agg.get("order").unwrap().size, 30);
        assert!(agg.get("noseparatorkey").is_none());
    }

    #[test]
    fn finalize_ranks_and_fills_readable_sizes() {
        let mut agg = PrefixAggregator::new();
        agg.record(&record("a:x", 2048, 1));
        agg.record(&record("b:y", 100, 1));
        let (top, totals) = agg.finalize(1);
        assert_eq!(top.len(), 1);
        // "a" and "a:x" tie at 2048; either may win, both outrank "b".
        assert!(top[0].key.starts_with('a'));
        assert_eq!(top[0].readable_size, "2.00 KB");
        assert_eq!(totals.get("b").unwrap().readable_size, "100 B");
    }
}
