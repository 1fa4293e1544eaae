//! Size-ranked key summaries.

use chrono::{DateTime, Utc};

use crate::record::Record;
use crate::stats::topn::Sizeable;
use crate::util::format_bytes;

/// Timestamp layout used for human-readable expirations.
pub const EXPIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary of one key, or of one aggregated key-name prefix.
///
/// For prefixes, `db` and `type_tag` are first-seen display metadata: a
/// prefix can cover keys of mixed types and databases, and no attempt is made
/// to reconcile them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KeyInfo {
    /// Database index.
    pub db: u64,
    /// Key name, or prefix string for aggregated entries.
    pub key: String,
    /// Raw type tag.
    pub type_tag: String,
    /// Size in bytes (accumulated, for prefixes).
    pub size: u64,
    /// Human-readable rendering of `size`.
    pub readable_size: String,
    /// Element count (accumulated, for prefixes).
    pub elements: u64,
    /// Formatted expiration timestamp, or empty when none.
    pub expire: String,
}

impl KeyInfo {
    /// Build the summary of a single decoded record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            db: record.db,
            key: record.key.clone(),
            type_tag: record.type_tag.clone(),
            size: record.size,
            readable_size: format_bytes(record.size),
            elements: record.elements,
            expire: format_expiration(record.expiration),
        }
    }
}

impl Sizeable for KeyInfo {
    fn size(&self) -> u64 {
        self.size
    }
}

/// Render an optional expiration instant, empty string when absent.
pub fn format_expiration(expiration: Option<DateTime<Utc>>) -> String {
    match expiration {
        Some(instant) => instant.format(EXPIRE_FORMAT).to_string(),
        None => String::new(),
    }
}
