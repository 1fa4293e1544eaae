//! Decoded record surface
//!
//! The core never reads a dump file itself; an external decoder yields
//! [`Record`] values one at a time. This module defines that contract plus
//! the fixed set of type tags the breakdown recognizes.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// One decoded key-value entry from a database dump.
///
/// Read-only to the analysis core. `type_tag` is kept as the raw string the
/// decoder produced: tags outside the five known kinds still flow through the
/// pipeline (they count toward totals) without crashing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Database index the key lives in.
    pub db: u64,
    /// Key name.
    pub key: String,
    /// Declared type tag, e.g. `"string"` or `"hash"`.
    pub type_tag: String,
    /// Serialized size in bytes.
    pub size: u64,
    /// Number of elements (1 for plain strings).
    pub elements: u64,
    /// Absolute expiration instant, if the key has one.
    pub expiration: Option<DateTime<Utc>>,
}

/// The five type tags that participate in the per-type breakdown.
///
/// Records with any other tag contribute to the global totals but are
/// silently excluded from the type breakdown. That exclusion is deliberate
/// and pinned by tests; do not add a catch-all kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RecordKind {
    /// Plain string value.
    String,
    /// Linked list / quicklist.
    List,
    /// Unordered set.
    Set,
    /// Sorted set.
    Zset,
    /// Hash table.
    Hash,
}

impl RecordKind {
    /// All known kinds, in display order.
    pub const ALL: [RecordKind; 5] = [
        RecordKind::String,
        RecordKind::List,
        RecordKind::Set,
        RecordKind::Zset,
        RecordKind::Hash,
    ];

    /// Map a raw decoder tag onto a known kind, if it is one.
    pub fn from_tag(tag: &str) -> Option<RecordKind> {
        match tag {
            "string" => Some(RecordKind::String),
            "list" => Some(RecordKind::List),
            "set" => Some(RecordKind::Set),
            "zset" => Some(RecordKind::Zset),
            "hash" => Some(RecordKind::Hash),
            _ => None,
        }
    }

    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::String => "string",
            RecordKind::List => "list",
            RecordKind::Set => "set",
            RecordKind::Zset => "zset",
            RecordKind::Hash => "hash",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// The external record source failed to produce a well-formed record.
///
/// Raised by whatever decodes the dump, not by the core. A decode failure
/// mid-stream aborts the whole analysis for that source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed record: {message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Wrap a decoder failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
