//! Streaming statistics accumulators
//!
//! Each accumulator consumes records independently during a single pass;
//! the orchestration in [`crate::analysis`] fans every record out to all of
//! them exactly once.

mod expire;
mod key_info;
mod prefix;
mod topn;
mod type_stats;

pub use expire::{ExpirationBucketer, ExpireBucket};
pub use key_info::{format_expiration, KeyInfo, EXPIRE_FORMAT};
pub use prefix::{
    pick_delimiter, prefix_at_level, PrefixAggregator, MAX_PREFIX_LEVELS, PREFIX_DELIMITERS,
};
pub use topn::{BoundedTopN, Sizeable};
pub use type_stats::{TypeStat, TypeStatsAccumulator};
