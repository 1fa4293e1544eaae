//! Expiration-age histogram
//!
//! Classifies every record into exactly one of nine buckets by the elapsed
//! time between `now` and the key's expiration instant.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::record::Record;
use crate::stats::type_stats::TypeStat;

/// Age bucket for a key's expiration, relative to a fixed `now`.
///
/// Buckets are exclusive and exhaustive. The `Expired` bucket keeps the
/// original sign convention: it holds keys whose expiration instant is still
/// ahead of `now` (negative elapsed hours). Keys whose expiration has already
/// passed fall into the elapsed-time buckets instead. Tests pin this
/// behavior; changing it is a spec revision, not a bug fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExpireBucket {
    /// Key has no expiration at all.
    #[cfg_attr(feature = "serde", serde(rename = "noexpire"))]
    NoExpire,
    /// Expiration instant lies in the future (elapsed hours < 0).
    #[cfg_attr(feature = "serde", serde(rename = "expired"))]
    Expired,
    /// Expired up to one hour ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp0to1h"))]
    Exp0To1h,
    /// Expired between one and three hours ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp1to3h"))]
    Exp1To3h,
    /// Expired between three and twelve hours ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp3to12h"))]
    Exp3To12h,
    /// Expired between twelve and twenty-four hours ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp12to24h"))]
    Exp12To24h,
    /// Expired between one and three days ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp1to2d"))]
    Exp1To2d,
    /// Expired between three and seven days ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp3to7d"))]
    Exp3To7d,
    /// Expired more than seven days ago.
    #[cfg_attr(feature = "serde", serde(rename = "exp7dplus"))]
    Exp7dPlus,
}

impl ExpireBucket {
    /// All buckets, in histogram display order.
    pub const ALL: [ExpireBucket; 9] = [
        ExpireBucket::NoExpire,
        ExpireBucket::Expired,
        ExpireBucket::Exp0To1h,
        ExpireBucket::Exp1To3h,
        ExpireBucket::Exp3To12h,
        ExpireBucket::Exp12To24h,
        ExpireBucket::Exp1To2d,
        ExpireBucket::Exp3To7d,
        ExpireBucket::Exp7dPlus,
    ];

    /// Wire/display name of the bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpireBucket::NoExpire => "noexpire",
            ExpireBucket::Expired => "expired",
            ExpireBucket::Exp0To1h => "exp0to1h",
            ExpireBucket::Exp1To3h => "exp1to3h",
            ExpireBucket::Exp3To12h => "exp3to12h",
            ExpireBucket::Exp12To24h => "exp12to24h",
            ExpireBucket::Exp1To2d => "exp1to2d",
            ExpireBucket::Exp3To7d => "exp3to7d",
            ExpireBucket::Exp7dPlus => "exp7dplus",
        }
    }

    /// Pick the bucket for an optional expiration instant against `now`.
    ///
    /// Evaluated as an ordered chain so an elapsed time of exactly zero lands
    /// in `Exp0To1h` rather than vanishing between conditions.
    pub fn classify(expiration: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ExpireBucket {
        let Some(instant) = expiration else {
            return ExpireBucket::NoExpire;
        };
        let hours = (now - instant).num_milliseconds() as f64 / 3_600_000.0;
        if hours < 0.0 {
            ExpireBucket::Expired
        } else if hours <= 1.0 {
            ExpireBucket::Exp0To1h
        } else if hours <= 3.0 {
            ExpireBucket::Exp1To3h
        } else if hours <= 12.0 {
            ExpireBucket::Exp3To12h
        } else if hours <= 24.0 {
            ExpireBucket::Exp12To24h
        } else if hours <= 72.0 {
            ExpireBucket::Exp1To2d
        } else if hours <= 168.0 {
            ExpireBucket::Exp3To7d
        } else {
            ExpireBucket::Exp7dPlus
        }
    }
}

impl std::fmt::Display for ExpireBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Accumulates count/memory per expiration bucket.
///
/// `now` is sampled once per analysis pass and held here so every record in
/// one pass is classified against the same reference instant.
#[derive(Debug, Clone)]
pub struct ExpirationBucketer {
    now: DateTime<Utc>,
    buckets: HashMap<ExpireBucket, TypeStat>,
}

impl ExpirationBucketer {
    /// Create a bucketer classifying against `now`, all buckets zeroed.
    pub fn new(now: DateTime<Utc>) -> Self {
        let buckets = ExpireBucket::ALL
            .iter()
            .map(|&bucket| (bucket, TypeStat::default()))
            .collect();
        Self { now, buckets }
    }

    /// Fold one record into its bucket.
    pub fn record(&mut self, record: &Record) {
        let bucket = ExpireBucket::classify(record.expiration, self.now);
        self.buckets.entry(bucket).or_default().observe(record.size);
    }

    /// Stats for one bucket.
    pub fn get(&self, bucket: ExpireBucket) -> TypeStat {
        self.buckets.get(&bucket).copied().unwrap_or_default()
    }

    /// Release the finished histogram.
    pub fn into_stats(self) -> HashMap<ExpireBucket, TypeStat> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_expiring(expiration: Option<DateTime<Utc>>, size: u64) -> Record {
        Record {
            db: 0,
            key: "k".into(),
            type_tag: "string".into(),
            size,
            elements: 1,
            expiration,
        }
    }

    #[test]
    fn no_expiration_goes_to_noexpire() {
        let now = Utc::now();
        assert_eq!(ExpireBucket::classify(None, now), ExpireBucket::NoExpire);
    }

    #[test]
    fn future_expiration_lands_in_expired() {
        // Literal legacy behavior: negative elapsed hours means "expired".
        let now = Utc::now();
        let future = now + Duration::hours(5);
        assert_eq!(ExpireBucket::classify(Some(future), now), ExpireBucket::Expired);
    }

    #[test]
    fn elapsed_hours_pick_the_matching_band() {
        let now = Utc::now();
        let cases = [
            (Duration::minutes(30), ExpireBucket::Exp0To1h),
            (Duration::hours(2), ExpireBucket::Exp1To3h),
            (Duration::hours(6), ExpireBucket::Exp3To12h),
            (Duration::hours(18), ExpireBucket::Exp12To24h),
            (Duration::hours(48), ExpireBucket::Exp1To2d),
            (Duration::hours(100), ExpireBucket::Exp3To7d),
            (Duration::hours(200), ExpireBucket::Exp7dPlus),
        ];
        for (ago, expected) in cases {
            assert_eq!(
                ExpireBucket::classify(Some(now - ago), now),
                expected,
                "expiration {ago} ago"
            );
        }
    }

    #[test]
    fn exactly_now_goes_to_first_band() {
        let now = Utc::now();
        assert_eq!(ExpireBucket::classify(Some(now), now), ExpireBucket::Exp0To1h);
    }

    #[test]
    fn every_record_lands_in_exactly_one_bucket() {
        let now = Utc::now();
        let mut bucketer = ExpirationBucketer::new(now);
        let offsets = [None, Some(-5i64), Some(0), Some(1), Some(50), Some(400)];
        for offset in offsets {
            let expiration = offset.map(|h| now - Duration::hours(h));
            bucketer.record(&record_expiring(expiration, 10));
        }
        let stats = bucketer.into_stats();
        let total: u64 = stats.values().map(|s| s.count).sum();
        assert_eq!(total, offsets.len() as u64);
    }
}
