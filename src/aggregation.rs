//! Daily aggregation of usage records
//!
//! Folds normalized records into one accumulation bucket per distinct
//! calendar date. Buckets are kept in **first-seen order** of their date key
//! (not sorted); that order is what drives the chart label order downstream.
//!
//! The peak day is tracked by an explicit `PeakTracker` value threaded
//! through the fold and returned alongside the buckets. The comparison runs
//! once per folded record, against the bucket's running total at that moment
//! rather than once per finalized day. Sums are monotonic non-negative, so the end
//! state matches a final per-day comparison, except for ties: the first date
//! to reach a given maximum wins and keeps winning.

use crate::types::{DomainProfile, UsageRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Per-day accumulation bucket
///
/// Created lazily on first sighting of a date key, then mutated by running
/// sums as further same-day records fold in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// Date key, the timestamp text before the first space (`YYYY-MM-DD` in
    /// well-formed uploads)
    pub date: String,
    /// Running sum of total usage for this date
    pub total_usage: f64,
    /// Running per-category sums, one entry per profile category
    pub categories: BTreeMap<String, f64>,
}

impl DayBucket {
    fn new(date: &str, profile: &DomainProfile) -> Self {
        Self {
            date: date.to_string(),
            total_usage: 0.0,
            categories: profile
                .categories
                .iter()
                .map(|c| (c.key.to_string(), 0.0))
                .collect(),
        }
    }

    fn add_record(&mut self, record: &UsageRecord, profile: &DomainProfile) {
        // A `None` total never reaches aggregation in the normal flow (the
        // validator rejects tables without the header); treat it as zero.
        self.total_usage += record.total_usage.unwrap_or_default();

        for category in profile.categories {
            let value = record.categories.get(category.key).copied().unwrap_or(0.0);
            if let Some(sum) = self.categories.get_mut(category.key) {
                *sum += value;
            }
        }
    }
}

/// Running maximum of per-day totals
///
/// Updated incrementally after each folded record, so the bucket under
/// comparison may still be mid-accumulation. Strict `>` means the first date
/// to reach a given maximum is the one reported on ties.
#[derive(Debug, Default, Clone)]
struct PeakTracker {
    max_usage: f64,
    peak_day: Option<String>,
}

impl PeakTracker {
    fn observe(&mut self, day_total: f64, date: &str) {
        if day_total > self.max_usage {
            self.max_usage = day_total;
            self.peak_day = Some(date.to_string());
        }
    }

    fn into_peak(self) -> Option<DayPeak> {
        self.peak_day.map(|day| DayPeak {
            day,
            usage: self.max_usage,
        })
    }
}

/// Peak day resolved by the aggregation fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPeak {
    /// Date key of the peak day
    pub day: String,
    /// Running total of that day at the last update that raised the maximum
    pub usage: f64,
}

/// Result of the aggregation fold: ordered buckets plus the tracked peak
///
/// `peak` is `None` when no folded record ever pushed a day total above zero
/// (including the case where every record was skipped for lacking a date
/// key).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregation {
    /// Day buckets in first-seen order of their date keys
    pub buckets: Vec<DayBucket>,
    /// Peak day and its usage, if any
    pub peak: Option<DayPeak>,
}

/// Fold records into per-day buckets
///
/// Records whose timestamp has no date key (no space character, or nothing
/// before it) are skipped entirely: no bucket, no sums, no error.
pub fn aggregate(records: &[UsageRecord], profile: &DomainProfile) -> DailyAggregation {
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tracker = PeakTracker::default();
    let mut folded = 0usize;

    for record in records {
        let Some(date) = record.date_key() else {
            continue;
        };

        let slot = match index.get(date) {
            Some(&slot) => slot,
            None => {
                let slot = buckets.len();
                index.insert(date.to_string(), slot);
                buckets.push(DayBucket::new(date, profile));
                slot
            }
        };

        let bucket = &mut buckets[slot];
        bucket.add_record(record, profile);
        tracker.observe(bucket.total_usage, &bucket.date);
        folded += 1;
    }

    debug!(
        "aggregated {} of {} records into {} day buckets",
        folded,
        records.len(),
        buckets.len()
    );

    DailyAggregation {
        peak: tracker.into_peak(),
        buckets,
    }
}
