//! Record normalizer
//!
//! Converts untyped decoded rows into typed [`UsageRecord`]s for one domain.
//! Exactly one record is produced per row, in row order.
//!
//! Numeric coercion policy: a category cell that is missing, empty, or not
//! numeric-parseable normalizes to `0`. This is deliberate and silent: no
//! error is raised here for corrupt numeric cells. The total-usage field is
//! the one place where "header absent from the table" is kept distinguishable
//! from "cell blank", because the schema validator needs that distinction.

use crate::types::{DomainProfile, RawRow, UsageRecord};
use tracing::debug;

/// Normalize decoded rows into usage records for the given domain
pub fn normalize(rows: Vec<RawRow>, profile: &DomainProfile) -> Vec<UsageRecord> {
    let records: Vec<UsageRecord> = rows
        .into_iter()
        .map(|row| normalize_row(&row, profile))
        .collect();
    debug!(
        "normalized {} records for domain {}",
        records.len(),
        profile.domain
    );
    records
}

fn normalize_row(row: &RawRow, profile: &DomainProfile) -> UsageRecord {
    let timestamp = row
        .get(profile.timestamp_column)
        .map(|cell| cell.to_text())
        .unwrap_or_default();

    // `None` only when the header itself is absent; the decoder guarantees
    // blank cells still carry an (empty) entry under their header.
    let total_usage = row
        .get(profile.total_column)
        .map(|cell| cell.as_number().unwrap_or(0.0));

    let categories = profile
        .categories
        .iter()
        .map(|category| {
            let value = row
                .get(category.column)
                .and_then(|cell| cell.as_number())
                .unwrap_or(0.0);
            (category.key.to_string(), value)
        })
        .collect();

    UsageRecord {
        timestamp,
        total_usage,
        categories,
    }
}
