//! Schema validator
//!
//! Rejects uploads that decoded to nothing, or whose table lacks the two
//! mandatory fields (timestamp and total usage).
//!
//! Validation probes only the **first** record as a schema representative; it
//! does not scan every record. Tables where only later rows are malformed
//! pass. This is an accepted limitation inherited from the source behavior,
//! kept isolated here so it can be swapped for a full scan without touching
//! the rest of the pipeline. The probe is sound for the header checks it
//! performs, because header presence is a property of the table's single
//! header row and therefore identical for every record.

use crate::error::{Result, UtilstatError};
use crate::types::{DomainProfile, UsageRecord};

/// Validate a normalized record set against the domain's schema
///
/// # Errors
///
/// - [`UtilstatError::EmptyDataset`] when there are zero records.
/// - [`UtilstatError::MissingRequiredColumns`] when the first record has an
///   empty timestamp or no derivable total usage (the total header was absent
///   from the table; a present-but-blank cell was already normalized to `0`
///   and passes).
pub fn validate(records: &[UsageRecord], profile: &DomainProfile) -> Result<()> {
    let Some(first) = records.first() else {
        return Err(UtilstatError::EmptyDataset);
    };

    if first.timestamp.is_empty() || first.total_usage.is_none() {
        return Err(UtilstatError::MissingRequiredColumns(
            profile.required_columns().join(", "),
        ));
    }

    Ok(())
}
