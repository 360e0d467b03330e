//! Upload processing pipeline
//!
//! Wires the stages end-to-end for one upload:
//! decode -> normalize -> validate -> aggregate -> summarize, plus the
//! upload-level metadata. One call handles one upload, synchronously, with no
//! state shared across calls, so concurrent uploads need no coordination.
//!
//! The whole pipeline is a pure function of `(buffer, extension, domain)`:
//! re-running it on the same input yields an identical result.
//!
//! # Examples
//!
//! ```
//! use utilstat::pipeline::process_upload;
//! use utilstat::types::Domain;
//!
//! let buffer = b"Timestamp,Total Water (Liters)\n2024-01-01 08:00,10\n";
//! let upload = process_upload(buffer, "csv", Domain::Water).unwrap();
//! assert_eq!(upload.metadata.total_records, 1);
//! assert_eq!(upload.analysis.summary.total_usage, 10.0);
//! ```

use crate::aggregation::aggregate;
use crate::decoder::{UploadFormat, decode};
use crate::error::Result;
use crate::normalizer::normalize;
use crate::summary::{AnalysisResult, summarize};
use crate::types::{DatasetMetadata, Domain, UsageRecord};
use crate::validator::validate;
use tracing::info;

/// Everything derived from one upload, ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedUpload {
    /// Normalized records in upload order
    pub records: Vec<UsageRecord>,
    /// Chart-ready analysis
    pub analysis: AnalysisResult,
    /// Upload-level metadata
    pub metadata: DatasetMetadata,
}

/// Run the full pipeline over one upload buffer
pub fn process_upload(buffer: &[u8], extension: &str, domain: Domain) -> Result<ProcessedUpload> {
    let profile = domain.profile();

    let format = UploadFormat::from_extension(extension)?;
    let rows = decode(buffer, format)?;
    let records = normalize(rows, profile);
    validate(&records, profile)?;

    let aggregation = aggregate(&records, profile);
    let analysis = summarize(&aggregation, profile)?;

    // validate() guarantees at least one record.
    let metadata = DatasetMetadata {
        total_records: records.len(),
        date_range_start: records
            .first()
            .map(|r| r.timestamp.clone())
            .unwrap_or_default(),
        date_range_end: records
            .last()
            .map(|r| r.timestamp.clone())
            .unwrap_or_default(),
    };

    info!(
        "processed {} upload: {} records across {} days",
        domain,
        records.len(),
        analysis.labels.len()
    );

    Ok(ProcessedUpload {
        records,
        analysis,
        metadata,
    })
}
