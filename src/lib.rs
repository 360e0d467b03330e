//! utilstat - Turn tabular utility usage uploads into chart-ready analytics
//!
//! This library provides functionality to:
//! - Decode delimited-text and spreadsheet uploads into untyped rows
//! - Normalize rows into typed water or electricity usage records
//! - Aggregate records into per-day buckets with running peak tracking
//! - Derive chart-ready series and scalar summaries per upload
//! - Store the resulting datasets per owner and serve them over HTTP
//!
//! # Examples
//!
//! ```
//! use utilstat::{pipeline::process_upload, types::Domain};
//!
//! fn main() -> utilstat::Result<()> {
//!     let buffer = b"Timestamp,Total Water (Liters),Drinking (Liters)\n\
//!                    2024-01-01 08:00,10,3\n\
//!                    2024-01-01 20:00,5,1\n";
//!
//!     let upload = process_upload(buffer, "csv", Domain::Water)?;
//!     assert_eq!(upload.analysis.labels, vec!["2024-01-01"]);
//!     assert_eq!(upload.analysis.summary.peak_usage, 15.0);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod api;
pub mod cli;
pub mod decoder;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod store;
pub mod summary;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use error::{Result, UtilstatError};
pub use summary::AnalysisResult;
pub use types::{Domain, UsageRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
