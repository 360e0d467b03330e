//! Common test utilities and helpers for utilstat tests
//!
//! Provides a builder for delimited-text upload buffers so tests can state
//! their input data without hand-writing CSV strings.

use utilstat::types::{DomainProfile, ELECTRICITY_PROFILE, WATER_PROFILE};

/// Builder for delimited-text upload buffers
///
/// Starts from a domain's full header set (or an explicit one) and collects
/// rows; `build` assembles the byte buffer the pipeline consumes.
pub struct UploadBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl UploadBuilder {
    /// Builder with the full header set of a profile
    pub fn for_profile(profile: &DomainProfile) -> Self {
        Self {
            headers: profile
                .required_columns()
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Builder with the water header set
    pub fn water() -> Self {
        Self::for_profile(&WATER_PROFILE)
    }

    /// Builder with the electricity header set
    #[allow(dead_code)]
    pub fn electricity() -> Self {
        Self::for_profile(&ELECTRICITY_PROFILE)
    }

    /// Builder with an explicit header set
    #[allow(dead_code)]
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of raw cell strings, in header order
    #[allow(dead_code)]
    pub fn raw_row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Append a fully-populated usage row: timestamp, total, then one value
    /// per category in profile order
    pub fn usage_row(mut self, timestamp: &str, total: f64, categories: [f64; 5]) -> Self {
        let mut cells = vec![timestamp.to_string(), total.to_string()];
        cells.extend(categories.iter().map(|v| v.to_string()));
        self.rows.push(cells);
        self
    }

    /// Assemble the upload buffer
    ///
    /// Plain comma joining: the fixed headers and numeric cells used in tests
    /// never need quoting.
    pub fn build(self) -> Vec<u8> {
        let mut out = self.headers.join(",");
        out.push('\n');
        for row in self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out.into_bytes()
    }
}

/// Assert that two float values are approximately equal
#[allow(dead_code)]
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() <= tolerance,
        "Values are not approximately equal: {} != {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}
