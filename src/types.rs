//! Core domain types for utilstat
//!
//! This module contains the fundamental types used throughout the utilstat
//! library: the two usage domains and their column descriptors, the untyped
//! decoded row, and the typed usage record the pipeline operates on.
//!
//! Water and electricity share the same pipeline; everything domain-specific
//! lives in the two static [`DomainProfile`] descriptors so no stage is
//! duplicated per domain.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Usage domain handled by the pipeline
///
/// Each domain has its own fixed category set and column headers, described
/// by its [`DomainProfile`].
///
/// # Examples
/// ```
/// use utilstat::types::Domain;
///
/// let domain: Domain = "water".parse().unwrap();
/// assert_eq!(domain, Domain::Water);
/// assert_eq!(domain.to_string(), "water");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Household water consumption, measured in liters
    Water,
    /// Household electricity consumption, measured in kWh
    Electricity,
}

impl Domain {
    /// Get the column descriptor for this domain
    pub fn profile(self) -> &'static DomainProfile {
        match self {
            Self::Water => &WATER_PROFILE,
            Self::Electricity => &ELECTRICITY_PROFILE,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Water => write!(f, "water"),
            Self::Electricity => write!(f, "electricity"),
        }
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "electricity" => Ok(Self::Electricity),
            _ => Err(format!(
                "invalid domain: {s} (expected `water` or `electricity`)"
            )),
        }
    }
}

/// One sub-metric column of a domain
#[derive(Debug, Clone, Copy)]
pub struct CategoryColumn {
    /// Key used for the category in records and summaries (e.g. `drinking`)
    pub key: &'static str,
    /// Exact header string in the uploaded table (e.g. `Drinking (Liters)`)
    pub column: &'static str,
    /// Human-readable name for distribution views (e.g. `Drinking`)
    pub label: &'static str,
}

/// Column descriptor for one domain
///
/// The pipeline stages are generic over this descriptor; the two instances
/// ([`WATER_PROFILE`], [`ELECTRICITY_PROFILE`]) are the only domain-specific
/// data in the crate.
#[derive(Debug, Clone, Copy)]
pub struct DomainProfile {
    /// Domain this profile describes
    pub domain: Domain,
    /// Header of the timestamp column
    pub timestamp_column: &'static str,
    /// Header of the mandatory total-usage column
    pub total_column: &'static str,
    /// Series name used for the total-usage chart series
    pub total_label: &'static str,
    /// Fixed category set, in chart order
    pub categories: &'static [CategoryColumn],
}

impl DomainProfile {
    /// All headers an upload for this domain is expected to carry
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![self.timestamp_column, self.total_column];
        columns.extend(self.categories.iter().map(|c| c.column));
        columns
    }
}

/// Column descriptor for water uploads
pub static WATER_PROFILE: DomainProfile = DomainProfile {
    domain: Domain::Water,
    timestamp_column: "Timestamp",
    total_column: "Total Water (Liters)",
    total_label: "Water Usage (Liters)",
    categories: &[
        CategoryColumn {
            key: "drinking",
            column: "Drinking (Liters)",
            label: "Drinking",
        },
        CategoryColumn {
            key: "cooking",
            column: "Cooking (Liters)",
            label: "Cooking",
        },
        CategoryColumn {
            key: "bathing",
            column: "Bathing (Liters)",
            label: "Bathing",
        },
        CategoryColumn {
            key: "washingClothes",
            column: "Washing Clothes (Liters)",
            label: "Washing Clothes",
        },
        CategoryColumn {
            key: "dishwashing",
            column: "Dishwashing (Liters)",
            label: "Dishwashing",
        },
    ],
};

/// Column descriptor for electricity uploads
pub static ELECTRICITY_PROFILE: DomainProfile = DomainProfile {
    domain: Domain::Electricity,
    timestamp_column: "Timestamp",
    total_column: "Total Electricity (kWh)",
    total_label: "Electricity Usage (kWh)",
    categories: &[
        CategoryColumn {
            key: "fan",
            column: "Fan (kWh)",
            label: "Fan",
        },
        CategoryColumn {
            key: "refrigerator",
            column: "Refrigerator (kWh)",
            label: "Refrigerator",
        },
        CategoryColumn {
            key: "washingMachine",
            column: "Washing Machine (kWh)",
            label: "Washing Machine",
        },
        CategoryColumn {
            key: "heater",
            column: "Heater (kWh)",
            label: "Heater",
        },
        CategoryColumn {
            key: "lights",
            column: "Lights (kWh)",
            label: "Lights",
        },
    ],
};

/// A single decoded cell
///
/// Delimited-text uploads produce only [`CellValue::Text`]; spreadsheet cells
/// retain the native type the reader reports.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// String cell (all CSV/TXT cells, spreadsheet text cells)
    Text(String),
    /// Numeric cell from a spreadsheet
    Number(f64),
}

impl CellValue {
    /// Interpret the cell as a finite number, if possible
    ///
    /// Text cells are trimmed and parsed; anything unparseable or non-finite
    /// is `None`, which the normalizer coerces to `0`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Render the cell as text, verbatim for string cells
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// One untyped row of an uploaded table, keyed by header
///
/// Ephemeral: produced by the decoder, consumed by the normalizer, then
/// discarded. Absent cells have no entry at all.
pub type RawRow = HashMap<String, CellValue>;

/// One typed usage record
///
/// Created once by the normalizer from a [`RawRow`] and immutable afterwards.
/// Every category key of the domain's profile is present in `categories`,
/// defaulting to `0` when the source cell was absent, empty, or not numeric.
///
/// # Examples
/// ```
/// use utilstat::types::{UsageRecord, WATER_PROFILE};
/// use std::collections::BTreeMap;
///
/// let record = UsageRecord {
///     timestamp: "2024-01-01 08:00".to_string(),
///     total_usage: Some(10.0),
///     categories: WATER_PROFILE
///         .categories
///         .iter()
///         .map(|c| (c.key.to_string(), 0.0))
///         .collect::<BTreeMap<_, _>>(),
/// };
/// assert_eq!(record.date_key(), Some("2024-01-01"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Source timestamp, verbatim (no reformatting)
    pub timestamp: String,
    /// Total usage for this record
    ///
    /// `None` only when the total-usage header was absent from the table
    /// entirely; a present but blank or unparseable cell is `Some(0.0)`.
    /// Header presence is a per-table property, so the schema validator's
    /// first-record probe sees the same state every later record has.
    pub total_usage: Option<f64>,
    /// Per-category usage, one entry per profile category
    pub categories: BTreeMap<String, f64>,
}

impl UsageRecord {
    /// Calendar-date key of this record: the timestamp text before the first
    /// space character
    ///
    /// Records whose timestamp contains no space (or nothing before it) have
    /// no date key and are excluded from every bucket and every sum.
    pub fn date_key(&self) -> Option<&str> {
        self.timestamp
            .split_once(' ')
            .map(|(date, _)| date)
            .filter(|date| !date.is_empty())
    }
}

/// Upload-level metadata stored alongside a dataset
///
/// The date range bounds are the raw timestamps of the first and last record
/// in upload order, not sorted, and not the aggregated date keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    /// Number of normalized records in the upload
    pub total_records: usize,
    /// Timestamp of the first record, verbatim
    pub date_range_start: String,
    /// Timestamp of the last record, verbatim
    pub date_range_end: String,
}
