//! Summary builder
//!
//! Shapes per-day aggregation buckets into the chart-ready
//! [`AnalysisResult`]: ordered labels, one aligned numeric series per
//! category plus the total, a distribution-by-category view, and the scalar
//! summary. Computed once per upload and never mutated afterwards.

use crate::aggregation::DailyAggregation;
use crate::error::{Result, UtilstatError};
use crate::types::{Domain, DomainProfile};
use serde::{Deserialize, Serialize};

/// One chart series aligned to the analysis labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Display name of the series
    pub name: String,
    /// One value per label, in label order
    pub data: Vec<f64>,
}

/// Category-share view: each category's total across all days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    /// Category display labels, in profile order
    pub categories: Vec<String>,
    /// Total per category, aligned to `categories`
    pub totals: Vec<f64>,
}

/// Grand total for one category across all days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category key (e.g. `drinking`)
    pub category: String,
    /// Sum of the category's daily series
    pub total: f64,
}

/// Highest single-day value for one category
///
/// `peak_day` is the shared total-usage peak day, reused for every category
/// rather than recomputed per category. That mirrors the source behavior and
/// is only technically correct when one day dominates all categories at once;
/// it is preserved deliberately for output compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPeak {
    /// Category key
    pub category: String,
    /// Shared peak day label
    pub peak_day: Option<String>,
    /// Maximum of the category's daily series
    pub peak_usage: f64,
}

/// Average daily value for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    /// Category key
    pub category: String,
    /// Category total divided by the number of days
    pub average: f64,
}

/// Scalar summary of one upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    /// Grand total across all days
    pub total_usage: f64,
    /// Grand total divided by the number of days
    pub average_usage: f64,
    /// Date with the highest running total, if any record pushed a day above
    /// zero
    pub peak_day: Option<String>,
    /// Total of the peak day
    pub peak_usage: f64,
    /// Per-category grand totals
    pub category_totals: Vec<CategoryTotal>,
    /// Per-category single-day maxima (electricity only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_peaks: Option<Vec<CategoryPeak>>,
    /// Per-category daily averages (electricity only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_averages: Option<Vec<CategoryAverage>>,
}

/// Chart-ready analysis of one upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Date labels in aggregator (first-seen) order
    pub labels: Vec<String>,
    /// Total-usage series aligned to `labels`
    pub total_series: Series,
    /// One series per category, in profile order, aligned to `labels`
    pub category_series: Vec<Series>,
    /// Category-share distribution across all days
    pub distribution: Distribution,
    /// Scalar summary
    pub summary: UsageSummary,
}

/// Build the analysis result from aggregated buckets
///
/// # Errors
///
/// Returns [`UtilstatError::EmptyAggregation`] when there are no buckets at
/// all (every record was skipped for lacking a date key): the per-day average
/// would otherwise be a division by zero, and a NaN must never reach the
/// caller.
pub fn summarize(
    aggregation: &DailyAggregation,
    profile: &DomainProfile,
) -> Result<AnalysisResult> {
    let buckets = &aggregation.buckets;
    if buckets.is_empty() {
        return Err(UtilstatError::EmptyAggregation);
    }

    let labels: Vec<String> = buckets.iter().map(|b| b.date.clone()).collect();

    let total_series = Series {
        name: profile.total_label.to_string(),
        data: buckets.iter().map(|b| b.total_usage).collect(),
    };

    let category_series: Vec<Series> = profile
        .categories
        .iter()
        .map(|category| Series {
            name: category.column.to_string(),
            data: buckets
                .iter()
                .map(|b| b.categories.get(category.key).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    let category_sums: Vec<f64> = category_series
        .iter()
        .map(|series| series.data.iter().sum())
        .collect();

    let distribution = Distribution {
        categories: profile
            .categories
            .iter()
            .map(|c| c.label.to_string())
            .collect(),
        totals: category_sums.clone(),
    };

    let total_usage: f64 = total_series.data.iter().sum();
    let average_usage = total_usage / labels.len() as f64;

    let (peak_day, peak_usage) = match &aggregation.peak {
        Some(peak) => (Some(peak.day.clone()), peak.usage),
        None => (None, 0.0),
    };

    let category_totals: Vec<CategoryTotal> = profile
        .categories
        .iter()
        .zip(&category_sums)
        .map(|(category, &total)| CategoryTotal {
            category: category.key.to_string(),
            total,
        })
        .collect();

    // Electricity summaries additionally report each category's single-day
    // maximum and daily average; water summaries do not.
    let (category_peaks, category_averages) = match profile.domain {
        Domain::Electricity => {
            let peaks = profile
                .categories
                .iter()
                .zip(&category_series)
                .map(|(category, series)| CategoryPeak {
                    category: category.key.to_string(),
                    peak_day: peak_day.clone(),
                    peak_usage: series
                        .data
                        .iter()
                        .copied()
                        .fold(f64::NEG_INFINITY, f64::max),
                })
                .collect();

            let averages = profile
                .categories
                .iter()
                .zip(&category_sums)
                .map(|(category, &total)| CategoryAverage {
                    category: category.key.to_string(),
                    average: total / labels.len() as f64,
                })
                .collect();

            (Some(peaks), Some(averages))
        }
        Domain::Water => (None, None),
    };

    Ok(AnalysisResult {
        labels,
        total_series,
        category_series,
        distribution,
        summary: UsageSummary {
            total_usage,
            average_usage,
            peak_day,
            peak_usage,
            category_totals,
            category_peaks,
            category_averages,
        },
    })
}
