//! Integration tests for the utilstat pipeline

mod common;

use common::{UploadBuilder, assert_approx_eq};
use utilstat::UtilstatError;
use utilstat::pipeline::process_upload;
use utilstat::types::Domain;

#[test]
fn test_multi_day_water_upload() {
    let buffer = UploadBuilder::water()
        .usage_row("2024-01-01 08:00", 10.0, [3.0, 2.0, 5.0, 0.0, 0.0])
        .usage_row("2024-01-01 20:00", 5.0, [1.0, 1.0, 3.0, 0.0, 0.0])
        .usage_row("2024-01-02 09:00", 40.0, [2.0, 3.0, 10.0, 20.0, 5.0])
        .usage_row("2024-01-03 07:30", 8.0, [2.0, 2.0, 4.0, 0.0, 0.0])
        .build();

    let upload = process_upload(&buffer, "csv", Domain::Water).unwrap();
    let analysis = &upload.analysis;

    assert_eq!(analysis.labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(analysis.total_series.data, vec![15.0, 40.0, 8.0]);

    let summary = &analysis.summary;
    assert_eq!(summary.total_usage, 63.0);
    assert_approx_eq(summary.average_usage, 21.0, 1e-9);
    assert_eq!(summary.peak_day.as_deref(), Some("2024-01-02"));
    assert_eq!(summary.peak_usage, 40.0);

    // Drinking: 3 + 1 on day one, 2 on day two, 2 on day three.
    assert_eq!(analysis.category_series[0].data, vec![4.0, 2.0, 2.0]);
    assert_eq!(analysis.distribution.totals[0], 8.0);
    assert_eq!(summary.category_totals[0].total, 8.0);
}

#[test]
fn test_labels_follow_first_seen_order_not_date_order() {
    let buffer = UploadBuilder::water()
        .usage_row("2024-01-05 08:00", 1.0, [0.0; 5])
        .usage_row("2024-01-01 08:00", 2.0, [0.0; 5])
        .usage_row("2024-01-05 20:00", 3.0, [0.0; 5])
        .build();

    let upload = process_upload(&buffer, "csv", Domain::Water).unwrap();
    assert_eq!(upload.analysis.labels, vec!["2024-01-05", "2024-01-01"]);
}

#[test]
fn test_spaceless_timestamps_are_excluded_everywhere() {
    let buffer = UploadBuilder::water()
        .usage_row("2024-01-01", 100.0, [50.0; 5])
        .usage_row("2024-01-02 08:00", 5.0, [1.0, 0.0, 0.0, 0.0, 0.0])
        .build();

    let upload = process_upload(&buffer, "csv", Domain::Water).unwrap();
    let analysis = &upload.analysis;

    assert_eq!(analysis.labels, vec!["2024-01-02"]);
    assert_eq!(analysis.summary.total_usage, 5.0);
    assert_eq!(analysis.distribution.totals[0], 1.0);
    // The excluded record still counts as an uploaded record, though.
    assert_eq!(upload.metadata.total_records, 2);
}

#[test]
fn test_corrupt_category_cells_zero_not_error() {
    let buffer = UploadBuilder::water()
        .raw_row(&["2024-01-01 08:00", "10", "abc", "", "5", "oops", "2"])
        .build();

    let upload = process_upload(&buffer, "csv", Domain::Water).unwrap();
    let record = &upload.records[0];

    assert_eq!(record.categories["drinking"], 0.0);
    assert_eq!(record.categories["cooking"], 0.0);
    assert_eq!(record.categories["bathing"], 5.0);
    assert_eq!(record.categories["washingClothes"], 0.0);
    assert_eq!(record.categories["dishwashing"], 2.0);

    for value in upload.analysis.total_series.data.iter() {
        assert!(value.is_finite());
    }
}

#[test]
fn test_electricity_and_water_share_nothing_but_structure() {
    let water = UploadBuilder::water()
        .usage_row("2024-01-01 08:00", 10.0, [1.0; 5])
        .build();
    let electricity = UploadBuilder::electricity()
        .usage_row("2024-01-01 08:00", 10.0, [1.0; 5])
        .build();

    let water = process_upload(&water, "csv", Domain::Water).unwrap();
    let electricity = process_upload(&electricity, "csv", Domain::Electricity).unwrap();

    assert_eq!(water.analysis.total_series.name, "Water Usage (Liters)");
    assert_eq!(
        electricity.analysis.total_series.name,
        "Electricity Usage (kWh)"
    );
    assert!(water.records[0].categories.contains_key("drinking"));
    assert!(electricity.records[0].categories.contains_key("fan"));

    // Category extras are an electricity-only summary feature.
    assert!(water.analysis.summary.category_peaks.is_none());
    assert!(electricity.analysis.summary.category_peaks.is_some());
}

#[test]
fn test_water_upload_missing_total_header() {
    let buffer = UploadBuilder::with_headers(&["Timestamp", "Drinking (Liters)"])
        .raw_row(&["2024-01-01 08:00", "3"])
        .build();

    let err = process_upload(&buffer, "csv", Domain::Water).unwrap_err();
    match err {
        UtilstatError::MissingRequiredColumns(columns) => {
            assert!(columns.contains("Total Water (Liters)"));
        }
        other => panic!("expected MissingRequiredColumns, got {other:?}"),
    }
}

#[test]
fn test_water_total_header_does_not_satisfy_electricity() {
    // A water upload pushed at the electricity endpoint fails the schema
    // probe, not some later stage.
    let buffer = UploadBuilder::water()
        .usage_row("2024-01-01 08:00", 10.0, [1.0; 5])
        .build();

    let err = process_upload(&buffer, "csv", Domain::Electricity).unwrap_err();
    assert!(matches!(err, UtilstatError::MissingRequiredColumns(_)));
}

#[test]
fn test_empty_upload() {
    let buffer = UploadBuilder::water().build();
    let err = process_upload(&buffer, "csv", Domain::Water).unwrap_err();
    assert!(matches!(err, UtilstatError::EmptyDataset));
}

#[test]
fn test_rerun_is_bit_identical() {
    let buffer = UploadBuilder::electricity()
        .usage_row("2024-02-01 06:00", 12.5, [2.5, 4.0, 0.0, 5.0, 1.0])
        .usage_row("2024-02-02 06:00", 8.25, [1.25, 4.0, 0.0, 2.0, 1.0])
        .build();

    let first = process_upload(&buffer, "csv", Domain::Electricity).unwrap();
    let second = process_upload(&buffer, "csv", Domain::Electricity).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.analysis).unwrap(),
        serde_json::to_string(&second.analysis).unwrap()
    );
}

#[test]
fn test_analysis_json_shape() {
    let buffer = UploadBuilder::water()
        .usage_row("2024-01-01 08:00", 10.0, [3.0, 2.0, 5.0, 0.0, 0.0])
        .build();

    let upload = process_upload(&buffer, "csv", Domain::Water).unwrap();
    let json = serde_json::to_value(&upload.analysis).unwrap();

    assert_eq!(json["labels"][0], "2024-01-01");
    assert_eq!(json["totalSeries"]["name"], "Water Usage (Liters)");
    assert_eq!(json["totalSeries"]["data"][0], 10.0);
    assert_eq!(json["distribution"]["categories"][0], "Drinking");
    assert_eq!(json["summary"]["totalUsage"], 10.0);
    assert_eq!(json["summary"]["peakDay"], "2024-01-01");
    // Water summaries omit the electricity-only blocks entirely.
    assert!(json["summary"].get("categoryPeaks").is_none());
}
