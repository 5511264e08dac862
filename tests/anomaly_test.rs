mod common;

use std::io::Cursor;

use fitrs::anomaly::{detect_outliers, heart_rate_extremes, iqr_bounds};
use fitrs::io::read_csv_from_reader;
use fitrs::Metric;

use common::FITNESS_CSV;

#[test]
fn test_iqr_outliers_on_known_data() {
    let steps = [
        4900.0, 6100.0, 5800.0, 6400.0, 5900.0, 6000.0, 6300.0, 5700.0, 21000.0, 150.0,
    ];
    let (lower, upper) = iqr_bounds(&steps, 1.5).unwrap();
    // Q1 = 5725, Q3 = 6250
    assert!((lower - 4937.5).abs() < 1e-9);
    assert!((upper - 7037.5).abs() < 1e-9);
    assert_eq!(detect_outliers(&steps, 1.5), vec![4900.0, 21000.0, 150.0]);

    // a wider fence keeps the mild low value
    assert_eq!(detect_outliers(&steps, 3.0), vec![21000.0, 150.0]);
}

#[test]
fn test_fixture_has_no_outliers() {
    let frame = read_csv_from_reader(Cursor::new(FITNESS_CSV), None).unwrap();
    for metric in [Metric::Steps, Metric::CaloriesBurned, Metric::HeartRateAvg] {
        let values = frame.metric(metric).unwrap().dropna();
        assert!(detect_outliers(&values, 1.5).is_empty(), "{:?}", metric);
    }
}

#[test]
fn test_heart_rate_extremes() {
    let frame = read_csv_from_reader(Cursor::new(FITNESS_CSV), None).unwrap();
    let extremes = heart_rate_extremes(&frame, 50.0, 100.0).unwrap();
    assert_eq!(extremes.low.index(), &[4]);
    assert_eq!(extremes.high.index(), &[0, 2, 3, 5, 7, 8]);

    let text = extremes.low.to_string();
    assert!(text.contains("2024-01-05"));
    assert!(text.contains("[1 rows x 5 columns]"));
}
