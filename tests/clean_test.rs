mod common;

use std::io::Cursor;

use fitrs::io::read_csv_from_reader;
use fitrs::{FitnessFrame, Metric, NA};

use common::FITNESS_CSV;

fn cleaned() -> (FitnessFrame, usize) {
    let mut frame = read_csv_from_reader(Cursor::new(FITNESS_CSV), None).unwrap();
    frame.clean_workout_types();
    let invalidated = frame.invalidate_nonpositive_steps();
    frame.derive_calories_per_step();
    (frame, invalidated)
}

#[test]
fn test_workout_types_are_trimmed_and_title_cased() {
    let (frame, _) = cleaned();
    assert_eq!(
        frame.workout_types(),
        vec![
            NA::Value("Cardio".to_string()),
            NA::Value("Yoga".to_string()),
            NA::Value("Strength".to_string()),
            NA::NA,
        ]
    );
    assert_eq!(
        frame.value_counts(),
        vec![
            ("Cardio".to_string(), 4),
            ("Yoga".to_string(), 3),
            ("Strength".to_string(), 2),
        ]
    );
}

#[test]
fn test_nonpositive_steps_become_na() {
    let (frame, invalidated) = cleaned();
    assert_eq!(invalidated, 1);

    let steps = frame.metric(Metric::Steps).unwrap();
    assert_eq!(steps.get(5), Some(&NA::NA));
    assert_eq!(steps.na_count(), 2);
    assert!(steps.dropna().iter().all(|&s| s > 0.0));
}

#[test]
fn test_calories_per_step_is_na_exactly_where_an_operand_is() {
    let (frame, _) = cleaned();
    let steps = frame.metric(Metric::Steps).unwrap();
    let calories = frame.metric(Metric::CaloriesBurned).unwrap();
    let ratio = frame.metric(Metric::CaloriesPerStep).unwrap();
    assert_eq!(ratio.len(), frame.row_count());

    for i in 0..frame.row_count() {
        match (steps.get(i), calories.get(i), ratio.get(i)) {
            (Some(NA::Value(s)), Some(NA::Value(c)), Some(NA::Value(r))) => {
                assert!((r - c / s).abs() < 1e-12)
            }
            (_, _, Some(NA::NA)) => {
                assert!(steps.get(i) == Some(&NA::NA) || calories.get(i) == Some(&NA::NA))
            }
            other => panic!("row {}: unexpected cells {:?}", i, other),
        }
    }
    assert_eq!(ratio.get(0), Some(&NA::Value(0.05)));
    assert_eq!(ratio.na_count(), 3);
}

#[test]
fn test_dtypes_after_cleaning() {
    let (frame, _) = cleaned();
    assert_eq!(
        frame.dtypes(),
        vec![
            ("Date", "datetime64[ns]"),
            ("Workout_Type", "object"),
            ("Steps", "float64"),
            ("Calories_Burned", "float64"),
            ("Heart_Rate_avg", "int64"),
            ("Calories_per_Step", "float64"),
        ]
    );
}

#[test]
fn test_describe_skips_missing_values() {
    let (frame, _) = cleaned();
    let summary = frame.describe();

    let heart_rate = summary.get("Heart_Rate_avg").unwrap();
    assert_eq!(heart_rate.count, 10);
    assert!((heart_rate.mean - 105.5).abs() < 1e-12);
    assert_eq!(heart_rate.min, 45.0);
    assert_eq!(heart_rate.max, 140.0);

    let steps = summary.get("Steps").unwrap();
    assert_eq!(steps.count, 8);
    assert_eq!(steps.min, 3000.0);
}
