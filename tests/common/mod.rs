// Shared fixtures for the integration tests

use std::fs;
use std::path::{Path, PathBuf};

/// Ten days of records with the usual export problems: padded and
/// mixed-case workout names, a zero step count, a blank and an `NA` cell,
/// a duplicated date and a gap on 2024-01-03.
pub const FITNESS_CSV: &str = "\
Date,Workout_Type,Steps,Calories_Burned,Heart_Rate_avg
2024-01-01, cardio ,10000,500,130
2024-01-02,Yoga,4000,200,85
2024-01-02,Strength,6000,350,110
2024-01-04,CARDIO,12000,550,140
2024-01-05,yoga,3000,180,45
2024-01-06,Cardio,0,420,125
2024-01-07,Yoga,,220,80
2024-01-08,Strength,7000,NA,115
2024-01-09,Cardio,11000,530,135
2024-01-10,,5000,260,90
";

/// Writes `contents` to `name` inside `dir` and returns its path
#[allow(dead_code)]
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
