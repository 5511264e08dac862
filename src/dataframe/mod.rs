// Fitness record table
pub mod clean;
pub mod display;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::NASeries;

pub use display::{format_float, format_pairs, ColumnInfo, FrameInfo, Summary};

pub const DATE: &str = "Date";
pub const WORKOUT_TYPE: &str = "Workout_Type";
pub const STEPS: &str = "Steps";
pub const CALORIES_BURNED: &str = "Calories_Burned";
pub const HEART_RATE_AVG: &str = "Heart_Rate_avg";
pub const CALORIES_PER_STEP: &str = "Calories_per_Step";

/// Columns every input file must provide
pub const REQUIRED_COLUMNS: [&str; 5] = [DATE, WORKOUT_TYPE, STEPS, CALORIES_BURNED, HEART_RATE_AVG];

/// Numeric columns of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Steps,
    CaloriesBurned,
    HeartRateAvg,
    CaloriesPerStep,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Steps,
        Metric::CaloriesBurned,
        Metric::HeartRateAvg,
        Metric::CaloriesPerStep,
    ];

    /// Column header
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Steps => STEPS,
            Metric::CaloriesBurned => CALORIES_BURNED,
            Metric::HeartRateAvg => HEART_RATE_AVG,
            Metric::CaloriesPerStep => CALORIES_PER_STEP,
        }
    }

    /// Human readable label for axes and legends
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Steps => "Steps",
            Metric::CaloriesBurned => "Calories Burned",
            Metric::HeartRateAvg => "Heart Rate",
            Metric::CaloriesPerStep => "Calories per Step",
        }
    }
}

/// One row of the table, borrowed from its columns
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    /// Label of the row in the loaded file (0-based)
    pub label: usize,
    pub date: &'a NA<NaiveDate>,
    pub workout_type: &'a NA<String>,
    pub steps: NA<f64>,
    pub calories_burned: NA<f64>,
    pub heart_rate_avg: NA<f64>,
    /// Present once the ratio has been derived
    pub calories_per_step: Option<NA<f64>>,
}

/// Daily fitness records
///
/// Rows keep the label they had in the loaded file, so subsets (head,
/// filtered rows) print with their original position.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessFrame {
    index: Vec<usize>,
    date: NASeries<NaiveDate>,
    workout_type: NASeries<String>,
    steps: NASeries<f64>,
    calories_burned: NASeries<f64>,
    heart_rate_avg: NASeries<f64>,
    calories_per_step: Option<NASeries<f64>>,
}

impl FitnessFrame {
    /// Builds a table from its five source columns
    pub fn new(
        date: NASeries<NaiveDate>,
        workout_type: NASeries<String>,
        steps: NASeries<f64>,
        calories_burned: NASeries<f64>,
        heart_rate_avg: NASeries<f64>,
    ) -> Result<Self> {
        let len = date.len();
        for (name, column_len) in [
            (WORKOUT_TYPE, workout_type.len()),
            (STEPS, steps.len()),
            (CALORIES_BURNED, calories_burned.len()),
            (HEART_RATE_AVG, heart_rate_avg.len()),
        ] {
            if column_len != len {
                return Err(Error::DimensionMismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    name, column_len, len
                )));
            }
        }

        Ok(FitnessFrame {
            index: (0..len).collect(),
            date: date.with_name(DATE),
            workout_type: workout_type.with_name(WORKOUT_TYPE),
            steps: steps.with_name(STEPS),
            calories_burned: calories_burned.with_name(CALORIES_BURNED),
            heart_rate_avg: heart_rate_avg.with_name(HEART_RATE_AVG),
            calories_per_step: None,
        })
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row labels
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn dates(&self) -> &NASeries<NaiveDate> {
        &self.date
    }

    pub fn workout_type(&self) -> &NASeries<String> {
        &self.workout_type
    }

    /// A numeric column
    ///
    /// `Calories_per_Step` only exists after
    /// [`derive_calories_per_step`](FitnessFrame::derive_calories_per_step).
    pub fn metric(&self, metric: Metric) -> Result<&NASeries<f64>> {
        match metric {
            Metric::Steps => Ok(&self.steps),
            Metric::CaloriesBurned => Ok(&self.calories_burned),
            Metric::HeartRateAvg => Ok(&self.heart_rate_avg),
            Metric::CaloriesPerStep => self
                .calories_per_step
                .as_ref()
                .ok_or_else(|| Error::ColumnNotFound(CALORIES_PER_STEP.to_string())),
        }
    }

    /// Numeric columns currently in the table, in display order
    pub fn metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| *m != Metric::CaloriesPerStep || self.calories_per_step.is_some())
            .collect()
    }

    /// Column headers in display order
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![DATE, WORKOUT_TYPE];
        names.extend(self.metrics().iter().map(|m| m.column_name()));
        names
    }

    /// Row at a position
    pub fn row(&self, pos: usize) -> Option<Row<'_>> {
        let label = *self.index.get(pos)?;
        Some(Row {
            label,
            date: self.date.get(pos)?,
            workout_type: self.workout_type.get(pos)?,
            steps: *self.steps.get(pos)?,
            calories_burned: *self.calories_burned.get(pos)?,
            heart_rate_avg: *self.heart_rate_avg.get(pos)?,
            calories_per_step: match &self.calories_per_step {
                Some(column) => Some(*column.get(pos)?),
                None => None,
            },
        })
    }

    /// Iterates over the rows
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.row_count()).filter_map(move |pos| self.row(pos))
    }

    /// Rows at the given positions, keeping their labels
    pub fn take(&self, positions: &[usize]) -> Result<Self> {
        let index = positions
            .iter()
            .map(|&pos| {
                self.index.get(pos).copied().ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "row {} out of bounds for table of {} rows",
                        pos,
                        self.row_count()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FitnessFrame {
            index,
            date: self.date.take(positions)?,
            workout_type: self.workout_type.take(positions)?,
            steps: self.steps.take(positions)?,
            calories_burned: self.calories_burned.take(positions)?,
            heart_rate_avg: self.heart_rate_avg.take(positions)?,
            calories_per_step: match &self.calories_per_step {
                Some(column) => Some(column.take(positions)?),
                None => None,
            },
        })
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Result<Self> {
        let n = std::cmp::min(n, self.row_count());
        let positions: Vec<usize> = (0..n).collect();
        self.take(&positions)
    }

    /// Rows for which `predicate` holds
    pub fn filter_rows<F>(&self, predicate: F) -> Result<Self>
    where
        F: Fn(&Row<'_>) -> bool,
    {
        let positions: Vec<usize> = self
            .rows()
            .enumerate()
            .filter(|(_, row)| predicate(row))
            .map(|(pos, _)| pos)
            .collect();
        self.take(&positions)
    }

    /// Number of missing cells per column
    pub fn missing_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts = vec![
            (DATE, self.date.na_count()),
            (WORKOUT_TYPE, self.workout_type.na_count()),
        ];
        for metric in self.metrics() {
            if let Ok(column) = self.metric(metric) {
                counts.push((metric.column_name(), column.na_count()));
            }
        }
        counts
    }

    /// Distinct workout types in order of first appearance (NA included)
    pub fn workout_types(&self) -> Vec<NA<String>> {
        self.workout_type.unique()
    }

    /// Rows per workout type, most frequent first
    ///
    /// Ties keep the order of first appearance. Missing types are not counted.
    pub fn value_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for workout in self.workout_type.values().iter().filter_map(|v| v.value()) {
            match counts.iter_mut().find(|(name, _)| name == workout) {
                Some((_, count)) => *count += 1,
                None => counts.push((workout.clone(), 1)),
            }
        }
        // stable sort keeps first-appearance order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// pandas-style dtype name of every column
    pub fn dtypes(&self) -> Vec<(&'static str, &'static str)> {
        let mut dtypes = vec![(DATE, "datetime64[ns]"), (WORKOUT_TYPE, "object")];
        for metric in self.metrics() {
            if let Ok(column) = self.metric(metric) {
                dtypes.push((metric.column_name(), numeric_dtype(column)));
            }
        }
        dtypes
    }
}

/// `int64` for a complete whole-number column, `float64` otherwise
pub(crate) fn numeric_dtype(column: &NASeries<f64>) -> &'static str {
    if !column.has_na() && column.is_integral() {
        "int64"
    } else {
        "float64"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn sample_frame() -> FitnessFrame {
        FitnessFrame::new(
            NASeries::from_options(
                vec![
                    Some(ymd(2024, 1, 1)),
                    Some(ymd(2024, 1, 1)),
                    Some(ymd(2024, 1, 2)),
                    Some(ymd(2024, 1, 4)),
                    None,
                ],
                None,
            ),
            NASeries::from_options(
                vec![
                    Some(" cardio".to_string()),
                    Some("YOGA ".to_string()),
                    Some("Cardio".to_string()),
                    None,
                    Some("strength".to_string()),
                ],
                None,
            ),
            NASeries::from_options(
                vec![Some(8000.0), Some(0.0), Some(12000.0), Some(-5.0), None],
                None,
            ),
            NASeries::from_options(
                vec![Some(400.0), Some(150.0), None, Some(300.0), Some(500.0)],
                None,
            ),
            NASeries::from_vec(vec![120.0, 45.0, 130.0, 72.0, 101.0], None),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = FitnessFrame::new(
            NASeries::from_vec(vec![ymd(2024, 1, 1)], None),
            NASeries::from_vec(vec!["Cardio".to_string()], None),
            NASeries::from_vec(vec![1.0, 2.0], None),
            NASeries::from_vec(vec![1.0], None),
            NASeries::from_vec(vec![1.0], None),
        );
        assert!(matches!(result, Err(Error::DimensionMismatch(_))));
    }

    #[test]
    fn test_missing_counts() {
        let frame = sample_frame();
        assert_eq!(
            frame.missing_counts(),
            vec![
                (DATE, 1),
                (WORKOUT_TYPE, 1),
                (STEPS, 1),
                (CALORIES_BURNED, 1),
                (HEART_RATE_AVG, 0)
            ]
        );
    }

    #[test]
    fn test_filter_rows_keeps_labels() {
        let frame = sample_frame();
        let high = frame
            .filter_rows(|row| row.heart_rate_avg.value().map_or(false, |hr| *hr > 100.0))
            .unwrap();
        assert_eq!(high.index(), &[0, 2, 4]);

        let head = high.head(2).unwrap();
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.index(), &[0, 2]);
    }

    #[test]
    fn test_calories_per_step_absent_until_derived() {
        let frame = sample_frame();
        assert!(matches!(
            frame.metric(Metric::CaloriesPerStep),
            Err(Error::ColumnNotFound(_))
        ));
        assert_eq!(frame.column_names().len(), 5);
    }

    #[test]
    fn test_dtypes() {
        let frame = sample_frame();
        let dtypes = frame.dtypes();
        assert_eq!(dtypes[0], (DATE, "datetime64[ns]"));
        assert_eq!(dtypes[1], (WORKOUT_TYPE, "object"));
        assert_eq!(dtypes[2], (STEPS, "float64"));
        assert_eq!(dtypes[4], (HEART_RATE_AVG, "int64"));
    }

    #[test]
    fn test_value_counts_ties_in_first_appearance_order() {
        let frame = FitnessFrame::new(
            NASeries::from_vec(vec![ymd(2024, 1, 1); 5], None),
            NASeries::from_options(
                vec![
                    Some("Yoga".to_string()),
                    Some("Cardio".to_string()),
                    None,
                    Some("Cardio".to_string()),
                    Some("Strength".to_string()),
                ],
                None,
            ),
            NASeries::from_vec(vec![1.0; 5], None),
            NASeries::from_vec(vec![1.0; 5], None),
            NASeries::from_vec(vec![1.0; 5], None),
        )
        .unwrap();

        assert_eq!(
            frame.value_counts(),
            vec![
                ("Cardio".to_string(), 2),
                ("Yoga".to_string(), 1),
                ("Strength".to_string(), 1)
            ]
        );
    }
}
