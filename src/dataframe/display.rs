//! Text rendering of the table and of its diagnostics (info, describe)

use std::collections::BTreeMap;
use std::fmt;

use crate::dataframe::{numeric_dtype, FitnessFrame, DATE, WORKOUT_TYPE};
use crate::na::NA;
use crate::stats::{self, DescriptiveStats};

/// Formats a number the way the tables print it
///
/// Whole numbers keep one decimal, others at most six; NA prints as `NaN`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.1}", value);
    }
    let s = format!("{:.6}", value);
    let trimmed = s.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

fn format_cell<T: fmt::Display>(value: &NA<T>, na: &str) -> String {
    match value {
        NA::Value(v) => v.to_string(),
        NA::NA => na.to_string(),
    }
}

fn format_number(value: &NA<f64>, integral: bool) -> String {
    match value {
        NA::Value(v) if integral => format!("{:.0}", v),
        NA::Value(v) => format_float(*v),
        NA::NA => "NaN".to_string(),
    }
}

/// Writes rows under a header, every column right-aligned except the first
fn write_table(f: &mut fmt::Formatter<'_>, header: &[String], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
        for (i, cell) in cells.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(0);
            if i == 0 {
                write!(f, "{:<width$}", cell, width = width)?;
            } else {
                write!(f, "  {:>width$}", cell, width = width)?;
            }
        }
        writeln!(f)
    };

    write_line(f, header)?;
    for row in rows {
        write_line(f, row)?;
    }
    Ok(())
}

impl fmt::Display for FitnessFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = self.metrics();
        let integral: Vec<bool> = metrics
            .iter()
            .map(|m| {
                self.metric(*m)
                    .map(|c| numeric_dtype(c) == "int64")
                    .unwrap_or(false)
            })
            .collect();

        let mut header = vec![String::new()];
        header.extend(self.column_names().iter().map(|s| s.to_string()));

        let rows: Vec<Vec<String>> = self
            .rows()
            .map(|row| {
                let mut cells = vec![
                    row.label.to_string(),
                    format_cell(row.date, "NaT"),
                    format_cell(row.workout_type, "NaN"),
                ];
                let values = [
                    Some(row.steps),
                    Some(row.calories_burned),
                    Some(row.heart_rate_avg),
                    row.calories_per_step,
                ];
                for (value, is_int) in values.iter().flatten().zip(&integral) {
                    cells.push(format_number(value, *is_int));
                }
                cells
            })
            .collect();

        if rows.is_empty() {
            writeln!(f, "Empty FitnessFrame")?;
            writeln!(f, "Columns: [{}]", self.column_names().join(", "))?;
            return writeln!(f, "Index: []");
        }

        write_table(f, &header, &rows)?;
        writeln!(f)?;
        write!(
            f,
            "[{} rows x {} columns]",
            self.row_count(),
            self.column_names().len()
        )
    }
}

/// Non-null count and dtype of one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub non_null: usize,
    pub dtype: &'static str,
}

/// Overview of the table, rendered like `DataFrame.info()`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInfo {
    pub entries: usize,
    pub first_label: Option<usize>,
    pub last_label: Option<usize>,
    pub columns: Vec<ColumnInfo>,
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<class 'fitrs::FitnessFrame'>")?;
        match (self.first_label, self.last_label) {
            (Some(first), Some(last)) => writeln!(
                f,
                "RangeIndex: {} entries, {} to {}",
                self.entries, first, last
            )?,
            _ => writeln!(f, "RangeIndex: 0 entries")?,
        }
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;

        let name_width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());
        writeln!(
            f,
            " #   {:<name_width$}  Non-Null Count  Dtype",
            "Column",
            name_width = name_width
        )?;
        writeln!(
            f,
            "---  {:<name_width$}  --------------  -----",
            "------",
            name_width = name_width
        )?;
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<name_width$}  {:<14}  {}",
                i,
                column.name,
                format!("{} non-null", column.non_null),
                column.dtype,
                name_width = name_width
            )?;
        }

        let mut dtype_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for column in &self.columns {
            *dtype_counts.entry(column.dtype).or_insert(0) += 1;
        }
        let summary: Vec<String> = dtype_counts
            .iter()
            .map(|(dtype, count)| format!("{}({})", dtype, count))
            .collect();
        write!(f, "dtypes: {}", summary.join(", "))
    }
}

/// Per-column descriptive statistics, rendered like `DataFrame.describe()`
#[derive(Debug, Clone)]
pub struct Summary {
    /// `None` for a column without any present value
    pub columns: Vec<(&'static str, Option<DescriptiveStats>)>,
}

impl Summary {
    /// Statistics of a column by header
    pub fn get(&self, column: &str) -> Option<&DescriptiveStats> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .and_then(|(_, stats)| stats.as_ref())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().map(|(name, _)| name.to_string()));

        let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
        let rows: Vec<Vec<String>> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut cells = vec![label.to_string()];
                for (_, stats) in &self.columns {
                    let value = match stats {
                        Some(s) => [
                            s.count as f64,
                            s.mean,
                            s.std,
                            s.min,
                            s.q1,
                            s.median,
                            s.q3,
                            s.max,
                        ][i],
                        None if i == 0 => 0.0,
                        None => f64::NAN,
                    };
                    cells.push(if value.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{:.6}", value)
                    });
                }
                cells
            })
            .collect();

        write_table(f, &header, &rows)
    }
}

impl FitnessFrame {
    /// Column overview: entries, non-null counts and dtypes
    pub fn info(&self) -> FrameInfo {
        let mut columns = vec![
            ColumnInfo {
                name: DATE,
                non_null: self.dates().value_count(),
                dtype: "datetime64[ns]",
            },
            ColumnInfo {
                name: WORKOUT_TYPE,
                non_null: self.workout_type().value_count(),
                dtype: "object",
            },
        ];
        for metric in self.metrics() {
            if let Ok(column) = self.metric(metric) {
                columns.push(ColumnInfo {
                    name: metric.column_name(),
                    non_null: column.value_count(),
                    dtype: numeric_dtype(column),
                });
            }
        }

        FrameInfo {
            entries: self.row_count(),
            first_label: self.index().first().copied(),
            last_label: self.index().last().copied(),
            columns,
        }
    }

    /// Descriptive statistics of every numeric column (NA skipped)
    pub fn describe(&self) -> Summary {
        let columns = self
            .metrics()
            .into_iter()
            .filter_map(|metric| {
                let column = self.metric(metric).ok()?;
                Some((metric.column_name(), stats::describe(column.dropna()).ok()))
            })
            .collect();
        Summary { columns }
    }
}

/// Renders `(name, value)` pairs as an aligned two-column listing
pub fn format_pairs<V: fmt::Display>(pairs: &[(&str, V)]) -> String {
    let width = pairs.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(name, value)| format!("{:<width$}  {}", name, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::tests::sample_frame;
    use crate::dataframe::{CALORIES_BURNED, HEART_RATE_AVG, STEPS};

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(8000.0), "8000.0");
        assert_eq!(format_float(0.05), "0.05");
        assert_eq!(format_float(1.0 / 3.0), "0.333333");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_display_head() {
        let frame = sample_frame();
        let text = frame.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Workout_Type"));
        assert!(lines[1].starts_with('0'));
        assert!(lines[1].contains("2024-01-01"));
        assert!(lines[1].contains("8000.0"));
        // integral column without NA prints without decimals
        assert!(lines[1].trim_end().ends_with("120"));
        assert!(text.ends_with("[5 rows x 5 columns]"));

        let head = frame.head(2).unwrap().to_string();
        assert_eq!(head.lines().count(), 5);
        assert!(head.ends_with("[2 rows x 5 columns]"));
    }

    #[test]
    fn test_display_marks_missing_cells() {
        let frame = sample_frame();
        let text = frame.to_string();
        let last_row = text.lines().nth(5).unwrap();
        assert!(last_row.starts_with('4'));
        assert!(last_row.contains("NaT"));
        assert!(last_row.contains("NaN"));
    }

    #[test]
    fn test_info() {
        let info = sample_frame().info();
        assert_eq!(info.entries, 5);
        assert_eq!(info.columns.len(), 5);
        assert_eq!(info.columns[2].non_null, 4);

        let text = info.to_string();
        assert!(text.contains("RangeIndex: 5 entries, 0 to 4"));
        assert!(text.contains("dtypes: datetime64[ns](1), float64(2), int64(1), object(1)"));
    }

    #[test]
    fn test_describe_skips_na_and_date() {
        let summary = sample_frame().describe();
        let names: Vec<&str> = summary.columns.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec![STEPS, CALORIES_BURNED, HEART_RATE_AVG]);

        let calories = summary.get(CALORIES_BURNED).unwrap();
        assert_eq!(calories.count, 4);
        assert!((calories.mean - 337.5).abs() < 1e-12);

        let text = summary.to_string();
        assert!(text.lines().nth(1).unwrap().starts_with("count"));
        assert!(text.contains("337.500000"));
    }

    #[test]
    fn test_format_pairs() {
        let text = format_pairs(&[("Date", 0), ("Heart_Rate_avg", 3)]);
        assert_eq!(text, "Date            0\nHeart_Rate_avg  3");
    }
}
