//! Date parsing and calendar checks for the daily records

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::na::NA;
use crate::series::NASeries;

/// Date layouts tried, in order, when no explicit format is configured
const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Time suffixes accepted after a date layout (the time is discarded)
const TIME_SUFFIXES: &[&str] = &["", " %H:%M:%S", "T%H:%M:%S", " %H:%M"];

/// Parses one date with a chrono format string
///
/// Formats carrying a time component are parsed as date-times and
/// truncated to the calendar date.
pub fn parse_date(s: &str, format: &str) -> Result<NaiveDate> {
    let parsed = if format.contains("%H") {
        NaiveDateTime::parse_from_str(s, format).map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(s, format)
    };
    parsed.map_err(|e| Error::DateFormat(format!("'{}' does not match '{}': {}", s, format, e)))
}

/// Finds the first known layout that parses `sample`
pub fn infer_date_format(sample: &str) -> Option<String> {
    DATE_LAYOUTS
        .iter()
        .flat_map(|layout| TIME_SUFFIXES.iter().map(move |suffix| format!("{}{}", layout, suffix)))
        .find(|format| parse_date(sample, format).is_ok())
}

/// Parses a raw text column into dates
///
/// Without an explicit `format` the layout is inferred from the first
/// present value and every other value must follow it.
pub fn parse_dates(raw: &NASeries<String>, format: Option<&str>) -> Result<NASeries<NaiveDate>> {
    parse_dates_on_lines(raw, format, &[])
}

/// `parse_dates` for values read from a CSV file
///
/// `lines` holds the file line of every value; errors name that line.
/// Rows past its end are numbered as if read right after a header line.
pub fn parse_dates_on_lines(
    raw: &NASeries<String>,
    format: Option<&str>,
    lines: &[usize],
) -> Result<NASeries<NaiveDate>> {
    let format = match format {
        Some(f) => f.to_string(),
        None => match raw.values().iter().find_map(|v| v.value()) {
            Some(sample) => infer_date_format(sample).ok_or_else(|| {
                Error::DateFormat(format!("cannot infer a date format from '{}'", sample))
            })?,
            // Nothing to parse
            None => return Ok(NASeries::new(vec![NA::NA; raw.len()], raw.name().cloned())),
        },
    };
    log::debug!("parsing dates with format '{}'", format);

    let mut dates = Vec::with_capacity(raw.len());
    for (row, value) in raw.values().iter().enumerate() {
        match value {
            NA::Value(s) => {
                let date = parse_date(s, &format).map_err(|_| {
                    Error::DateFormat(format!(
                        "'{}' at line {} does not match the date format '{}'",
                        s,
                        lines.get(row).copied().unwrap_or(row + 2),
                        format
                    ))
                })?;
                dates.push(NA::Value(date));
            }
            NA::NA => dates.push(NA::NA),
        }
    }

    Ok(NASeries::new(dates, raw.name().cloned()))
}

/// Every calendar day from `start` to `end`, both inclusive
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    if start > end {
        return Err(Error::InvalidInput(format!(
            "date range start {} is after end {}",
            start, end
        )));
    }

    let days = (end - start).num_days();
    Ok((0..=days).map(|i| start + Duration::days(i)).collect())
}

/// Number of cells equal to an earlier cell (NA compares equal to NA)
pub fn duplicated_count(dates: &NASeries<NaiveDate>) -> usize {
    let mut seen = HashSet::new();
    dates
        .values()
        .iter()
        .filter(|d| !seen.insert(**d))
        .count()
}

/// Days between the earliest and latest date that have no record
pub fn missing_dates(dates: &NASeries<NaiveDate>) -> Result<Vec<NaiveDate>> {
    let present: BTreeSet<NaiveDate> = dates.dropna().into_iter().collect();
    let (start, end) = match (present.first(), present.last()) {
        (Some(&start), Some(&end)) => (start, end),
        _ => return Ok(Vec::new()),
    };

    Ok(date_range(start, end)?
        .into_iter()
        .filter(|d| !present.contains(d))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_infer_date_format() {
        assert_eq!(infer_date_format("2024-03-01").as_deref(), Some("%Y-%m-%d"));
        assert_eq!(infer_date_format("03/01/2024").as_deref(), Some("%m/%d/%Y"));
        assert_eq!(
            infer_date_format("2024-03-01 08:30:00").as_deref(),
            Some("%Y-%m-%d %H:%M:%S")
        );
        assert_eq!(infer_date_format("01 Mar 2024").as_deref(), Some("%d %b %Y"));
        assert!(infer_date_format("yesterday").is_none());
    }

    #[test]
    fn test_parse_dates_inconsistent_format() {
        let raw = NASeries::from_vec(vec!["2024-03-01".to_string(), "03/02/2024".to_string()], None);
        assert!(matches!(parse_dates(&raw, None), Err(Error::DateFormat(_))));
    }

    #[test]
    fn test_parse_dates_keeps_na() {
        let raw = NASeries::from_options(vec![None, Some("2024-03-01".to_string())], None);
        let dates = parse_dates(&raw, None).unwrap();
        assert_eq!(dates.values(), &[NA::NA, NA::Value(ymd(2024, 3, 1))]);
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = date_range(ymd(2024, 2, 27), ymd(2024, 3, 2)).unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range[2], ymd(2024, 2, 29));
        assert!(date_range(ymd(2024, 3, 2), ymd(2024, 3, 1)).is_err());
    }

    #[test]
    fn test_duplicates_and_gaps() {
        let dates = NASeries::from_options(
            vec![
                Some(ymd(2024, 1, 1)),
                Some(ymd(2024, 1, 1)),
                Some(ymd(2024, 1, 4)),
                None,
                None,
            ],
            None,
        );
        assert_eq!(duplicated_count(&dates), 2);
        assert_eq!(
            missing_dates(&dates).unwrap(),
            vec![ymd(2024, 1, 2), ymd(2024, 1, 3)]
        );
    }
}
