//! Outlier and implausible-value checks

use crate::dataframe::FitnessFrame;
use crate::error::{Error, Result};
use crate::stats;

/// Tukey fences `(Q1 - k·IQR, Q3 + k·IQR)`
pub fn iqr_bounds(values: &[f64], k: f64) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(Error::EmptyData("IQR bounds need at least one value".into()));
    }
    let q1 = stats::quantile(values, 0.25);
    let q3 = stats::quantile(values, 0.75);
    let iqr = q3 - q1;
    Ok((q1 - k * iqr, q3 + k * iqr))
}

/// Values strictly outside the Tukey fences, in input order
///
/// An empty input has no outliers.
pub fn detect_outliers(values: &[f64], k: f64) -> Vec<f64> {
    match iqr_bounds(values, k) {
        Ok((lower, upper)) => values
            .iter()
            .copied()
            .filter(|&v| v < lower || v > upper)
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Rows with an implausibly low or high average heart rate
#[derive(Debug, Clone)]
pub struct HeartRateExtremes {
    /// `Heart_Rate_avg < low`
    pub low: FitnessFrame,
    /// `Heart_Rate_avg > high`
    pub high: FitnessFrame,
}

/// Splits out rows below `low` and above `high` (both strict)
pub fn heart_rate_extremes(frame: &FitnessFrame, low: f64, high: f64) -> Result<HeartRateExtremes> {
    let extremes = HeartRateExtremes {
        low: frame.filter_rows(|row| row.heart_rate_avg.value().map_or(false, |hr| *hr < low))?,
        high: frame.filter_rows(|row| row.heart_rate_avg.value().map_or(false, |hr| *hr > high))?,
    };
    log::debug!(
        "heart rate extremes: {} below {}, {} above {}",
        extremes.low.row_count(),
        low,
        extremes.high.row_count(),
        high
    );
    Ok(extremes)
}
