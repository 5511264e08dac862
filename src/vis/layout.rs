//! Numbers behind the figures: box statistics, histogram bins, fitted lines
//! and axis ranges

use crate::error::{Error, Result};
use crate::stats;

/// Whisker reach in IQRs
pub const WHISKER_IQR: f64 = 1.5;

/// Box-and-whisker summary of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within `WHISKER_IQR` IQRs below Q1
    pub whisker_low: f64,
    /// Largest value within `WHISKER_IQR` IQRs above Q3
    pub whisker_high: f64,
    /// Values beyond the whiskers
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// `None` for an empty sample
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let q1 = stats::quantile(values, 0.25);
        let median = stats::quantile(values, 0.5);
        let q3 = stats::quantile(values, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - WHISKER_IQR * iqr;
        let upper_fence = q3 + WHISKER_IQR * iqr;

        let inside = values
            .iter()
            .copied()
            .filter(|&v| v >= lower_fence && v <= upper_fence);
        let whisker_low = inside.clone().fold(f64::INFINITY, f64::min);
        let whisker_high = inside.fold(f64::NEG_INFINITY, f64::max);
        let fliers = values
            .iter()
            .copied()
            .filter(|&v| v < lower_fence || v > upper_fence)
            .collect();

        Some(BoxStats {
            q1,
            median,
            q3,
            // the box always holds values, so both whiskers are finite
            whisker_low: whisker_low.min(q1),
            whisker_high: whisker_high.max(q3),
            fliers,
        })
    }

    /// Lowest and highest point drawn
    pub fn extent(&self) -> (f64, f64) {
        self.fliers.iter().fold(
            (self.whisker_low, self.whisker_high),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
    }
}

/// One histogram bar `[start, end)` (the last bin also holds its end)
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Sturges' rule: `ceil(log2(n)) + 1` bins
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Equal-width bins over the data range
pub fn histogram(data: &[f64], bins: usize) -> Result<Vec<Bin>> {
    if data.is_empty() {
        return Err(Error::EmptyData("histogram needs at least one value".into()));
    }
    if bins == 0 {
        return Err(Error::InvalidInput("bin count must be at least 1".into()));
    }

    let (mut min_value, mut max_value) = min_max(data);
    if min_value == max_value {
        // single distinct value: centre a unit-wide range on it
        min_value -= 0.5;
        max_value += 0.5;
    }
    let bin_width = (max_value - min_value) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in data {
        let index = ((value - min_value) / bin_width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min_value + i as f64 * bin_width,
            end: min_value + (i + 1) as f64 * bin_width,
            count,
        })
        .collect())
}

/// Least-squares line `y = slope·x + intercept`
pub fn least_squares(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "regression inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::InsufficientData(
            "a regression line needs at least two points".into(),
        ));
    }

    let slope = stats::covariance(x, y)? / stats::covariance(x, x)?;
    if !slope.is_finite() {
        return Err(Error::ComputationError(
            "regression line undefined: x has zero variance".into(),
        ));
    }
    let n = x.len() as f64;
    let intercept = y.iter().sum::<f64>() / n - slope * x.iter().sum::<f64>() / n;
    Ok((slope, intercept))
}

/// Smallest and largest value (infinite bounds for empty input)
pub fn min_max(data: &[f64]) -> (f64, f64) {
    data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// `[lo, hi]` widened by `fraction` of its span on both sides
///
/// A zero-width range is widened by one unit so the axis stays drawable.
pub fn padded_range(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - span * fraction, hi + span * fraction)
}

/// Tick label of a categorical axis drawn at integer positions
pub fn category_label(names: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    names.get(rounded as usize).cloned().unwrap_or_default()
}
