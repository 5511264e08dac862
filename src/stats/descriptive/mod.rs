// Descriptive statistics

use crate::error::{Error, Result};
use crate::stats::DescriptiveStats;

/// Summary statistics of a sample
pub(crate) fn describe_impl(data: &[f64]) -> Result<DescriptiveStats> {
    if data.is_empty() {
        return Err(Error::EmptyData("describe needs at least one value".into()));
    }

    let count = data.len();
    let mean = mean(data);

    // Sample standard deviation (n - 1); undefined for a single value
    let std = if count > 1 {
        (data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let sorted = sorted_copy(data);

    Ok(DescriptiveStats {
        count,
        mean,
        std,
        min: sorted[0],
        q1: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        q3: percentile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (n - 1 denominator)
pub(crate) fn variance(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

pub(crate) fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of sorted data, linearly interpolated between the two closest
/// ranks at position `p * (n - 1)`
pub(crate) fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }

    let n = sorted_data.len();
    let idx = p * (n - 1) as f64;
    let idx_floor = idx.floor() as usize;
    let idx_ceil = idx.ceil() as usize;

    if idx_floor == idx_ceil {
        return sorted_data[idx_floor];
    }

    let weight_ceil = idx - idx_floor as f64;
    let weight_floor = 1.0 - weight_ceil;

    sorted_data[idx_floor] * weight_floor + sorted_data[idx_ceil] * weight_ceil
}

/// Sample covariance
pub(crate) fn covariance_impl(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "covariance inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }

    if x.len() < 2 {
        return Err(Error::InsufficientData(
            "covariance needs at least two observations".into(),
        ));
    }

    let n = x.len();
    let mean_x = mean(x);
    let mean_y = mean(y);

    Ok(x.iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>()
        / (n - 1) as f64)
}

/// Pearson correlation coefficient
pub(crate) fn correlation_impl(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "correlation inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }

    if x.len() < 2 {
        return Err(Error::InsufficientData(
            "correlation needs at least two observations".into(),
        ));
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    // Σ(xi - x̄)(yi - ȳ)
    let numerator = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>();

    // √[Σ(xi - x̄)² · Σ(yi - ȳ)²]
    let ss_x = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum::<f64>();
    let ss_y = y.iter().map(|&yi| (yi - mean_y).powi(2)).sum::<f64>();
    if is_flat(x, ss_x) || is_flat(y, ss_y) {
        return Err(Error::ComputationError(
            "correlation undefined: zero variance".into(),
        ));
    }

    Ok((numerator / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0))
}

/// Whether the squared deviations `ss` are rounding noise relative to the
/// scale of `values`
fn is_flat(values: &[f64], ss: f64) -> bool {
    let scale = values.iter().map(|&v| v * v).sum::<f64>();
    ss <= f64::EPSILON * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = describe_impl(&data).unwrap();

        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 1e-10);
        assert!((stats.std - 1.5811388300841898).abs() < 1e-10);
        assert!((stats.min - 1.0).abs() < 1e-10);
        assert!((stats.max - 5.0).abs() < 1e-10);
        assert!((stats.median - 3.0).abs() < 1e-10);
        assert!((stats.q1 - 2.0).abs() < 1e-10);
        assert!((stats.q3 - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_describe_single_value() {
        let stats = describe_impl(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_nan());
        assert_eq!(stats.q1, 42.0);
    }

    #[test]
    fn test_describe_empty() {
        assert!(describe_impl(&[]).is_err());
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        // position 0.75 between 10 and 20
        assert!((percentile(&sorted, 0.25) - 17.5).abs() < 1e-12);
        assert!((percentile(&sorted, 0.75) - 32.5).abs() < 1e-12);
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_covariance() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((covariance_impl(&x, &y).unwrap() - 2.5).abs() < 1e-10);

        let y_neg = vec![5.0, 4.0, 3.0, 2.0, 1.0];
        assert!((covariance_impl(&x, &y_neg).unwrap() + 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_correlation() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((correlation_impl(&x, &y).unwrap() - 1.0).abs() < 1e-10);

        let y_neg = vec![5.0, 4.0, 3.0, 2.0, 1.0];
        assert!((correlation_impl(&x, &y_neg).unwrap() + 1.0).abs() < 1e-10);

        let y_flat = vec![3.0, 3.0, 3.0, 3.0, 3.0];
        assert!(correlation_impl(&x, &y_flat).is_err());

        let tenths = vec![0.1, 0.1, 0.1];
        assert!(correlation_impl(&[1.0, 2.0, 3.0], &tenths).is_err());
        assert!(correlation_impl(&[0.0, 0.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_correlation_small_magnitudes() {
        let x = [1e-9, 2e-9, 3e-9, 4e-9];
        let y = [1e-9, 2.5e-9, 2.9e-9, 4.2e-9];
        let scaled = correlation_impl(&x, &y).unwrap();
        let unscaled = correlation_impl(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.5, 2.9, 4.2]).unwrap();
        assert!((scaled - unscaled).abs() < 1e-12);
        assert!((scaled - 0.9796392).abs() < 1e-6);
    }
}
