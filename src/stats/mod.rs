// fitrs statistics module
//
// Descriptive statistics, the special functions behind the p-values, and the
// hypothesis tests used by the analysis report.

pub mod descriptive;
pub mod distributions;
pub mod inference;

use crate::error::Result;

/// Computes summary statistics of numeric data
///
/// # Example
/// ```rust
/// use fitrs::stats;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let stats = stats::describe(&data).unwrap();
/// assert_eq!(stats.count, 5);
/// assert!((stats.mean - 3.0).abs() < 1e-12);
/// ```
pub fn describe<T: AsRef<[f64]>>(data: T) -> Result<DescriptiveStats> {
    descriptive::describe_impl(data.as_ref())
}

/// Summary statistics of one numeric sample
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (NaN for a single value)
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// 25% quantile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// 75% quantile
    pub q3: f64,
    /// Maximum
    pub max: f64,
}

/// Linearly interpolated quantile, `q` in [0, 1]
///
/// Returns NaN for empty data.
pub fn quantile<T: AsRef<[f64]>>(data: T, q: f64) -> f64 {
    let sorted = descriptive::sorted_copy(data.as_ref());
    descriptive::percentile(&sorted, q.clamp(0.0, 1.0))
}

/// Pearson correlation coefficient of two equally long arrays
///
/// # Example
/// ```rust
/// use fitrs::stats;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
/// let corr = stats::correlation(&x, &y).unwrap();
/// assert!((corr - 1.0).abs() < 1e-12);
/// ```
pub fn correlation<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    descriptive::correlation_impl(x.as_ref(), y.as_ref())
}

/// Sample covariance of two equally long arrays
pub fn covariance<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U) -> Result<f64> {
    descriptive::covariance_impl(x.as_ref(), y.as_ref())
}

/// Result of a two-sample t-test
#[derive(Debug, Clone)]
pub struct TTestResult {
    /// t statistic (sample1 minus sample2)
    pub statistic: f64,
    /// Two-sided p-value
    pub pvalue: f64,
    /// `pvalue < alpha`
    pub significant: bool,
    /// Degrees of freedom (fractional for Welch's test)
    pub df: f64,
    /// Mean of the first sample
    pub mean1: f64,
    /// Mean of the second sample
    pub mean2: f64,
}

/// Two-sample t-test
///
/// `equal_var = true` runs Student's pooled-variance test, `false` runs
/// Welch's test with Welch-Satterthwaite degrees of freedom.
///
/// # Example
/// ```rust
/// use fitrs::stats;
///
/// let sample1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let sample2 = vec![11.0, 13.0, 15.0, 17.0, 19.0];
/// let result = stats::ttest(&sample1, &sample2, 0.05, false).unwrap();
/// assert!(result.statistic < 0.0);
/// assert!(result.significant);
/// ```
pub fn ttest<T: AsRef<[f64]>, U: AsRef<[f64]>>(
    sample1: T,
    sample2: U,
    alpha: f64,
    equal_var: bool,
) -> Result<TTestResult> {
    inference::ttest_impl(sample1.as_ref(), sample2.as_ref(), alpha, equal_var)
}

/// Result of a Pearson correlation test
#[derive(Debug, Clone)]
pub struct PearsonResult {
    /// Correlation coefficient
    pub r: f64,
    /// Two-sided p-value for r = 0
    pub p_value: f64,
    /// Number of pairs
    pub n: usize,
    /// `p_value < alpha`
    pub significant: bool,
}

/// Pearson correlation coefficient with its significance test
pub fn pearson<T: AsRef<[f64]>, U: AsRef<[f64]>>(x: T, y: U, alpha: f64) -> Result<PearsonResult> {
    inference::pearson_impl(x.as_ref(), y.as_ref(), alpha)
}

/// Result of a one-way analysis of variance
#[derive(Debug, Clone)]
pub struct AnovaResult {
    /// F statistic
    pub f_statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Between-group sum of squares
    pub ss_between: f64,
    /// Within-group sum of squares
    pub ss_within: f64,
    /// Total sum of squares
    pub ss_total: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub df_total: usize,
    pub ms_between: f64,
    pub ms_within: f64,
    /// `p_value < alpha`
    pub significant: bool,
}

/// One-way ANOVA over named groups
///
/// # Example
/// ```rust
/// use fitrs::stats;
///
/// let groups = vec![
///     ("A", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
///     ("B", vec![2.0, 3.0, 4.0, 5.0, 6.0]),
///     ("C", vec![3.0, 4.0, 5.0, 6.0, 7.0]),
/// ];
/// let result = stats::anova(&groups, 0.05).unwrap();
/// assert!((result.f_statistic - 2.0).abs() < 1e-12);
/// assert!(!result.significant);
/// ```
pub fn anova<T: AsRef<[f64]>>(groups: &[(&str, T)], alpha: f64) -> Result<AnovaResult> {
    let groups_converted: Vec<(&str, &[f64])> = groups
        .iter()
        .map(|(name, values)| (*name, values.as_ref()))
        .collect();

    inference::anova_impl(&groups_converted, alpha)
}

/// Result of a Shapiro-Wilk normality test
#[derive(Debug, Clone)]
pub struct ShapiroWilkResult {
    /// W statistic
    pub w: f64,
    /// p-value
    pub p_value: f64,
    /// Sample size
    pub n: usize,
}

/// Shapiro-Wilk test for normality (3 to 5000 values)
pub fn shapiro_wilk<T: AsRef<[f64]>>(data: T) -> Result<ShapiroWilkResult> {
    inference::shapiro_wilk_impl(data.as_ref())
}
