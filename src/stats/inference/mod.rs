// Hypothesis tests

use crate::error::{Error, Result};
use crate::stats::descriptive::{correlation_impl, mean, sorted_copy, variance};
use crate::stats::distributions::{
    f_survival, inverse_normal_cdf, standard_normal_cdf, student_t_two_sided,
};
use crate::stats::{AnovaResult, PearsonResult, ShapiroWilkResult, TTestResult};

fn check_finite(name: &str, data: &[f64]) -> Result<()> {
    if data.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "{} contains non-finite values",
            name
        )));
    }
    Ok(())
}

/// Two-sample t-test (Student when `equal_var`, Welch otherwise)
pub(crate) fn ttest_impl(
    sample1: &[f64],
    sample2: &[f64],
    alpha: f64,
    equal_var: bool,
) -> Result<TTestResult> {
    if sample1.is_empty() || sample2.is_empty() {
        return Err(Error::EmptyData("t-test needs two non-empty samples".into()));
    }

    let n1 = sample1.len();
    let n2 = sample2.len();

    if n1 < 2 || n2 < 2 {
        return Err(Error::InsufficientData(format!(
            "t-test needs at least two values per sample (got {} and {})",
            n1, n2
        )));
    }
    check_finite("t-test sample", sample1)?;
    check_finite("t-test sample", sample2)?;

    let mean1 = mean(sample1);
    let mean2 = mean(sample2);
    let var1 = variance(sample1);
    let var2 = variance(sample2);
    let n1f = n1 as f64;
    let n2f = n2 as f64;

    let (std_err, df) = if equal_var {
        let pooled_var = ((n1f - 1.0) * var1 + (n2f - 1.0) * var2) / (n1f + n2f - 2.0);
        ((pooled_var * (1.0 / n1f + 1.0 / n2f)).sqrt(), n1f + n2f - 2.0)
    } else {
        // Welch-Satterthwaite degrees of freedom
        let se1 = var1 / n1f;
        let se2 = var2 / n2f;
        let df = (se1 + se2).powi(2) / (se1.powi(2) / (n1f - 1.0) + se2.powi(2) / (n2f - 1.0));
        ((se1 + se2).sqrt(), df)
    };

    if std_err < 1e-300 {
        return Err(Error::ComputationError(
            "t-test undefined: both samples have zero variance".into(),
        ));
    }

    let statistic = (mean1 - mean2) / std_err;
    let pvalue = student_t_two_sided(statistic, df);

    Ok(TTestResult {
        statistic,
        pvalue,
        significant: pvalue < alpha,
        df,
        mean1,
        mean2,
    })
}

/// Pearson correlation with a two-sided p-value from t = r·√(n-2)/√(1-r²)
pub(crate) fn pearson_impl(x: &[f64], y: &[f64], alpha: f64) -> Result<PearsonResult> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "pearson inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 3 {
        return Err(Error::InsufficientData(format!(
            "pearson correlation needs at least three pairs (got {})",
            n
        )));
    }
    check_finite("pearson x", x)?;
    check_finite("pearson y", y)?;

    let r = correlation_impl(x, y)?;
    let df = (n - 2) as f64;
    let p_value = if (1.0 - r.abs()) < 1e-15 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        student_t_two_sided(t, df)
    };

    Ok(PearsonResult {
        r,
        p_value,
        n,
        significant: p_value < alpha,
    })
}

/// One-way ANOVA over named groups
pub(crate) fn anova_impl(groups: &[(&str, &[f64])], alpha: f64) -> Result<AnovaResult> {
    if groups.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "ANOVA needs at least two groups (got {})",
            groups.len()
        )));
    }

    for (name, values) in groups {
        if values.is_empty() {
            return Err(Error::EmptyData(format!("ANOVA group '{}' is empty", name)));
        }
        check_finite(name, values)?;
    }

    let total_n: usize = groups.iter().map(|(_, v)| v.len()).sum();
    let global_mean =
        groups.iter().flat_map(|(_, v)| v.iter()).sum::<f64>() / total_n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    let mut ss_total = 0.0;

    for (_, values) in groups {
        let group_mean = mean(values);
        ss_between += values.len() as f64 * (group_mean - global_mean).powi(2);
        for &value in *values {
            ss_within += (value - group_mean).powi(2);
            ss_total += (value - global_mean).powi(2);
        }
    }

    let df_between = groups.len() - 1;
    let df_within = total_n - groups.len();
    let df_total = total_n - 1;

    if df_within == 0 {
        return Err(Error::InsufficientData(
            "ANOVA needs more observations than groups".into(),
        ));
    }

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let (f_statistic, p_value) = if ms_within > 1e-300 {
        let f = ms_between / ms_within;
        (f, f_survival(f, df_between as f64, df_within as f64))
    } else if ms_between > 1e-300 {
        // Constant groups with different means
        (f64::INFINITY, 0.0)
    } else {
        return Err(Error::ComputationError(
            "ANOVA undefined: every value is identical".into(),
        ));
    };

    Ok(AnovaResult {
        f_statistic,
        p_value,
        ss_between,
        ss_within,
        ss_total,
        df_between,
        df_within,
        df_total,
        ms_between,
        ms_within,
        significant: p_value < alpha,
    })
}

// Royston (1992, AS R94) polynomial coefficients
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

/// c[0] + c[1]·x + c[2]·x² + ...
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Shapiro-Wilk W and p-value (Royston's approximation, 3 <= n <= 5000)
pub(crate) fn shapiro_wilk_impl(data: &[f64]) -> Result<ShapiroWilkResult> {
    let n = data.len();
    if n < 3 {
        return Err(Error::InsufficientData(format!(
            "Shapiro-Wilk needs at least three values (got {})",
            n
        )));
    }
    if n > 5000 {
        return Err(Error::InvalidInput(format!(
            "Shapiro-Wilk approximation is valid up to 5000 values (got {})",
            n
        )));
    }
    check_finite("Shapiro-Wilk sample", data)?;

    let x = sorted_copy(data);
    let range = x[n - 1] - x[0];
    if range < 1e-300 {
        return Err(Error::ComputationError(
            "Shapiro-Wilk undefined: all values are identical".into(),
        ));
    }

    let m = mean(&x);
    let ss: f64 = x.iter().map(|&v| (v - m).powi(2)).sum();

    if n == 3 {
        let w = (0.5 * (x[2] - x[0]).powi(2) / ss).clamp(0.75, 1.0);
        let p_value = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
        return Ok(ShapiroWilkResult {
            w,
            p_value: p_value.clamp(0.0, 1.0),
            n,
        });
    }

    let a = shapiro_wilk_coefficients(n)?;
    let nn2 = n / 2;
    let numerator: f64 = (0..nn2).map(|i| a[i] * (x[n - 1 - i] - x[i])).sum();
    let w = (numerator * numerator / ss).min(1.0);

    Ok(ShapiroWilkResult {
        w,
        p_value: shapiro_wilk_p_value(w, n).clamp(0.0, 1.0),
        n,
    })
}

/// Half of the antisymmetric coefficient vector (largest first)
fn shapiro_wilk_coefficients(n: usize) -> Result<Vec<f64>> {
    let nn2 = n / 2;
    let nf = n as f64;

    // Blom scores of the lower order statistics (negative)
    let m: Vec<f64> = (0..nn2)
        .map(|i| inverse_normal_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a1 = poly(&SW_C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; nn2];

    let (first_free, fac_sq, denom) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&SW_C2, rsn);
        a[1] = a2;
        (
            2,
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
        )
    } else {
        (1, summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
    };

    if fac_sq <= 0.0 || denom <= 0.0 {
        return Err(Error::ComputationError(
            "Shapiro-Wilk coefficients could not be normalised".into(),
        ));
    }
    let fac = (fac_sq / denom).sqrt();

    a[0] = a1;
    for i in first_free..nn2 {
        a[i] = -m[i] / fac;
    }

    Ok(a)
}

fn shapiro_wilk_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    let (y, m, s) = if n <= 11 {
        let gamma = poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        (-(gamma - y).ln(), poly(&SW_C3, nf), poly(&SW_C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (y, poly(&SW_C5, ln_n), poly(&SW_C6, ln_n).exp())
    };

    1.0 - standard_normal_cdf((y - m) / s)
}
