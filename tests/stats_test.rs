use fitrs::error::Error;
use fitrs::stats;

const CARDIO: [f64; 4] = [500.0, 550.0, 420.0, 530.0];
const YOGA: [f64; 3] = [200.0, 180.0, 220.0];

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {} got {}",
        expected,
        actual
    );
}

#[test]
fn test_welch_ttest() {
    let result = stats::ttest(&CARDIO, &YOGA, 0.05, false).unwrap();
    assert_close(result.statistic, 9.733285267845751, 1e-9);
    assert_close(result.df, 3.9034841810172205, 1e-9);
    assert_close(result.pvalue, 0.0007029726950229068, 1e-8);
    assert!(result.significant);
    assert_close(result.mean1, 500.0, 1e-12);
    assert_close(result.mean2, 200.0, 1e-12);
}

#[test]
fn test_ttest_needs_two_values_per_sample() {
    assert!(stats::ttest(&[1.0], &YOGA, 0.05, false).is_err());
}

#[test]
fn test_pearson() {
    let steps = [10000.0, 4000.0, 6000.0, 12000.0, 3000.0, 11000.0, 5000.0];
    let calories = [500.0, 200.0, 350.0, 550.0, 180.0, 530.0, 260.0];
    let result = stats::pearson(&steps, &calories, 0.05).unwrap();
    assert_close(result.r, 0.9905578395946883, 1e-12);
    assert_close(result.p_value, 1.6555104888006124e-05, 1e-9);
    assert_eq!(result.n, 7);
    assert!(result.significant);
}

#[test]
fn test_pearson_degenerate_input() {
    assert!(matches!(
        stats::pearson(&[1.0, 2.0], &[1.0], 0.05),
        Err(Error::DimensionMismatch(_))
    ));
    assert!(stats::pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 0.05).is_err());
}

#[test]
fn test_anova() {
    let groups = vec![
        ("Cardio", vec![130.0, 140.0, 125.0, 135.0]),
        ("Strength", vec![110.0, 115.0]),
        ("Yoga", vec![85.0, 45.0, 80.0]),
    ];
    let result = stats::anova(&groups, 0.05).unwrap();
    assert_close(result.f_statistic, 18.670498084291186, 1e-9);
    assert_close(result.p_value, 0.0026531211628086355, 1e-9);
    assert_eq!(result.df_between, 2);
    assert_eq!(result.df_within, 6);
    assert_eq!(result.df_total, 8);
    assert_close(result.ss_total, result.ss_between + result.ss_within, 1e-6);
    assert!(result.significant);
}

#[test]
fn test_anova_needs_two_groups() {
    let groups = vec![("Cardio", vec![130.0, 140.0])];
    assert!(stats::anova(&groups, 0.05).is_err());
}

#[test]
fn test_shapiro_wilk() {
    let result = stats::shapiro_wilk(&CARDIO).unwrap();
    assert_close(result.w, 0.9080600364256242, 1e-6);
    assert_close(result.p_value, 0.47218421698317026, 1e-4);
    assert_eq!(result.n, 4);

    // three evenly spaced values are perfectly normal-looking
    let result = stats::shapiro_wilk(&YOGA).unwrap();
    assert_close(result.w, 1.0, 1e-12);
    assert_close(result.p_value, 1.0, 1e-12);

    assert!(stats::shapiro_wilk(&[1.0, 2.0]).is_err());
    assert!(stats::shapiro_wilk(&[3.0, 3.0, 3.0]).is_err());
}

#[test]
fn test_shapiro_wilk_larger_samples() {
    // heights of 15 women (inches), the classic R `women` dataset
    let heights: Vec<f64> = (58..=72).map(f64::from).collect();
    let result = stats::shapiro_wilk(&heights).unwrap();
    assert_eq!(result.n, 15);
    assert_close(result.w, 0.96359, 1e-4);
    assert_close(result.p_value, 0.7545, 1e-3);

    let mut skewed = vec![1.0; 12];
    skewed.push(50.0);
    let result = stats::shapiro_wilk(&skewed).unwrap();
    assert!(result.w < 0.5);
    assert!(result.p_value < 1e-3);
}

#[test]
fn test_describe_and_quantile() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0];
    let summary = stats::describe(&data).unwrap();
    assert_eq!(summary.count, 5);
    assert_close(summary.mean, 3.0, 1e-12);
    assert_close(summary.std, 2.5f64.sqrt(), 1e-12);
    assert_eq!(summary.q1, 2.0);
    assert_eq!(summary.median, 3.0);
    assert_eq!(summary.q3, 4.0);

    assert_close(stats::quantile(&[1.0, 2.0, 3.0, 4.0], 0.25), 1.75, 1e-12);
    assert!(stats::describe(&[] as &[f64]).is_err());
}
