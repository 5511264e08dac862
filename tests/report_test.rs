mod common;

use std::path::PathBuf;

use fitrs::error::Error;
use fitrs::report::run_with_writer;
use fitrs::{AnalysisConfig, PlotFormat};

use common::{write_csv, FITNESS_CSV};

fn config_for(input: PathBuf, output_dir: PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        input,
        output_dir,
        render_plots: false,
        ..AnalysisConfig::default()
    }
}

/// Byte offset of `needle` in `text`, panicking with context when absent
fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in output:\n{}", needle, text))
}

#[test]
fn test_full_report_without_plots() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "fitness.csv", FITNESS_CSV);
    let config = config_for(input, dir.path().join("plots"));

    let mut out = Vec::new();
    let report = run_with_writer(&config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(report.rows, 10);
    assert_eq!(report.invalidated_steps, 1);
    assert!(report.figures.is_empty());
    assert!(!dir.path().join("plots").exists());

    let expected_in_order = [
        "Missing values per column:",
        "Unique workout types after cleaning: [Cardio, Yoga, Strength, NaN]",
        "Steps outliers count: 0",
        "Calories Burned outliers count: 0",
        "Heart Rate outliers count: 0",
        "Duplicate Dates: 1",
        "Missing Dates: [2024-01-03]",
        "Shapiro-Wilk p-value for Cardio Calories Burned: 0.4722",
        "Shapiro-Wilk p-value for Yoga Calories Burned: 1.0000",
        "Not enough data for Shapiro test for Strength",
        "Data Types:",
        "First 5 Rows:",
        "Dataset Info:",
        "Summary Statistics:",
        "Workout Type Distribution:",
        "Unusually Low Heart Rates:",
        "[1 rows x 6 columns]",
        "Unusually High Heart Rates:",
        "[6 rows x 6 columns]",
        "[H1] T-test - Cardio vs Yoga (Calories Burned):",
        "T-statistic = 9.73, P-value = 0.0007",
        "[H2] Pearson Correlation - Steps vs Calories Burned:",
        "Correlation = 0.99, P-value = 0.0000",
        "[H3] ANOVA - Heart Rate by Workout Type:",
        "F-statistic = 18.67, P-value = 0.0027",
    ];
    let mut last = 0;
    for needle in expected_in_order {
        let at = position(&text[last..], needle) + last;
        last = at + needle.len();
    }
    assert_eq!(text.matches("Reject H0 at alpha = 0.05").count(), 3);

    assert!((report.calories_ttest.statistic - 9.733285267845751).abs() < 1e-9);
    assert!((report.steps_calories.r - 0.9905578395946883).abs() < 1e-12);
    assert_eq!(report.steps_calories.n, 7);
    assert_eq!(report.heart_rate_anova.df_between, 2);
}

#[test]
fn test_unknown_comparison_group_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "fitness.csv", FITNESS_CSV);
    let config = AnalysisConfig {
        group_b: "Pilates".to_string(),
        ..config_for(input, dir.path().join("plots"))
    };

    let mut out = Vec::new();
    match run_with_writer(&config, &mut out) {
        Err(Error::InsufficientData(message)) => assert!(message.contains("Pilates")),
        other => panic!("expected insufficient data, got {:?}", other.map(|r| r.rows)),
    }
}

#[test]
fn test_invalid_config_fails_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        alpha: 1.5,
        ..config_for(dir.path().join("absent.csv"), dir.path().join("plots"))
    };
    let mut out = Vec::new();
    assert!(matches!(
        run_with_writer(&config, &mut out),
        Err(Error::Config(_))
    ));
    assert!(out.is_empty());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path().join("absent.csv"), dir.path().join("plots"));
    let mut out = Vec::new();
    assert!(matches!(run_with_writer(&config, &mut out), Err(Error::Io(_))));
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "fitrs.toml",
        "input = \"data/export.csv\"\nplot_format = \"svg\"\nalpha = 0.01\nhead_rows = 3\n",
    );
    let config = AnalysisConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.input, PathBuf::from("data/export.csv"));
    assert_eq!(config.plot_format, PlotFormat::Svg);
    assert_eq!(config.alpha, 0.01);
    assert_eq!(config.head_rows, 3);
    assert_eq!(config.group_a, "Cardio");
    assert!(config.validate().is_ok());
}

/// Whether plotters can lay out text with the sans-serif system font
fn sans_serif_available() -> bool {
    use plotters::style::{FontDesc, FontFamily, FontStyle};
    FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal)
        .box_size("Steps")
        .is_ok()
}

#[test]
fn test_figures_are_written() {
    if !sans_serif_available() {
        eprintln!("skipping figure rendering: no sans-serif font installed");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "fitness.csv", FITNESS_CSV);
    let config = AnalysisConfig {
        render_plots: true,
        plot_format: PlotFormat::Svg,
        ..config_for(input, dir.path().join("plots"))
    };

    let mut out = Vec::new();
    let report = run_with_writer(&config, &mut out).unwrap();
    let names: Vec<String> = report
        .figures
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(names.len(), 11);
    assert_eq!(names[0], "01_daily_averages.svg");
    assert_eq!(names[10], "11_heart_rate_anova.svg");
    assert!(report.figures.iter().all(|p| p.exists()));
}
