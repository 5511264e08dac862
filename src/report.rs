//! The exploratory analysis of a fitness tracker export
//!
//! [`run`] loads the CSV, cleans it, prints the diagnostics and the three
//! hypothesis tests to stdout and writes the figures into the output
//! directory. [`run_with_writer`] does the same into any `Write`.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::anomaly::{detect_outliers, heart_rate_extremes};
use crate::config::AnalysisConfig;
use crate::dataframe::{format_pairs, FitnessFrame, Metric};
use crate::error::{Error, Result};
use crate::groupby::{daily_means, group_by_workout};
use crate::io::read_csv;
use crate::na::NA;
use crate::stats::{self, AnovaResult, PearsonResult, TTestResult};
use crate::temporal::{duplicated_count, missing_dates};
use crate::vis::layout::{histogram, least_squares, sturges_bins};
use crate::vis::{
    BarChart, BoxPlot, FigureSize, FigureWriter, Histogram, LineChart, RegressionPlot, ScatterPlot,
};

/// Fewest values the normality check runs on
const MIN_SHAPIRO_SAMPLE: usize = 3;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct Report {
    /// Rows loaded from the CSV
    pub rows: usize,
    /// Steps cells set to NA because they were zero or negative
    pub invalidated_steps: usize,
    /// Figure files written, in order
    pub figures: Vec<PathBuf>,
    /// Calories burned, `group_a` vs `group_b`
    pub calories_ttest: TTestResult,
    /// Steps vs calories burned
    pub steps_calories: PearsonResult,
    /// Heart rate by workout type
    pub heart_rate_anova: AnovaResult,
}

/// Runs the analysis, printing to stdout
pub fn run(config: &AnalysisConfig) -> Result<Report> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_writer(config, &mut out)
}

/// Runs the analysis, printing to `out`
pub fn run_with_writer<W: Write>(config: &AnalysisConfig, out: &mut W) -> Result<Report> {
    config.validate()?;

    let mut frame = read_csv(&config.input, config.date_format.as_deref())?;
    let rows = frame.row_count();

    writeln!(out, "Missing values per column:")?;
    writeln!(out, "{}", format_pairs(&frame.missing_counts()))?;

    frame.clean_workout_types();
    writeln!(
        out,
        "Unique workout types after cleaning: {}",
        format_workout_types(&frame.workout_types())
    )?;

    let invalidated_steps = frame.invalidate_nonpositive_steps();
    frame.derive_calories_per_step();

    print_outlier_counts(&frame, config, out)?;
    print_date_checks(&frame, out)?;
    print_normality(&frame, out)?;
    print_overview(&frame, config, out)?;

    let mut figures = if config.render_plots {
        Some(FigureWriter::new(
            &config.output_dir,
            config.plot_format,
            config.plot_width,
            config.plot_height,
        )?)
    } else {
        log::info!("plot rendering disabled");
        None
    };

    if let Some(writer) = figures.as_mut() {
        write_overview_figures(&frame, writer)?;
    }

    let extremes = heart_rate_extremes(&frame, config.heart_rate_low, config.heart_rate_high)?;
    writeln!(out, "Unusually Low Heart Rates:")?;
    writeln!(out, "{}", extremes.low)?;
    writeln!(out)?;
    writeln!(out, "Unusually High Heart Rates:")?;
    writeln!(out, "{}", extremes.high)?;

    let calories_ttest = calories_ttest(&frame, config, figures.as_mut(), out)?;
    let steps_calories = steps_calories_correlation(&frame, config, figures.as_mut(), out)?;
    let heart_rate_anova = heart_rate_anova(&frame, config, figures.as_mut(), out)?;

    Ok(Report {
        rows,
        invalidated_steps,
        figures: figures
            .map(|writer| writer.written().to_vec())
            .unwrap_or_default(),
        calories_ttest,
        steps_calories,
        heart_rate_anova,
    })
}

/// `[Cardio, Yoga, NaN]`
fn format_workout_types(types: &[NA<String>]) -> String {
    let names: Vec<String> = types
        .iter()
        .map(|t| match t {
            NA::Value(name) => name.clone(),
            NA::NA => "NaN".to_string(),
        })
        .collect();
    format!("[{}]", names.join(", "))
}

fn print_outlier_counts<W: Write>(
    frame: &FitnessFrame,
    config: &AnalysisConfig,
    out: &mut W,
) -> Result<()> {
    for metric in [Metric::Steps, Metric::CaloriesBurned, Metric::HeartRateAvg] {
        let values = frame.metric(metric)?.dropna();
        let outliers = detect_outliers(&values, config.iqr_multiplier);
        writeln!(out, "{} outliers count: {}", metric.label(), outliers.len())?;
    }
    Ok(())
}

fn print_date_checks<W: Write>(frame: &FitnessFrame, out: &mut W) -> Result<()> {
    writeln!(out, "Duplicate Dates: {}", duplicated_count(frame.dates()))?;

    let missing = missing_dates(frame.dates())?;
    let missing: Vec<String> = missing.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    writeln!(out, "Missing Dates: [{}]", missing.join(", "))?;
    Ok(())
}

/// Shapiro-Wilk on Calories_Burned per workout type
///
/// A sample the test cannot handle (constant values, more than 5000
/// values) is reported and skipped.
fn print_normality<W: Write>(frame: &FitnessFrame, out: &mut W) -> Result<()> {
    let grouped = group_by_workout(frame, Metric::CaloriesBurned)?;
    for (workout, values) in grouped.groups_in_appearance_order() {
        if values.len() < MIN_SHAPIRO_SAMPLE {
            writeln!(out, "Not enough data for Shapiro test for {}", workout)?;
            continue;
        }
        match stats::shapiro_wilk(&values) {
            Ok(result) => writeln!(
                out,
                "Shapiro-Wilk p-value for {} Calories Burned: {:.4}",
                workout, result.p_value
            )?,
            Err(e) => {
                log::warn!("Shapiro-Wilk skipped for {}: {}", workout, e);
                writeln!(out, "Shapiro-Wilk test not applicable for {}: {}", workout, e)?;
            }
        }
    }
    Ok(())
}

fn print_overview<W: Write>(frame: &FitnessFrame, config: &AnalysisConfig, out: &mut W) -> Result<()> {
    writeln!(out, "Data Types:")?;
    writeln!(out, "{}", format_pairs(&frame.dtypes()))?;
    writeln!(out)?;
    writeln!(out, "First {} Rows:", config.head_rows)?;
    writeln!(out, "{}", frame.head(config.head_rows)?)?;
    writeln!(out, "Dataset Info:")?;
    writeln!(out, "{}", frame.info())?;
    writeln!(out)?;
    writeln!(out, "Summary Statistics:")?;
    writeln!(out, "{}", frame.describe())?;
    writeln!(out)?;
    writeln!(out, "Workout Type Distribution:")?;
    let counts = frame.value_counts();
    let counts: Vec<(&str, usize)> = counts.iter().map(|(t, n)| (t.as_str(), *n)).collect();
    writeln!(out, "{}", format_pairs(&counts))?;
    Ok(())
}

/// Trend, pattern and anomaly figures
fn write_overview_figures(frame: &FitnessFrame, writer: &mut FigureWriter) -> Result<()> {
    let daily = daily_means(frame)?;
    let trend = LineChart {
        dates: daily.dates.clone(),
        series: [Metric::Steps, Metric::CaloriesBurned, Metric::HeartRateAvg]
            .iter()
            .filter_map(|&metric| {
                daily
                    .series(metric)
                    .map(|values| (metric.label().to_string(), values.to_vec()))
            })
            .collect(),
    };
    let settings = writer.settings(
        "Daily Averages: Steps, Calories Burned, Heart Rate",
        "Date",
        "Value",
        FigureSize::Wide,
    );
    writer.write("daily_averages", &trend, &settings)?;

    let scatter = ScatterPlot {
        groups: points_by_workout(frame),
    };
    let settings = writer.settings(
        "Steps vs Calories Burned",
        "Steps",
        "Calories Burned",
        FigureSize::Standard,
    );
    writer.write("steps_vs_calories", &scatter, &settings)?;

    let per_step = BoxPlot::from_groups(&group_by_workout(frame, Metric::CaloriesPerStep)?.groups());
    let settings = writer.settings(
        "Calories per Step by Workout Type",
        "Workout Type",
        "Calories per Step",
        FigureSize::Standard,
    );
    writer.write("calories_per_step_by_workout", &per_step, &settings)?;

    let heart_rate = BoxPlot::from_groups(&group_by_workout(frame, Metric::HeartRateAvg)?.groups());
    let settings = writer.settings(
        "Heart Rate by Workout Type",
        "Workout Type",
        "Heart Rate",
        FigureSize::Standard,
    );
    writer.write("heart_rate_by_workout", &heart_rate, &settings)?;

    for (metric, slug) in [
        (Metric::Steps, "steps_outliers"),
        (Metric::CaloriesBurned, "calories_outliers"),
    ] {
        let values = frame.metric(metric)?.dropna();
        let single = BoxPlot::from_groups(&[(metric.label().to_string(), values)]);
        let settings = writer.settings(
            &format!("Outliers in {}", metric.label()),
            "",
            metric.label(),
            FigureSize::Small,
        );
        writer.write(slug, &single, &settings)?;
    }

    let steps = frame.metric(Metric::Steps)?.dropna();
    let bins = if steps.is_empty() {
        Vec::new()
    } else {
        histogram(&steps, sturges_bins(steps.len()))?
    };
    let settings = writer.settings("Distribution of Steps", "Steps", "Count", FigureSize::Standard);
    writer.write("steps_histogram", &Histogram { bins }, &settings)?;

    let counts = BarChart {
        bars: frame.value_counts(),
    };
    let settings = writer.settings(
        "Workout Type Distribution",
        "Workout Type",
        "Count",
        FigureSize::Standard,
    );
    writer.write("workout_type_counts", &counts, &settings)?;

    Ok(())
}

/// (Steps, Calories_Burned) pairs per workout type, in first appearance order
fn points_by_workout(frame: &FitnessFrame) -> Vec<(String, Vec<(f64, f64)>)> {
    let mut groups: Vec<(String, Vec<(f64, f64)>)> = frame
        .workout_types()
        .into_iter()
        .filter_map(|t| t.value().cloned())
        .map(|t| (t, Vec::new()))
        .collect();

    for row in frame.rows() {
        if let (NA::Value(workout), NA::Value(steps), NA::Value(calories)) =
            (row.workout_type, row.steps, row.calories_burned)
        {
            if let Some((_, points)) = groups.iter_mut().find(|(name, _)| *name == *workout) {
                points.push((steps, calories));
            }
        }
    }
    groups
}

fn verdict(significant: bool, alpha: f64) -> String {
    if significant {
        format!("Reject H0 at alpha = {}", alpha)
    } else {
        format!("Fail to reject H0 at alpha = {}", alpha)
    }
}

/// Welch's t-test on Calories_Burned between the two configured types
fn calories_ttest<W: Write>(
    frame: &FitnessFrame,
    config: &AnalysisConfig,
    figures: Option<&mut FigureWriter>,
    out: &mut W,
) -> Result<TTestResult> {
    let grouped = group_by_workout(frame, Metric::CaloriesBurned)?;
    let first = grouped.values(&config.group_a);
    let second = grouped.values(&config.group_b);
    for (name, values) in [(&config.group_a, &first), (&config.group_b, &second)] {
        if values.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "workout type '{}' has {} Calories_Burned values, the t-test needs at least 2",
                name,
                values.len()
            )));
        }
    }

    let result = stats::ttest(&first, &second, config.alpha, false)?;
    writeln!(out)?;
    writeln!(
        out,
        "[H1] T-test - {} vs {} (Calories Burned):",
        config.group_a, config.group_b
    )?;
    writeln!(
        out,
        "T-statistic = {:.2}, P-value = {:.4}",
        result.statistic, result.pvalue
    )?;
    writeln!(out, "{}", verdict(result.significant, config.alpha))?;

    if let Some(writer) = figures {
        let boxes = BoxPlot::from_groups(&[
            (config.group_a.clone(), first),
            (config.group_b.clone(), second),
        ]);
        let settings = writer.settings(
            &format!("Calories Burned: {} vs {}", config.group_a, config.group_b),
            "Workout Type",
            "Calories Burned",
            FigureSize::Standard,
        );
        writer.write("calories_ttest", &boxes, &settings)?;
    }
    Ok(result)
}

/// Pearson correlation of Steps and Calories_Burned over complete pairs
fn steps_calories_correlation<W: Write>(
    frame: &FitnessFrame,
    config: &AnalysisConfig,
    figures: Option<&mut FigureWriter>,
    out: &mut W,
) -> Result<PearsonResult> {
    let (steps, calories): (Vec<f64>, Vec<f64>) = frame
        .rows()
        .filter_map(|row| match (row.steps, row.calories_burned) {
            (NA::Value(s), NA::Value(c)) => Some((s, c)),
            _ => None,
        })
        .unzip();
    log::debug!("correlating {} complete Steps/Calories pairs", steps.len());

    let result = stats::pearson(&steps, &calories, config.alpha)?;
    writeln!(out)?;
    writeln!(out, "[H2] Pearson Correlation - Steps vs Calories Burned:")?;
    writeln!(
        out,
        "Correlation = {:.2}, P-value = {:.4}",
        result.r, result.p_value
    )?;
    writeln!(out, "{}", verdict(result.significant, config.alpha))?;

    if let Some(writer) = figures {
        let (slope, intercept) = least_squares(&steps, &calories)?;
        let regression = RegressionPlot {
            points: steps.into_iter().zip(calories).collect(),
            slope,
            intercept,
        };
        let settings = writer.settings(
            "Steps vs Calories Burned",
            "Steps",
            "Calories Burned",
            FigureSize::Standard,
        );
        writer.write("steps_calories_regression", &regression, &settings)?;
    }
    Ok(result)
}

/// One-way ANOVA of Heart_Rate_avg across workout types
fn heart_rate_anova<W: Write>(
    frame: &FitnessFrame,
    config: &AnalysisConfig,
    figures: Option<&mut FigureWriter>,
    out: &mut W,
) -> Result<AnovaResult> {
    let mut groups = group_by_workout(frame, Metric::HeartRateAvg)?.groups();
    groups.retain(|(name, values)| {
        if values.is_empty() {
            log::warn!("workout type {} has no heart rate values, left out of ANOVA", name);
        }
        !values.is_empty()
    });

    let named: Vec<(&str, &[f64])> = groups
        .iter()
        .map(|(name, values)| (name.as_str(), values.as_slice()))
        .collect();
    let result = stats::anova(&named, config.alpha)?;
    writeln!(out)?;
    writeln!(out, "[H3] ANOVA - Heart Rate by Workout Type:")?;
    writeln!(
        out,
        "F-statistic = {:.2}, P-value = {:.4}",
        result.f_statistic, result.p_value
    )?;
    writeln!(out, "{}", verdict(result.significant, config.alpha))?;

    if let Some(writer) = figures {
        let boxes = BoxPlot::from_groups(&groups);
        let settings = writer.settings(
            "Heart Rate Across Workout Types",
            "Workout Type",
            "Heart Rate",
            FigureSize::Standard,
        );
        writer.write("heart_rate_anova", &boxes, &settings)?;
    }
    Ok(result)
}
