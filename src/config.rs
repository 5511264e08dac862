//! Analysis settings
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! reproduces the stock analysis of `Fitness_Tracker_Data.csv`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Image format of the rendered figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotFormat {
    #[default]
    Png,
    Svg,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for PlotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// CSV file with the daily records
    pub input: PathBuf,
    /// Directory the figures are written to
    pub output_dir: PathBuf,
    pub plot_format: PlotFormat,
    pub render_plots: bool,
    /// Size of the daily trend chart in pixels; other figures scale from it
    pub plot_width: u32,
    pub plot_height: u32,
    /// Tukey fence factor
    pub iqr_multiplier: f64,
    /// Heart rates strictly below this are reported as unusually low
    pub heart_rate_low: f64,
    /// Heart rates strictly above this are reported as unusually high
    pub heart_rate_high: f64,
    /// Significance level of the hypothesis tests
    pub alpha: f64,
    /// Workout types compared by the calorie t-test
    pub group_a: String,
    pub group_b: String,
    pub head_rows: usize,
    /// chrono format of the Date column, inferred when absent
    pub date_format: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Fitness_Tracker_Data.csv"),
            output_dir: PathBuf::from("plots"),
            plot_format: PlotFormat::Png,
            render_plots: true,
            plot_width: 1200,
            plot_height: 600,
            iqr_multiplier: 1.5,
            heart_rate_low: 50.0,
            heart_rate_high: 100.0,
            alpha: 0.05,
            group_a: "Cardio".to_string(),
            group_b: "Yoga".to_string(),
            head_rows: 5,
            date_format: None,
        }
    }
}

impl AnalysisConfig {
    /// Parses a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads settings from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Checks that the settings describe a runnable analysis
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::Config(format!(
                "alpha must lie strictly between 0 and 1 (got {})",
                self.alpha
            )));
        }
        if !(self.iqr_multiplier > 0.0) {
            return Err(Error::Config(format!(
                "iqr_multiplier must be positive (got {})",
                self.iqr_multiplier
            )));
        }
        if !(self.heart_rate_low < self.heart_rate_high) {
            return Err(Error::Config(format!(
                "heart_rate_low ({}) must be below heart_rate_high ({})",
                self.heart_rate_low, self.heart_rate_high
            )));
        }
        if self.group_a == self.group_b {
            return Err(Error::Config(format!(
                "group_a and group_b must differ (both are '{}')",
                self.group_a
            )));
        }
        if self.plot_width == 0 || self.plot_height == 0 {
            return Err(Error::Config("plot size must be non-zero".into()));
        }
        Ok(())
    }
}
