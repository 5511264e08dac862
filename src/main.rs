use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fitrs::{report, AnalysisConfig, PlotFormat};

/// Exploratory analysis of a fitness tracker CSV export.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with Date, Workout_Type, Steps, Calories_Burned and Heart_Rate_avg columns
    input: Option<PathBuf>,

    /// TOML file with analysis settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the figures are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Image format of the figures
    #[arg(long, value_enum)]
    format: Option<PlotFormat>,

    /// Skip rendering figures
    #[arg(long)]
    no_plots: bool,

    /// Significance level of the hypothesis tests
    #[arg(long)]
    alpha: Option<f64>,
}

impl Cli {
    /// Settings from the config file (or defaults) with flags applied on top
    fn into_config(self) -> fitrs::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(format) = self.format {
            config.plot_format = format;
        }
        if self.no_plots {
            config.render_plots = false;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = cli.into_config().and_then(|config| report::run(&config));

    match result {
        Ok(report) => {
            log::info!(
                "analysed {} rows, wrote {} figures",
                report.rows,
                report.figures.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
