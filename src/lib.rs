//! Exploratory analysis of daily fitness tracker records
//!
//! Loads a CSV export, cleans it, prints diagnostics and descriptive
//! statistics, renders trend and distribution figures and runs three
//! hypothesis tests (Welch's t-test, Pearson correlation, one-way ANOVA).

pub mod anomaly;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod io;
pub mod na;
pub mod report;
pub mod series;
pub mod stats;
pub mod temporal;
pub mod vis;

// Re-export commonly used types
pub use config::{AnalysisConfig, PlotFormat};
pub use dataframe::{FitnessFrame, Metric};
pub use error::{Error, Result};
pub use groupby::GroupBy;
pub use na::NA;
pub use report::Report;
pub use series::NASeries;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
