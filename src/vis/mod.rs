//! Figure rendering with plotters
//!
//! Every figure of the analysis is written to its own image file in the
//! output directory, numbered in the order the figures are produced:
//! `plots/01_daily_averages.png`, `plots/02_steps_vs_calories.png`, ...

pub mod layout;
pub mod plotters_ext;

use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::PlotFormat;
use crate::error::Result;

pub use self::layout::{BoxStats, Bin};
pub use self::plotters_ext::{BarChart, BoxPlot, Histogram, LineChart, RegressionPlot, ScatterPlot};

/// Settings shared by every figure
#[derive(Debug, Clone)]
pub struct PlotSettings {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pub format: PlotFormat,
    pub show_legend: bool,
    pub show_grid: bool,
    /// Colour cycle for series and categories
    pub color_palette: Vec<(u8, u8, u8)>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            title: "Plot".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            width: 800,
            height: 600,
            format: PlotFormat::Png,
            show_legend: true,
            show_grid: true,
            color_palette: vec![
                (76, 114, 176),  // blue
                (221, 132, 82),  // orange
                (85, 168, 104),  // green
                (196, 78, 82),   // red
                (129, 114, 179), // purple
                (147, 120, 96),  // brown
                (218, 139, 195), // pink
                (140, 140, 140), // grey
                (204, 185, 116), // khaki
                (100, 181, 205), // cyan
            ],
        }
    }
}

impl PlotSettings {
    /// Palette colour `i`, cycling
    pub fn color(&self, i: usize) -> RGBColor {
        match self.color_palette.len() {
            0 => RGBColor(0, 0, 0),
            n => {
                let (r, g, b) = self.color_palette[i % n];
                RGBColor(r, g, b)
            }
        }
    }
}

/// Something that can draw itself onto a plotters drawing area
pub trait Figure {
    /// Whether there is nothing to draw
    fn is_empty(&self) -> bool;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Renders `figure` to `path` in the configured format
pub fn render<F: Figure>(figure: &F, path: &Path, settings: &PlotSettings) -> Result<()> {
    let size = (settings.width, settings.height);
    match settings.format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            figure.draw(&root, settings)?;
            root.present()?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            figure.draw(&root, settings)?;
            root.present()?;
        }
    }
    Ok(())
}

/// Figure size relative to the base (daily trend) size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FigureSize {
    /// 12 x 6
    Wide,
    /// 8 x 6
    Standard,
    /// 6 x 4
    Small,
}

/// Numbers figures and writes them into the output directory
#[derive(Debug)]
pub struct FigureWriter {
    output_dir: PathBuf,
    format: PlotFormat,
    base_width: u32,
    base_height: u32,
    /// Figures handled so far, skipped ones included
    numbered: usize,
    written: Vec<PathBuf>,
}

impl FigureWriter {
    /// Creates the output directory if needed
    pub fn new<P: AsRef<Path>>(
        output_dir: P,
        format: PlotFormat,
        base_width: u32,
        base_height: u32,
    ) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(FigureWriter {
            output_dir,
            format,
            base_width,
            base_height,
            numbered: 0,
            written: Vec::new(),
        })
    }

    /// Path the next figure with this slug would be written to
    pub fn next_path(&self, slug: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{:02}_{}.{}",
            self.numbered + 1,
            slug,
            self.format.extension()
        ))
    }

    /// Pixel size for a figure class
    pub fn pixels(&self, size: FigureSize) -> (u32, u32) {
        let (w, h) = (self.base_width, self.base_height);
        match size {
            FigureSize::Wide => (w, h),
            FigureSize::Standard => ((w * 2 / 3).max(1), h),
            FigureSize::Small => ((w / 2).max(1), (h * 2 / 3).max(1)),
        }
    }

    /// Settings preset for a figure
    pub fn settings(&self, title: &str, x_label: &str, y_label: &str, size: FigureSize) -> PlotSettings {
        let (width, height) = self.pixels(size);
        PlotSettings {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            width,
            height,
            format: self.format,
            ..PlotSettings::default()
        }
    }

    /// Renders a figure and returns its path
    ///
    /// An empty figure is skipped with a warning (`Ok(None)`); it still
    /// takes its number so later file names do not shift.
    pub fn write<F: Figure>(
        &mut self,
        slug: &str,
        figure: &F,
        settings: &PlotSettings,
    ) -> Result<Option<PathBuf>> {
        let path = self.next_path(slug);
        self.numbered += 1;
        if figure.is_empty() {
            log::warn!("skipped {}: no data to plot", path.display());
            return Ok(None);
        }
        render(figure, &path, settings)?;
        log::info!("wrote {}", path.display());
        self.written.push(path.clone());
        Ok(Some(path))
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}
