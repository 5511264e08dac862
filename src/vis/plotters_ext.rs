//! The figures of the analysis, drawn with plotters on any backend

use std::ops::Range;

use chrono::{Duration, NaiveDate};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::na::NA;
use crate::vis::layout::{category_label, min_max, padded_range, Bin, BoxStats};
use crate::vis::{Figure, PlotSettings};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Clears the area and builds a titled chart over the given ranges
fn build_chart<'a, DB>(
    root: &'a DrawingArea<DB, Shift>,
    settings: &PlotSettings,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<Chart<'a, DB>>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;
    Ok(chart)
}

/// Draws axes with descriptions, optionally with a custom x tick formatter
fn draw_mesh<'a, DB>(
    chart: &mut Chart<'a, DB>,
    settings: &PlotSettings,
    x_labels: Option<usize>,
    x_formatter: Option<&dyn Fn(&f64) -> String>,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(settings.x_label.as_str())
        .y_desc(settings.y_label.as_str());
    if let Some(count) = x_labels {
        mesh.x_labels(count);
    }
    if let Some(formatter) = x_formatter {
        mesh.x_label_formatter(formatter);
    }
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;
    Ok(())
}

fn draw_legend<'a, DB>(chart: &mut Chart<'a, DB>, settings: &PlotSettings) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
{
    if settings.show_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}

fn range(lo: f64, hi: f64, fraction: f64) -> Range<f64> {
    let (lo, hi) = padded_range(lo, hi, fraction);
    lo..hi
}

/// Lines over calendar dates; NA cells break the line
#[derive(Debug, Clone)]
pub struct LineChart {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<(String, Vec<NA<f64>>)>,
}

impl LineChart {
    fn x_of(&self, date: NaiveDate) -> f64 {
        match self.dates.first() {
            Some(start) => (date - *start).num_days() as f64,
            None => 0.0,
        }
    }
}

impl Figure for LineChart {
    fn is_empty(&self) -> bool {
        self.dates.is_empty()
            || self
                .series
                .iter()
                .all(|(_, values)| values.iter().all(|v| v.is_na()))
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (start, end) = match (self.dates.first(), self.dates.last()) {
            (Some(&start), Some(&end)) => (start, end),
            _ => return Err(Error::EmptyData("line chart has no dates".into())),
        };
        let present: Vec<f64> = self
            .series
            .iter()
            .flat_map(|(_, values)| values.iter().filter_map(|v| v.value().copied()))
            .collect();
        if present.is_empty() {
            return Err(Error::EmptyData("line chart has no values".into()));
        }
        let (y_min, y_max) = min_max(&present);

        let mut chart = build_chart(
            root,
            settings,
            range(0.0, self.x_of(end), 0.02),
            range(y_min, y_max, 0.05),
        )?;
        let date_label = |v: &f64| (start + Duration::days(v.round() as i64)).format("%Y-%m-%d").to_string();
        draw_mesh(&mut chart, settings, Some(8), Some(&date_label as &dyn Fn(&f64) -> String))?;

        for (i, (name, values)) in self.series.iter().enumerate() {
            let color = settings.color(i);

            // consecutive present points form one segment
            let mut segments: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
            for (date, value) in self.dates.iter().zip(values) {
                match value {
                    NA::Value(v) => {
                        if let Some(segment) = segments.last_mut() {
                            segment.push((self.x_of(*date), *v));
                        }
                    }
                    NA::NA => segments.push(Vec::new()),
                }
            }

            let mut labelled = false;
            for segment in segments.into_iter().filter(|s| !s.is_empty()) {
                let annotation = if segment.len() == 1 {
                    chart.draw_series(segment.into_iter().map(|p| Circle::new(p, 2, color.filled())))?
                } else {
                    chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?
                };
                if !labelled {
                    annotation.label(name.clone()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                    labelled = true;
                }
            }
        }

        draw_legend(&mut chart, settings)
    }
}

/// Points coloured by group
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    pub groups: Vec<(String, Vec<(f64, f64)>)>,
}

impl Figure for ScatterPlot {
    fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, points)| points.is_empty())
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let xs: Vec<f64> = self.groups.iter().flat_map(|(_, p)| p.iter().map(|p| p.0)).collect();
        let ys: Vec<f64> = self.groups.iter().flat_map(|(_, p)| p.iter().map(|p| p.1)).collect();
        if xs.is_empty() {
            return Err(Error::EmptyData("scatter plot has no points".into()));
        }
        let (x_min, x_max) = min_max(&xs);
        let (y_min, y_max) = min_max(&ys);

        let mut chart = build_chart(
            root,
            settings,
            range(x_min, x_max, 0.05),
            range(y_min, y_max, 0.05),
        )?;
        draw_mesh(&mut chart, settings, None, None)?;

        for (i, (name, points)) in self.groups.iter().enumerate() {
            let color = settings.color(i);
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?
                .label(name.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        draw_legend(&mut chart, settings)
    }
}

/// Box-and-whisker plot, one box per category
#[derive(Debug, Clone)]
pub struct BoxPlot {
    pub boxes: Vec<(String, BoxStats)>,
}

impl BoxPlot {
    /// Builds the boxes, dropping categories without values
    pub fn from_groups(groups: &[(String, Vec<f64>)]) -> Self {
        BoxPlot {
            boxes: groups
                .iter()
                .filter_map(|(name, values)| {
                    BoxStats::from_values(values).map(|stats| (name.clone(), stats))
                })
                .collect(),
        }
    }
}

impl Figure for BoxPlot {
    fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.boxes.is_empty() {
            return Err(Error::EmptyData("box plot has no values".into()));
        }
        let (y_min, y_max) = self
            .boxes
            .iter()
            .map(|(_, stats)| stats.extent())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            });
        let names: Vec<String> = self.boxes.iter().map(|(name, _)| name.clone()).collect();
        let n = names.len() as f64;

        let mut chart = build_chart(root, settings, -0.5..(n - 0.5), range(y_min, y_max, 0.05))?;
        let label = |v: &f64| category_label(&names, *v);
        draw_mesh(&mut chart, settings, Some(names.len() + 1), Some(&label as &dyn Fn(&f64) -> String))?;

        for (i, (_, stats)) in self.boxes.iter().enumerate() {
            let x = i as f64;
            let color = settings.color(i);
            let line = BLACK.stroke_width(1);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.4, stats.q1), (x + 0.4, stats.q3)],
                color.mix(0.8).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.4, stats.q1), (x + 0.4, stats.q3)],
                line,
            )))?;

            let segments = vec![
                // median
                vec![(x - 0.4, stats.median), (x + 0.4, stats.median)],
                // whiskers
                vec![(x, stats.q3), (x, stats.whisker_high)],
                vec![(x, stats.q1), (x, stats.whisker_low)],
                // caps
                vec![(x - 0.2, stats.whisker_high), (x + 0.2, stats.whisker_high)],
                vec![(x - 0.2, stats.whisker_low), (x + 0.2, stats.whisker_low)],
            ];
            chart.draw_series(segments.into_iter().map(|points| PathElement::new(points, line)))?;

            chart.draw_series(stats.fliers.iter().map(|&v| Circle::new((x, v), 3, line)))?;
        }

        Ok(())
    }
}

/// Frequency histogram
#[derive(Debug, Clone)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Figure for Histogram {
    fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (start, end) = match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => return Err(Error::EmptyData("histogram has no bins".into())),
        };
        let max_count = self.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;

        let mut chart = build_chart(root, settings, range(start, end, 0.02), 0.0..(max_count * 1.1))?;
        draw_mesh(&mut chart, settings, None, None)?;

        let color = settings.color(0);
        chart.draw_series(self.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], color.filled())
        }))?;
        chart.draw_series(self.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], WHITE.stroke_width(1))
        }))?;

        Ok(())
    }
}

/// Vertical bars, one per category
#[derive(Debug, Clone)]
pub struct BarChart {
    pub bars: Vec<(String, usize)>,
}

impl Figure for BarChart {
    fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.bars.is_empty() {
            return Err(Error::EmptyData("bar chart has no categories".into()));
        }
        let names: Vec<String> = self.bars.iter().map(|(name, _)| name.clone()).collect();
        let n = names.len() as f64;
        let max_count = self.bars.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;

        let mut chart = build_chart(root, settings, -0.5..(n - 0.5), 0.0..(max_count * 1.1))?;
        let label = |v: &f64| category_label(&names, *v);
        draw_mesh(&mut chart, settings, Some(names.len() + 1), Some(&label as &dyn Fn(&f64) -> String))?;

        chart.draw_series(self.bars.iter().enumerate().map(|(i, (_, count))| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, *count as f64)],
                settings.color(i).filled(),
            )
        }))?;

        Ok(())
    }
}

/// Scatter plot with its least-squares line
#[derive(Debug, Clone)]
pub struct RegressionPlot {
    pub points: Vec<(f64, f64)>,
    pub slope: f64,
    pub intercept: f64,
}

impl Figure for RegressionPlot {
    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, settings: &PlotSettings) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.points.is_empty() {
            return Err(Error::EmptyData("regression plot has no points".into()));
        }
        let xs: Vec<f64> = self.points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = self.points.iter().map(|p| p.1).collect();
        let (x_min, x_max) = min_max(&xs);
        let fit = |x: f64| self.slope * x + self.intercept;
        let (y_min, y_max) = min_max(&ys);
        let (y_min, y_max) = (
            y_min.min(fit(x_min)).min(fit(x_max)),
            y_max.max(fit(x_min)).max(fit(x_max)),
        );

        let mut chart = build_chart(
            root,
            settings,
            range(x_min, x_max, 0.05),
            range(y_min, y_max, 0.05),
        )?;
        draw_mesh(&mut chart, settings, None, None)?;

        let color = settings.color(0);
        chart.draw_series(
            self.points
                .iter()
                .map(|&p| Circle::new(p, 4, color.mix(0.8).filled())),
        )?;
        chart.draw_series(LineSeries::new(
            vec![(x_min, fit(x_min)), (x_max, fit(x_max))],
            color.stroke_width(3),
        ))?;

        Ok(())
    }
}
