use super::aggregate::LabeledSeries;
use super::{Error, Result};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::PathBuf;

pub const CHART_SIZE: (u32, u32) = (800, 800);

/// One line of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Everything a renderer needs to draw the line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub series: Vec<Series>,
}

impl Chart {
    /// chart of the `stat` values, one line per label in label order
    pub fn new(stat: &str, labeled: &LabeledSeries) -> Chart {
        let series = labeled
            .points()
            .into_iter()
            .map(|(label, points)| Series { label, points })
            .collect();
        Chart {
            title: format!("msquic {} via secnetperf", stat),
            x_desc: String::from("Run #"),
            y_desc: stat.to_string(),
            series,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }

    /// x and y ranges covering all points, with some margin
    pub fn ranges(&self) -> ((f64, f64), (f64, f64)) {
        let xmax = self
            .series
            .iter()
            .map(|s| s.points.len())
            .max()
            .unwrap_or(0) as f64
            + 1.;
        let ys = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1));
        let (ymin, ymax) = ys.fold((0f64, 0f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
        let margin = if ymax > ymin { (ymax - ymin) / 10. } else { 1. };
        ((0., xmax), (ymin, ymax + margin))
    }
}

/// Draws a chart somewhere.
pub trait ChartRenderer {
    fn render(&mut self, chart: &Chart) -> Result<()>;
}

/// Renders to an svg or png file with plotters; does nothing without a file.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    output: Option<PathBuf>,
    size: (u32, u32),
}

impl PlottersRenderer {
    pub fn new(output: Option<PathBuf>) -> PlottersRenderer {
        PlottersRenderer {
            output,
            size: CHART_SIZE,
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        let fout = match &self.output {
            Some(p) => p,
            None => {
                info!("no --output file specified, nothing to do");
                return Ok(());
            }
        };
        let is_svg = fout
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        let drawn = if is_svg {
            draw_lines(SVGBackend::new(fout, self.size).into_drawing_area(), chart)
        } else {
            draw_lines(BitMapBackend::new(fout, self.size).into_drawing_area(), chart)
        };
        drawn.map_err(|e| Error::Render(e.to_string()))?;
        info!("saved chart with {} line(s) to {}", chart.series.len(), fout.display());
        Ok(())
    }
}

fn draw_lines<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &Chart,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let ((xmin, xmax), (ymin, ymax)) = chart.ranges();
    root.fill(&WHITE)?;
    let mut ctx = ChartBuilder::on(&root)
        .margin(20)
        .caption(&chart.title, ("sans-serif", 28))
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;
    ctx.configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
        .label_style(("sans-serif", 16))
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .x_label_formatter(&|x: &f64| format!("{}", x.round()))
        .y_label_formatter(&|y: &f64| format!("{}", y.round()))
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        ctx.draw_series(LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(2),
        ))?
        .label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        ctx.draw_series(
            series
                .points
                .iter()
                .map(|&p| Circle::new(p, 4, color.filled())),
        )?;
    }
    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 16))
            .draw()?;
    }
    root.present()?;
    Ok(())
}
