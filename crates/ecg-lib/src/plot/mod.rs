use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::signal::SampleSeries;

pub const ECG_TRACE_COLOR: u32 = 0x1F77B4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Line(line) => &line.name,
        }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        match self {
            Series::Line(line) => &line.points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub legend: bool,
    pub grid: bool,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            legend: false,
            grid: false,
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// Data extent as `(x_min, x_max, y_min, y_max)`, or `None` without points.
    /// Degenerate spans are widened so a chart always has a non-empty range.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.series.iter().flat_map(|s| s.points().iter());
        let first = points.next()?;
        let init = (first[0], first[0], first[1], first[1]);
        let (x0, x1, y0, y1) = points.fold(init, |(x0, x1, y0, y1), p| {
            (x0.min(p[0]), x1.max(p[0]), y0.min(p[1]), y1.max(p[1]))
        });
        let widen = |lo: f64, hi: f64| if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
        let (x0, x1) = widen(x0, x1);
        let (y0, y1) = widen(y0, y1);
        Some((x0, x1, y0, y1))
    }
}

/// Anything that can present a [`Figure`].
pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

/// Non-graphical fallback: prints each series' raw x and y arrays.
pub struct TextBackend<W: Write> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PlotBackend for TextBackend<W> {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()> {
        if let Some(title) = &fig.title {
            writeln!(self.out, "{}", title)?;
        }
        let x_label = fig.x.label.as_deref().unwrap_or("x");
        let y_label = fig.y.label.as_deref().unwrap_or("y");
        for series in &fig.series {
            let xs: Vec<f64> = series.points().iter().map(|p| p[0]).collect();
            let ys: Vec<f64> = series.points().iter().map(|p| p[1]).collect();
            writeln!(self.out, "{}", series.name())?;
            writeln!(self.out, "{}: {:?}", x_label, xs)?;
            writeln!(self.out, "{}: {:?}", y_label, ys)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

/// Voltage-over-time line chart of a recording.
pub fn figure_from_samples(series: &SampleSeries, max_points: usize) -> Figure {
    let points: Vec<[f64; 2]> = series
        .time()
        .iter()
        .zip(series.voltage())
        .map(|(&t, &v)| [t, v])
        .collect();
    let mut fig = Figure::new(Some("ECG Signal".into()));
    fig.x.label = Some("Time (s)".into());
    fig.y.label = Some("Voltage (mV)".into());
    fig.legend = true;
    fig.grid = true;
    fig.add_series(Series::Line(LineSeries {
        name: "ECG Signal".into(),
        points: decimate_points(&points, max_points.max(2)),
        style: Style {
            width: 1.4,
            color: Color(ECG_TRACE_COLOR),
        },
    }));
    fig
}
