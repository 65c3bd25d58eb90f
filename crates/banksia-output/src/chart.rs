//! Self-contained SVG line charts.
//!
//! Charts are plain SVG documents: one polyline per series over a shared
//! date axis. Null values break a line into separate segments.

use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;

/// Colour of the primary price or volatility line.
pub const LINE_COLOR: &str = "#1f77b4";
/// Colour of the annual volatility line.
pub const VOLATILITY_COLOR: &str = "#ff7f0e";
/// Colour of the drawdown line.
pub const DRAWDOWN_COLOR: &str = "#d62728";
/// Colour of the cumulative return line.
pub const CUMULATIVE_COLOR: &str = "#2ca02c";

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

/// Errors that can occur while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A series does not have one value per date.
    #[error("series '{label}' has {actual} values but the axis has {expected} dates")]
    LengthMismatch {
        /// Series label.
        label: String,
        /// Number of dates on the axis.
        expected: usize,
        /// Number of values in the series.
        actual: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One named line of a chart.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    /// Legend label.
    pub label: String,
    /// Stroke colour.
    pub color: &'static str,
    /// One value per date; `None` leaves a gap.
    pub values: Vec<Option<f64>>,
}

/// A line chart over a date axis.
#[derive(Debug, Clone)]
pub struct LineChart {
    title: String,
    y_label: String,
    dates: Vec<Option<NaiveDate>>,
    series: Vec<ChartSeries>,
}

impl LineChart {
    /// Create an empty chart over `dates`.
    pub fn new(
        title: impl Into<String>,
        y_label: impl Into<String>,
        dates: Vec<Option<NaiveDate>>,
    ) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            dates,
            series: Vec::new(),
        }
    }

    /// Add a line.
    pub fn with_series(
        mut self,
        label: impl Into<String>,
        color: &'static str,
        values: Vec<Option<f64>>,
    ) -> Self {
        self.series.push(ChartSeries {
            label: label.into(),
            color,
            values,
        });
        self
    }

    /// Chart title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Lines of the chart.
    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    fn extent(&self) -> Option<(f64, f64)> {
        let mut values = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied().flatten())
            .filter(|v| v.is_finite())
            .peekable();
        values.peek()?;

        let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if lo == hi {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            lo -= pad;
            hi += pad;
        }
        Some((lo, hi))
    }

    fn x_at(&self, idx: usize) -> f64 {
        let inner = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        if self.dates.len() <= 1 {
            return MARGIN_LEFT + inner / 2.0;
        }
        MARGIN_LEFT + inner * idx as f64 / (self.dates.len() - 1) as f64
    }

    /// Render the chart as an SVG document.
    ///
    /// A chart with no finite values renders with a "No data" note instead
    /// of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if a series length differs from the number of dates.
    pub fn render(&self) -> Result<String, ChartError> {
        for s in &self.series {
            if s.values.len() != self.dates.len() {
                return Err(ChartError::LengthMismatch {
                    label: s.label.clone(),
                    expected: self.dates.len(),
                    actual: s.values.len(),
                });
            }
        }

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><style>text{{font-family:Arial,sans-serif;font-size:12px;fill:#333}}</style>"#
        ));
        svg.push_str(r##"<rect width="100%" height="100%" fill="#ffffff" />"##);
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="30" text-anchor="middle" font-size="18">{title}</text>"#,
            x = WIDTH / 2.0,
            title = escape(&self.title)
        ));

        let bottom = HEIGHT - MARGIN_BOTTOM;
        let right = WIDTH - MARGIN_RIGHT;

        match self.extent() {
            Some((lo, hi)) => {
                let scale = |v: f64| bottom - (v - lo) / (hi - lo) * (bottom - MARGIN_TOP);

                for i in 0..=Y_TICKS {
                    let value = lo + (hi - lo) * i as f64 / Y_TICKS as f64;
                    let y = scale(value);
                    svg.push_str(&format!(
                        r##"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{right}" y2="{y:.2}" stroke="#e5e5e5" stroke-width="1" /><text x="{x:.2}" y="{ty:.2}" text-anchor="end">{value}</text>"##,
                        x = MARGIN_LEFT - 6.0,
                        ty = y + 4.0,
                        value = format_tick(value)
                    ));
                }

                for s in &self.series {
                    for segment in segments(&s.values) {
                        let points = segment
                            .iter()
                            .map(|&(idx, v)| format!("{:.2},{:.2}", self.x_at(idx), scale(v)))
                            .collect::<Vec<_>>()
                            .join(" ");
                        svg.push_str(&format!(
                            r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points}" />"#,
                            color = s.color
                        ));
                    }
                }
            }
            None => {
                svg.push_str(&format!(
                    r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="14">No data</text>"#,
                    x = WIDTH / 2.0,
                    y = HEIGHT / 2.0
                ));
            }
        }

        self.draw_axes(&mut svg);
        self.draw_legend(&mut svg);

        svg.push_str("</svg>\n");
        Ok(svg)
    }

    fn draw_axes(&self, svg: &mut String) {
        let bottom = HEIGHT - MARGIN_BOTTOM;
        let right = WIDTH - MARGIN_RIGHT;
        svg.push_str(&format!(
            r##"<line x1="{MARGIN_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#000" stroke-width="1" /><line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom}" stroke="#000" stroke-width="1" />"##
        ));

        if !self.dates.is_empty() {
            let step = (self.dates.len() / X_TICKS).max(1);
            let last = self.dates.len() - 1;
            let mut ticks: Vec<usize> = (0..self.dates.len()).step_by(step).collect();
            if ticks.last() != Some(&last) {
                ticks.push(last);
            }
            for idx in ticks {
                let Some(date) = self.dates[idx] else {
                    continue;
                };
                let x = self.x_at(idx);
                svg.push_str(&format!(
                    r##"<line x1="{x:.2}" y1="{bottom}" x2="{x:.2}" y2="{y2}" stroke="#000" stroke-width="1" /><text x="{x:.2}" y="{ty}" text-anchor="middle">{label}</text>"##,
                    y2 = bottom + 4.0,
                    ty = bottom + 18.0,
                    label = date.format("%Y-%m-%d")
                ));
            }
        }

        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">Date</text>"#,
            x = MARGIN_LEFT + (right - MARGIN_LEFT) / 2.0,
            y = HEIGHT - 15.0
        ));
        svg.push_str(&format!(
            r#"<text x="20" y="{y:.2}" text-anchor="middle" transform="rotate(-90 20 {y:.2})">{label}</text>"#,
            y = MARGIN_TOP + (bottom - MARGIN_TOP) / 2.0,
            label = escape(&self.y_label)
        ));
    }

    fn draw_legend(&self, svg: &mut String) {
        let x = MARGIN_LEFT + 12.0;
        let mut y = MARGIN_TOP + 16.0;
        for s in &self.series {
            svg.push_str(&format!(
                r#"<line x1="{x}" y1="{ly:.2}" x2="{x2}" y2="{ly:.2}" stroke="{color}" stroke-width="2" /><text x="{tx}" y="{y:.2}">{label}</text>"#,
                ly = y - 4.0,
                x2 = x + 20.0,
                tx = x + 26.0,
                color = s.color,
                label = escape(&s.label)
            ));
            y += 18.0;
        }
    }

    /// Render the chart and write it to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ChartError> {
        let svg = self.render()?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}

/// Split values into runs of consecutive finite points.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((idx, *v)),
            _ => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else if value.abs() >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.4}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
