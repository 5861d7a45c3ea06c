//! PNG charts embedded by the visibility report.
//!
//! Every chart is rendered on its own [`Canvas`] and written independently:
//! [`generate_charts`] returns one result per chart so a broken series only
//! costs its own image. Charts whose input is missing are drawn from sample
//! data, flagged on the outcome and marked on the image.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::ReportError;
use crate::format;
use crate::model::charts::{resolve_series, ChartInput, DataPoint, SeriesInput, SummaryMetrics};
use crate::theme::{Swatch, Theme, Thresholds, Verdict};

pub mod canvas;

use canvas::{Anchor, Arc, Canvas, ChartFonts, Ink, Weight};

/// Pixels per figure inch.
const DPI: f32 = 150.0;

/// Point sizes converted to pixels at [`DPI`].
fn px(points: f32) -> f32 {
    points * DPI / 72.0
}

const TITLE: f32 = 11.0 * DPI / 72.0;
const LABEL: f32 = 9.0 * DPI / 72.0;
const SMALL: f32 = 8.0 * DPI / 72.0;
const TINY: f32 = 7.0 * DPI / 72.0;

const QUERY_LIMIT: usize = 10;
const QUERY_LABEL_CHARS: usize = 18;

/// The five charts, in the order they are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    CitationTrend,
    EnginePerformance,
    CategoryDistribution,
    TopQueries,
    MetricsSummary,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::CitationTrend,
        ChartKind::EnginePerformance,
        ChartKind::CategoryDistribution,
        ChartKind::TopQueries,
        ChartKind::MetricsSummary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::CitationTrend => "citation_trend",
            ChartKind::EnginePerformance => "engine_performance",
            ChartKind::CategoryDistribution => "category_distribution",
            ChartKind::TopQueries => "top_queries",
            ChartKind::MetricsSummary => "metrics_summary",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.png", self.name())
    }

    /// Image size in pixels: the figure size in inches at 150 DPI.
    pub fn size(self) -> (u32, u32) {
        let (width, height) = match self {
            ChartKind::CategoryDistribution => (8.0, 6.0),
            ChartKind::MetricsSummary => (10.0, 8.0),
            _ => (10.0, 5.0),
        };
        ((width * DPI) as u32, (height * DPI) as u32)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chart that was written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub path: PathBuf,
    /// The chart shows sample values because its input was missing.
    pub sample: bool,
}

/// Renders and writes all five charts into `output_dir`.
///
/// The directory must exist. Results come back in [`ChartKind::ALL`] order.
pub fn generate_charts(
    input: &ChartInput,
    output_dir: &Path,
    theme: &Theme,
    fonts: Option<&ChartFonts>,
) -> Vec<(ChartKind, Result<ChartOutcome, ReportError>)> {
    ChartKind::ALL
        .iter()
        .map(|&kind| (kind, write_chart(kind, input, output_dir, theme, fonts)))
        .collect()
}

fn write_chart(
    kind: ChartKind,
    input: &ChartInput,
    output_dir: &Path,
    theme: &Theme,
    fonts: Option<&ChartFonts>,
) -> Result<ChartOutcome, ReportError> {
    let (canvas, sample) = render_chart(kind, input, theme, fonts)?;
    let path = output_dir.join(kind.file_name());
    canvas.save(&path)?;
    debug!("Wrote {} (sample data: {})", path.display(), sample);
    Ok(ChartOutcome { kind, path, sample })
}

/// Draws one chart in memory. The flag reports a sample-data fallback.
pub fn render_chart<'f>(
    kind: ChartKind,
    input: &ChartInput,
    theme: &Theme,
    fonts: Option<&'f ChartFonts>,
) -> Result<(Canvas<'f>, bool), ReportError> {
    let (width, height) = kind.size();
    let mut canvas = Canvas::new(width, height, theme.palette.white, fonts);

    let sample = match kind {
        ChartKind::MetricsSummary => {
            let metrics = input.metrics.as_ref().and_then(SummaryMetrics::from_object);
            let sample = metrics.is_none();
            metrics_summary(&mut canvas, theme, &metrics.unwrap_or_else(SummaryMetrics::sample));
            sample
        }
        _ => {
            let (points, sample) = series_or_sample(kind, input)?;
            match kind {
                ChartKind::CitationTrend => citation_trend(&mut canvas, theme, &points),
                ChartKind::EnginePerformance => engine_performance(&mut canvas, theme, &points),
                ChartKind::CategoryDistribution => category_distribution(&mut canvas, theme, &points)?,
                _ => top_queries(&mut canvas, theme, &points),
            }
            sample
        }
    };

    if sample {
        warn!("No {} data supplied; drawing sample data", kind);
        sample_mark(&mut canvas, theme);
    }
    Ok((canvas, sample))
}

fn series_or_sample(kind: ChartKind, input: &ChartInput) -> Result<(Vec<DataPoint>, bool), ReportError> {
    let series: Option<&SeriesInput> = match kind {
        ChartKind::CitationTrend => input.trend.as_ref(),
        ChartKind::EnginePerformance => input.engine_performance.as_ref(),
        ChartKind::CategoryDistribution => input.category_distribution.as_ref(),
        ChartKind::TopQueries => input.top_queries.as_ref(),
        ChartKind::MetricsSummary => None,
    };
    Ok(match resolve_series(series)? {
        Some(points) => (points, false),
        None => (sample_series(kind), true),
    })
}

fn sample_series(kind: ChartKind) -> Vec<DataPoint> {
    let (labels, values): (Vec<String>, Vec<f64>) = match kind {
        ChartKind::CitationTrend => (
            (1..=4).map(|week| format!("Week {}", week)).collect(),
            vec![45.0, 52.0, 48.0, 55.0],
        ),
        ChartKind::EnginePerformance => (
            ["GPT", "Gemini", "Claude", "Perplexity"].map(String::from).to_vec(),
            vec![65.0, 58.0, 72.0, 45.0],
        ),
        ChartKind::CategoryDistribution => (
            ["Product", "Service", "Technical", "Other"].map(String::from).to_vec(),
            vec![35.0, 28.0, 22.0, 15.0],
        ),
        ChartKind::TopQueries => (
            (1..=5).map(|query| format!("Query {}", query)).collect(),
            vec![85.0, 78.0, 72.0, 68.0, 65.0],
        ),
        ChartKind::MetricsSummary => (Vec::new(), Vec::new()),
    };
    labels
        .into_iter()
        .zip(values)
        .map(|(label, value)| DataPoint::new(label, value))
        .collect()
}

/// Warning stripe along the top edge plus a `SAMPLE DATA` label.
fn sample_mark(canvas: &mut Canvas<'_>, theme: &Theme) {
    let width = canvas.width() as f32;
    canvas.fill_rect(0.0, 0.0, width, 8.0, theme.palette.warning);
    let ink = Ink::new(SMALL, Weight::Bold, theme.palette.fail);
    canvas.text(width - 16.0, 24.0, "SAMPLE DATA", ink, Anchor::End);
}

fn percent_label(value: f64) -> String {
    format!("{}%", format::number(value))
}

/// Plot area of a chart, with a 0 to 100 percent scale on one axis.
#[derive(Clone, Copy, Debug)]
struct Plot {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Plot {
    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn percent_y(&self, value: f64) -> f32 {
        self.bottom - (value.clamp(0.0, 100.0) as f32 / 100.0) * self.height()
    }

    fn percent_x(&self, value: f64) -> f32 {
        self.left + (value.clamp(0.0, 100.0) as f32 / 100.0) * self.width()
    }

    /// Centre of slot `index` when the horizontal axis holds `count` slots.
    fn slot_x(&self, index: usize, count: usize) -> f32 {
        self.left + (index as f32 + 0.5) * self.width() / count.max(1) as f32
    }

    fn slot_y(&self, index: usize, count: usize) -> f32 {
        self.top + (index as f32 + 0.5) * self.height() / count.max(1) as f32
    }

    /// Left and bottom spines.
    fn spines(&self, canvas: &mut Canvas<'_>, theme: &Theme) {
        let edge = theme.palette.gray_lighter;
        canvas.line((self.left, self.top), (self.left, self.bottom), 2.0, edge);
        canvas.line((self.left, self.bottom), (self.right, self.bottom), 2.0, edge);
    }

    /// Horizontal grid and tick labels for a vertical percent scale.
    fn percent_rows(&self, canvas: &mut Canvas<'_>, theme: &Theme) {
        let ink = Ink::new(LABEL, Weight::Regular, theme.palette.gray);
        for step in (0..=100).step_by(20) {
            let y = self.percent_y(f64::from(step));
            canvas.line((self.left, y), (self.right, y), 1.0, theme.palette.gray_lighter.tint(0.5));
            canvas.text(self.left - 10.0, y, &step.to_string(), ink, Anchor::End);
        }
        self.spines(canvas, theme);
    }

    /// Vertical grid and tick labels for a horizontal percent scale.
    fn percent_columns(&self, canvas: &mut Canvas<'_>, theme: &Theme) {
        let ink = Ink::new(LABEL, Weight::Regular, theme.palette.gray);
        for step in (0..=100).step_by(20) {
            let x = self.percent_x(f64::from(step));
            canvas.line((x, self.top), (x, self.bottom), 1.0, theme.palette.gray_lighter.tint(0.5));
            canvas.text(x, self.bottom + 18.0, &step.to_string(), ink, Anchor::Middle);
        }
        self.spines(canvas, theme);
    }
}

fn title(canvas: &mut Canvas<'_>, theme: &Theme, text: &str, y: f32) {
    let x = canvas.width() as f32 / 2.0;
    canvas.text(x, y, text, Ink::new(TITLE, Weight::Bold, theme.palette.black), Anchor::Middle);
}

fn y_axis_label(canvas: &mut Canvas<'_>, theme: &Theme, plot: &Plot, text: &str) {
    let ink = Ink::new(LABEL, Weight::Regular, theme.palette.gray);
    let y = plot.top + plot.height() / 2.0;
    canvas.vertical_text(plot.left - 70.0, y, text, ink, Anchor::Middle, theme.palette.white);
}

fn threshold_row(canvas: &mut Canvas<'_>, theme: &Theme, plot: &Plot) {
    let y = plot.percent_y(Thresholds::VISIBILITY.pass);
    canvas.dashed_line((plot.left, y), (plot.right, y), 2.0, theme.palette.gray_light, 12.0, 6.0);
}

/// Line chart of citation rates over time with a shaded area.
fn citation_trend(canvas: &mut Canvas<'_>, theme: &Theme, points: &[DataPoint]) {
    let palette = &theme.palette;
    let plot = Plot {
        left: 130.0,
        top: 80.0,
        right: canvas.width() as f32 - 40.0,
        bottom: canvas.height() as f32 - 110.0,
    };
    title(canvas, theme, "CITATION RATE TREND", 36.0);
    plot.percent_rows(canvas, theme);

    let vertices: Vec<(f32, f32)> = points
        .iter()
        .enumerate()
        .map(|(index, point)| (plot.slot_x(index, points.len()), plot.percent_y(point.value)))
        .collect();

    if let (Some(first), Some(last)) = (vertices.first(), vertices.last()) {
        let mut area = vertices.clone();
        area.push((last.0, plot.bottom));
        area.push((first.0, plot.bottom));
        canvas.polygon(&area, palette.gray.tint(0.9));
    }

    threshold_row(canvas, theme, &plot);
    if let Some(last) = vertices.last() {
        let y = plot.percent_y(Thresholds::VISIBILITY.pass + 2.0);
        let ink = Ink::new(TINY, Weight::Regular, palette.gray);
        canvas.text(last.0, y - 8.0, "PASS threshold", ink, Anchor::End);
    }

    for pair in vertices.windows(2) {
        canvas.line(pair[0], pair[1], 4.0, palette.gray_dark);
    }

    let tick = Ink::new(LABEL, Weight::Regular, palette.gray);
    let value = Ink::new(LABEL, Weight::Bold, palette.black);
    for (point, &(x, y)) in points.iter().zip(&vertices) {
        canvas.circle((x, y), 9.0, palette.black);
        canvas.circle((x, y), 5.0, palette.white);
        canvas.text(x, y - 30.0, &percent_label(point.value), value, Anchor::Middle);
        canvas.text(x, plot.bottom + 20.0, &point.label, tick, Anchor::Middle);
    }

    let axis = Ink::new(LABEL, Weight::Regular, palette.gray);
    canvas.text(plot.left + plot.width() / 2.0, plot.bottom + 60.0, "Period", axis, Anchor::Middle);
    y_axis_label(canvas, theme, &plot, "Citation Rate (%)");
}

/// Horizontal bars per engine, first engine on top.
fn engine_performance(canvas: &mut Canvas<'_>, theme: &Theme, points: &[DataPoint]) {
    let palette = &theme.palette;
    let plot = Plot {
        left: 210.0,
        top: 80.0,
        right: canvas.width() as f32 - 60.0,
        bottom: canvas.height() as f32 - 100.0,
    };
    title(canvas, theme, "ENGINE PERFORMANCE", 36.0);
    plot.percent_columns(canvas, theme);

    let band = plot.height() / points.len().max(1) as f32;
    let name = Ink::new(LABEL, Weight::Regular, palette.gray);
    for (index, point) in points.iter().enumerate() {
        let verdict = Verdict::classify(point.value, Thresholds::VISIBILITY);
        let center = plot.slot_y(index, points.len());
        let thickness = band * 0.5;
        let end = plot.percent_x(point.value);
        canvas.fill_rect(
            plot.left,
            center - thickness / 2.0,
            end - plot.left,
            thickness,
            theme.verdict_color(verdict),
        );
        canvas.text(plot.left - 12.0, center, &point.label.to_uppercase(), name, Anchor::End);

        let label = format!("{} ({})", percent_label(point.value), verdict.two_tier().label());
        let ink = Ink::new(SMALL, Weight::Bold, palette.black);
        canvas.text(plot.percent_x(point.value + 2.0), center, &label, ink, Anchor::Start);
    }

    let x = plot.percent_x(Thresholds::VISIBILITY.pass);
    canvas.dashed_line((x, plot.top), (x, plot.bottom), 2.0, palette.gray_light, 12.0, 6.0);

    let axis = Ink::new(LABEL, Weight::Regular, palette.gray);
    let y = plot.bottom + 56.0;
    canvas.text(plot.left + plot.width() / 2.0, y, "Citation Rate (%)", axis, Anchor::Middle);
}

/// `(start, sweep)` of each wedge in clockwise degrees from twelve o'clock,
/// for wedges laid out counter-clockwise from the top.
fn wedge_arcs(values: &[f64]) -> Result<Vec<(f32, f32)>, ReportError> {
    if let Some(negative) = values.iter().find(|value| **value < 0.0) {
        return Err(ReportError::render(format!(
            "Wedge sizes must be non-negative, got {}",
            negative
        )));
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Err(ReportError::render("Wedge sizes must add up to a positive total"));
    }
    let mut turned = 0.0f32;
    Ok(values
        .iter()
        .map(|value| {
            let sweep = (value / total * 360.0) as f32;
            turned += sweep;
            (360.0 - turned, sweep)
        })
        .collect())
}

/// Point at `radius` along the clockwise `angle` from twelve o'clock.
fn polar(center: (f32, f32), radius: f32, angle: f32) -> (f32, f32) {
    let radians = angle.to_radians();
    (center.0 + radius * radians.sin(), center.1 - radius * radians.cos())
}

/// White separators along wedge boundaries.
fn wedge_edges(canvas: &mut Canvas<'_>, theme: &Theme, center: (f32, f32), outer: f32, inner: f32, arcs: &[(f32, f32)]) {
    if arcs.len() < 2 {
        return;
    }
    for &(start, _) in arcs {
        canvas.line(polar(center, inner, start), polar(center, outer + 1.0, start), 4.0, theme.palette.white);
    }
}

/// Donut of query categories in the gray palette.
fn category_distribution(canvas: &mut Canvas<'_>, theme: &Theme, points: &[DataPoint]) -> Result<(), ReportError> {
    let palette = &theme.palette;
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();
    let wedges = wedge_arcs(&values)?;
    let swatches = [palette.gray_dark, palette.gray, palette.gray_light, palette.gray_lighter];

    title(canvas, theme, "QUERY CATEGORY DISTRIBUTION", 36.0);
    let center = (canvas.width() as f32 / 2.0, canvas.height() as f32 / 2.0 + 30.0);
    let outer = 310.0;
    let inner = outer * 0.4;

    let arcs: Vec<Arc> = wedges
        .iter()
        .enumerate()
        .map(|(index, &(start, sweep))| Arc {
            start,
            sweep,
            color: swatches[index % swatches.len()],
        })
        .collect();
    canvas.ring(center, outer, inner, &arcs);
    wedge_edges(canvas, theme, center, outer, inner, &wedges);

    let total: f64 = values.iter().sum();
    let share = Ink::new(LABEL, Weight::Bold, palette.white);
    let name = Ink::new(LABEL, Weight::Regular, palette.gray_dark);
    for (point, &(start, sweep)) in points.iter().zip(&wedges) {
        let middle = start + sweep / 2.0;
        let inside = polar(center, outer * 0.75, middle);
        canvas.text(inside.0, inside.1, &format!("{:.0}%", point.value / total * 100.0), share, Anchor::Middle);

        let outside = polar(center, outer * 1.1, middle);
        let anchor = if outside.0 < center.0 - 1.0 {
            Anchor::End
        } else if outside.0 > center.0 + 1.0 {
            Anchor::Start
        } else {
            Anchor::Middle
        };
        canvas.text(outside.0, outside.1, &point.label, name, anchor);
    }
    Ok(())
}

/// Vertical bars for the first ten queries.
fn top_queries(canvas: &mut Canvas<'_>, theme: &Theme, points: &[DataPoint]) {
    let palette = &theme.palette;
    let points = &points[..points.len().min(QUERY_LIMIT)];
    let plot = Plot {
        left: 130.0,
        top: 80.0,
        right: canvas.width() as f32 - 40.0,
        bottom: canvas.height() as f32 - 230.0,
    };
    title(canvas, theme, "TOP QUERIES PERFORMANCE", 36.0);
    plot.percent_rows(canvas, theme);
    threshold_row(canvas, theme, &plot);

    let band = plot.width() / points.len().max(1) as f32;
    let value = Ink::new(SMALL, Weight::Bold, palette.black);
    let tick = Ink::new(SMALL, Weight::Regular, palette.gray);
    for (index, point) in points.iter().enumerate() {
        let verdict = Verdict::classify(point.value, Thresholds::VISIBILITY);
        let center = plot.slot_x(index, points.len());
        let width = band * 0.6;
        let top = plot.percent_y(point.value);
        canvas.fill_rect(center - width / 2.0, top, width, plot.bottom - top, theme.verdict_color(verdict));
        canvas.text(center, plot.percent_y(point.value + 2.0) - 10.0, &percent_label(point.value), value, Anchor::Middle);

        let label = format::truncate(&point.label, QUERY_LABEL_CHARS);
        canvas.vertical_text(center, plot.bottom + 10.0, &label, tick, Anchor::End, palette.white);
    }

    y_axis_label(canvas, theme, &plot, "Citation Rate (%)");
}

/// Percentage ring: `value` of 100 in `color`, the rest in the lightest gray.
fn gauge(canvas: &mut Canvas<'_>, theme: &Theme, center: (f32, f32), value: f64, color: Swatch) {
    let outer = 190.0;
    let inner = outer * 0.65;
    let filled = (value.clamp(0.0, 100.0) * 3.6) as f32;
    let arcs = [
        Arc {
            start: 360.0 - filled,
            sweep: filled,
            color,
        },
        Arc {
            start: 0.0,
            sweep: 360.0 - filled,
            color: theme.palette.gray_lightest,
        },
    ];
    canvas.ring(center, outer, inner, &arcs);
}

fn change_label(change: f64) -> String {
    if change > 0.0 {
        format!("+{}%p", format::number(change))
    } else {
        format!("{}%p", format::number(change))
    }
}

/// Four panels: citation rate, total tests, average rank and share of voice.
fn metrics_summary(canvas: &mut Canvas<'_>, theme: &Theme, metrics: &SummaryMetrics) {
    let palette = &theme.palette;
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    title(canvas, theme, "KEY METRICS SUMMARY", 40.0);

    let top = 80.0;
    let panel = (width / 2.0, (height - top) / 2.0);
    let centers: Vec<(f32, f32)> = (0..4)
        .map(|index| {
            let (column, row) = ((index % 2) as f32, (index / 2) as f32);
            (panel.0 * (column + 0.5), top + panel.1 * (row + 0.5) + 20.0)
        })
        .collect();
    let panel_title = |index: usize| (centers[index].0, centers[index].1 - panel.1 / 2.0 + 10.0);
    let heading = Ink::new(px(10.0), Weight::Bold, palette.black);
    let big = Ink::new(px(24.0), Weight::Bold, palette.black);
    let huge = Ink::new(px(32.0), Weight::Bold, palette.black);
    let caption = Ink::new(px(10.0), Weight::Regular, palette.gray);

    let rate = metrics.citation_rate;
    let verdict = Verdict::classify(rate, Thresholds::VISIBILITY).two_tier();
    let color = theme.verdict_color(verdict);
    let (x, y) = centers[0];
    gauge(canvas, theme, (x, y), rate, color);
    canvas.text(x, y - 20.0, &percent_label(rate), big, Anchor::Middle);
    canvas.text(x, y + 28.0, verdict.label(), Ink::new(px(10.0), Weight::Bold, color), Anchor::Middle);
    let change = metrics.citation_rate_change;
    let change_color = if change > 0.0 { palette.pass } else { palette.fail };
    canvas.text(
        x,
        y + 66.0,
        &change_label(change),
        Ink::new(px(10.0), Weight::Regular, change_color),
        Anchor::Middle,
    );

    let (x, y) = centers[1];
    canvas.text(x, y - 20.0, &format::number(metrics.total_tests), huge, Anchor::Middle);
    canvas.text(x, y + 60.0, "TESTS", caption, Anchor::Middle);

    let (x, y) = centers[2];
    let rank = if metrics.avg_rank == 0.0 {
        "-".to_owned()
    } else {
        format!("{:.1}", metrics.avg_rank)
    };
    canvas.text(x, y - 20.0, &rank, huge, Anchor::Middle);
    canvas.text(x, y + 60.0, "RANK", caption, Anchor::Middle);

    let (x, y) = centers[3];
    gauge(canvas, theme, (x, y), metrics.share_of_voice, palette.gray_dark);
    canvas.text(x, y, &percent_label(metrics.share_of_voice), big, Anchor::Middle);

    for (index, text) in ["CITATION RATE", "TOTAL TESTS", "AVG RANK", "SHARE OF VOICE"]
        .iter()
        .enumerate()
    {
        let (x, y) = panel_title(index);
        canvas.text(x, y, text, heading, Anchor::Middle);
    }
}
