use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use crate::error::Result;
use crate::loss::loss_type::MetricKind;
use crate::train::epoch_record::EpochRecord;
use crate::train::harness::{EpochObserver, Predictor};

/// Default output file for static-chart runs.
pub const DEFAULT_CHART_FILE: &str = "training_progress.png";

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([90, 90, 90]);
const GRIDLINE: Rgb<u8> = Rgb([228, 228, 228]);
const LOSS_COLOR: Rgb<u8> = Rgb([220, 60, 50]);
const METRIC_COLOR: Rgb<u8> = Rgb([40, 110, 210]);

/// The two per-epoch series of a finished run, indexed by epoch - 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric_kind: MetricKind,
    pub loss: Vec<f64>,
    pub metric: Vec<f64>,
}

impl ChartSeries {
    pub fn new(metric_kind: MetricKind) -> ChartSeries {
        ChartSeries { metric_kind, loss: Vec::new(), metric: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.loss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loss.is_empty()
    }
}

/// Where a finished run's chart goes.
pub trait ChartSink {
    fn render(&mut self, series: &ChartSeries) -> Result<()>;
}

/// Static-chart reporter: appends every epoch, renders once at the end.
pub struct ChartReporter<S: ChartSink> {
    series: ChartSeries,
    sink: S,
}

impl<S: ChartSink> ChartReporter<S> {
    pub fn new(metric_kind: MetricKind, sink: S) -> ChartReporter<S> {
        ChartReporter { series: ChartSeries::new(metric_kind), sink }
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    /// Renders the accumulated series. Call only after a successful run;
    /// a run that produced no epochs renders nothing.
    pub fn finish(mut self) -> Result<S> {
        if !self.series.is_empty() {
            self.sink.render(&self.series)?;
        }
        Ok(self.sink)
    }
}

impl<S: ChartSink> EpochObserver for ChartReporter<S> {
    fn on_epoch_end(&mut self, record: &EpochRecord, _model: &dyn Predictor) -> Result<()> {
        info!("{}", record.summary());
        self.series.loss.push(record.train.loss);
        self.series.metric.push(record.train.metric);
        Ok(())
    }
}

/// Draws both series as line charts on a shared y-axis and saves a PNG.
///
/// Loss is red, the metric blue; the legend swatches in the top-right
/// corner follow the same order. An accuracy run always shows the full
/// 0..1 range; an MSE run scales to its largest value.
#[derive(Debug, Clone)]
pub struct PngChart {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl PngChart {
    pub fn new(path: impl Into<PathBuf>) -> PngChart {
        PngChart { path: path.into(), width: 800, height: 450 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixel canvas for `series`; split out from `render` for testing.
    pub fn draw(&self, series: &ChartSeries) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let plot = PlotArea::new(self.width, self.height, series);

        for k in 0..=4 {
            let y = plot.top + (plot.bottom - plot.top) * k as f64 / 4.0;
            draw_line(&mut img, (plot.left, y), (plot.right, y), GRIDLINE, 1);
        }
        draw_line(&mut img, (plot.left, plot.top), (plot.left, plot.bottom), AXIS, 1);
        draw_line(&mut img, (plot.left, plot.bottom), (plot.right, plot.bottom), AXIS, 1);

        for (values, color) in [(&series.loss, LOSS_COLOR), (&series.metric, METRIC_COLOR)] {
            let points: Vec<(f64, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| plot.project(i, v))
                .collect();
            for pair in points.windows(2) {
                draw_line(&mut img, pair[0], pair[1], color, 2);
            }
            for &p in &points {
                fill_rect(&mut img, p.0 - 2.0, p.1 - 2.0, 5, 5, color);
            }
        }

        let legend_x = plot.right - 40.0;
        fill_rect(&mut img, legend_x, plot.top + 6.0, 14, 8, LOSS_COLOR);
        fill_rect(&mut img, legend_x + 20.0, plot.top + 6.0, 14, 8, METRIC_COLOR);
        img
    }
}

impl ChartSink for PngChart {
    fn render(&mut self, series: &ChartSeries) -> Result<()> {
        self.draw(series).save_with_format(&self.path, ImageFormat::Png)?;
        info!(path = %self.path.display(), epochs = series.len(), "chart saved");
        Ok(())
    }
}

/// Maps (epoch index, value) to pixel coordinates.
struct PlotArea {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    epochs: usize,
    y_max: f64,
}

impl PlotArea {
    fn new(width: u32, height: u32, series: &ChartSeries) -> PlotArea {
        let peak = series
            .loss
            .iter()
            .chain(series.metric.iter())
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0f64, f64::max);
        let y_max = match series.metric_kind {
            MetricKind::Accuracy => peak.max(1.0),
            MetricKind::Mse if peak > 0.0 => peak * 1.05,
            MetricKind::Mse => 1.0,
        };
        PlotArea {
            left: 50.0,
            right: width as f64 - 20.0,
            top: 20.0,
            bottom: height as f64 - 40.0,
            epochs: series.len(),
            y_max,
        }
    }

    fn project(&self, index: usize, value: f64) -> (f64, f64) {
        let x = if self.epochs <= 1 {
            (self.left + self.right) / 2.0
        } else {
            self.left + (self.right - self.left) * index as f64 / (self.epochs - 1) as f64
        };
        let v = if value.is_finite() { value.clamp(0.0, self.y_max) } else { self.y_max };
        let y = self.bottom - (self.bottom - self.top) * v / self.y_max;
        (x, y)
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(img: &mut RgbImage, x: f64, y: f64, w: u32, h: u32, color: Rgb<u8>) {
    let (x0, y0) = (x.round() as i64, y.round() as i64);
    for dy in 0..h as i64 {
        for dx in 0..w as i64 {
            put(img, x0 + dx, y0 + dy, color);
        }
    }
}

/// Bresenham line, `thickness` pixels wide.
fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>, thickness: i64) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        for t in 0..thickness {
            put(img, x0, y0 + t, color);
            put(img, x0 + t, y0, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::epoch_record::Evaluation;

    struct NoModel;

    impl Predictor for NoModel {
        fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
            Ok(vec![0.0; inputs.len()])
        }
    }

    #[derive(Default)]
    struct CountingSink {
        renders: Vec<ChartSeries>,
    }

    impl ChartSink for CountingSink {
        fn render(&mut self, series: &ChartSeries) -> Result<()> {
            self.renders.push(series.clone());
            Ok(())
        }
    }

    fn record(epoch: usize, loss: f64, metric: f64) -> EpochRecord {
        EpochRecord {
            epoch,
            total_epochs: 3,
            metric_kind: MetricKind::Mse,
            train: Evaluation { loss, metric },
            validation: None,
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_reporter_accumulates_then_renders_once() {
        let mut reporter = ChartReporter::new(MetricKind::Mse, CountingSink::default());
        for (i, loss) in [0.9, 0.5, 0.2].into_iter().enumerate() {
            reporter.on_epoch_end(&record(i + 1, loss, loss / 2.0), &NoModel).unwrap();
        }
        assert_eq!(reporter.series().len(), 3);

        let sink = reporter.finish().unwrap();
        assert_eq!(sink.renders.len(), 1);
        assert_eq!(sink.renders[0].loss, vec![0.9, 0.5, 0.2]);
        assert_eq!(sink.renders[0].metric, vec![0.45, 0.25, 0.1]);
    }

    #[test]
    fn test_empty_run_renders_nothing() {
        let reporter = ChartReporter::new(MetricKind::Accuracy, CountingSink::default());
        assert!(reporter.finish().unwrap().renders.is_empty());
    }

    #[test]
    fn test_draw_puts_series_colors_on_canvas() {
        let series = ChartSeries {
            metric_kind: MetricKind::Accuracy,
            loss: vec![0.7, 0.4, 0.3],
            metric: vec![0.5, 0.8, 0.9],
        };
        let img = PngChart::new("unused.png").draw(&series);
        assert_eq!(img.dimensions(), (800, 450));
        assert!(img.pixels().any(|p| *p == LOSS_COLOR));
        assert!(img.pixels().any(|p| *p == METRIC_COLOR));
    }

    #[test]
    fn test_axis_follows_metric_kind() {
        let mut series = ChartSeries {
            metric_kind: MetricKind::Accuracy,
            loss: vec![0.2, 0.1],
            metric: vec![0.3, 0.4],
        };
        let plot = PlotArea::new(800, 450, &series);
        assert_eq!(plot.y_max, 1.0);
        assert_eq!(plot.project(1, 1.0).1, plot.top);

        series.metric_kind = MetricKind::Mse;
        let plot = PlotArea::new(800, 450, &series);
        assert!((plot.y_max - 0.42).abs() < 1e-12);
    }

    #[test]
    fn test_single_epoch_and_non_finite_values_draw() {
        let series = ChartSeries {
            metric_kind: MetricKind::Mse,
            loss: vec![f64::NAN],
            metric: vec![0.0],
        };
        let img = PngChart::new("unused.png").draw(&series);
        assert!(img.pixels().any(|p| *p == METRIC_COLOR));
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let mut sink = PngChart::new(&path);
        let series = ChartSeries {
            metric_kind: MetricKind::Mse,
            loss: vec![1.0, 0.5],
            metric: vec![1.0, 0.5],
        };
        sink.render(&series).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(sink.path(), path.as_path());
    }
}
