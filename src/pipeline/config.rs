use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::dataset::generator::DatasetMode;
use crate::dataset::region::Rect;
use crate::error::{Error, Result};
use crate::fractal::complex::ComplexPoint;
use crate::loss::loss_type::{LossType, MetricKind};
use crate::network::spec::{LayerSpec, NetworkSpec};
use crate::optim::OptimizerKind;
use crate::report::chart::DEFAULT_CHART_FILE;
use crate::train::fit_config::FitConfig;

/// Iteration bound of both fractal demos.
pub const FRACTAL_MAX_ITER: u32 = 50;

/// Julia parameter used by the Julia demo.
pub const DEFAULT_JULIA_C: ComplexPoint = ComplexPoint::new(-0.8, 0.156);

pub const DEFAULT_PORT: u16 = 3000;

/// The four bundled demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Demo {
    Regression,
    Circle,
    Mandelbrot,
    Julia,
}

impl Demo {
    /// Regression has no plane to draw, so it charts; the rest go live.
    pub fn default_output(&self) -> OutputKind {
        match self {
            Demo::Regression => OutputKind::Chart,
            _ => OutputKind::Live,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Chart,
    Live,
}

/// Where progress goes. Chosen once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputMode {
    /// Accumulate every epoch, write one PNG at the end.
    Chart { path: PathBuf },
    /// Stream a `resolution × resolution` prediction grid to browsers after
    /// every epoch, holding training for `delay_ms` each time.
    Live {
        resolution: u32,
        delay_ms: u64,
        port: u16,
        echo_samples: bool,
    },
}

impl OutputMode {
    pub fn kind(&self) -> OutputKind {
        match self {
            OutputMode::Chart { .. } => OutputKind::Chart,
            OutputMode::Live { .. } => OutputKind::Live,
        }
    }
}

/// Everything one run needs: data, model, schedule, output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub dataset: DatasetMode,
    pub region: Rect,
    pub samples: usize,
    /// Fraction kept for training; the rest validates. `None` trains on all.
    pub train_fraction: Option<f64>,
    pub network: NetworkSpec,
    pub optimizer: OptimizerKind,
    pub fit: FitConfig,
    pub output: OutputMode,
    /// Seeds data generation, initialization and shuffling. `None` draws
    /// from OS entropy.
    pub seed: Option<u64>,
}

fn relu_stack(input_size: usize, hidden: &[usize], head: ActivationFunction, loss: LossType, metric: MetricKind) -> NetworkSpec {
    let mut layers: Vec<LayerSpec> = hidden
        .iter()
        .map(|&size| LayerSpec::new(size, ActivationFunction::ReLU))
        .collect();
    layers.push(LayerSpec::new(1, head));
    NetworkSpec { input_size, layers, loss, metric }
}

fn binary_classifier(hidden: &[usize]) -> NetworkSpec {
    relu_stack(2, hidden, ActivationFunction::Sigmoid, LossType::BinaryCrossEntropy, MetricKind::Accuracy)
}

impl PipelineConfig {
    /// The demo's bundled settings, sent to `output`. Live presets listen on
    /// `DEFAULT_PORT` and chart presets write `DEFAULT_CHART_FILE`.
    pub fn preset(demo: Demo, output: OutputKind) -> PipelineConfig {
        let live = |resolution: u32, delay_ms: u64, echo_samples: bool| match output {
            OutputKind::Chart => OutputMode::Chart { path: PathBuf::from(DEFAULT_CHART_FILE) },
            OutputKind::Live => OutputMode::Live { resolution, delay_ms, port: DEFAULT_PORT, echo_samples },
        };

        match demo {
            Demo::Regression => PipelineConfig {
                dataset: DatasetMode::Regression { dim: 100 },
                region: Rect::unit_square(),
                samples: 10_000,
                train_fraction: None,
                network: relu_stack(
                    100,
                    &[64, 32, 16],
                    ActivationFunction::Identity,
                    LossType::Mse,
                    MetricKind::Mse,
                ),
                optimizer: OptimizerKind::Adam { learning_rate: 0.001 },
                fit: FitConfig::new(10, 256),
                output: live(50, 200, false),
                seed: None,
            },
            Demo::Circle => PipelineConfig {
                dataset: DatasetMode::Circle,
                region: Rect::unit_square(),
                samples: 1_000,
                train_fraction: None,
                network: binary_classifier(&[16, 8]),
                optimizer: OptimizerKind::Adam { learning_rate: 0.01 },
                fit: FitConfig::new(20, 32),
                output: live(50, 500, true),
                seed: None,
            },
            Demo::Mandelbrot => PipelineConfig {
                dataset: DatasetMode::Mandelbrot { max_iter: FRACTAL_MAX_ITER },
                region: Rect::mandelbrot(),
                samples: 10_000,
                train_fraction: Some(0.8),
                network: binary_classifier(&[64, 64, 32]),
                optimizer: OptimizerKind::Adam { learning_rate: 0.005 },
                fit: FitConfig::new(50, 64),
                output: live(60, 100, false),
                seed: None,
            },
            Demo::Julia => PipelineConfig {
                dataset: DatasetMode::Julia { c: DEFAULT_JULIA_C, max_iter: FRACTAL_MAX_ITER },
                region: Rect::julia(),
                samples: 10_000,
                train_fraction: Some(0.8),
                network: binary_classifier(&[64, 64, 32]),
                optimizer: OptimizerKind::Adam { learning_rate: 0.005 },
                fit: FitConfig::new(50, 64),
                output: live(60, 100, false),
                seed: None,
            },
        }
    }

    /// Checks every setting a run depends on, before anything is generated.
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(Error::InvalidConfig("sample count must be at least 1".into()));
        }
        if self.dataset.dim() == 0 {
            return Err(Error::InvalidConfig("regression dimension must be at least 1".into()));
        }
        if let Some(f) = self.train_fraction {
            if !(f > 0.0 && f <= 1.0) {
                return Err(Error::InvalidSplit(f));
            }
        }
        self.network.validate()?;
        if self.network.input_size != self.dataset.dim() {
            return Err(Error::Shape { expected: self.network.input_size, actual: self.dataset.dim() });
        }
        self.fit.validate()?;

        if let OutputMode::Live { resolution, .. } = self.output {
            if !self.dataset.is_planar() {
                return Err(Error::InvalidConfig(format!(
                    "live output needs a 2-D dataset, '{}' is not one",
                    self.dataset.name()
                )));
            }
            if resolution == 0 {
                return Err(Error::InvalidConfig("grid resolution must be at least 1".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMOS: [Demo; 4] = [Demo::Regression, Demo::Circle, Demo::Mandelbrot, Demo::Julia];

    #[test]
    fn test_default_presets_validate() {
        for demo in DEMOS {
            PipelineConfig::preset(demo, demo.default_output()).validate().unwrap();
            PipelineConfig::preset(demo, OutputKind::Chart).validate().unwrap();
        }
    }

    #[test]
    fn test_fractal_presets_use_fifty_iterations() {
        let m = PipelineConfig::preset(Demo::Mandelbrot, OutputKind::Live);
        assert_eq!(m.dataset, DatasetMode::Mandelbrot { max_iter: 50 });
        assert_eq!(m.region, Rect::mandelbrot());

        let j = PipelineConfig::preset(Demo::Julia, OutputKind::Live);
        assert_eq!(j.dataset.parameter(), Some(ComplexPoint::new(-0.8, 0.156)));
    }

    #[test]
    fn test_live_regression_rejected() {
        let cfg = PipelineConfig::preset(Demo::Regression, OutputKind::Live);
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_settings_rejected() {
        let mut cfg = PipelineConfig::preset(Demo::Circle, OutputKind::Live);
        cfg.output = OutputMode::Live { resolution: 0, delay_ms: 0, port: 0, echo_samples: false };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = PipelineConfig::preset(Demo::Circle, OutputKind::Chart);
        cfg.fit.epochs = 0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = PipelineConfig::preset(Demo::Circle, OutputKind::Chart);
        cfg.train_fraction = Some(1.5);
        assert!(matches!(cfg.validate(), Err(Error::InvalidSplit(_))));

        let mut cfg = PipelineConfig::preset(Demo::Circle, OutputKind::Chart);
        cfg.network.input_size = 3;
        assert!(matches!(cfg.validate(), Err(Error::Shape { expected: 3, actual: 2 })));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = PipelineConfig::preset(Demo::Julia, OutputKind::Live);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
