pub mod error;
pub mod fractal;
pub mod dataset;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod report;
pub mod server;
pub mod pipeline;

// Convenience re-exports
pub use error::{Error, Result};
pub use fractal::{classify, escape_iterations, ComplexPoint, FractalKind};
pub use dataset::{generate, generate_grid, Dataset, DatasetMode, Rect};
pub use network::{NetworkSpec, LayerSpec};
pub use optim::OptimizerKind;
pub use train::{EpochObserver, EpochRecord, FitConfig, Predictor, Sequential, TrainingHarness};
pub use report::{ChartReporter, LiveReporter, Pacer, PngChart, Publisher};
pub use server::{Broadcaster, LiveServer};
pub use pipeline::{Demo, OutputKind, Pipeline, PipelineConfig};
