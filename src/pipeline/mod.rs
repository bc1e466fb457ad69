//! One parameterized run: dataset mode × output mode.

pub mod config;

pub use config::{Demo, OutputKind, OutputMode, PipelineConfig, DEFAULT_JULIA_C, DEFAULT_PORT, FRACTAL_MAX_ITER};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::dataset::generator::generate;
use crate::dataset::sample::Dataset;
use crate::error::{Error, Result};
use crate::report::chart::{ChartReporter, ChartSink, PngChart};
use crate::report::live::LiveReporter;
use crate::report::pacer::Pacer;
use crate::report::publisher::Publisher;
use crate::server::LiveServer;
use crate::train::harness::TrainingHarness;
use crate::train::loop_fn::Sequential;

/// Generated data, already split.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub train: Dataset,
    pub validation: Option<Dataset>,
}

/// How a finished run left things.
pub enum Outcome {
    Chart { path: PathBuf, epochs: usize },
    /// Training is over but the server keeps serving the final frame.
    Live { server: LiveServer, epochs: usize },
}

pub struct Pipeline {
    config: PipelineConfig,
    rng: StdRng,
}

impl Pipeline {
    /// Validates `config` up front, so a bad region or schedule fails before
    /// any data is generated.
    pub fn new(config: PipelineConfig) -> Result<Pipeline> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Pipeline { config, rng })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generates the dataset and takes the configured split.
    pub fn prepare(&mut self) -> Result<Prepared> {
        let cfg = &self.config;
        let data = generate(cfg.samples, &cfg.region, cfg.dataset, &mut self.rng)?;
        let prepared = match cfg.train_fraction {
            Some(fraction) => {
                let (train, validation) = data.split(fraction)?;
                Prepared { train, validation: Some(validation) }
            }
            None => Prepared { train: data, validation: None },
        };
        info!(
            dataset = cfg.dataset.name(),
            train = prepared.train.len(),
            validation = prepared.validation.as_ref().map_or(0, Dataset::len),
            "dataset ready"
        );
        Ok(prepared)
    }

    /// Builds the in-crate harness for the configured topology.
    pub fn compile(&mut self) -> Result<Sequential> {
        let rng = StdRng::seed_from_u64(self.rng.gen());
        Sequential::compile(&self.config.network, self.config.optimizer, rng)
    }

    /// Trains with a chart reporter and renders `sink` once, after the last
    /// epoch. A failed run renders nothing.
    pub fn run_chart<H, S>(&self, harness: &mut H, data: &Prepared, sink: S) -> Result<S>
    where
        H: TrainingHarness + ?Sized,
        S: ChartSink,
    {
        let mut reporter = ChartReporter::new(self.config.network.metric, sink);
        harness.fit(&data.train, data.validation.as_ref(), &self.config.fit, &mut reporter)?;
        reporter.finish()
    }

    /// Trains with a live reporter publishing to `publisher`, then publishes
    /// `done`. Returns the number of frames sent.
    pub fn run_live<H>(&self, harness: &mut H, data: &Prepared, publisher: Arc<dyn Publisher>) -> Result<usize>
    where
        H: TrainingHarness + ?Sized,
    {
        let (resolution, delay_ms, echo_samples) = match self.config.output {
            OutputMode::Live { resolution, delay_ms, echo_samples, .. } => (resolution, delay_ms, echo_samples),
            OutputMode::Chart { .. } => {
                return Err(Error::InvalidConfig("run is configured for chart output".into()));
            }
        };

        let mut reporter = LiveReporter::new(
            publisher,
            self.config.dataset,
            self.config.region,
            resolution,
            Pacer::new(Duration::from_millis(delay_ms)),
        )?;
        if echo_samples {
            reporter = reporter.with_samples(&data.train)?;
        }

        harness.fit(&data.train, data.validation.as_ref(), &self.config.fit, &mut reporter)?;
        reporter.finish()?;
        Ok(reporter.frames())
    }

    /// Full run with the in-crate harness and the configured output.
    pub fn run(mut self) -> Result<Outcome> {
        let data = self.prepare()?;
        let mut model = self.compile()?;
        let epochs = self.config.fit.epochs;

        match self.config.output.clone() {
            OutputMode::Chart { path } => {
                self.run_chart(&mut model, &data, PngChart::new(path.clone()))?;
                Ok(Outcome::Chart { path, epochs })
            }
            OutputMode::Live { port, .. } => {
                let server = LiveServer::start(port)?;
                info!("open {} to watch training", server.url());
                let publisher: Arc<dyn Publisher> = server.broadcaster();
                let epochs = self.run_live(&mut model, &data, publisher)?;
                Ok(Outcome::Live { server, epochs })
            }
        }
    }
}
