use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fractal_nn::pipeline::{Demo, Outcome, OutputKind, OutputMode, Pipeline, PipelineConfig, DEFAULT_PORT};

/// Trains a small network on a synthetic dataset and shows its progress,
/// either as a PNG chart or live in the browser.
#[derive(Debug, Parser)]
#[command(name = "fractal-nn", version, about)]
struct Cli {
    /// Which demo dataset to learn
    #[arg(long, value_enum, default_value = "mandelbrot")]
    dataset: Demo,

    /// Progress output; defaults to `chart` for regression, `live` otherwise
    #[arg(long, value_enum)]
    output: Option<OutputKind>,

    /// Seed for data, initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Chart file for `--output chart`
    #[arg(long)]
    chart_path: Option<PathBuf>,

    /// Port of the live viewer
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let output = self.output.unwrap_or_else(|| self.dataset.default_output());
        let mut config = PipelineConfig::preset(self.dataset, output);
        config.seed = self.seed;
        match &mut config.output {
            OutputMode::Chart { path } => {
                if let Some(p) = self.chart_path {
                    *path = p;
                }
            }
            OutputMode::Live { port, .. } => *port = self.port,
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let demo = cli.dataset;
    let config = cli.into_config();
    info!(?demo, output = ?config.output.kind(), seed = ?config.seed, "starting run");

    let pipeline = Pipeline::new(config).context("invalid run configuration")?;
    match pipeline.run().context("training run failed")? {
        Outcome::Chart { path, epochs } => {
            info!(epochs, path = %path.display(), "training chart written");
        }
        Outcome::Live { server, epochs } => {
            info!(epochs, "training finished; still serving {} (Ctrl-C to quit)", server.url());
            server.join().context("live server stopped")?;
        }
    }
    Ok(())
}
