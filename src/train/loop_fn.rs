use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::dataset::sample::Dataset;
use crate::error::{Error, Result};
use crate::loss::loss_type::{LossType, MetricKind};
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::optim::{Optimizer, OptimizerKind};
use crate::train::epoch_record::{EpochRecord, Evaluation};
use crate::train::fit_config::FitConfig;
use crate::train::harness::{EpochObserver, Predictor, TrainingHarness};

/// A compiled feed-forward network: topology, loss, metric and optimizer.
///
/// This is the crate's own `TrainingHarness`.
pub struct Sequential {
    network: Network,
    loss: LossType,
    metric: MetricKind,
    optimizer: Box<dyn Optimizer>,
    rng: StdRng,
}

impl Sequential {
    /// Builds the network described by `spec` and pairs it with `optimizer`.
    /// `rng` seeds both weight initialization and per-epoch shuffling.
    pub fn compile(spec: &NetworkSpec, optimizer: OptimizerKind, mut rng: StdRng) -> Result<Sequential> {
        let network = Network::from_spec(spec, &mut rng)?;
        debug!(parameters = network.parameter_count(), "compiled network");
        Ok(Sequential {
            network,
            loss: spec.loss,
            metric: spec.metric,
            optimizer: optimizer.build(),
            rng,
        })
    }

    /// Mean loss and metric over `data` without updating weights.
    pub fn evaluate(&self, data: &Dataset) -> Result<Evaluation> {
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let mut loss = 0.0;
        let mut metric = 0.0;
        for s in data.samples() {
            let output = self.network.infer(&s.features)?;
            loss += self.loss.loss(&output, &[s.label]);
            metric += self.metric.score(output[0], s.label);
        }
        let n = data.len() as f64;
        Ok(Evaluation { loss: loss / n, metric: metric / n })
    }

    /// One full pass of mini-batch updates. Returns the mean loss and metric
    /// of the outputs seen during the pass (pre-update, per batch).
    fn run_one_epoch(&mut self, train: &Dataset, batch_size: usize, shuffle: bool) -> Result<Evaluation> {
        let samples = train.samples();
        let n = samples.len();

        let mut indices: Vec<usize> = (0..n).collect();
        if shuffle {
            indices.shuffle(&mut self.rng);
        }

        let mut total_loss = 0.0;
        let mut total_metric = 0.0;
        let mut grads = self.network.zero_grads();

        for batch in indices.chunks(batch_size) {
            grads.iter_mut().for_each(|g| g.reset());

            for &idx in batch {
                let sample = &samples[idx];
                let expected = [sample.label];
                let caches = self.network.forward(&sample.features)?;
                let output = match caches.last() {
                    Some(c) => c.output.as_slice(),
                    None => return Err(Error::InvalidConfig("network has no layers".into())),
                };

                total_loss += self.loss.loss(output, &expected);
                total_metric += self.metric.score(output[0], sample.label);

                let delta = self.loss.derivative(output, &expected);
                self.network.backward(&sample.features, &caches, delta, &mut grads);
            }

            let inv_batch = 1.0 / batch.len() as f64;
            grads.iter_mut().for_each(|g| g.scale(inv_batch));
            self.optimizer.step(&mut self.network.layers, &grads);
        }

        Ok(Evaluation {
            loss: total_loss / n as f64,
            metric: total_metric / n as f64,
        })
    }

    fn check_dataset(&self, data: &Dataset) -> Result<()> {
        if data.dim() != self.network.input_size() {
            return Err(Error::Shape { expected: self.network.input_size(), actual: data.dim() });
        }
        Ok(())
    }
}

impl Predictor for Sequential {
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        inputs
            .iter()
            .map(|x| self.network.infer(x).map(|out| out[0]))
            .collect()
    }
}

impl TrainingHarness for Sequential {
    /// Trains for `config.epochs` epochs, reporting each one to `observer`
    /// before the next begins.
    ///
    /// Shape and emptiness problems are reported before the first epoch.
    /// An observer error stops training and is returned unchanged.
    fn fit(
        &mut self,
        train: &Dataset,
        validation: Option<&Dataset>,
        config: &FitConfig,
        observer: &mut dyn EpochObserver,
    ) -> Result<()> {
        config.validate()?;
        if train.is_empty() {
            return Err(Error::EmptyDataset);
        }
        self.check_dataset(train)?;
        let validation = match validation {
            Some(v) if !v.is_empty() => {
                self.check_dataset(v)?;
                Some(v)
            }
            _ => None,
        };

        for epoch in 1..=config.epochs {
            let t_start = Instant::now();

            let train_eval = self.run_one_epoch(train, config.batch_size, config.shuffle)?;
            let validation_eval = validation.map(|v| self.evaluate(v)).transpose()?;

            let record = EpochRecord {
                epoch,
                total_epochs: config.epochs,
                metric_kind: self.metric,
                train: train_eval,
                validation: validation_eval,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };

            observer.on_epoch_end(&record, &*self)?;
        }

        Ok(())
    }
}
