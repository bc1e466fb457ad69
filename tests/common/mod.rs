use std::sync::{Arc, Mutex};

use fractal_nn::dataset::Dataset;
use fractal_nn::loss::MetricKind;
use fractal_nn::train::{EpochObserver, EpochRecord, Evaluation, FitConfig, Predictor, TrainingHarness};
use fractal_nn::Result;

/// Harness that trains nothing: it replays a fixed loss curve, one record
/// per epoch, and predicts `re + im` so frames can be checked against the
/// grid. Every call is appended to the shared `log`.
pub struct ScriptedHarness {
    pub losses: Vec<f64>,
    pub metric_kind: MetricKind,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl ScriptedHarness {
    pub fn new(losses: Vec<f64>, metric_kind: MetricKind) -> ScriptedHarness {
        ScriptedHarness { losses, metric_kind, log: Arc::default() }
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Predictor for ScriptedHarness {
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(inputs.iter().map(|x| x[0] + x[1]).collect())
    }
}

impl TrainingHarness for ScriptedHarness {
    fn fit(
        &mut self,
        _train: &Dataset,
        validation: Option<&Dataset>,
        config: &FitConfig,
        observer: &mut dyn EpochObserver,
    ) -> Result<()> {
        for epoch in 1..=config.epochs {
            let loss = self.losses[(epoch - 1) % self.losses.len()];
            let record = EpochRecord {
                epoch,
                total_epochs: config.epochs,
                metric_kind: self.metric_kind,
                train: Evaluation { loss, metric: 1.0 - loss },
                validation: validation.map(|_| Evaluation { loss: loss + 0.1, metric: 0.9 - loss }),
                elapsed_ms: 1,
            };
            self.log.lock().unwrap().push(format!("epoch {}", epoch));
            observer.on_epoch_end(&record, &*self)?;
        }
        Ok(())
    }
}
