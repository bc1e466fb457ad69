use crate::dataset::sample::Dataset;
use crate::error::Result;
use crate::train::epoch_record::EpochRecord;
use crate::train::fit_config::FitConfig;

/// Inference on a model's current weights.
///
/// Must be usable between epochs, while `fit` is still running.
pub trait Predictor {
    /// One scalar prediction per input, in input order.
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Receives every completed epoch.
///
/// `fit` does not start epoch `k + 1` until `on_epoch_end` for epoch `k`
/// has returned. An `Err` aborts training and is returned from `fit`.
pub trait EpochObserver {
    fn on_epoch_end(&mut self, record: &EpochRecord, model: &dyn Predictor) -> Result<()>;
}

/// Something that can be fitted to a dataset and queried mid-training.
pub trait TrainingHarness: Predictor {
    fn fit(
        &mut self,
        train: &Dataset,
        validation: Option<&Dataset>,
        config: &FitConfig,
        observer: &mut dyn EpochObserver,
    ) -> Result<()>;
}

/// Observer that ignores every epoch.
pub struct NoopObserver;

impl EpochObserver for NoopObserver {
    fn on_epoch_end(&mut self, _record: &EpochRecord, _model: &dyn Predictor) -> Result<()> {
        Ok(())
    }
}

impl<F> EpochObserver for F
where
    F: FnMut(&EpochRecord, &dyn Predictor) -> Result<()>,
{
    fn on_epoch_end(&mut self, record: &EpochRecord, model: &dyn Predictor) -> Result<()> {
        self(record, model)
    }
}
