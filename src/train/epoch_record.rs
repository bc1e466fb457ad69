use serde::{Serialize, Deserialize};

use crate::loss::loss_type::MetricKind;

/// Loss and metric measured over one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f64,
    pub metric: f64,
}

/// Statistics of one completed epoch.
///
/// Produced by the harness once per epoch and handed to the observer by
/// reference; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    pub metric_kind: MetricKind,
    /// Mean loss and metric over the epoch's training pass.
    pub train: Evaluation,
    /// Held-out figures, measured after the epoch's last update.
    pub validation: Option<Evaluation>,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochRecord {
    pub fn loss(&self) -> f64 {
        self.train.loss
    }

    pub fn metric(&self) -> f64 {
        self.train.metric
    }

    /// `Epoch 3/20 - Loss: 0.4123 - Accuracy: 0.8810`
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Epoch {}/{} - Loss: {:.4} - {}: {:.4}",
            self.epoch,
            self.total_epochs,
            self.train.loss,
            self.metric_kind.label(),
            self.train.metric
        );
        if let Some(val) = self.validation {
            line.push_str(&format!(
                " - Val loss: {:.4} - Val {}: {:.4}",
                val.loss,
                self.metric_kind.label(),
                val.metric
            ));
        }
        line
    }
}
