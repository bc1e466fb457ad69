use serde::{Serialize, Deserialize};

use crate::loss::bce::BceLoss;
use crate::loss::mse::MseLoss;

/// Selects which loss function the training loop uses.
///
/// - `Mse`: mean-squared error; pair with Identity or Sigmoid output.
/// - `BinaryCrossEntropy`: pair with a single Sigmoid output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    BinaryCrossEntropy,
}

impl LossType {
    pub fn loss(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Mse                => MseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
        }
    }

    pub fn derivative(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        match self {
            LossType::Mse                => MseLoss::derivative(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::derivative(predicted, expected),
        }
    }
}

/// The per-epoch quality figure reported next to the loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Fraction of samples whose output, thresholded at 0.5, matches the label.
    Accuracy,
    /// Mean squared error, regardless of the training loss.
    Mse,
}

impl MetricKind {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Accuracy => "Accuracy",
            MetricKind::Mse => "MSE",
        }
    }

    /// Contribution of one sample; the epoch figure is the mean of these.
    pub fn score(&self, predicted: f64, expected: f64) -> f64 {
        match self {
            MetricKind::Accuracy => {
                let class = if predicted >= 0.5 { 1.0 } else { 0.0 };
                if class == expected { 1.0 } else { 0.0 }
            }
            MetricKind::Mse => (predicted - expected).powi(2),
        }
    }
}
