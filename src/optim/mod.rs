use serde::{Deserialize, Serialize};

use crate::layers::dense::{Layer, LayerGrads};

pub mod sgd;
pub mod adam;

pub use sgd::Sgd;
pub use adam::Adam;

/// Updates a network's parameters from averaged mini-batch gradients.
pub trait Optimizer: Send {
    /// Applies one update. `grads[i]` belongs to `layers[i]`.
    fn step(&mut self, layers: &mut [Layer], grads: &[LayerGrads]);

    fn learning_rate(&self) -> f64;
}

/// Serializable optimizer choice, turned into an `Optimizer` at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd { learning_rate: f64 },
    Adam { learning_rate: f64 },
}

impl OptimizerKind {
    pub fn build(&self) -> Box<dyn Optimizer> {
        match *self {
            OptimizerKind::Sgd { learning_rate } => Box::new(Sgd::new(learning_rate)),
            OptimizerKind::Adam { learning_rate } => Box::new(Adam::default_params(learning_rate)),
        }
    }
}
