use crate::layers::dense::{Layer, LayerGrads};
use crate::optim::Optimizer;

/// Plain stochastic gradient descent.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, layers: &mut [Layer], grads: &[LayerGrads]) {
        for (layer, g) in layers.iter_mut().zip(grads) {
            for (w, gw) in layer.weights.data.iter_mut().zip(&g.weights.data) {
                *w -= self.learning_rate * gw;
            }
            for (b, gb) in layer.biases.iter_mut().zip(&g.biases) {
                *b -= self.learning_rate * gb;
            }
        }
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
