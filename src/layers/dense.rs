use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// Fully connected layer: `a = σ(x · W + b)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction,
}

/// Values a forward pass keeps for the matching backward pass.
#[derive(Debug, Clone)]
pub struct LayerCache {
    /// Pre-activation values (z = xW + b), needed for σ'(z).
    pub pre_activation: Vec<f64>,
    pub output: Vec<f64>,
}

/// Gradient accumulators shaped like one layer's parameters.
#[derive(Debug, Clone)]
pub struct LayerGrads {
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

impl LayerGrads {
    pub fn zeros_like(layer: &Layer) -> LayerGrads {
        LayerGrads {
            weights: Matrix::zeros(layer.input_size, layer.size),
            biases: vec![0.0; layer.size],
        }
    }

    pub fn reset(&mut self) {
        self.weights.fill(0.0);
        self.biases.iter_mut().for_each(|b| *b = 0.0);
    }

    pub fn scale(&mut self, factor: f64) {
        self.weights.scale(factor);
        self.biases.iter_mut().for_each(|b| *b *= factor);
    }
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, activation: ActivationFunction, rng: &mut R) -> Layer {
        let weights = if activation.prefers_he_init() {
            Matrix::he(input_size, size, rng)
        } else {
            Matrix::xavier(input_size, size, rng)
        };

        Layer {
            size,
            input_size,
            weights,
            biases: vec![0.0; size],
            activator: activation,
        }
    }

    fn pre_activation(&self, input: &[f64]) -> Vec<f64> {
        let mut z = self.weights.left_mul(input);
        for (zi, b) in z.iter_mut().zip(&self.biases) {
            *zi += b;
        }
        z
    }

    /// Inference-only forward pass.
    pub fn infer(&self, input: &[f64]) -> Vec<f64> {
        self.pre_activation(input)
            .into_iter()
            .map(|x| self.activator.function(x))
            .collect()
    }

    /// Training forward pass; the cache feeds `backward`.
    pub fn forward(&self, input: &[f64]) -> LayerCache {
        let pre_activation = self.pre_activation(input);
        let output = pre_activation.iter().map(|&x| self.activator.function(x)).collect();
        LayerCache { pre_activation, output }
    }

    /// Accumulates this layer's gradients into `grads` and returns ∂L/∂input.
    ///
    /// `output_delta` is ∂L/∂a for this layer (error in activation space).
    pub fn backward(&self, cache: &LayerCache, input: &[f64], output_delta: &[f64], grads: &mut LayerGrads) -> Vec<f64> {
        // δ = error ⊙ σ'(z)
        let delta: Vec<f64> = output_delta
            .iter()
            .zip(&cache.pre_activation)
            .map(|(e, &z)| e * self.activator.derivative(z))
            .collect();

        grads.weights.add_outer(input, &delta);
        for (gb, d) in grads.biases.iter_mut().zip(&delta) {
            *gb += d;
        }

        self.weights.mul_vec(&delta)
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.data.len() + self.biases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_layer(activation: ActivationFunction) -> Layer {
        Layer {
            size: 2,
            input_size: 2,
            weights: Matrix { rows: 2, cols: 2, data: vec![0.5, -0.25, 0.1, 0.4] },
            biases: vec![0.1, -0.2],
            activator: activation,
        }
    }

    #[test]
    fn test_infer_matches_forward_output() {
        let layer = fixed_layer(ActivationFunction::Tanh);
        let x = [0.3, -0.7];
        assert_eq!(layer.infer(&x), layer.forward(&x).output);
    }

    #[test]
    fn test_backward_matches_finite_difference() {
        let layer = fixed_layer(ActivationFunction::Sigmoid);
        let x = [0.3, -0.7];
        // L = sum(a), so ∂L/∂a = 1
        let loss = |l: &Layer| l.infer(&x).iter().sum::<f64>();

        let cache = layer.forward(&x);
        let mut grads = LayerGrads::zeros_like(&layer);
        let input_grad = layer.backward(&cache, &x, &[1.0, 1.0], &mut grads);

        let h = 1e-6;
        for idx in 0..4 {
            let mut plus = layer.clone();
            plus.weights.data[idx] += h;
            let mut minus = layer.clone();
            minus.weights.data[idx] -= h;
            let numeric = (loss(&plus) - loss(&minus)) / (2.0 * h);
            assert_relative_eq!(grads.weights.data[idx], numeric, epsilon = 1e-6);
        }

        let x_loss = |x: [f64; 2]| layer.infer(&x).iter().sum::<f64>();
        let numeric = (x_loss([0.3 + h, -0.7]) - x_loss([0.3 - h, -0.7])) / (2.0 * h);
        assert_relative_eq!(input_grad[0], numeric, epsilon = 1e-6);
    }

    #[test]
    fn test_grads_reset_and_scale() {
        let layer = fixed_layer(ActivationFunction::Identity);
        let mut grads = LayerGrads::zeros_like(&layer);
        let cache = layer.forward(&[1.0, 1.0]);
        layer.backward(&cache, &[1.0, 1.0], &[2.0, 2.0], &mut grads);
        assert_eq!(grads.biases, vec![2.0, 2.0]);
        grads.scale(0.5);
        assert_eq!(grads.biases, vec![1.0, 1.0]);
        grads.reset();
        assert!(grads.weights.data.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_new_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(5);
        let layer = Layer::new(16, 2, ActivationFunction::ReLU, &mut rng);
        assert_eq!(layer.weights.rows, 2);
        assert_eq!(layer.weights.cols, 16);
        assert_eq!(layer.parameter_count(), 48);
    }
}
