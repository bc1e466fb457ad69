use crate::layers::dense::{Layer, LayerGrads};
use crate::optim::Optimizer;

/// Adam with bias-corrected step size.
///
/// Moment buffers are laid out like the layers' parameters: for each layer
/// the weights first, then the biases. They are allocated on the first step.
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    t: u64,
    m: Vec<Vec<f64>>,
    v: Vec<Vec<f64>>,
}

impl Adam {
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Adam {
        Adam { learning_rate, beta1, beta2, epsilon, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Adam with the usual defaults (β1 = 0.9, β2 = 0.999, ε = 1e-8).
    pub fn default_params(learning_rate: f64) -> Adam {
        Adam::new(learning_rate, 0.9, 0.999, 1e-8)
    }

    fn ensure_moments(&mut self, layers: &[Layer]) {
        if self.m.len() != layers.len() {
            self.m = layers.iter().map(|l| vec![0.0; l.parameter_count()]).collect();
            self.v = self.m.clone();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, layers: &mut [Layer], grads: &[LayerGrads]) {
        self.ensure_moments(layers);
        self.t += 1;

        let lr_t = self.learning_rate
            * ((1.0 - self.beta2.powi(self.t as i32)).sqrt()
                / (1.0 - self.beta1.powi(self.t as i32)));
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);

        for (i, (layer, g)) in layers.iter_mut().zip(grads).enumerate() {
            let params = layer.weights.data.iter_mut().chain(layer.biases.iter_mut());
            let grad = g.weights.data.iter().chain(g.biases.iter());
            let moments = self.m[i].iter_mut().zip(self.v[i].iter_mut());

            for ((p, &gr), (m, v)) in params.zip(grad).zip(moments) {
                *m = beta1 * *m + (1.0 - beta1) * gr;
                *v = beta2 * *v + (1.0 - beta2) * gr * gr;
                *p -= lr_t * *m / (v.sqrt() + eps);
            }
        }
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
