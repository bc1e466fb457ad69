use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::layers::dense::{Layer, LayerCache, LayerGrads};
use crate::network::spec::NetworkSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn from_spec<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .layer_shapes()
            .into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation, rng))
            .collect();
        Ok(Network { layers })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size).unwrap_or(0)
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(Error::Shape { expected: self.input_size(), actual: input.len() });
        }
        Ok(())
    }

    /// Forward pass on the current weights without touching them.
    pub fn infer(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.infer(&current);
        }
        Ok(current)
    }

    /// Forward pass keeping every layer's cache for `backward`.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<LayerCache>> {
        self.check_input(input)?;
        let mut caches: Vec<LayerCache> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let cache = match caches.last() {
                Some(prev) => layer.forward(&prev.output),
                None => layer.forward(input),
            };
            caches.push(cache);
        }
        Ok(caches)
    }

    /// Backpropagates `output_delta` (∂L/∂output) and accumulates every
    /// layer's gradients into `grads`.
    pub fn backward(&self, input: &[f64], caches: &[LayerCache], output_delta: Vec<f64>, grads: &mut [LayerGrads]) {
        let mut delta = output_delta;
        for i in (0..self.layers.len()).rev() {
            let layer_input = if i == 0 { input } else { caches[i - 1].output.as_slice() };
            delta = self.layers[i].backward(&caches[i], layer_input, &delta, &mut grads[i]);
        }
    }

    pub fn zero_grads(&self) -> Vec<LayerGrads> {
        self.layers.iter().map(LayerGrads::zeros_like).collect()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }
}
