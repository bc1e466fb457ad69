use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::loss::loss_type::{LossType, MetricKind};

/// One dense layer of a topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(size: usize, activation: ActivationFunction) -> LayerSpec {
        LayerSpec { size, activation }
    }
}

/// A serializable feed-forward topology plus the loss it trains against and
/// the metric it reports.
///
/// Layer input sizes are implied: the first layer reads `input_size`
/// features, every later one reads the previous layer's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
    pub metric: MetricKind,
}

impl NetworkSpec {
    /// `(size, input_size, activation)` for every layer, in order.
    pub fn layer_shapes(&self) -> Vec<(usize, usize, ActivationFunction)> {
        let mut fan_in = self.input_size;
        self.layers
            .iter()
            .map(|l| {
                let shape = (l.size, fan_in, l.activation);
                fan_in = l.size;
                shape
            })
            .collect()
    }

    /// Rejects topologies the harness cannot train: no layers, a zero-width
    /// layer, or an output wider than the single scalar every dataset label is.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::InvalidConfig("network input size must be at least 1".into()));
        }
        if self.layers.iter().any(|l| l.size == 0) {
            return Err(Error::InvalidConfig("every layer needs at least one unit".into()));
        }
        match self.layers.last() {
            None => Err(Error::InvalidConfig("network has no layers".into())),
            Some(out) if out.size != 1 => Err(Error::InvalidConfig(format!(
                "output layer must have exactly 1 unit, got {}",
                out.size
            ))),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(layers: Vec<LayerSpec>) -> NetworkSpec {
        NetworkSpec {
            input_size: 2,
            layers,
            loss: LossType::BinaryCrossEntropy,
            metric: MetricKind::Accuracy,
        }
    }

    #[test]
    fn test_layer_shapes_chain_fan_in() {
        let s = spec(vec![
            LayerSpec::new(16, ActivationFunction::ReLU),
            LayerSpec::new(8, ActivationFunction::ReLU),
            LayerSpec::new(1, ActivationFunction::Sigmoid),
        ]);
        assert_eq!(
            s.layer_shapes(),
            vec![
                (16, 2, ActivationFunction::ReLU),
                (8, 16, ActivationFunction::ReLU),
                (1, 8, ActivationFunction::Sigmoid),
            ]
        );
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_topologies() {
        assert!(spec(vec![]).validate().is_err());
        assert!(spec(vec![LayerSpec::new(2, ActivationFunction::Sigmoid)]).validate().is_err());
        assert!(spec(vec![
            LayerSpec::new(0, ActivationFunction::ReLU),
            LayerSpec::new(1, ActivationFunction::Sigmoid),
        ])
        .validate()
        .is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let s = spec(vec![LayerSpec::new(1, ActivationFunction::Sigmoid)]);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"binary_cross_entropy\""));
        assert_eq!(serde_json::from_str::<NetworkSpec>(&json).unwrap(), s);
    }
}
