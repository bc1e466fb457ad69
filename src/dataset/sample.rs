use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which labels a dataset may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDomain {
    /// Labels are exactly 0.0 or 1.0.
    Binary,
    /// Any finite real.
    Real,
}

impl LabelDomain {
    pub fn contains(&self, label: f64) -> bool {
        match self {
            LabelDomain::Binary => label == 0.0 || label == 1.0,
            LabelDomain::Real => label.is_finite(),
        }
    }
}

/// One training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: f64,
}

impl Sample {
    pub fn new(features: Vec<f64>, label: f64) -> Sample {
        Sample { features, label }
    }
}

/// Ordered, fixed-dimension collection of samples.
///
/// Every sample has exactly `dim` features and a label inside `domain`;
/// `Dataset::new` refuses anything else, so the invariant holds for every
/// value of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    dim: usize,
    domain: LabelDomain,
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(dim: usize, domain: LabelDomain, samples: Vec<Sample>) -> Result<Dataset> {
        for (index, s) in samples.iter().enumerate() {
            if s.features.len() != dim {
                return Err(Error::Shape { expected: dim, actual: s.features.len() });
            }
            if !domain.contains(s.label) {
                return Err(Error::Label { index, value: s.label });
            }
        }
        Ok(Dataset { dim, domain, samples })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn domain(&self) -> LabelDomain {
        self.domain
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn inputs(&self) -> Vec<Vec<f64>> {
        self.samples.iter().map(|s| s.features.clone()).collect()
    }

    pub fn labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Positional split: the first `round(n * train_fraction)` samples train,
    /// the rest validate.
    ///
    /// No reshuffling happens here. Generation order is already random per
    /// sample, so the prefix is an unbiased draw; datasets from any other
    /// source must be shuffled by the caller first.
    pub fn split(self, train_fraction: f64) -> Result<(Dataset, Dataset)> {
        if !(train_fraction > 0.0 && train_fraction <= 1.0) {
            return Err(Error::InvalidSplit(train_fraction));
        }
        let n = self.samples.len();
        let n_train = ((n as f64 * train_fraction).round() as usize).min(n);

        let Dataset { dim, domain, mut samples } = self;
        let validation = samples.split_off(n_train);
        Ok((
            Dataset { dim, domain, samples },
            Dataset { dim, domain, samples: validation },
        ))
    }
}
