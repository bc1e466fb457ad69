/// Binary cross-entropy for a Sigmoid output layer.
pub struct BceLoss;

/// Keeps log() and the derivative's denominator away from zero.
const EPS: f64 = 1e-12;

impl BceLoss {
    /// Scalar BCE: -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum::<f64>() / n
    }

    /// Per-output gradient: (p - y) / ((p + ε) · (1 - p + ε)) / n
    ///
    /// Through a Sigmoid's σ'(z) = p(1 - p) this collapses to `p - y`.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| (p - y) / ((p + EPS) * (1.0 - p + EPS)) / n)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bce_confident_and_wrong() {
        assert!(BceLoss::loss(&[0.99], &[1.0]) < 0.02);
        assert!(BceLoss::loss(&[0.01], &[1.0]) > 4.0);
        assert_relative_eq!(BceLoss::loss(&[0.5], &[0.0]), std::f64::consts::LN_2, epsilon = 1e-9);
    }

    #[test]
    fn test_bce_times_sigmoid_slope_is_residual() {
        let p: f64 = 0.7;
        let d = BceLoss::derivative(&[p], &[1.0])[0];
        assert_relative_eq!(d * p * (1.0 - p), p - 1.0, epsilon = 1e-9);
    }
}
