use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::region::Rect;
use crate::dataset::sample::{Dataset, LabelDomain, Sample};
use crate::error::{Error, Result};
use crate::fractal::classifier::FractalKind;
use crate::fractal::complex::ComplexPoint;

/// Radius of the disc labelled `1` by the circle demo.
pub const CIRCLE_RADIUS: f64 = 0.5;

/// How samples are drawn and labelled.
///
/// The three geometric modes draw 2-D points from the region; `Regression`
/// ignores the region and produces unstructured vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DatasetMode {
    /// Features uniform in `[-1, 1)^dim`, label uniform in `[0, 1)`.
    Regression { dim: usize },
    /// Label 1 iff the point lies strictly inside the circle of radius 0.5.
    Circle,
    Mandelbrot { max_iter: u32 },
    Julia { c: ComplexPoint, max_iter: u32 },
}

impl DatasetMode {
    pub fn dim(&self) -> usize {
        match self {
            DatasetMode::Regression { dim } => *dim,
            _ => 2,
        }
    }

    pub fn label_domain(&self) -> LabelDomain {
        match self {
            DatasetMode::Regression { .. } => LabelDomain::Real,
            _ => LabelDomain::Binary,
        }
    }

    /// True for the modes whose samples are points in the region, i.e. the
    /// ones that can be rendered on a grid.
    pub fn is_planar(&self) -> bool {
        !matches!(self, DatasetMode::Regression { .. })
    }

    /// Julia parameter, if any.
    pub fn parameter(&self) -> Option<ComplexPoint> {
        match self {
            DatasetMode::Julia { c, .. } => Some(*c),
            _ => None,
        }
    }

    /// Label for a planar point. `None` for `Regression`, whose labels are
    /// random rather than a function of the point.
    pub fn label_point(&self, p: ComplexPoint) -> Option<f64> {
        let inside = match *self {
            DatasetMode::Regression { .. } => return None,
            DatasetMode::Circle => p.norm_sqr() < CIRCLE_RADIUS * CIRCLE_RADIUS,
            DatasetMode::Mandelbrot { max_iter } => FractalKind::Mandelbrot.classify(p, max_iter),
            DatasetMode::Julia { c, max_iter } => FractalKind::Julia { c }.classify(p, max_iter),
        };
        Some(if inside { 1.0 } else { 0.0 })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatasetMode::Regression { .. } => "regression",
            DatasetMode::Circle => "circle",
            DatasetMode::Mandelbrot { .. } => "mandelbrot",
            DatasetMode::Julia { .. } => "julia",
        }
    }
}

/// Draws `n` i.i.d. samples and labels them according to `mode`.
pub fn generate<R: Rng + ?Sized>(n: usize, region: &Rect, mode: DatasetMode, rng: &mut R) -> Result<Dataset> {
    if mode.dim() == 0 {
        return Err(Error::InvalidConfig("sample dimension must be at least 1".into()));
    }

    let samples = (0..n)
        .map(|_| match mode {
            DatasetMode::Regression { dim } => {
                let features = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
                Sample::new(features, rng.gen::<f64>())
            }
            _ => {
                let p = region.sample(rng);
                let label = mode.label_point(p).unwrap_or_default();
                Sample::new(p.to_vec(), label)
            }
        })
        .collect();

    Dataset::new(mode.dim(), mode.label_domain(), samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::classifier::classify;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generates_exact_count_and_dimension() {
        let mut rng = StdRng::seed_from_u64(1);
        let modes = [
            DatasetMode::Regression { dim: 5 },
            DatasetMode::Circle,
            DatasetMode::Mandelbrot { max_iter: 50 },
            DatasetMode::Julia { c: ComplexPoint::new(-0.8, 0.156), max_iter: 50 },
        ];
        for mode in modes {
            let ds = generate(300, &Rect::mandelbrot(), mode, &mut rng).unwrap();
            assert_eq!(ds.len(), 300);
            assert_eq!(ds.dim(), mode.dim());
            assert!(ds.samples().iter().all(|s| s.features.len() == mode.dim()));
            assert!(ds.samples().iter().all(|s| mode.label_domain().contains(s.label)));
        }
    }

    #[test]
    fn test_mandelbrot_labels_match_classifier() {
        let mut rng = StdRng::seed_from_u64(2);
        let mode = DatasetMode::Mandelbrot { max_iter: 50 };
        let ds = generate(500, &Rect::mandelbrot(), mode, &mut rng).unwrap();
        for s in ds.samples() {
            let p = ComplexPoint::new(s.features[0], s.features[1]);
            assert_eq!(s.label == 1.0, classify(p, None, 50));
            assert!(Rect::mandelbrot().contains(p));
        }
        // The framed region holds both classes.
        assert!(ds.samples().iter().any(|s| s.label == 1.0));
        assert!(ds.samples().iter().any(|s| s.label == 0.0));
    }

    #[test]
    fn test_circle_labels() {
        let mode = DatasetMode::Circle;
        assert_eq!(mode.label_point(ComplexPoint::new(0.1, 0.1)), Some(1.0));
        assert_eq!(mode.label_point(ComplexPoint::new(0.5, 0.0)), Some(0.0));
        assert_eq!(mode.label_point(ComplexPoint::new(-0.9, 0.9)), Some(0.0));
    }

    #[test]
    fn test_regression_ignores_region_and_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let ds = generate(200, &Rect::mandelbrot(), DatasetMode::Regression { dim: 3 }, &mut rng).unwrap();
        for s in ds.samples() {
            assert!(s.features.iter().all(|x| (-1.0..1.0).contains(x)));
            assert!((0.0..1.0).contains(&s.label));
        }
        assert_eq!(ds.domain(), LabelDomain::Real);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = generate(10, &Rect::unit_square(), DatasetMode::Regression { dim: 0 }, &mut rng);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let mode = DatasetMode::Julia { c: ComplexPoint::new(-0.8, 0.156), max_iter: 50 };
        let a = generate(50, &Rect::julia(), mode, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate(50, &Rect::julia(), mode, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mode_metadata() {
        assert!(DatasetMode::Circle.is_planar());
        assert!(!DatasetMode::Regression { dim: 2 }.is_planar());
        let c = ComplexPoint::new(0.3, 0.5);
        assert_eq!(DatasetMode::Julia { c, max_iter: 10 }.parameter(), Some(c));
        assert_eq!(DatasetMode::Mandelbrot { max_iter: 10 }.parameter(), None);
        assert_eq!(DatasetMode::Mandelbrot { max_iter: 10 }.name(), "mandelbrot");
    }
}
