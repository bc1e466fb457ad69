use fractal_nn::dataset::{generate, generate_grid, DatasetMode, LabelDomain, Rect};
use fractal_nn::fractal::{classify, ComplexPoint};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAX_ITER: u32 = 50;

#[test]
fn known_mandelbrot_points() {
    assert!(classify(ComplexPoint::new(-1.0, 0.0), None, MAX_ITER));
    assert!(!classify(ComplexPoint::new(1.0, 1.0), None, MAX_ITER));
    assert!(classify(ComplexPoint::ZERO, None, MAX_ITER));
}

#[test]
fn zero_iterations_classify_everything_inside() {
    for p in [ComplexPoint::new(5.0, 5.0), ComplexPoint::new(-2.0, 0.3)] {
        assert!(classify(p, None, 0));
        assert!(classify(p, Some(ComplexPoint::new(-0.8, 0.156)), 0));
    }
}

#[test]
fn mandelbrot_dataset_labels_match_classifier() {
    let region = Rect::mandelbrot();
    let mode = DatasetMode::Mandelbrot { max_iter: MAX_ITER };
    let data = generate(500, &region, mode, &mut StdRng::seed_from_u64(42)).unwrap();

    assert_eq!(data.len(), 500);
    assert_eq!(data.dim(), 2);
    assert_eq!(data.domain(), LabelDomain::Binary);
    for s in data.samples() {
        let p = ComplexPoint::new(s.features[0], s.features[1]);
        assert!(region.contains(p));
        let inside = classify(p, None, MAX_ITER);
        assert_eq!(s.label, if inside { 1.0 } else { 0.0 });
    }
    // The region frames the set, so both classes show up.
    let positives = data.labels().iter().filter(|&&y| y == 1.0).count();
    assert!(positives > 0 && positives < 500);
}

#[test]
fn malformed_region_fails_before_generation() {
    assert!(Rect::new(1.0, -2.5, -1.0, 1.0).is_err());
    assert!(Rect::new(-2.5, 1.0, 1.0, 1.0).is_err());
}

#[test]
fn grid_over_default_region() {
    let region = Rect::mandelbrot();
    let grid = generate_grid(60, &region);
    assert_eq!(grid.len(), 3600);
    assert_eq!(grid[0], ComplexPoint::new(-2.5, -1.0));
    let last = grid[grid.len() - 1];
    assert!(last.re < 1.0 && last.im < 1.0);
}
