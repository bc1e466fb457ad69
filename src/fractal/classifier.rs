use serde::{Deserialize, Serialize};

use crate::fractal::complex::ComplexPoint;

/// Escape radius squared; `|z|² > 4` means the orbit diverges.
const ESCAPE_NORM_SQR: f64 = 4.0;

/// Which escape-time map a dataset is labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FractalKind {
    /// `z ← z² + point`, seeded at `z = 0`.
    Mandelbrot,
    /// `z ← z² + c`, seeded at `z = point`.
    Julia { c: ComplexPoint },
}

impl FractalKind {
    /// The fixed additive term, if this kind has one.
    pub fn parameter(&self) -> Option<ComplexPoint> {
        match self {
            FractalKind::Mandelbrot => None,
            FractalKind::Julia { c } => Some(*c),
        }
    }

    pub fn classify(&self, point: ComplexPoint, max_iter: u32) -> bool {
        classify(point, self.parameter(), max_iter)
    }
}

/// Iteration on which the orbit escaped, or `None` if it stayed bounded for
/// all `max_iter` steps.
///
/// With `parameter == None` this is the Mandelbrot map seeded at zero; with
/// `Some(c)` it is the Julia map for `c` seeded at `point`.
pub fn escape_iterations(point: ComplexPoint, parameter: Option<ComplexPoint>, max_iter: u32) -> Option<u32> {
    let (mut z, k) = match parameter {
        None => (ComplexPoint::ZERO, point),
        Some(c) => (point, c),
    };

    for i in 1..=max_iter {
        z = z.square() + k;
        if z.norm_sqr() > ESCAPE_NORM_SQR {
            return Some(i);
        }
    }
    None
}

/// Escape-time membership test.
///
/// Returns `true` iff the orbit survives all `max_iter` iterations. The
/// answer is an approximation that tightens as `max_iter` grows; with
/// `max_iter == 0` every point is (vacuously) a member.
pub fn classify(point: ComplexPoint, parameter: Option<ComplexPoint>, max_iter: u32) -> bool {
    escape_iterations(point, parameter, max_iter).is_none()
}
