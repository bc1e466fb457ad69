use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fractal::complex::ComplexPoint;

/// Axis-aligned rectangle `[re_start, re_end) × [im_start, im_end)` on the
/// complex plane. Only constructible with valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    re_start: f64,
    re_end: f64,
    im_start: f64,
    im_end: f64,
}

impl Rect {
    /// Validates the bounds: every value finite and each start strictly
    /// below its end.
    pub fn new(re_start: f64, re_end: f64, im_start: f64, im_end: f64) -> Result<Rect> {
        let bounds = [re_start, re_end, im_start, im_end];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidRegion(format!(
                "bounds must be finite, got re [{}, {}], im [{}, {}]",
                re_start, re_end, im_start, im_end
            )));
        }
        if re_start >= re_end {
            return Err(Error::InvalidRegion(format!(
                "re_start ({}) must be below re_end ({})",
                re_start, re_end
            )));
        }
        if im_start >= im_end {
            return Err(Error::InvalidRegion(format!(
                "im_start ({}) must be below im_end ({})",
                im_start, im_end
            )));
        }
        Ok(Rect { re_start, re_end, im_start, im_end })
    }

    /// `re ∈ [-2.5, 1], im ∈ [-1, 1]`, framing the Mandelbrot set.
    pub fn mandelbrot() -> Rect {
        Rect { re_start: -2.5, re_end: 1.0, im_start: -1.0, im_end: 1.0 }
    }

    pub fn julia() -> Rect {
        Rect { re_start: -1.6, re_end: 1.6, im_start: -1.0, im_end: 1.0 }
    }

    /// The `[-1, 1]²` square used by the circle demo.
    pub fn unit_square() -> Rect {
        Rect { re_start: -1.0, re_end: 1.0, im_start: -1.0, im_end: 1.0 }
    }

    pub fn re_start(&self) -> f64 { self.re_start }
    pub fn re_end(&self) -> f64 { self.re_end }
    pub fn im_start(&self) -> f64 { self.im_start }
    pub fn im_end(&self) -> f64 { self.im_end }

    pub fn width(&self) -> f64 {
        self.re_end - self.re_start
    }

    pub fn height(&self) -> f64 {
        self.im_end - self.im_start
    }

    /// Draws one point uniformly from the rectangle.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ComplexPoint {
        ComplexPoint::new(
            rng.gen_range(self.re_start..self.re_end),
            rng.gen_range(self.im_start..self.im_end),
        )
    }

    pub fn contains(&self, p: ComplexPoint) -> bool {
        (self.re_start..self.re_end).contains(&p.re) && (self.im_start..self.im_end).contains(&p.im)
    }
}

// Deserialization goes through `Rect::new` so bounds read from JSON are
// validated like any other.
impl<'de> Deserialize<'de> for Rect {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            re_start: f64,
            re_end: f64,
            im_start: f64,
            im_end: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Rect::new(raw.re_start, raw.re_end, raw.im_start, raw.im_end)
            .map_err(serde::de::Error::custom)
    }
}
