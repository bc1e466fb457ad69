use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// A point on the complex plane. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexPoint {
    pub re: f64,
    pub im: f64,
}

impl ComplexPoint {
    pub const ZERO: ComplexPoint = ComplexPoint { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> ComplexPoint {
        ComplexPoint { re, im }
    }

    /// `(a, b)² = (a² − b², 2ab)`
    pub fn square(self) -> ComplexPoint {
        ComplexPoint {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }

    /// Squared modulus `re² + im²`; compared against 4 to avoid a sqrt.
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn to_vec(self) -> Vec<f64> {
        vec![self.re, self.im]
    }
}

impl Add for ComplexPoint {
    type Output = ComplexPoint;

    fn add(self, rhs: Self) -> Self::Output {
        ComplexPoint {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Mul for ComplexPoint {
    type Output = ComplexPoint;

    fn mul(self, rhs: Self) -> Self::Output {
        ComplexPoint {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}
