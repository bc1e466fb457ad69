pub mod complex;
pub mod classifier;

pub use complex::ComplexPoint;
pub use classifier::{classify, escape_iterations, FractalKind};
