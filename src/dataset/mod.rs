pub mod region;
pub mod sample;
pub mod generator;
pub mod grid;

pub use region::Rect;
pub use sample::{Dataset, LabelDomain, Sample};
pub use generator::{generate, DatasetMode};
pub use grid::{generate_grid, Grid};
