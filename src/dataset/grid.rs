use crate::dataset::region::Rect;
use crate::fractal::complex::ComplexPoint;

/// Regular `resolution × resolution` lattice over a region, used only for
/// inference and rendering.
///
/// Points are row-major: row `i` fixes `im`, column `j` fixes `re`, and the
/// point at list index `i * resolution + j` is
/// `(re_start + j·Δre, im_start + i·Δim)` with `Δ = extent / resolution`.
/// Stepping is half-open, so the far edges are never reached exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    resolution: u32,
    region: Rect,
    points: Vec<ComplexPoint>,
}

impl Grid {
    pub fn new(resolution: u32, region: Rect) -> Grid {
        Grid { resolution, region, points: generate_grid(resolution, &region) }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn region(&self) -> &Rect {
        &self.region
    }

    pub fn points(&self) -> &[ComplexPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as 2-feature input vectors, in grid order.
    pub fn inputs(&self) -> Vec<Vec<f64>> {
        self.points.iter().map(|p| p.to_vec()).collect()
    }

    /// Coordinates as `[re, im]` pairs, the shape sent to viewers.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.re, p.im]).collect()
    }
}

/// Produces exactly `resolution²` lattice points in row-major order.
pub fn generate_grid(resolution: u32, region: &Rect) -> Vec<ComplexPoint> {
    let g = resolution as usize;
    let step_re = region.width() / resolution as f64;
    let step_im = region.height() / resolution as f64;

    let mut points = Vec::with_capacity(g * g);
    for i in 0..g {
        let im = region.im_start() + i as f64 * step_im;
        for j in 0..g {
            let re = region.re_start() + j as f64 * step_re;
            points.push(ComplexPoint::new(re, im));
        }
    }
    points
}
