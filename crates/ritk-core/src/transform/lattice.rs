//! Lattice bookkeeping shared by free-form transformations.

use serde::{Serialize, Deserialize};
use crate::spatial::{Point3, Vector3};

/// Maximum number of fixed-point iterations used by iterative inverses.
pub const INVERSE_MAX_ITERATIONS: usize = 100;

/// Residual below which an iterative inverse is considered converged.
pub const INVERSE_TOLERANCE: f64 = 1e-6;

/// Number of control points along each lattice axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatticeExtent {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Temporal control points; 1 for a static deformation.
    pub nt: usize,
}

impl LatticeExtent {
    /// Static lattice of `nx × ny × nz` control points.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz, nt: 1 }
    }

    /// Lattice with `nt` temporal control points.
    pub fn with_frames(mut self, nt: usize) -> Self {
        self.nt = nt;
        self
    }

    /// Extent along spatial axis `axis` (0 = x).
    pub fn spatial(&self, axis: usize) -> usize {
        match axis {
            0 => self.nx,
            1 => self.ny,
            _ => self.nz,
        }
    }

    /// Control points in one temporal frame.
    pub fn points_per_frame(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Total number of control points.
    pub fn len(&self) -> usize {
        self.points_per_frame() * self.nt
    }

    /// True when any axis has no control points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of a spatial control point, x fastest.
    pub fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.ny + j) * self.nx + i
    }
}

/// Activity flag of a control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlPointStatus {
    /// Free to move during registration.
    #[default]
    Active,
    /// Held fixed during registration.
    Passive,
}

/// Cubic B-spline basis weights for a fractional offset `u` in `[0, 1)`.
pub fn cubic_bspline_weights(u: f64) -> [f64; 4] {
    let u2 = u * u;
    let u3 = u2 * u;
    let one_minus_u = 1.0 - u;
    [
        one_minus_u * one_minus_u * one_minus_u / 6.0,
        (3.0 * u3 - 6.0 * u2 + 4.0) / 6.0,
        (-3.0 * u3 + 3.0 * u2 + 3.0 * u + 1.0) / 6.0,
        u3 / 6.0,
    ]
}

/// Invert `x -> base(x) + displacement(x)` by fixed-point iteration.
///
/// `base_inverse` undoes the non-displacement part; `displacement` is the
/// field added on top of it.
pub fn invert_by_fixed_point<F, G>(target: &Point3, base_inverse: F, displacement: G) -> Option<Point3>
where
    F: Fn(&Point3) -> Point3,
    G: Fn(&Point3) -> Vector3,
{
    let mut estimate = base_inverse(target);
    for _ in 0..INVERSE_MAX_ITERATIONS {
        if !estimate.is_finite() {
            return None;
        }
        let next = base_inverse(&(*target - displacement(&estimate)));
        let step = next.distance(&estimate);
        estimate = next;
        if step < INVERSE_TOLERANCE {
            return estimate.is_finite().then_some(estimate);
        }
    }
    None
}
