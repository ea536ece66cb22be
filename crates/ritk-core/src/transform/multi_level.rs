//! Multi-level free-form deformation.
//!
//! A global affine part followed by an ordered stack of B-spline levels:
//! T(x) = A(x) + sum_l D_l(x)

use crate::spatial::{Point3, Vector3};
use super::affine::AffineTransform;
use super::bspline::BSplineTransform;
use super::lattice::invert_by_fixed_point;
use super::trait_::{FreeFormLevel, MultiLevel, Transformation};

/// Multi-level transform (global affine plus local B-spline levels).
///
/// Levels are stored coarsest first; the last level is the finest.
#[derive(Debug, Clone)]
pub struct MultiLevelTransform {
    global: AffineTransform,
    levels: Vec<BSplineTransform>,
}

impl MultiLevelTransform {
    /// Create a new multi-level transform.
    ///
    /// # Arguments
    /// * `global` - The global transform applied before the local displacements
    /// * `levels` - Local levels, coarsest first
    pub fn new(global: AffineTransform, levels: Vec<BSplineTransform>) -> Self {
        Self { global, levels }
    }

    /// Append a finer level.
    pub fn push_level(&mut self, level: BSplineTransform) {
        self.levels.push(level);
    }

    /// Get the global part.
    pub fn global(&self) -> &AffineTransform {
        &self.global
    }

    /// Get the local levels.
    pub fn levels(&self) -> &[BSplineTransform] {
        &self.levels
    }

    fn total_displacement(&self, point: &Point3, t: f64) -> Vector3 {
        let mut total = Vector3::zeros();
        for level in &self.levels {
            total += level.displacement(point, t);
        }
        total
    }
}

impl Transformation for MultiLevelTransform {
    fn transform_point(&self, point: &Point3, _t1: f64, t2: f64) -> Point3 {
        self.global.apply(point) + self.total_displacement(point, t2)
    }

    fn inverse_point(&self, point: &Point3, _t1: f64, t2: f64) -> Option<Point3> {
        // A(x) + D(x) = y  =>  x = A^-1(y - D(x))
        invert_by_fixed_point(
            point,
            |p| self.global.apply_inverse(p),
            |p| self.total_displacement(p, t2),
        )
    }

    fn as_multi_level(&self) -> Option<&dyn MultiLevel> {
        Some(self)
    }
}

impl MultiLevel for MultiLevelTransform {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn level(&self, index: usize) -> Option<&dyn FreeFormLevel> {
        self.levels.get(index).map(|level| level as &dyn FreeFormLevel)
    }
}
