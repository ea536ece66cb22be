//! Transformation traits.
//!
//! A transformation maps world points observed at time `t1` to world points
//! at time `t2`. Some transformations carry a free-form component; callers
//! discover it through the capability accessors instead of downcasting.

use std::fmt::Debug;
use crate::spatial::{Point3, Vector3};
use super::lattice::{ControlPointStatus, LatticeExtent};

/// Spatial transformation of 3D world points.
pub trait Transformation: Debug {
    /// Map a world point forward.
    fn transform_point(&self, point: &Point3, t1: f64, t2: f64) -> Point3;

    /// Solve for the point that maps onto `point`.
    ///
    /// Returns `None` when no finite preimage could be found.
    fn inverse_point(&self, point: &Point3, t1: f64, t2: f64) -> Option<Point3>;

    /// View this transformation as a multi-level free-form deformation.
    fn as_multi_level(&self) -> Option<&dyn MultiLevel> {
        None
    }

    /// View this transformation as a single free-form level.
    fn as_free_form(&self) -> Option<&dyn FreeFormLevel> {
        None
    }
}

/// One free-form deformation defined on a regular control-point lattice.
pub trait FreeFormLevel: Transformation {
    /// Number of control points along x, y, z and t.
    fn lattice_extent(&self) -> LatticeExtent;

    /// Map a world point to continuous lattice coordinates.
    fn world_to_lattice(&self, point: &Point3) -> Point3;

    /// Map continuous lattice coordinates to a world point.
    fn lattice_to_world(&self, lattice: &Point3) -> Point3;

    /// Time of a (possibly fractional) temporal lattice index.
    fn lattice_to_time(&self, frame: f64) -> f64;

    /// Activity flag of the control point at `(i, j, k)`.
    fn status(&self, i: usize, j: usize, k: usize) -> ControlPointStatus;

    /// Classification label of the control point at `(i, j, k)`.
    fn label(&self, i: usize, j: usize, k: usize) -> i32;

    /// Displacement contributed by this level at a world point and time.
    fn displacement(&self, point: &Point3, t: f64) -> Vector3;
}

/// Ordered stack of free-form levels, optionally preceded by a global part.
pub trait MultiLevel: Transformation {
    /// Number of free-form levels.
    fn level_count(&self) -> usize;

    /// Level `index`, coarsest first.
    fn level(&self, index: usize) -> Option<&dyn FreeFormLevel>;

    /// Finest level, if any.
    fn finest_level(&self) -> Option<&dyn FreeFormLevel> {
        self.level_count()
            .checked_sub(1)
            .and_then(|last| self.level(last))
    }

    /// Apply only the finest level's displacement.
    fn local_transform_point(&self, point: &Point3, t1: f64, t2: f64) -> Point3 {
        match self.finest_level() {
            Some(level) => level.transform_point(point, t1, t2),
            None => *point,
        }
    }

    /// Invert only the finest level's displacement.
    fn local_inverse_point(&self, point: &Point3, t1: f64, t2: f64) -> Option<Point3> {
        match self.finest_level() {
            Some(level) => level.inverse_point(point, t1, t2),
            None => Some(*point),
        }
    }
}
