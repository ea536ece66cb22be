//! B-Spline transform implementation.
//!
//! This module provides a cubic B-spline free-form deformation defined on a
//! regular control-point lattice, optionally sampled at several time points.

use crate::error::{CoreError, Result};
use crate::image::ImageMetadata;
use crate::spatial::{Point3, Vector3, Spacing3, Direction3};
use super::lattice::{
    cubic_bspline_weights, invert_by_fixed_point, ControlPointStatus, LatticeExtent,
};
use super::trait_::{FreeFormLevel, Transformation};

/// B-Spline Transform (Free-form deformation).
///
/// Uses a grid of control points to define a smooth displacement field.
/// The lattice geometry (origin, control-point spacing, orientation and the
/// temporal axis) reuses [`ImageMetadata`]: lattice coordinates play the role
/// of continuous indices.
///
/// For a lattice with several temporal control points the displacement is
/// interpolated linearly between the two nearest frames and evaluated at the
/// *after* time `t2`; `t1` does not enter the displacement.
#[derive(Debug, Clone)]
pub struct BSplineTransform {
    extent: LatticeExtent,
    geometry: ImageMetadata<3>,
    /// Control point displacements, x fastest, one block per temporal frame.
    coefficients: Vec<Vector3>,
    status: Vec<ControlPointStatus>,
    labels: Vec<i32>,
}

impl BSplineTransform {
    /// Create a new B-Spline transform.
    ///
    /// # Arguments
    /// * `extent` - Number of control points along x, y, z and t
    /// * `geometry` - Placement of the lattice in world space and time
    /// * `coefficients` - Control point displacements, `extent.len()` entries
    pub fn new(
        extent: LatticeExtent,
        geometry: ImageMetadata<3>,
        coefficients: Vec<Vector3>,
    ) -> Result<Self> {
        if extent.is_empty() {
            return Err(CoreError::invalid_lattice(format!(
                "every axis needs at least one control point, got {:?}",
                extent
            )));
        }
        if coefficients.len() != extent.len() {
            return Err(CoreError::CoefficientMismatch {
                expected: extent.len(),
                actual: coefficients.len(),
            });
        }
        let spatial = extent.points_per_frame();
        Ok(Self {
            extent,
            geometry,
            coefficients,
            status: vec![ControlPointStatus::Active; spatial],
            labels: vec![0; spatial],
        })
    }

    /// Create a lattice with zero displacement everywhere.
    pub fn identity(extent: LatticeExtent, geometry: ImageMetadata<3>) -> Result<Self> {
        Self::new(extent, geometry, vec![Vector3::zeros(); extent.len()])
    }

    /// Create a static, axis-aligned lattice spanning `physical_size` from `origin`.
    ///
    /// Control point spacing is `physical_size / (n - 1)` along each axis;
    /// axes with a single control point get unit spacing.
    pub fn spanning(
        grid_size: [usize; 3],
        origin: Point3,
        physical_size: [f64; 3],
    ) -> Result<Self> {
        let spacing = Spacing3::new(std::array::from_fn(|i| {
            if grid_size[i] > 1 {
                physical_size[i] / (grid_size[i] - 1) as f64
            } else {
                1.0
            }
        }));
        let geometry = ImageMetadata::new(origin, spacing, Direction3::identity())?;
        Self::identity(LatticeExtent::new(grid_size[0], grid_size[1], grid_size[2]), geometry)
    }

    /// Get the lattice geometry.
    pub fn geometry(&self) -> &ImageMetadata<3> {
        &self.geometry
    }

    /// Get all control point displacements.
    pub fn coefficients(&self) -> &[Vector3] {
        &self.coefficients
    }

    /// Displacement stored at a control point.
    pub fn coefficient(&self, i: usize, j: usize, k: usize, l: usize) -> Option<Vector3> {
        self.coefficient_index(i, j, k, l).map(|idx| self.coefficients[idx])
    }

    /// Set the displacement of a control point. Out-of-range indices are ignored.
    pub fn set_coefficient(&mut self, i: usize, j: usize, k: usize, l: usize, value: Vector3) {
        if let Some(idx) = self.coefficient_index(i, j, k, l) {
            self.coefficients[idx] = value;
        }
    }

    /// Set the same displacement on every control point.
    pub fn fill(&mut self, value: Vector3) {
        self.coefficients.iter_mut().for_each(|c| *c = value);
    }

    /// Set the activity flag of a control point.
    pub fn set_status(&mut self, i: usize, j: usize, k: usize, status: ControlPointStatus) {
        if let Some(idx) = self.spatial_index(i, j, k) {
            self.status[idx] = status;
        }
    }

    /// Set the label of a control point.
    pub fn set_label(&mut self, i: usize, j: usize, k: usize, label: i32) {
        if let Some(idx) = self.spatial_index(i, j, k) {
            self.labels[idx] = label;
        }
    }

    fn spatial_index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        let e = &self.extent;
        (i < e.nx && j < e.ny && k < e.nz).then(|| e.flat_index(i, j, k))
    }

    fn coefficient_index(&self, i: usize, j: usize, k: usize, l: usize) -> Option<usize> {
        if l >= self.extent.nt {
            return None;
        }
        self.spatial_index(i, j, k)
            .map(|idx| l * self.extent.points_per_frame() + idx)
    }

    /// Spatial B-spline evaluation of temporal frame `frame`.
    fn spatial_displacement(&self, lattice: &Point3, frame: usize) -> Vector3 {
        let e = self.extent;
        let mut base = [0i64; 3];
        let mut weights = [[0.0; 4]; 3];
        for axis in 0..3 {
            let floor = lattice[axis].floor();
            base[axis] = floor as i64 - 1;
            weights[axis] = cubic_bspline_weights(lattice[axis] - floor);
        }
        let clamp = |v: i64, n: usize| v.clamp(0, n as i64 - 1) as usize;
        let offset = frame * e.points_per_frame();

        let mut displacement = Vector3::zeros();
        for (c, wz) in weights[2].iter().enumerate() {
            let k = clamp(base[2] + c as i64, e.nz);
            for (b, wy) in weights[1].iter().enumerate() {
                let j = clamp(base[1] + b as i64, e.ny);
                for (a, wx) in weights[0].iter().enumerate() {
                    let i = clamp(base[0] + a as i64, e.nx);
                    let w = wx * wy * wz;
                    if w != 0.0 {
                        displacement += self.coefficients[offset + e.flat_index(i, j, k)] * w;
                    }
                }
            }
        }
        displacement
    }
}

impl Transformation for BSplineTransform {
    fn transform_point(&self, point: &Point3, _t1: f64, t2: f64) -> Point3 {
        *point + self.displacement(point, t2)
    }

    fn inverse_point(&self, point: &Point3, _t1: f64, t2: f64) -> Option<Point3> {
        invert_by_fixed_point(point, |p| *p, |p| self.displacement(p, t2))
    }

    fn as_free_form(&self) -> Option<&dyn FreeFormLevel> {
        Some(self)
    }
}

impl FreeFormLevel for BSplineTransform {
    fn lattice_extent(&self) -> LatticeExtent {
        self.extent
    }

    fn world_to_lattice(&self, point: &Point3) -> Point3 {
        self.geometry.world_to_index(point)
    }

    fn lattice_to_world(&self, lattice: &Point3) -> Point3 {
        self.geometry.index_to_world(lattice)
    }

    fn lattice_to_time(&self, frame: f64) -> f64 {
        self.geometry.temporal().frame_to_time(frame)
    }

    fn status(&self, i: usize, j: usize, k: usize) -> ControlPointStatus {
        self.spatial_index(i, j, k)
            .map(|idx| self.status[idx])
            .unwrap_or(ControlPointStatus::Passive)
    }

    fn label(&self, i: usize, j: usize, k: usize) -> i32 {
        self.spatial_index(i, j, k).map(|idx| self.labels[idx]).unwrap_or(0)
    }

    fn displacement(&self, point: &Point3, t: f64) -> Vector3 {
        let lattice = self.world_to_lattice(point);
        if !lattice.is_finite() {
            return Vector3::new([f64::NAN; 3]);
        }
        if self.extent.nt == 1 {
            return self.spatial_displacement(&lattice, 0);
        }

        let last = (self.extent.nt - 1) as f64;
        let frame = self.geometry.temporal().time_to_frame(t);
        let frame = if frame.is_finite() { frame.clamp(0.0, last) } else { 0.0 };
        let lower = frame.floor();
        let alpha = frame - lower;
        let d0 = self.spatial_displacement(&lattice, lower as usize);
        if alpha == 0.0 {
            return d0;
        }
        let d1 = self.spatial_displacement(&lattice, lower as usize + 1);
        d0 * (1.0 - alpha) + d1 * alpha
    }
}
