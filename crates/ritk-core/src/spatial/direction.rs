//! Direction type for representing image and lattice orientation.

use nalgebra::SMatrix;
use super::Vector;
use serde::{Serialize, Deserialize};

/// Direction matrix representing axis orientation.
///
/// The direction matrix is a D×D matrix where column i is the direction of
/// the i-th index axis in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Build a direction matrix whose columns are the given axis vectors.
    pub fn from_axes(axes: [Vector<D>; D]) -> Self {
        let mut m = SMatrix::<f64, D, D>::zeros();
        for (c, axis) in axes.iter().enumerate() {
            for r in 0..D {
                m[(r, c)] = axis[r];
            }
        }
        Self(m)
    }

    /// Check if direction matrix is orthogonal (rotation or reflection).
    pub fn is_orthogonal(&self) -> bool {
        let product = self.0 * self.0.transpose();
        let identity = SMatrix::<f64, D, D>::identity();
        (0..D).all(|i| {
            (0..D).all(|j| (product[(i, j)] - identity[(i, j)]).abs() < 1e-6)
        })
    }

    /// Try to compute the inverse of the direction matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}

impl Direction<3> {
    /// Rotation about the z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self(SMatrix::<f64, 3, 3>::new(
            c, -s, 0.0,
            s, c, 0.0,
            0.0, 0.0, 1.0,
        ))
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Direction<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Direction3 = Direction<3>;
    type Vector3 = Vector<3>;

    #[test]
    fn test_rotation_is_orthogonal() {
        let rot = Direction3::rotation_z(std::f64::consts::FRAC_PI_2);
        assert!(rot.is_orthogonal());
        let v = rot * Vector3::new([1.0, 0.0, 0.0]);
        assert!((v[0]).abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_axes_roundtrip() {
        let axes = [
            Vector3::new([0.0, 1.0, 0.0]),
            Vector3::new([-1.0, 0.0, 0.0]),
            Vector3::new([0.0, 0.0, 1.0]),
        ];
        let d = Direction3::from_axes(axes);
        for (c, axis) in axes.iter().enumerate() {
            for r in 0..3 {
                assert_eq!(d[(r, c)], axis[r]);
            }
        }
        assert!(d.try_inverse().is_some());
    }

    #[test]
    fn test_singular_direction_has_no_inverse() {
        let d = Direction3::from_axes([Vector3::zeros(), Vector3::zeros(), Vector3::zeros()]);
        assert!(d.try_inverse().is_none());
        assert!(!d.is_orthogonal());
    }
}
