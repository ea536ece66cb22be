//! Affine transform implementation.
//!
//! Global linear-plus-translation mapping. Affine transforms have no
//! free-form component and expose none of the lattice capabilities.

use nalgebra::Matrix3;
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Point3, Vector3};
use super::trait_::Transformation;

/// Affine Transform.
///
/// y = A * x + t
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix3<f64>,
    translation: Vector3,
    inverse_matrix: Matrix3<f64>,
}

impl AffineTransform {
    /// Create a new affine transform from a linear part and a translation.
    pub fn new(matrix: Matrix3<f64>, translation: Vector3) -> Result<Self> {
        let inverse_matrix = matrix.try_inverse().ok_or(CoreError::SingularAffine)?;
        Ok(Self {
            matrix,
            translation,
            inverse_matrix,
        })
    }

    /// The identity mapping.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
            translation: Vector3::zeros(),
            inverse_matrix: Matrix3::identity(),
        }
    }

    /// A pure translation.
    pub fn translation(offset: Vector3) -> Self {
        Self {
            translation: offset,
            ..Self::identity()
        }
    }

    /// Get the linear part.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Get the translation.
    pub fn offset(&self) -> &Vector3 {
        &self.translation
    }

    /// Apply the mapping (time independent).
    pub fn apply(&self, point: &Point3) -> Point3 {
        Point(self.matrix * point.0 + self.translation.0)
    }

    /// Apply the inverse mapping.
    pub fn apply_inverse(&self, point: &Point3) -> Point3 {
        Point(self.inverse_matrix * (point.0 - self.translation.0))
    }
}

impl Transformation for AffineTransform {
    fn transform_point(&self, point: &Point3, _t1: f64, _t2: f64) -> Point3 {
        self.apply(point)
    }

    fn inverse_point(&self, point: &Point3, _t1: f64, _t2: f64) -> Option<Point3> {
        let result = self.apply_inverse(point);
        result.is_finite().then_some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_roundtrip() {
        let transform = AffineTransform::translation(Vector3::new([1.0, 2.0, 3.0]));
        let p = Point3::new([0.5, 0.5, 0.5]);
        let moved = transform.transform_point(&p, 0.0, 0.0);
        assert_eq!(moved, Point3::new([1.5, 2.5, 3.5]));
        let back = transform.inverse_point(&moved, 0.0, 0.0).unwrap();
        assert!(back.distance(&p) < 1e-12);
    }

    #[test]
    fn test_affine_has_no_free_form_capability() {
        let transform = AffineTransform::identity();
        assert!(transform.as_free_form().is_none());
        assert!(transform.as_multi_level().is_none());
    }

    #[test]
    fn test_singular_affine_rejected() {
        let result = AffineTransform::new(Matrix3::zeros(), Vector3::zeros());
        assert_eq!(result, Err(CoreError::SingularAffine));
    }

    #[test]
    fn test_scaling_inverse() {
        let transform = AffineTransform::new(
            Matrix3::new(2.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 1.0),
            Vector3::new([1.0, 0.0, 0.0]),
        ).unwrap();
        let p = Point3::new([3.0, 4.0, 5.0]);
        let y = transform.apply(&p);
        assert_eq!(y, Point3::new([7.0, 2.0, 5.0]));
        assert!(transform.apply_inverse(&y).distance(&p) < 1e-12);
    }
}
