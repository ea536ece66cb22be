//! Translation transform implementation.
//!
//! This module provides a simple translation transform.

use serde::{Serialize, Deserialize};
use crate::spatial::{Point3, Vector3};
use super::trait_::Transformation;

/// Simple Translation Transform.
///
/// Translates points by a fixed offset vector, independent of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslationTransform {
    translation: Vector3,
}

impl TranslationTransform {
    /// Create a new translation transform.
    ///
    /// # Arguments
    /// * `translation` - Offset added to every point
    pub fn new(translation: Vector3) -> Self {
        Self { translation }
    }

    /// Get the translation vector.
    pub fn translation(&self) -> Vector3 {
        self.translation
    }
}

impl Transformation for TranslationTransform {
    fn transform_point(&self, point: &Point3, _t1: f64, _t2: f64) -> Point3 {
        *point + self.translation
    }

    fn inverse_point(&self, point: &Point3, _t1: f64, _t2: f64) -> Option<Point3> {
        Some(*point - self.translation)
    }
}
