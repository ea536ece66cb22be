//! Direction in which a transformation is evaluated.

use serde::{Serialize, Deserialize};
use ritk_core::spatial::Point3;
use ritk_core::transform::{MultiLevel, Transformation};

/// Forward or inverse evaluation of a transformation.
///
/// Computed once per update and passed to every point mapping, so all
/// points of one update are mapped the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EvaluationDirection {
    #[default]
    Forward,
    Inverse,
}

impl EvaluationDirection {
    /// Direction selected by an "invert" flag.
    pub fn from_invert_flag(invert: bool) -> Self {
        if invert {
            Self::Inverse
        } else {
            Self::Forward
        }
    }

    /// The opposite direction.
    pub fn complement(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }

    /// Map `point` through `transformation` in this direction.
    pub fn apply<T>(self, transformation: &T, point: &Point3, t1: f64, t2: f64) -> Option<Point3>
    where
        T: Transformation + ?Sized,
    {
        match self {
            Self::Forward => Some(transformation.transform_point(point, t1, t2)),
            Self::Inverse => transformation.inverse_point(point, t1, t2),
        }
    }

    /// Map `point` through the finest level of a multi-level transformation.
    pub fn apply_local<M>(self, transformation: &M, point: &Point3, t1: f64, t2: f64) -> Option<Point3>
    where
        M: MultiLevel + ?Sized,
    {
        match self {
            Self::Forward => Some(transformation.local_transform_point(point, t1, t2)),
            Self::Inverse => transformation.local_inverse_point(point, t1, t2),
        }
    }
}
