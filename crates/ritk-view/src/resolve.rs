//! Extraction of the free-form deformation shown by the viewer.

use ritk_core::spatial::Point3;
use ritk_core::transform::{FreeFormLevel, LatticeExtent, MultiLevel, Transformation};
use crate::config::EvaluationScope;
use crate::direction::EvaluationDirection;
use crate::error::{Result, ViewError};
use crate::time::TimeSpan;

/// Free-form deformation found behind a transformation handle.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDeformation<'a> {
    multi_level: Option<&'a dyn MultiLevel>,
    single_level: &'a dyn FreeFormLevel,
}

impl<'a> ResolvedDeformation<'a> {
    /// The multi-level handle, when the transformation has one.
    pub fn multi_level(&self) -> Option<&'a dyn MultiLevel> {
        self.multi_level
    }

    /// The level whose lattice is sampled (the finest one for multi-level handles).
    pub fn level(&self) -> &'a dyn FreeFormLevel {
        self.single_level
    }

    /// Lattice extent of the sampled level.
    pub fn extent(&self) -> LatticeExtent {
        self.single_level.lattice_extent()
    }

    /// Map a world point through the deformation.
    ///
    /// `Local` evaluates only the finest level; `Composed` evaluates the whole
    /// multi-level handle and behaves like `Local` for single-level handles.
    /// Returns `None` when the mapping has no finite result.
    pub fn evaluate(
        &self,
        point: &Point3,
        span: TimeSpan,
        direction: EvaluationDirection,
        scope: EvaluationScope,
    ) -> Option<Point3> {
        let mapped = match (scope, self.multi_level) {
            (EvaluationScope::Composed, Some(multi)) => {
                direction.apply(multi, point, span.t1, span.t2)
            }
            (EvaluationScope::Local, Some(multi)) => {
                direction.apply_local(multi, point, span.t1, span.t2)
            }
            (_, None) => direction.apply(self.single_level, point, span.t1, span.t2),
        };
        mapped.filter(Point3::is_finite)
    }

    /// Map a world point through the finest level only.
    pub fn evaluate_local(&self, point: &Point3, span: TimeSpan, direction: EvaluationDirection) -> Option<Point3> {
        self.evaluate(point, span, direction, EvaluationScope::Local)
    }
}

/// Find the free-form deformation behind `transformation`.
///
/// Multi-level handles are preferred and resolve to their last (finest)
/// level; otherwise a single free-form level is used as is. Transformations
/// without a free-form part, and multi-level handles without levels,
/// resolve to `None`.
///
/// # Errors
/// `CapacityExceeded` when the sampled lattice has more than `max_dim`
/// control points along x, y or z.
pub fn resolve_transformation(
    transformation: &dyn Transformation,
    max_dim: usize,
) -> Result<Option<ResolvedDeformation<'_>>> {
    let resolved = if let Some(multi) = transformation.as_multi_level() {
        multi.finest_level().map(|level| ResolvedDeformation {
            multi_level: Some(multi),
            single_level: level,
        })
    } else {
        transformation.as_free_form().map(|level| ResolvedDeformation {
            multi_level: None,
            single_level: level,
        })
    };

    let Some(resolved) = resolved else {
        return Ok(None);
    };

    let extent = resolved.extent();
    for (axis, n) in [("x", extent.nx), ("y", extent.ny), ("z", extent.nz)] {
        if let Err(err) = ViewError::check_capacity(axis, n, max_dim) {
            tracing::warn!("Rejecting lattice {:?}: {}", extent, err);
            return Err(err);
        }
    }
    if extent.points_per_frame() == 0 {
        tracing::debug!("Lattice {:?} has no control points", extent);
        return Ok(None);
    }

    Ok(Some(resolved))
}
