//! Sampling strategies for the deformation grid.
//!
//! * [`control_points`] - one sample per lattice control point in view
//! * [`regular`] - evenly spaced samples over the viewport
//! * [`tag`] - tag grids spanned by three landmarks

pub mod control_points;
pub mod regular;
pub mod tag;

pub use control_points::{sample_control_points, ControlPointSample};
pub use regular::{sample_regular_grid, Viewport};
pub use tag::{sample_tag_grid, TagGridSet, TagGridSlice, TAG_GRID_DIVISIONS};

use ritk_core::spatial::Point3;
use crate::config::EvaluationScope;
use crate::direction::EvaluationDirection;
use crate::grid::{SampleGrid, SamplePoint};
use crate::resolve::ResolvedDeformation;
use crate::space::ImageSpace;
use crate::time::TimeSpan;

/// Settings shared by every point mapped during one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingOptions {
    pub time_span: TimeSpan,
    pub direction: EvaluationDirection,
    pub scope: EvaluationScope,
    pub max_grid_dimension: usize,
}

impl SamplingOptions {
    /// Forward, local evaluation over `time_span` with the default capacity.
    pub fn new(time_span: TimeSpan) -> Self {
        Self {
            time_span,
            direction: EvaluationDirection::Forward,
            scope: EvaluationScope::Local,
            max_grid_dimension: 1000,
        }
    }

    pub fn with_direction(mut self, direction: EvaluationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_scope(mut self, scope: EvaluationScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_max_grid_dimension(mut self, max: usize) -> Self {
        self.max_grid_dimension = max;
        self
    }
}

/// Map a world point through the deformation and into image indices.
pub(crate) fn map_to_index<I: ImageSpace + ?Sized>(
    image: &I,
    resolved: &ResolvedDeformation<'_>,
    world: &Point3,
    time_span: TimeSpan,
    direction: EvaluationDirection,
    scope: EvaluationScope,
) -> Option<Point3> {
    resolved
        .evaluate(world, time_span, direction, scope)
        .map(|mapped| image.world_to_index(&mapped))
        .filter(Point3::is_finite)
}

/// Store a sample, keeping the point in place when it has no finite image.
pub(crate) fn store_sample(grid: &mut SampleGrid, i: usize, j: usize, mut point: SamplePoint, after: Option<Point3>) {
    match after {
        Some(after) => point.after = after,
        None => {
            point.after = point.before;
            grid.mark_degenerate();
        }
    }
    grid.set(i, j, point);
}

pub(crate) fn report_degenerate(kind: &str, grid: &SampleGrid) {
    if grid.degenerate_points() > 0 {
        tracing::warn!(
            "{} grid: {} of {} points have no finite image and were left in place",
            kind,
            grid.degenerate_points(),
            grid.len()
        );
    }
}
