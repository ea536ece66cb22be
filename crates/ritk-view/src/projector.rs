//! Deformation-grid projection for the displayed image.
//!
//! When the viewer shows the source resampled through its transformation,
//! the grid has to be drawn in the resampled frame, so the before-points
//! are mapped the opposite way from the sampling direction.

use crate::config::ViewMode;
use crate::grid::SampleGrid;
use crate::resolve::ResolvedDeformation;
use crate::sampler::{map_to_index, report_degenerate, store_sample, SamplingOptions};
use crate::space::ImageSpace;

/// Build the overlay grid for the displayed image.
///
/// In `Source` view with the source transformation applied, every overlay
/// after-point is the before-point mapped through the complement of
/// `options.direction`. In every other case the overlay is the sampled grid.
pub fn project_deformation_grid<I: ImageSpace + ?Sized>(
    image: &I,
    grid: &SampleGrid,
    resolved: &ResolvedDeformation<'_>,
    view_mode: ViewMode,
    apply: bool,
    options: &SamplingOptions,
) -> SampleGrid {
    if view_mode != ViewMode::Source || !apply {
        return grid.clone();
    }

    let direction = options.direction.complement();
    let (nx, ny) = grid.dimensions();
    let mut overlay = SampleGrid::with_dimensions(nx, ny);
    for ((i, j), point) in grid.cells() {
        let world = image.index_to_world(&point.before);
        let after = map_to_index(image, resolved, &world, options.time_span, direction, options.scope);
        store_sample(&mut overlay, i, j, *point, after);
    }
    report_degenerate("Overlay", &overlay);
    overlay
}
