//! Regular-grid sampling over the viewport.

use serde::{Serialize, Deserialize};
use ritk_core::spatial::Point3;
use crate::error::{Result, ViewError};
use crate::grid::{SampleGrid, SamplePoint};
use crate::resolve::ResolvedDeformation;
use crate::space::ImageSpace;
use super::{map_to_index, report_degenerate, store_sample, SamplingOptions};

/// Size of the viewed area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport covering one slice of `image`.
    pub fn of_image<I: ImageSpace + ?Sized>(image: &I) -> Self {
        Self::new(image.width() as f64, image.height() as f64)
    }
}

fn cell_count(usable: f64, spacing: f64, axis: &'static str, max: usize) -> Result<usize> {
    // Float to int casts saturate, so oversized requests still hit the bound.
    let count = (usable / spacing).round() as usize;
    ViewError::check_capacity(axis, count, max)?;
    Ok(count)
}

/// Sample evenly spaced points over `viewport`, leaving `margin` pixels free.
///
/// The usable extent `size - margin` is split into `round(usable / spacing)`
/// cells per axis and a point is placed at the centre of each cell on slice
/// `z = 0`. A non-positive spacing, a viewport no larger than the margin or a
/// zero cell count give an empty grid.
///
/// # Arguments
/// * `image` - Image the grid is drawn over
/// * `resolved` - Deformation mapping the points
/// * `viewport` - Viewed area in pixels
/// * `spacing` - Requested distance between samples in pixels
/// * `margin` - Border in pixels, split evenly between both sides
/// * `options` - Time span, direction, scope and capacity of the update
pub fn sample_regular_grid<I: ImageSpace + ?Sized>(
    image: &I,
    resolved: &ResolvedDeformation<'_>,
    viewport: Viewport,
    spacing: f64,
    margin: f64,
    options: &SamplingOptions,
) -> Result<SampleGrid> {
    let usable_w = viewport.width - margin;
    let usable_h = viewport.height - margin;
    if !(spacing.is_finite() && spacing > 0.0) || !(usable_w > 0.0 && usable_h > 0.0) {
        tracing::debug!(
            "No regular grid for viewport {:?}, spacing {}, margin {}",
            viewport,
            spacing,
            margin
        );
        return Ok(SampleGrid::empty());
    }

    let nx = cell_count(usable_w, spacing, "x", options.max_grid_dimension)?;
    let ny = cell_count(usable_h, spacing, "y", options.max_grid_dimension)?;
    if nx == 0 || ny == 0 {
        return Ok(SampleGrid::empty());
    }

    let dx = usable_w / nx as f64;
    let dy = usable_h / ny as f64;
    let offset = margin / 2.0;
    let mut grid = SampleGrid::bounded(nx, ny, options.max_grid_dimension)?;

    for j in 0..ny {
        for i in 0..nx {
            let before = Point3::new([
                i as f64 * dx + offset + dx / 2.0,
                j as f64 * dy + offset + dy / 2.0,
                0.0,
            ]);
            let world = image.index_to_world(&before);
            let after = map_to_index(
                image,
                resolved,
                &world,
                options.time_span,
                options.direction,
                options.scope,
            );
            store_sample(&mut grid, i, j, SamplePoint::fixed(before), after);
        }
    }

    tracing::debug!("Regular grid {}x{} with spacing ({}, {})", nx, ny, dx, dy);
    report_degenerate("Regular", &grid);

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        assert_eq!(cell_count(160.0, 20.0, "x", 1000).unwrap(), 8);
        assert_eq!(cell_count(5.0, 20.0, "x", 1000).unwrap(), 0);
        assert!(cell_count(1.0e9, 1.0, "x", 1000).is_err());
    }
}
