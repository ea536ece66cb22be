//! Control-point sampling.
//!
//! Places one sample on every lattice control point inside the region of
//! interest, so the overlay shows the lattice itself being deformed.

use ritk_core::spatial::Point3;
use crate::error::Result;
use crate::grid::{LabelRange, SampleGrid, SamplePoint, ViewPlaneAxes};
use crate::resolve::ResolvedDeformation;
use crate::roi::{clamp_region, RegionOfInterest};
use crate::space::ImageSpace;
use super::{map_to_index, report_degenerate, store_sample, SamplingOptions};

/// Result of sampling the control points in view.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointSample {
    pub grid: SampleGrid,
    pub roi: RegionOfInterest,
    /// Range of the labels met; `None` for an empty grid.
    pub labels: Option<LabelRange>,
}

/// Sample the control points of the resolved level that fall on `image`.
///
/// The grid has one cell per control point of the region of interest on the
/// plane `axes`. Along the collapsed axis later control points overwrite
/// earlier ones.
///
/// # Arguments
/// * `image` - Image the grid is drawn over
/// * `resolved` - Deformation whose lattice is sampled
/// * `axes` - Plane shown by the viewer
/// * `options` - Time span, direction, scope and capacity of the update
pub fn sample_control_points<I: ImageSpace + ?Sized>(
    image: &I,
    resolved: &ResolvedDeformation<'_>,
    axes: ViewPlaneAxes,
    options: &SamplingOptions,
) -> Result<ControlPointSample> {
    let level = resolved.level();
    let roi = clamp_region(image, level);
    let (nx, ny) = roi.plane_dimensions(axes);
    let mut grid = SampleGrid::bounded(nx, ny, options.max_grid_dimension)?;
    let mut labels = None;

    for k in roi.k1..=roi.k2 {
        for j in roi.j1..=roi.j2 {
            for i in roi.i1..=roi.i2 {
                let world = level.lattice_to_world(&Point3::new([i as f64, j as f64, k as f64]));
                let label = level.label(i, j, k);
                labels = LabelRange::extend(labels, label);

                let point = SamplePoint {
                    before: image.world_to_index(&world),
                    after: Point3::origin(),
                    status: level.status(i, j, k).into(),
                    label,
                };
                let after = map_to_index(
                    image,
                    resolved,
                    &world,
                    options.time_span,
                    options.direction,
                    options.scope,
                );
                let (m, n) = axes.cell([i - roi.i1, j - roi.j1, k - roi.k1]);
                store_sample(&mut grid, m, n, point, after);
            }
        }
    }

    tracing::debug!(
        "Control-point grid {}x{} over ROI {:?}..{:?}",
        nx,
        ny,
        roi.lower(),
        roi.upper()
    );
    report_degenerate("Control-point", &grid);

    Ok(ControlPointSample { grid, roi, labels })
}
