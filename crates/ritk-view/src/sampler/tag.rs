//! Tag-grid sampling.
//!
//! A tag grid is a stack of square grids spanned by three landmarks, one
//! grid per sampled slice between the lowest and highest landmark.

use ritk_core::spatial::Point3;
use crate::error::{Result, ViewError};
use crate::grid::{SampleGrid, SamplePoint};
use crate::resolve::ResolvedDeformation;
use crate::space::ImageSpace;
use super::{report_degenerate, store_sample, SamplingOptions};

/// Number of cells along each side of a tag grid.
pub const TAG_GRID_DIVISIONS: usize = 12;

const LANDMARK_COUNT: usize = 3;

/// Tag grid on one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGridSlice {
    /// Slice index in the viewed image.
    pub z: i64,
    /// `(TAG_GRID_DIVISIONS + 1)²` samples.
    pub grid: SampleGrid,
}

/// Tag grids of all sampled slices, lowest slice first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagGridSet {
    pub slices: Vec<TagGridSlice>,
}

impl TagGridSet {
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Grid of slice `z`, if it was sampled.
    pub fn slice(&self, z: i64) -> Option<&SampleGrid> {
        self.slices.iter().find(|s| s.z == z).map(|s| &s.grid)
    }
}

/// Slice step `max(1, round((k2 - k1) / 12))`.
fn slice_step(k1: i64, k2: i64) -> i64 {
    let span = k2.saturating_sub(k1) as f64 / TAG_GRID_DIVISIONS as f64;
    (span.round() as i64).max(1)
}

/// Sample a tag grid spanned by three world-space landmarks.
///
/// Cell `(m, n)` lies at `p0 + n * (p1 - p0) / 12 + m * (p2 - p1) / 12` in
/// the x/y plane of the image, so `(0, 0)` is on landmark 0 and `(12, 12)`
/// on landmark 2. Slices run from the lowest to the highest landmark with a
/// step of `max(1, round((k2 - k1) / 12))`. After-points are mapped through
/// the finest level only, and only when `apply` is set.
///
/// # Errors
/// * `InvalidLandmarkCount` unless exactly three landmarks are given
/// * `NonFiniteLandmark` when a landmark has a NaN or infinite coordinate
pub fn sample_tag_grid<I: ImageSpace + ?Sized>(
    image: &I,
    resolved: &ResolvedDeformation<'_>,
    landmarks: &[Point3],
    apply: bool,
    options: &SamplingOptions,
) -> Result<TagGridSet> {
    if landmarks.len() != LANDMARK_COUNT {
        return Err(ViewError::InvalidLandmarkCount {
            expected: LANDMARK_COUNT,
            actual: landmarks.len(),
        });
    }
    let mut indices = [Point3::origin(); LANDMARK_COUNT];
    for (index, (landmark, slot)) in landmarks.iter().zip(indices.iter_mut()).enumerate() {
        *slot = image.world_to_index(landmark);
        if !landmark.is_finite() || !slot.is_finite() {
            tracing::warn!("Tag grid landmark {} is not finite: {:?}", index, landmark);
            return Err(ViewError::NonFiniteLandmark { index });
        }
    }
    let [p0, p1, p2] = indices;

    let z_min = p0[2].min(p1[2]).min(p2[2]);
    let z_max = p0[2].max(p1[2]).max(p2[2]);
    let k1 = z_min.round() as i64;
    let k2 = z_max.round() as i64;
    let step = slice_step(k1, k2);

    let divisions = TAG_GRID_DIVISIONS as f64;
    let d1 = (p1 - p0) / divisions;
    let d2 = (p2 - p1) / divisions;
    let size = TAG_GRID_DIVISIONS + 1;

    let mut slices = Vec::new();
    let mut k = k1;
    while k <= k2 {
        let mut grid = SampleGrid::bounded(size, size, options.max_grid_dimension)?;
        for m in 0..size {
            for n in 0..size {
                let before = Point3::new([
                    p0[0] + d1[0] * n as f64 + d2[0] * m as f64,
                    p0[1] + d1[1] * n as f64 + d2[1] * m as f64,
                    k as f64,
                ]);
                let after = if apply {
                    let world = image.index_to_world(&before);
                    resolved
                        .evaluate_local(&world, options.time_span, options.direction)
                        .map(|mapped| image.world_to_index(&mapped))
                        .filter(Point3::is_finite)
                } else {
                    Some(before)
                };
                store_sample(&mut grid, m, n, SamplePoint::fixed(before), after);
            }
        }
        report_degenerate("Tag", &grid);
        slices.push(TagGridSlice { z: k, grid });
        k = match k.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }

    tracing::debug!("Tag grid over slices {}..={} (step {}), {} slices", k1, k2, step, slices.len());

    Ok(TagGridSet { slices })
}
