//! Sample grids produced by the samplers.
//!
//! A [`SampleGrid`] is a row-major 2D container of [`SamplePoint`]s. Its
//! dimensions come from the request and are bounded by a capacity check, not
//! by a fixed array size.

use serde::{Serialize, Deserialize};
use ritk_core::spatial::Point3;
use ritk_core::transform::ControlPointStatus;
use crate::error::{Result, ViewError};

/// Activity of a sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointStatus {
    Active,
    Passive,
    /// Regular-grid and tag-grid samples carry no control-point status.
    #[default]
    Unknown,
}

impl From<ControlPointStatus> for PointStatus {
    fn from(status: ControlPointStatus) -> Self {
        match status {
            ControlPointStatus::Active => Self::Active,
            ControlPointStatus::Passive => Self::Passive,
        }
    }
}

/// One sampled location, before and after the transformation.
///
/// Both positions are continuous image indices of the viewed image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SamplePoint {
    pub before: Point3,
    pub after: Point3,
    pub status: PointStatus,
    pub label: i32,
}

impl SamplePoint {
    /// A point that the transformation leaves in place.
    pub fn fixed(position: Point3) -> Self {
        Self {
            before: position,
            after: position,
            ..Self::default()
        }
    }
}

/// Which two image axes span the viewing plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewPlaneAxes {
    #[default]
    XY,
    XZ,
    YZ,
}

impl ViewPlaneAxes {
    /// The in-plane axes as `(first, second)` axis numbers (0 = x).
    pub fn grid_axes(self) -> (usize, usize) {
        match self {
            Self::XY => (0, 1),
            Self::XZ => (0, 2),
            Self::YZ => (1, 2),
        }
    }

    /// Grid cell of a 3D offset `[di, dj, dk]`.
    pub fn cell(self, offset: [usize; 3]) -> (usize, usize) {
        let (a, b) = self.grid_axes();
        (offset[a], offset[b])
    }
}

/// Minimum and maximum of the labels seen while sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRange {
    pub min: i32,
    pub max: i32,
}

impl LabelRange {
    /// Range holding a single label.
    pub fn single(label: i32) -> Self {
        Self { min: label, max: label }
    }

    /// Widen the range to include `label`.
    pub fn include(&mut self, label: i32) {
        self.min = self.min.min(label);
        self.max = self.max.max(label);
    }

    /// Fold a label into an optional range.
    pub fn extend(range: Option<Self>, label: i32) -> Option<Self> {
        let mut range = range.unwrap_or_else(|| Self::single(label));
        range.include(label);
        Some(range)
    }
}

/// Row-major 2D grid of sample points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleGrid {
    nx: usize,
    ny: usize,
    points: Vec<SamplePoint>,
    degenerate_points: usize,
}

impl SampleGrid {
    /// Grid with no samples.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an `nx × ny` grid of default points, rejecting dimensions above `max`.
    ///
    /// # Arguments
    /// * `nx` - Number of columns
    /// * `ny` - Number of rows
    /// * `max` - Largest allowed extent along either axis
    pub fn bounded(nx: usize, ny: usize, max: usize) -> Result<Self> {
        ViewError::check_capacity("x", nx, max)?;
        ViewError::check_capacity("y", ny, max)?;
        Ok(Self::with_dimensions(nx, ny))
    }

    pub(crate) fn with_dimensions(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            points: vec![SamplePoint::default(); nx * ny],
            degenerate_points: 0,
        }
    }

    /// Grid dimensions `(nx, ny)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn index(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.nx && j < self.ny).then(|| j * self.nx + i)
    }

    /// Sample at column `i`, row `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<&SamplePoint> {
        self.index(i, j).map(|idx| &self.points[idx])
    }

    /// Replace the sample at column `i`, row `j`. Out-of-range cells are ignored.
    pub fn set(&mut self, i: usize, j: usize, point: SamplePoint) {
        if let Some(idx) = self.index(i, j) {
            self.points[idx] = point;
        }
    }

    /// Samples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter()
    }

    /// Samples with their `(i, j)` cell.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &SamplePoint)> {
        let nx = self.nx.max(1);
        self.points
            .iter()
            .enumerate()
            .map(move |(idx, p)| ((idx % nx, idx / nx), p))
    }

    /// Number of samples whose after-point could not be computed.
    pub fn degenerate_points(&self) -> usize {
        self.degenerate_points
    }

    pub(crate) fn mark_degenerate(&mut self) {
        self.degenerate_points += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_grid_indexing() {
        let mut grid = SampleGrid::bounded(3, 2, 10).unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.len(), 6);
        let p = SamplePoint::fixed(Point3::new([1.0, 2.0, 0.0]));
        grid.set(2, 1, p);
        assert_eq!(grid.get(2, 1), Some(&p));
        assert_eq!(grid.iter().nth(5), Some(&p));
        assert!(grid.get(3, 0).is_none());
        let ((i, j), _) = grid.cells().last().unwrap();
        assert_eq!((i, j), (2, 1));
    }

    #[test]
    fn test_bounded_grid_rejects_oversize() {
        let err = SampleGrid::bounded(4, 1001, 1000).unwrap_err();
        assert!(matches!(err, ViewError::CapacityExceeded { axis: "y", .. }));
    }

    #[test]
    fn test_empty_grid() {
        let grid = SampleGrid::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.dimensions(), (0, 0));
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn test_plane_axes() {
        assert_eq!(ViewPlaneAxes::XZ.grid_axes(), (0, 2));
        assert_eq!(ViewPlaneAxes::YZ.cell([4, 5, 6]), (5, 6));
    }

    #[test]
    fn test_label_range() {
        let range = [3, -1, 7]
            .iter()
            .fold(None, |acc, &l| LabelRange::extend(acc, l))
            .unwrap();
        assert_eq!(range, LabelRange { min: -1, max: 7 });
    }
}
