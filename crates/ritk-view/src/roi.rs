//! Region of the control-point lattice covered by the viewed image.

use serde::{Serialize, Deserialize};
use ritk_core::spatial::Point3;
use ritk_core::transform::FreeFormLevel;
use crate::grid::ViewPlaneAxes;
use crate::space::ImageSpace;

/// Inclusive box of lattice indices.
///
/// Invariant: `i1 <= i2`, `j1 <= j2`, `k1 <= k2`, all inside the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub i1: usize,
    pub j1: usize,
    pub k1: usize,
    pub i2: usize,
    pub j2: usize,
    pub k2: usize,
}

impl RegionOfInterest {
    /// Lower corner `[i1, j1, k1]`.
    pub fn lower(&self) -> [usize; 3] {
        [self.i1, self.j1, self.k1]
    }

    /// Upper corner `[i2, j2, k2]`.
    pub fn upper(&self) -> [usize; 3] {
        [self.i2, self.j2, self.k2]
    }

    /// Number of lattice points along each axis; 0 along an inverted axis.
    pub fn counts(&self) -> [usize; 3] {
        let span = |lower: usize, upper: usize| upper.saturating_add(1).saturating_sub(lower);
        [
            span(self.i1, self.i2),
            span(self.j1, self.j2),
            span(self.k1, self.k2),
        ]
    }

    /// Grid dimensions of the region seen on the plane spanned by `axes`.
    pub fn plane_dimensions(&self, axes: ViewPlaneAxes) -> (usize, usize) {
        axes.cell(self.counts())
    }
}

fn clamp_axis(value: f64, extent: usize) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let last = extent.saturating_sub(1);
    (value.round() as usize).min(last)
}

/// Clamp the viewed image's footprint to the lattice of `level`.
///
/// The corners `(0, 0, 0)` and `(w-1, h-1, 0)` of the image are mapped to
/// lattice coordinates, rounded, clamped to the lattice and ordered.
/// Non-finite lattice coordinates clamp to 0.
pub fn clamp_region<I: ImageSpace + ?Sized>(image: &I, level: &dyn FreeFormLevel) -> RegionOfInterest {
    let extent = level.lattice_extent();
    let corner = |index: Point3| {
        let lattice = level.world_to_lattice(&image.index_to_world(&index));
        [
            clamp_axis(lattice[0], extent.nx),
            clamp_axis(lattice[1], extent.ny),
            clamp_axis(lattice[2], extent.nz),
        ]
    };

    let a = corner(Point3::new([0.0, 0.0, 0.0]));
    let b = corner(Point3::new([
        image.width() as f64 - 1.0,
        image.height() as f64 - 1.0,
        0.0,
    ]));

    RegionOfInterest {
        i1: a[0].min(b[0]),
        j1: a[1].min(b[1]),
        k1: a[2].min(b[2]),
        i2: a[0].max(b[0]),
        j2: a[1].max(b[1]),
        k2: a[2].max(b[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(-3.2, 5), 0);
        assert_eq!(clamp_axis(f64::NAN, 5), 0);
        assert_eq!(clamp_axis(f64::INFINITY, 5), 0);
        assert_eq!(clamp_axis(2.5, 5), 3);
        assert_eq!(clamp_axis(2.4, 5), 2);
        assert_eq!(clamp_axis(17.0, 5), 4);
    }

    #[test]
    fn test_plane_dimensions() {
        let roi = RegionOfInterest { i1: 1, j1: 0, k1: 2, i2: 4, j2: 2, k2: 2 };
        assert_eq!(roi.counts(), [4, 3, 1]);
        assert_eq!(roi.plane_dimensions(ViewPlaneAxes::XY), (4, 3));
        assert_eq!(roi.plane_dimensions(ViewPlaneAxes::XZ), (4, 1));
        assert_eq!(roi.plane_dimensions(ViewPlaneAxes::YZ), (3, 1));
    }

    #[test]
    fn test_inverted_region_has_no_points() {
        let roi = RegionOfInterest { i1: 4, j1: 0, k1: 3, i2: 1, j2: 0, k2: 0 };
        assert_eq!(roi.counts(), [0, 1, 0]);
        assert_eq!(roi.plane_dimensions(ViewPlaneAxes::XY), (0, 1));
    }
}
