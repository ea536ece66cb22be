//! Image coordinate spaces seen by the samplers.
//!
//! The samplers only need coordinate conversions and extents from the image
//! they draw over, so they work against [`ImageSpace`] rather than a concrete
//! image type.

use burn::tensor::backend::Backend;
use ritk_core::spatial::Point3;
use ritk_core::Image;

/// Coordinate conversions of a 3D image sequence.
///
/// The samplers treat index x and y as the two in-plane axes of the viewing
/// plane and index z = 0 as the slice on screen. For an XZ or YZ view, pass
/// the resliced plane image whose direction maps index y onto the world axis
/// shown vertically, not the whole volume.
pub trait ImageSpace {
    /// Map a continuous `(x, y, z)` index to world coordinates.
    fn index_to_world(&self, index: &Point3) -> Point3;

    /// Map world coordinates to a continuous index.
    fn world_to_index(&self, world: &Point3) -> Point3;

    /// Time of frame `frame`.
    fn frame_to_time(&self, frame: usize) -> f64;

    /// Samples along x.
    fn width(&self) -> usize;

    /// Samples along y.
    fn height(&self) -> usize;

    /// Samples along z.
    fn depth(&self) -> usize;

    /// Number of temporal frames.
    fn frame_count(&self) -> usize;

    /// True when a world point lies inside the voxel footprint of the image.
    fn is_in_fov(&self, world: &Point3) -> bool {
        let index = self.world_to_index(world);
        let extents = [self.width(), self.height(), self.depth()];
        (0..3).all(|axis| index[axis] >= -0.5 && index[axis] < extents[axis] as f64 - 0.5)
    }
}

impl<B: Backend> ImageSpace for Image<B, 3> {
    fn index_to_world(&self, index: &Point3) -> Point3 {
        Image::index_to_world(self, index)
    }

    fn world_to_index(&self, world: &Point3) -> Point3 {
        Image::world_to_index(self, world)
    }

    fn frame_to_time(&self, frame: usize) -> f64 {
        self.temporal().frame_to_time(frame as f64)
    }

    fn width(&self) -> usize {
        self.extent(0)
    }

    fn height(&self) -> usize {
        self.extent(1)
    }

    fn depth(&self) -> usize {
        self.extent(2)
    }

    fn frame_count(&self) -> usize {
        self.temporal().frames
    }
}
