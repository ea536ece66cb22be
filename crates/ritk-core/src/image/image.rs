//! Image type with physical metadata and coordinate transformations.
//!
//! This module provides the Image struct which combines tensor data with
//! the metadata that places it in world space and time.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Spacing, Direction};
use super::metadata::{ImageMetadata, TemporalAxis};

/// Medical image with physical metadata.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image (2 or 3)
///
/// # Coordinate Systems
/// * **Index Space**: continuous `(x, y, z)` indices; the tensor is stored
///   with the fastest axis last, i.e. `[depth, height, width]` for 3D.
/// * **World Space**: continuous coordinates in mm.
///
/// # Examples
/// ```rust
/// use ritk_core::Image;
/// use ritk_core::spatial::{Point3, Spacing3, Direction3};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 3>::zeros([1, 64, 64], &device);
/// let image = Image::new(
///     data,
///     Point3::new([0.0, 0.0, 0.0]),
///     Spacing3::new([1.0, 1.0, 1.0]),
///     Direction3::identity(),
/// ).unwrap();
/// assert_eq!(image.shape(), [1, 64, 64]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    data: Tensor<B, D>,
    metadata: ImageMetadata<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    ///
    /// # Arguments
    /// * `data` - The image data as a tensor
    /// * `origin` - World coordinate of the first pixel
    /// * `spacing` - Physical distance between pixels along each axis
    /// * `direction` - Orientation matrix of the image axes
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Result<Self> {
        let metadata = ImageMetadata::new(origin, spacing, direction)?;
        Ok(Self { data, metadata })
    }

    /// Create an image from data and prebuilt metadata.
    pub fn from_metadata(data: Tensor<B, D>, metadata: ImageMetadata<D>) -> Self {
        Self { data, metadata }
    }

    /// Attach a temporal axis describing the frame sequence.
    pub fn with_temporal_axis(mut self, temporal: TemporalAxis) -> Self {
        self.metadata = self.metadata.with_temporal_axis(temporal);
        self
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Get the image metadata.
    pub fn metadata(&self) -> &ImageMetadata<D> {
        &self.metadata
    }

    /// Get the origin (world coordinate of first pixel).
    pub fn origin(&self) -> &Point<D> {
        self.metadata.origin()
    }

    /// Get the spacing (physical distance between pixels).
    pub fn spacing(&self) -> &Spacing<D> {
        self.metadata.spacing()
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        self.metadata.direction()
    }

    /// Get the temporal axis.
    pub fn temporal(&self) -> &TemporalAxis {
        self.metadata.temporal()
    }

    /// Get the tensor shape.
    pub fn shape(&self) -> [usize; D] {
        let dims = self.data.shape().dims;
        std::array::from_fn(|i| dims[i])
    }

    /// Number of samples along index axis `axis` (0 = x).
    pub fn extent(&self, axis: usize) -> usize {
        self.shape()[D - 1 - axis]
    }

    /// Convert a continuous index to a world point.
    pub fn index_to_world(&self, index: &Point<D>) -> Point<D> {
        self.metadata.index_to_world(index)
    }

    /// Convert a world point to a continuous index.
    pub fn world_to_index(&self, point: &Point<D>) -> Point<D> {
        self.metadata.world_to_index(point)
    }

    /// True when a world point falls inside the voxel footprint of the image.
    pub fn is_in_fov(&self, point: &Point<D>) -> bool {
        let index = self.world_to_index(point);
        (0..D).all(|axis| {
            let n = self.extent(axis) as f64;
            index[axis] >= -0.5 && index[axis] < n - 0.5
        })
    }

    /// Read the whole tensor back as `f32` values in storage order.
    pub fn values(&self) -> Result<Vec<f32>> {
        self.data
            .clone()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| CoreError::image_data(format!("{:?}", e)))
    }
}
