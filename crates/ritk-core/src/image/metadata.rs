//! Image metadata types.
//!
//! Metadata describes how image indices map to world coordinates and how
//! frame indices map to time.

use serde::{Serialize, Deserialize};
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Spacing, Direction, Vector};

/// Temporal sampling of an image sequence.
///
/// Frame `f` is acquired at `origin + f * spacing`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalAxis {
    /// Time of frame 0.
    pub origin: f64,
    /// Time between consecutive frames.
    pub spacing: f64,
    /// Number of frames.
    pub frames: usize,
}

impl TemporalAxis {
    /// A single static frame at time 0.
    pub fn single_frame() -> Self {
        Self { origin: 0.0, spacing: 1.0, frames: 1 }
    }

    /// Create a temporal axis.
    pub fn new(origin: f64, spacing: f64, frames: usize) -> Self {
        Self { origin, spacing, frames }
    }

    /// Time of a (possibly fractional) frame index.
    pub fn frame_to_time(&self, frame: f64) -> f64 {
        self.origin + frame * self.spacing
    }

    /// Fractional frame index for a time value.
    pub fn time_to_frame(&self, time: f64) -> f64 {
        if self.spacing == 0.0 {
            return 0.0;
        }
        (time - self.origin) / self.spacing
    }
}

impl Default for TemporalAxis {
    fn default() -> Self {
        Self::single_frame()
    }
}

/// Image metadata containing physical space information.
///
/// Index space is ordered `(x, y, z)`; world space follows
/// `world = origin + Direction * (index * spacing)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata<const D: usize> {
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
    inverse_direction: Direction<D>,
    temporal: TemporalAxis,
}

impl<const D: usize> ImageMetadata<D> {
    /// Create new image metadata.
    ///
    /// Fails if the spacing is not strictly positive or the direction
    /// matrix is singular.
    pub fn new(origin: Point<D>, spacing: Spacing<D>, direction: Direction<D>) -> Result<Self> {
        if !spacing.is_valid() {
            return Err(CoreError::invalid_spacing(format!("{:?}", spacing.to_vec())));
        }
        let inverse_direction = direction.try_inverse().ok_or(CoreError::SingularDirection)?;
        Ok(Self {
            origin,
            spacing,
            direction,
            inverse_direction,
            temporal: TemporalAxis::single_frame(),
        })
    }

    /// Attach a temporal axis.
    pub fn with_temporal_axis(mut self, temporal: TemporalAxis) -> Self {
        self.temporal = temporal;
        self
    }

    /// Get the origin.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Get the temporal axis.
    pub fn temporal(&self) -> &TemporalAxis {
        &self.temporal
    }

    /// Map a continuous index to world coordinates.
    pub fn index_to_world(&self, index: &Point<D>) -> Point<D> {
        let mut scaled = Vector::<D>::zeros();
        for i in 0..D {
            scaled[i] = index[i] * self.spacing[i];
        }
        self.origin + self.direction * scaled
    }

    /// Map world coordinates to a continuous index.
    pub fn world_to_index(&self, point: &Point<D>) -> Point<D> {
        let rotated = self.inverse_direction * (*point - self.origin);
        let mut index = Point::<D>::origin();
        for i in 0..D {
            index[i] = rotated[i] / self.spacing[i];
        }
        index
    }
}

impl<const D: usize> Default for ImageMetadata<D> {
    fn default() -> Self {
        Self {
            origin: Point::origin(),
            spacing: Spacing::uniform(1.0),
            direction: Direction::identity(),
            inverse_direction: Direction::identity(),
            temporal: TemporalAxis::single_frame(),
        }
    }
}
