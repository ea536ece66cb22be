pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;

pub use error::{CoreError, Result};
pub use image::{Image, ImageMetadata, TemporalAxis};
pub use spatial::{Point, Vector, Spacing, Direction};
