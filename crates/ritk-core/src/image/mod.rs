//! Image types with world-space and temporal metadata.

pub mod image;
pub mod metadata;

pub use image::Image;
pub use metadata::{ImageMetadata, TemporalAxis};
