//! Error types for deformation view updates.
//!
//! Having no free-form deformation to show is not an error; it is reported
//! as an empty update.

use thiserror::Error;
use ritk_core::CoreError;

/// Main error type for the deformation view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Tag grids are spanned by exactly three landmarks.
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount {
        expected: usize,
        actual: usize,
    },

    /// Tag-grid landmarks must have finite coordinates.
    #[error("Landmark {index} has non-finite coordinates")]
    NonFiniteLandmark {
        index: usize,
    },

    /// A requested grid is larger than the configured bound.
    #[error("Capacity exceeded along {axis}: {extent} > {max}")]
    CapacityExceeded {
        axis: &'static str,
        extent: usize,
        max: usize,
    },

    /// Invalid viewer configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Image samples could not be read.
    #[error("Image data error: {0}")]
    ImageData(String),
}

/// Result type for deformation view operations.
pub type Result<T> = std::result::Result<T, ViewError>;

impl ViewError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an image data error.
    pub fn image_data(msg: impl Into<String>) -> Self {
        Self::ImageData(msg.into())
    }

    /// Check a grid extent against a capacity bound.
    pub fn check_capacity(axis: &'static str, extent: usize, max: usize) -> Result<()> {
        if extent > max {
            return Err(Self::CapacityExceeded { axis, extent, max });
        }
        Ok(())
    }
}

impl From<CoreError> for ViewError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ImageData(msg) => Self::ImageData(msg),
            other => Self::InvalidConfiguration(other.to_string()),
        }
    }
}
