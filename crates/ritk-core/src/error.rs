//! Error types for constructing images and transformations.

use thiserror::Error;

/// Errors raised when core spatial objects are built from invalid parts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The direction matrix cannot be inverted.
    #[error("Direction matrix is singular")]
    SingularDirection,

    /// Spacing must be finite and strictly positive along every axis.
    #[error("Invalid spacing: {0}")]
    InvalidSpacing(String),

    /// Lattice description is not usable.
    #[error("Invalid lattice: {0}")]
    InvalidLattice(String),

    /// Number of coefficients does not match the lattice size.
    #[error("Coefficient count mismatch: expected {expected}, got {actual}")]
    CoefficientMismatch {
        expected: usize,
        actual: usize,
    },

    /// Linear part of an affine transform cannot be inverted.
    #[error("Affine matrix is singular")]
    SingularAffine,

    /// Image tensor data could not be read back.
    #[error("Image data error: {0}")]
    ImageData(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an invalid spacing error.
    pub fn invalid_spacing(msg: impl Into<String>) -> Self {
        Self::InvalidSpacing(msg.into())
    }

    /// Create an invalid lattice error.
    pub fn invalid_lattice(msg: impl Into<String>) -> Self {
        Self::InvalidLattice(msg.into())
    }

    /// Create an image data error.
    pub fn image_data(msg: impl Into<String>) -> Self {
        Self::ImageData(msg.into())
    }
}
