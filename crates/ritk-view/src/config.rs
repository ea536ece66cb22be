//! Viewer configuration.
//!
//! Holds everything an update needs to know about how the viewer is set up:
//! which plane is shown, which image is displayed, how the source
//! transformation is applied and how the deformation grid is sampled.

use serde::{Serialize, Deserialize};
use crate::direction::EvaluationDirection;
use crate::error::{Result, ViewError};
use crate::grid::ViewPlaneAxes;

/// Image shown in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Target image only.
    #[default]
    Target,
    /// Transformed source image only.
    Source,
    /// Target and source interleaved as a checkerboard.
    Checkerboard,
    /// Difference of target and source.
    Subtraction,
}

/// Which part of a multi-level transformation drives the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EvaluationScope {
    /// Only the finest free-form level.
    #[default]
    Local,
    /// Global part plus every level.
    Composed,
}

/// Configuration for deformation view updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Plane shown by the viewer.
    pub view_axes: ViewPlaneAxes,
    /// Image shown by the viewer.
    pub view_mode: ViewMode,
    /// Resample the source through the source transformation.
    pub apply_source_transform: bool,
    /// Use the inverse of the source transformation.
    pub invert_source_transform: bool,
    /// Deformation grid spacing in pixels; 0 samples the control points.
    pub grid_resolution: f64,
    /// Compute the deformation overlay.
    pub display_deformation_grid: bool,
    /// Emit control-point markers in the overlay geometry.
    pub display_deformation_points: bool,
    /// Emit displacement arrows in the overlay geometry.
    pub display_deformation_arrows: bool,
    /// Border in pixels left free by the regular grid.
    pub margin: f64,
    /// Largest grid extent along any axis.
    pub max_grid_dimension: usize,
    /// Part of a multi-level transformation that is evaluated.
    pub scope: EvaluationScope,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            view_axes: ViewPlaneAxes::XY,
            view_mode: ViewMode::Target,
            apply_source_transform: true,
            invert_source_transform: false,
            grid_resolution: 0.0,
            display_deformation_grid: true,
            display_deformation_points: false,
            display_deformation_arrows: false,
            margin: 40.0,
            max_grid_dimension: 1000,
            scope: EvaluationScope::Local,
        }
    }
}

impl ViewerConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewing plane.
    pub fn with_view_axes(mut self, axes: ViewPlaneAxes) -> Self {
        self.view_axes = axes;
        self
    }

    /// Set the displayed image.
    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// Enable or disable resampling through the source transformation.
    pub fn with_apply_source_transform(mut self, apply: bool) -> Self {
        self.apply_source_transform = apply;
        self
    }

    /// Use the inverse of the source transformation.
    pub fn with_inverted_source_transform(mut self, invert: bool) -> Self {
        self.invert_source_transform = invert;
        self
    }

    /// Set the regular grid spacing; 0 switches back to control-point sampling.
    pub fn with_grid_resolution(mut self, resolution: f64) -> Self {
        self.grid_resolution = resolution;
        self
    }

    /// Enable or disable the deformation overlay.
    pub fn with_deformation_grid(mut self, display: bool) -> Self {
        self.display_deformation_grid = display;
        self
    }

    /// Enable or disable control-point markers.
    pub fn with_deformation_points(mut self, display: bool) -> Self {
        self.display_deformation_points = display;
        self
    }

    /// Enable or disable displacement arrows.
    pub fn with_deformation_arrows(mut self, display: bool) -> Self {
        self.display_deformation_arrows = display;
        self
    }

    /// Set the regular-grid margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the grid capacity bound.
    pub fn with_max_grid_dimension(mut self, max: usize) -> Self {
        self.max_grid_dimension = max;
        self
    }

    /// Set the evaluation scope.
    pub fn with_scope(mut self, scope: EvaluationScope) -> Self {
        self.scope = scope;
        self
    }

    /// Direction in which every point of an update is mapped.
    pub fn evaluation_direction(&self) -> EvaluationDirection {
        EvaluationDirection::from_invert_flag(self.invert_source_transform)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.grid_resolution.is_finite() || self.grid_resolution < 0.0 {
            return Err(ViewError::invalid_configuration(format!(
                "grid resolution must be finite and non-negative, got {}",
                self.grid_resolution
            )));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ViewError::invalid_configuration(format!(
                "margin must be finite and non-negative, got {}",
                self.margin
            )));
        }
        if self.max_grid_dimension == 0 {
            return Err(ViewError::invalid_configuration(
                "max grid dimension must be positive",
            ));
        }
        Ok(())
    }
}
