//! Deformation view orchestration.
//!
//! [`DeformationView`] runs one update of the deformation overlay: resolve
//! the free-form deformation, resolve the time span, sample the grid and
//! project it for the displayed image. Every update starts from scratch and
//! returns values owned by the caller.

use ritk_core::spatial::{Point2, Point3};
use ritk_core::transform::Transformation;
use crate::config::{ViewMode, ViewerConfig};
use crate::direction::EvaluationDirection;
use crate::error::{Result, ViewError};
use crate::grid::{LabelRange, SampleGrid};
use crate::overlay::{self, Arrow, LineSegment, PointMarker};
use crate::projector::project_deformation_grid;
use crate::resolve::resolve_transformation;
use crate::roi::RegionOfInterest;
use crate::sampler::{
    sample_control_points, sample_regular_grid, sample_tag_grid, SamplingOptions, TagGridSet, Viewport,
};
use crate::space::ImageSpace;
use crate::time::{resolve_time_span, TimeSpan};

/// Inputs of one update.
#[derive(Clone, Copy)]
pub struct ViewScene<'a> {
    /// Target image; its frame gives the before time.
    pub target: &'a dyn ImageSpace,
    /// Displayed target frame, may be out of range.
    pub target_frame: i64,
    /// Source image; its frame gives the after time.
    pub source: &'a dyn ImageSpace,
    /// Displayed source frame, may be out of range.
    pub source_frame: i64,
    /// Transformation from target to source.
    pub transformation: &'a dyn Transformation,
}

/// Result of one update.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    /// Direction every point was mapped in.
    pub direction: EvaluationDirection,
    /// `None` when there was no free-form deformation.
    pub time_span: Option<TimeSpan>,
    /// Region of the lattice in view, for control-point sampling only.
    pub roi: Option<RegionOfInterest>,
    pub grid: SampleGrid,
    /// Grid to draw over the displayed image, when the overlay is enabled.
    pub overlay: Option<SampleGrid>,
    pub labels: Option<LabelRange>,
}

impl ViewUpdate {
    /// Update with nothing to draw.
    pub fn empty(direction: EvaluationDirection) -> Self {
        Self {
            direction,
            time_span: None,
            roi: None,
            grid: SampleGrid::empty(),
            overlay: None,
            labels: None,
        }
    }

    /// True when no point was sampled.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

/// Screen geometry of the deformation overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayGeometry {
    pub grid_lines: Vec<LineSegment>,
    pub arrows: Vec<Arrow>,
    pub points: Vec<PointMarker>,
}

/// Deformation overlay of one viewer.
#[derive(Debug, Clone)]
pub struct DeformationView {
    config: ViewerConfig,
}

impl DeformationView {
    /// Create a view with a validated configuration.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: ViewerConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn displayed<'a>(&self, scene: &ViewScene<'a>) -> &'a dyn ImageSpace {
        match self.config.view_mode {
            ViewMode::Source => scene.source,
            _ => scene.target,
        }
    }

    fn options(&self, time_span: TimeSpan) -> SamplingOptions {
        SamplingOptions::new(time_span)
            .with_direction(self.config.evaluation_direction())
            .with_scope(self.config.scope)
            .with_max_grid_dimension(self.config.max_grid_dimension)
    }

    /// Sample the deformation grid for `scene`.
    ///
    /// Transformations without a free-form part give an empty update.
    ///
    /// The displayed image is the viewing plane: its index x/y span the plane
    /// and index z = 0 is the current slice (see [`ImageSpace`]). Control
    /// points are placed in grid cells by `view_axes`; control points that
    /// differ only along the collapsed lattice axis share a cell and the last
    /// one sampled is kept.
    ///
    /// # Errors
    /// `CapacityExceeded` when the lattice or the requested grid is larger
    /// than the configured bound.
    pub fn update(&self, scene: &ViewScene<'_>) -> Result<ViewUpdate> {
        let config = &self.config;
        let direction = config.evaluation_direction();

        let Some(resolved) = resolve_transformation(scene.transformation, config.max_grid_dimension)? else {
            tracing::debug!("Transformation has no free-form deformation, nothing to sample");
            return Ok(ViewUpdate::empty(direction));
        };

        let time_span = resolve_time_span(
            scene.target,
            scene.target_frame,
            scene.source,
            scene.source_frame,
            resolved.level(),
        );
        let options = self.options(time_span);
        let image = self.displayed(scene);

        let (grid, roi, labels) = if config.grid_resolution == 0.0 {
            let sample = sample_control_points(image, &resolved, config.view_axes, &options)?;
            (sample.grid, Some(sample.roi), sample.labels)
        } else {
            let grid = sample_regular_grid(
                image,
                &resolved,
                Viewport::of_image(image),
                config.grid_resolution,
                config.margin,
                &options,
            )?;
            (grid, None, None)
        };

        let overlay = config.display_deformation_grid.then(|| {
            project_deformation_grid(
                image,
                &grid,
                &resolved,
                config.view_mode,
                config.apply_source_transform,
                &options,
            )
        });

        tracing::debug!(
            "Deformation update: {:?} grid {}x{}, t = [{}, {}], {:?}",
            config.view_axes,
            grid.nx(),
            grid.ny(),
            time_span.t1,
            time_span.t2,
            direction
        );

        Ok(ViewUpdate {
            direction,
            time_span: Some(time_span),
            roi,
            grid,
            overlay,
            labels,
        })
    }

    /// Sample a tag grid spanned by three world-space landmarks.
    ///
    /// Returns `None` when the transformation has no free-form part.
    ///
    /// # Errors
    /// `InvalidLandmarkCount` unless exactly three landmarks are given.
    pub fn update_tag_grid(&self, scene: &ViewScene<'_>, landmarks: &[Point3]) -> Result<Option<TagGridSet>> {
        if landmarks.len() != 3 {
            return Err(ViewError::InvalidLandmarkCount {
                expected: 3,
                actual: landmarks.len(),
            });
        }

        let Some(resolved) = resolve_transformation(scene.transformation, self.config.max_grid_dimension)? else {
            tracing::debug!("Transformation has no free-form deformation, no tag grid");
            return Ok(None);
        };

        let time_span = resolve_time_span(
            scene.target,
            scene.target_frame,
            scene.source,
            scene.source_frame,
            resolved.level(),
        );
        let tags = sample_tag_grid(
            self.displayed(scene),
            &resolved,
            landmarks,
            self.config.apply_source_transform,
            &self.options(time_span),
        )?;
        Ok(Some(tags))
    }

    /// Screen geometry of an update, as enabled by the configuration.
    ///
    /// Grid lines follow the overlay grid; arrows and markers follow the
    /// sampled grid.
    pub fn overlay_geometry(&self, update: &ViewUpdate, origin: Point2) -> OverlayGeometry {
        let grid_lines = match (&update.overlay, self.config.display_deformation_grid) {
            (Some(overlay), true) => overlay::grid_lines(overlay, origin),
            _ => Vec::new(),
        };
        let arrows = if self.config.display_deformation_arrows {
            overlay::displacement_arrows(&update.grid, origin)
        } else {
            Vec::new()
        };
        let points = if self.config.display_deformation_points {
            overlay::point_markers(&update.grid, origin)
        } else {
            Vec::new()
        };
        OverlayGeometry {
            grid_lines,
            arrows,
            points,
        }
    }
}
