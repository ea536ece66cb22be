//! Deformation grid sampling for ritk viewers.
//!
//! Given the image shown in a viewer and a transformation with a free-form
//! part, this crate samples a grid of points on the viewing plane, maps them
//! through the deformation and returns before/after point sets plus the
//! screen geometry a renderer needs to draw them.
//!
//! The entry point is [`DeformationView`]; the individual stages
//! ([`resolve_transformation`], [`resolve_time_span`], the samplers in
//! [`sampler`] and [`project_deformation_grid`]) are public as well.

pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod overlay;
pub mod projector;
pub mod resolve;
pub mod roi;
pub mod sampler;
pub mod space;
pub mod time;
pub mod view;

pub use config::{EvaluationScope, ViewMode, ViewerConfig};
pub use direction::EvaluationDirection;
pub use error::{Result, ViewError};
pub use grid::{LabelRange, PointStatus, SampleGrid, SamplePoint, ViewPlaneAxes};
pub use projector::project_deformation_grid;
pub use resolve::{resolve_transformation, ResolvedDeformation};
pub use roi::{clamp_region, RegionOfInterest};
pub use sampler::{
    sample_control_points, sample_regular_grid, sample_tag_grid, ControlPointSample, SamplingOptions,
    TagGridSet, TagGridSlice, Viewport,
};
pub use space::ImageSpace;
pub use time::{resolve_time_span, TimeSpan};
pub use view::{DeformationView, OverlayGeometry, ViewScene, ViewUpdate};
