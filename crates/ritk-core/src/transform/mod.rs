//! Transform types and operations.
//!
//! This module provides the transformation traits consumed by viewers and
//! the translation, affine, B-spline and multi-level implementations of them.

pub mod trait_;
pub mod lattice;
pub mod translation;
pub mod affine;
pub mod bspline;
pub mod multi_level;

pub use trait_::{Transformation, FreeFormLevel, MultiLevel};
pub use lattice::{ControlPointStatus, LatticeExtent};
pub use translation::TranslationTransform;
pub use affine::AffineTransform;
pub use bspline::BSplineTransform;
pub use multi_level::MultiLevelTransform;
