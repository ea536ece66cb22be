//! Time resolution for time-varying deformations.

use serde::{Serialize, Deserialize};
use ritk_core::transform::FreeFormLevel;
use crate::space::ImageSpace;

/// Times at which the before- and after-points are observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub t1: f64,
    pub t2: f64,
}

impl TimeSpan {
    pub fn new(t1: f64, t2: f64) -> Self {
        Self { t1, t2 }
    }
}

impl Default for TimeSpan {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

fn frame_time<I: ImageSpace + ?Sized>(image: &I, frame: i64) -> Option<f64> {
    let frame = usize::try_from(frame).ok()?;
    (frame < image.frame_count()).then(|| image.frame_to_time(frame))
}

/// Resolve the time span of one update.
///
/// A frame inside `[0, frame_count)` of its image takes that frame's time.
/// Otherwise the before side falls back to the first temporal control point
/// of `level` and the after side to its last.
///
/// # Arguments
/// * `before_image` - Image the before-points belong to (the target)
/// * `before_frame` - Displayed frame of `before_image`, may be out of range
/// * `after_image` - Image the after-points belong to (the source)
/// * `after_frame` - Displayed frame of `after_image`, may be out of range
/// * `level` - Free-form level providing the fallback times
pub fn resolve_time_span<T, S>(
    before_image: &T,
    before_frame: i64,
    after_image: &S,
    after_frame: i64,
    level: &dyn FreeFormLevel,
) -> TimeSpan
where
    T: ImageSpace + ?Sized,
    S: ImageSpace + ?Sized,
{
    let last = level.lattice_extent().nt.saturating_sub(1) as f64;
    let t1 = frame_time(before_image, before_frame).unwrap_or_else(|| level.lattice_to_time(0.0));
    let t2 = frame_time(after_image, after_frame).unwrap_or_else(|| level.lattice_to_time(last));
    TimeSpan::new(t1, t2)
}
