//! Overlay geometry for a renderer.
//!
//! Everything here is plain 2D geometry in screen pixels: image-index
//! positions shifted by the screen position of the viewer's first pixel.
//! How the geometry is rasterized is up to the caller.

use burn::tensor::backend::Backend;
use serde::{Serialize, Deserialize};
use ritk_core::spatial::{Point2, Point3};
use ritk_core::transform::Transformation;
use ritk_core::Image;
use crate::error::Result;
use crate::grid::{PointStatus, SampleGrid};
use crate::space::ImageSpace;

/// Arrows shorter than this get no head.
const MIN_ARROW_LENGTH: f64 = 0.01;
/// Ratio of arrowhead length to its half-width.
const ARROW_FAT_FACTOR: f64 = 2.0;
/// Half-length of a landmark cross in pixels.
const LANDMARK_CROSS_SIZE: f64 = 8.0;
/// Half-size of an ROI corner handle in pixels.
const ROI_HANDLE_SIZE: f64 = 2.0;

/// Straight line between two screen points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point2,
    pub end: Point2,
}

impl LineSegment {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// Displacement arrow from a before-point to its after-point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub shaft: LineSegment,
    /// Filled triangle at the tip; `None` for near-zero displacements.
    pub head: Option<[Point2; 3]>,
}

/// Control point drawn in its status colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub position: Point2,
    pub status: PointStatus,
    pub label: i32,
}

/// Cross drawn on a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossMarker {
    pub horizontal: LineSegment,
    pub vertical: LineSegment,
}

/// Region-of-interest marker: a handle at each corner and the region between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiMarker {
    pub first_handle: [Point2; 4],
    pub second_handle: [Point2; 4],
    pub region: [Point2; 4],
}

/// Screen position of an image index.
fn screen(origin: Point2, index: &Point3) -> Point2 {
    Point2::new([origin[0] + index[0], origin[1] + index[1]])
}

/// Lines joining horizontal and vertical neighbours of the after-points of `grid`.
pub fn grid_lines(grid: &SampleGrid, origin: Point2) -> Vec<LineSegment> {
    let (nx, ny) = grid.dimensions();
    let mut lines = Vec::new();
    let mut join = |a: (usize, usize), b: (usize, usize)| {
        if let (Some(p), Some(q)) = (grid.get(a.0, a.1), grid.get(b.0, b.1)) {
            lines.push(LineSegment::new(screen(origin, &p.after), screen(origin, &q.after)));
        }
    };
    for j in 0..ny {
        for i in 0..nx.saturating_sub(1) {
            join((i, j), (i + 1, j));
        }
    }
    for j in 0..ny.saturating_sub(1) {
        for i in 0..nx {
            join((i, j), (i, j + 1));
        }
    }
    lines
}

fn arrow_head(tip: Point2, dx: f64, dy: f64) -> Option<[Point2; 3]> {
    let length = (dx * dx + dy * dy).sqrt();
    if !length.is_finite() || length <= MIN_ARROW_LENGTH {
        return None;
    }
    let anchor_width = length / 6.0;
    let factor = ARROW_FAT_FACTOR * anchor_width / length;
    let (back_x, back_y) = (dx * factor, dy * factor);
    let (side_x, side_y) = (
        dy * factor / (2.0 * ARROW_FAT_FACTOR),
        -dx * factor / (2.0 * ARROW_FAT_FACTOR),
    );
    Some([
        tip,
        Point2::new([tip[0] - back_x + side_x, tip[1] - back_y + side_y]),
        Point2::new([tip[0] - back_x - side_x, tip[1] - back_y - side_y]),
    ])
}

/// One arrow per sample, from before-point to after-point.
pub fn displacement_arrows(grid: &SampleGrid, origin: Point2) -> Vec<Arrow> {
    grid.iter()
        .map(|p| {
            let start = screen(origin, &p.before);
            let end = screen(origin, &p.after);
            Arrow {
                shaft: LineSegment::new(start, end),
                head: arrow_head(end, p.after[0] - p.before[0], p.after[1] - p.before[1]),
            }
        })
        .collect()
}

/// One marker per sample at its before-point.
pub fn point_markers(grid: &SampleGrid, origin: Point2) -> Vec<PointMarker> {
    grid.iter()
        .map(|p| PointMarker {
            position: screen(origin, &p.before),
            status: p.status,
            label: p.label,
        })
        .collect()
}

/// Crosses on the world-space `landmarks` that fall inside `image`.
///
/// Source landmarks are given with `source_transformation`; they are mapped
/// back into the target frame through its inverse first, and dropped when no
/// inverse is found.
pub fn landmark_crosses<I: ImageSpace + ?Sized>(
    image: &I,
    landmarks: &[Point3],
    source_transformation: Option<&dyn Transformation>,
    origin: Point2,
) -> Vec<CrossMarker> {
    landmarks
        .iter()
        .filter_map(|p| match source_transformation {
            Some(t) => t.inverse_point(p, 0.0, 0.0),
            None => Some(*p),
        })
        .filter(|p| image.is_in_fov(p))
        .map(|p| {
            let c = screen(origin, &image.world_to_index(&p));
            let s = LANDMARK_CROSS_SIZE;
            CrossMarker {
                horizontal: LineSegment::new(Point2::new([c[0] - s, c[1]]), Point2::new([c[0] + s, c[1]])),
                vertical: LineSegment::new(Point2::new([c[0], c[1] - s]), Point2::new([c[0], c[1] + s])),
            }
        })
        .collect()
}

fn handle(centre: Point2) -> [Point2; 4] {
    let s = ROI_HANDLE_SIZE;
    [
        Point2::new([centre[0] - s, centre[1] - s]),
        Point2::new([centre[0] + s, centre[1] - s]),
        Point2::new([centre[0] + s, centre[1] + s]),
        Point2::new([centre[0] - s, centre[1] + s]),
    ]
}

/// Marker for the region between two world-space corners.
pub fn roi_marker<I: ImageSpace + ?Sized>(image: &I, first: &Point3, second: &Point3, origin: Point2) -> RoiMarker {
    let a = screen(origin, &image.world_to_index(first));
    let b = screen(origin, &image.world_to_index(second));
    RoiMarker {
        first_handle: handle(a),
        second_handle: handle(b),
        region: [
            a,
            Point2::new([a[0], b[1]]),
            b,
            Point2::new([b[0], a[1]]),
        ],
    }
}

/// Contour segments where slice 0 of `image` crosses `value`.
///
/// Each pair of horizontal or vertical neighbours on opposite sides of
/// `value` contributes one unit segment on the pixel border between them.
pub fn isoline_segments<B: Backend>(image: &Image<B, 3>, value: f32, origin: Point2) -> Result<Vec<LineSegment>> {
    let width = image.extent(0);
    let height = image.extent(1);
    let values = image.values()?;
    let at = |i: usize, j: usize| values[j * width + i];
    let crosses = |a: f32, b: f32| (a <= value && b > value) || (a > value && b <= value);
    let point = |x: f64, y: f64| Point2::new([origin[0] + x, origin[1] + y]);

    let mut segments = Vec::new();
    for j in 0..height.saturating_sub(1) {
        for i in 0..width.saturating_sub(1) {
            let (x, y) = (i as f64, j as f64);
            if crosses(at(i, j), at(i + 1, j)) {
                segments.push(LineSegment::new(point(x + 0.5, y - 0.5), point(x + 0.5, y + 0.5)));
            }
            if crosses(at(i, j), at(i, j + 1)) {
                segments.push(LineSegment::new(point(x + 0.5, y + 0.5), point(x - 0.5, y + 0.5)));
            }
        }
    }
    tracing::debug!("Isoline {} has {} segments", value, segments.len());
    Ok(segments)
}
