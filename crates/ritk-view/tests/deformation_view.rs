use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use proptest::prelude::*;
use ritk_core::image::{Image, TemporalAxis};
use ritk_core::spatial::{Direction3, Point3, Spacing3, Vector3};
use ritk_core::transform::{
    AffineTransform, BSplineTransform, FreeFormLevel, LatticeExtent, MultiLevelTransform, Transformation,
};
use ritk_core::ImageMetadata;
use ritk_view::{
    project_deformation_grid, resolve_time_span, resolve_transformation, sample_regular_grid, sample_tag_grid,
    DeformationView, EvaluationDirection, EvaluationScope, SamplingOptions, TimeSpan, ViewError, ViewMode,
    ViewPlaneAxes, ViewScene, ViewerConfig, Viewport,
};

type Backend = NdArray<f32>;

fn image(width: usize, height: usize, depth: usize) -> Image<Backend, 3> {
    let device = Default::default();
    let data = Tensor::<Backend, 3>::zeros([depth, height, width], &device);
    Image::new(data, Point3::origin(), Spacing3::uniform(1.0), Direction3::identity()).unwrap()
}

/// Static lattice whose corner control points sit on the corners of a `width × height` slice.
fn covering_ffd(nx: usize, ny: usize, width: usize, height: usize) -> BSplineTransform {
    BSplineTransform::spanning(
        [nx, ny, 1],
        Point3::origin(),
        [(width - 1) as f64, (height - 1) as f64, 0.0],
    )
    .unwrap()
}

fn shifted_ffd(nx: usize, ny: usize, width: usize, height: usize, shift: Vector3) -> BSplineTransform {
    let mut ffd = covering_ffd(nx, ny, width, height);
    ffd.fill(shift);
    ffd
}

/// Single-slice image whose index axes point along `axes` in world space.
fn plane(size: usize, origin: Point3, axes: [Vector3; 3]) -> Image<Backend, 3> {
    let device = Default::default();
    let data = Tensor::<Backend, 3>::zeros([1, size, size], &device);
    Image::new(data, origin, Spacing3::uniform(1.0), Direction3::from_axes(axes)).unwrap()
}

fn scene<'a>(
    target: &'a Image<Backend, 3>,
    source: &'a Image<Backend, 3>,
    transformation: &'a dyn Transformation,
) -> ViewScene<'a> {
    ViewScene {
        target,
        target_frame: 0,
        source,
        source_frame: 0,
        transformation,
    }
}

#[test]
fn test_affine_gives_empty_update() {
    let target = image(32, 32, 1);
    let affine = AffineTransform::translation(Vector3::new([3.0, 0.0, 0.0]));
    let view = DeformationView::new(ViewerConfig::default()).unwrap();

    let update = view.update(&scene(&target, &target, &affine)).unwrap();

    assert!(update.is_empty());
    assert_eq!(update.grid.dimensions(), (0, 0));
    assert!(update.time_span.is_none());
    assert!(update.overlay.is_none());
}

#[test]
fn test_control_point_grid_covers_lattice() {
    let target = image(20, 10, 1);
    let ffd = covering_ffd(5, 4, 20, 10);
    let view = DeformationView::new(ViewerConfig::default()).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    assert_eq!(update.grid.dimensions(), (5usize.min(20), 4usize.min(10)));
    let roi = update.roi.unwrap();
    assert_eq!((roi.i1, roi.j1, roi.i2, roi.j2), (0, 0, 4, 3));
    for ((i, j), point) in update.grid.cells() {
        let lattice = ffd.world_to_lattice(&target.index_to_world(&point.before));
        assert!((lattice[0] - i as f64).abs() < 0.5, "cell ({}, {}) -> {:?}", i, j, lattice);
        assert!((lattice[1] - j as f64).abs() < 0.5, "cell ({}, {}) -> {:?}", i, j, lattice);
    }
}

#[test]
fn test_partially_visible_lattice_is_clamped() {
    // Lattice three times the size of the image: only its first part is in view.
    let target = image(10, 10, 1);
    let ffd = BSplineTransform::spanning([10, 10, 1], Point3::origin(), [27.0, 27.0, 0.0]).unwrap();
    let view = DeformationView::new(ViewerConfig::default()).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    // Corner (9, 9) is lattice (3, 3).
    assert_eq!(update.grid.dimensions(), (4, 4));
}

#[test]
fn test_time_span_resolution() {
    let extent = LatticeExtent::new(3, 3, 1).with_frames(4);
    let geometry = ImageMetadata::new(Point3::origin(), Spacing3::uniform(5.0), Direction3::identity())
        .unwrap()
        .with_temporal_axis(TemporalAxis::new(0.0, 0.5, 4));
    let ffd = BSplineTransform::identity(extent, geometry).unwrap();
    let target = image(10, 10, 1).with_temporal_axis(TemporalAxis::new(10.0, 2.0, 5));
    let source = image(10, 10, 1).with_temporal_axis(TemporalAxis::new(0.0, 1.0, 2));

    let span = resolve_time_span(&target, -1, &source, 1, &ffd);
    assert_eq!(span, TimeSpan::new(ffd.lattice_to_time(0.0), 1.0));

    let span = resolve_time_span(&target, 2, &source, 7, &ffd);
    assert_eq!(span.t1, 14.0);
    assert_eq!(span.t2, ffd.lattice_to_time(3.0));
    assert_eq!(span.t2, 1.5);
}

#[test]
fn test_regular_grid_dimensions_and_spacing() {
    let target = image(200, 100, 1);
    let ffd = covering_ffd(4, 4, 200, 100);
    let config = ViewerConfig::default().with_grid_resolution(20.0);
    let view = DeformationView::new(config).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    assert_eq!(update.grid.dimensions(), (8, 3));
    assert!(update.roi.is_none());
    let first = update.grid.get(0, 0).unwrap().before;
    let next_x = update.grid.get(1, 0).unwrap().before;
    let next_y = update.grid.get(0, 1).unwrap().before;
    assert_eq!(first, Point3::new([30.0, 30.0, 0.0]));
    assert!((next_x[0] - first[0] - 20.0).abs() < 1e-12);
    assert!((next_y[1] - first[1] - 20.0).abs() < 1e-12);
}

#[test]
fn test_regular_grid_degenerate_requests_are_empty() {
    let target = image(50, 50, 1);
    let ffd = covering_ffd(3, 3, 50, 50);
    let resolved = resolve_transformation(&ffd, 1000).unwrap().unwrap();
    let options = SamplingOptions::new(TimeSpan::default());
    let viewport = Viewport::new(50.0, 50.0);

    assert!(sample_regular_grid(&target, &resolved, viewport, 0.0, 40.0, &options).unwrap().is_empty());
    assert!(sample_regular_grid(&target, &resolved, viewport, -5.0, 40.0, &options).unwrap().is_empty());
    assert!(sample_regular_grid(&target, &resolved, viewport, 10.0, 60.0, &options).unwrap().is_empty());
    assert!(sample_regular_grid(&target, &resolved, viewport, 30.0, 40.0, &options).unwrap().is_empty());
}

#[test]
fn test_tag_grid_over_unit_square() {
    let target = image(4, 4, 16);
    let ffd = BSplineTransform::spanning([3, 3, 3], Point3::origin(), [3.0, 3.0, 15.0]).unwrap();
    let resolved = resolve_transformation(&ffd, 1000).unwrap().unwrap();
    let landmarks = [
        Point3::new([0.0, 0.0, 0.0]),
        Point3::new([1.0, 0.0, 6.0]),
        Point3::new([1.0, 1.0, 12.0]),
    ];

    let tags = sample_tag_grid(&target, &resolved, &landmarks, true, &SamplingOptions::new(TimeSpan::default()))
        .unwrap();

    assert_eq!(tags.len(), 13);
    for (k, slice) in tags.slices.iter().enumerate() {
        assert_eq!(slice.z, k as i64);
        assert_eq!(slice.grid.dimensions(), (13, 13));
        let first = slice.grid.get(0, 0).unwrap();
        let last = slice.grid.get(12, 12).unwrap();
        assert!((first.before[0] - 0.0).abs() < 1e-12 && (first.before[1] - 0.0).abs() < 1e-12);
        assert!((last.before[0] - 1.0).abs() < 1e-12 && (last.before[1] - 1.0).abs() < 1e-12);
        assert_eq!(first.before[2], k as f64);
        // Identity lattice leaves every point in place.
        assert!(last.after.distance(&last.before) < 1e-12);
    }
    assert!(tags.slice(12).is_some());
    assert!(tags.slice(13).is_none());
}

#[test]
fn test_tag_grid_step_and_apply_flag() {
    let target = image(8, 8, 64);
    let ffd = shifted_ffd(3, 3, 8, 8, Vector3::new([1.0, 0.0, 0.0]));
    let resolved = resolve_transformation(&ffd, 1000).unwrap().unwrap();
    let landmarks = [
        Point3::new([1.0, 1.0, 2.0]),
        Point3::new([5.0, 1.0, 30.0]),
        Point3::new([5.0, 5.0, 50.0]),
    ];
    let options = SamplingOptions::new(TimeSpan::default());

    // (50 - 2) / 12 = 4
    let tags = sample_tag_grid(&target, &resolved, &landmarks, false, &options).unwrap();
    let zs: Vec<i64> = tags.slices.iter().map(|s| s.z).collect();
    assert_eq!(zs, (2..=50).step_by(4).collect::<Vec<_>>());
    for slice in &tags.slices {
        assert!(slice.grid.iter().all(|p| p.after == p.before));
    }

    let applied = sample_tag_grid(&target, &resolved, &landmarks, true, &options).unwrap();
    let p = applied.slices[0].grid.get(3, 4).unwrap();
    assert!((p.after[0] - p.before[0] - 1.0).abs() < 1e-9);
}

#[test]
fn test_tag_grid_step_is_rounded() {
    let target = image(8, 8, 19);
    let ffd = covering_ffd(3, 3, 8, 8);
    let resolved = resolve_transformation(&ffd, 1000).unwrap().unwrap();
    let landmarks = [
        Point3::new([1.0, 1.0, 0.0]),
        Point3::new([5.0, 1.0, 9.0]),
        Point3::new([5.0, 5.0, 18.0]),
    ];

    // 18 / 12 = 1.5 rounds to 2
    let tags = sample_tag_grid(&target, &resolved, &landmarks, false, &SamplingOptions::new(TimeSpan::default()))
        .unwrap();
    let zs: Vec<i64> = tags.slices.iter().map(|s| s.z).collect();
    assert_eq!(zs, (0..=18).step_by(2).collect::<Vec<_>>());
    assert_eq!(tags.len(), 10);
}

#[test]
fn test_tag_grid_rejects_non_finite_landmarks() {
    let target = image(8, 8, 8);
    let ffd = covering_ffd(3, 3, 8, 8);
    let view = DeformationView::new(ViewerConfig::default()).unwrap();
    let ffd_scene = scene(&target, &target, &ffd);

    let landmarks = [
        Point3::new([f64::NAN, 1.0, 0.0]),
        Point3::new([5.0, 1.0, 2.0]),
        Point3::new([5.0, 5.0, 4.0]),
    ];
    let err = view.update_tag_grid(&ffd_scene, &landmarks).unwrap_err();
    assert_eq!(err, ViewError::NonFiniteLandmark { index: 0 });

    let landmarks = [
        Point3::new([1.0, 1.0, 0.0]),
        Point3::new([5.0, 1.0, 2.0]),
        Point3::new([5.0, f64::INFINITY, 4.0]),
    ];
    let err = view.update_tag_grid(&ffd_scene, &landmarks).unwrap_err();
    assert_eq!(err, ViewError::NonFiniteLandmark { index: 2 });
}

#[test]
fn test_tag_grid_requires_three_landmarks() {
    let target = image(8, 8, 8);
    let ffd = covering_ffd(3, 3, 8, 8);
    let view = DeformationView::new(ViewerConfig::default()).unwrap();
    let ffd_scene = scene(&target, &target, &ffd);

    for count in [2usize, 4] {
        let landmarks = vec![Point3::origin(); count];
        let err = view.update_tag_grid(&ffd_scene, &landmarks).unwrap_err();
        assert_eq!(err, ViewError::InvalidLandmarkCount { expected: 3, actual: count });
    }

    let affine = AffineTransform::identity();
    let landmarks = [Point3::origin(); 3];
    let none = view.update_tag_grid(&scene(&target, &target, &affine), &landmarks).unwrap();
    assert!(none.is_none());
}

#[test]
fn test_overlay_in_source_view_uses_complement() {
    let target = image(20, 20, 1);
    let ffd = shifted_ffd(4, 4, 20, 20, Vector3::new([2.0, -1.0, 0.0]));
    let resolved = resolve_transformation(&ffd, 1000).unwrap().unwrap();
    let view = DeformationView::new(ViewerConfig::default().with_view_mode(ViewMode::Source)).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();
    let overlay = update.overlay.as_ref().unwrap();
    assert_eq!(overlay.dimensions(), update.grid.dimensions());
    for (sample, projected) in update.grid.iter().zip(overlay.iter()) {
        assert_eq!(projected.before, sample.before);
        let expected = Point3::new([sample.before[0] - 2.0, sample.before[1] + 1.0, sample.before[2]]);
        assert!(projected.after.distance(&expected) < 1e-6, "{:?} vs {:?}", projected.after, expected);
        assert!((sample.after[0] - sample.before[0] - 2.0).abs() < 1e-9);
    }

    // Without the source transformation applied, the overlay is the sampled grid.
    let options = SamplingOptions::new(update.time_span.unwrap());
    let plain = project_deformation_grid(&target, &update.grid, &resolved, ViewMode::Source, false, &options);
    assert_eq!(plain, update.grid);
    let plain = project_deformation_grid(&target, &update.grid, &resolved, ViewMode::Target, true, &options);
    assert_eq!(plain, update.grid);
}

#[test]
fn test_overlay_can_be_disabled() {
    let target = image(20, 20, 1);
    let ffd = covering_ffd(4, 4, 20, 20);
    let view = DeformationView::new(ViewerConfig::default().with_deformation_grid(false)).unwrap();
    let update = view.update(&scene(&target, &target, &ffd)).unwrap();
    assert!(!update.is_empty());
    assert!(update.overlay.is_none());
}

#[test]
fn test_inverse_direction_is_used_throughout() {
    let target = image(20, 20, 1);
    let ffd = shifted_ffd(4, 4, 20, 20, Vector3::new([1.0, 0.0, 0.0]));
    let config = ViewerConfig::default()
        .with_inverted_source_transform(true)
        .with_view_mode(ViewMode::Source);
    let view = DeformationView::new(config).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    assert_eq!(update.direction, EvaluationDirection::Inverse);
    let sample = update.grid.get(1, 1).unwrap();
    assert!((sample.after[0] - sample.before[0] + 1.0).abs() < 1e-6);
    let projected = update.overlay.as_ref().unwrap().get(1, 1).unwrap();
    assert!((projected.after[0] - projected.before[0] - 1.0).abs() < 1e-9);
}

#[test]
fn test_capacity_bound_is_recoverable() {
    let target = image(20, 20, 1);
    let ffd = covering_ffd(12, 4, 20, 20);
    let view = DeformationView::new(ViewerConfig::default().with_max_grid_dimension(10)).unwrap();

    let err = view.update(&scene(&target, &target, &ffd)).unwrap_err();
    assert_eq!(err, ViewError::CapacityExceeded { axis: "x", extent: 12, max: 10 });

    let view = DeformationView::new(ViewerConfig::default().with_grid_resolution(0.5).with_max_grid_dimension(10))
        .unwrap();
    let wide = image(200, 200, 1);
    let ffd = covering_ffd(4, 4, 200, 200);
    assert!(matches!(
        view.update(&scene(&wide, &wide, &ffd)),
        Err(ViewError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_invalid_configuration_rejected() {
    let err = DeformationView::new(ViewerConfig::default().with_grid_resolution(-2.0)).unwrap_err();
    assert!(matches!(err, ViewError::InvalidConfiguration(_)));
}

#[test]
fn test_multi_level_scope() {
    let target = image(20, 20, 1);
    let multi = MultiLevelTransform::new(
        AffineTransform::translation(Vector3::new([0.0, 3.0, 0.0])),
        vec![
            shifted_ffd(3, 3, 20, 20, Vector3::new([1.0, 0.0, 0.0])),
            shifted_ffd(5, 5, 20, 20, Vector3::new([0.5, 0.0, 0.0])),
        ],
    );

    let local = DeformationView::new(ViewerConfig::default()).unwrap();
    let update = local.update(&scene(&target, &target, &multi)).unwrap();
    assert_eq!(update.grid.dimensions(), (5, 5));
    let p = update.grid.get(2, 2).unwrap();
    assert!(((p.after - p.before).norm() - 0.5).abs() < 1e-9);

    let composed = DeformationView::new(ViewerConfig::default().with_scope(EvaluationScope::Composed)).unwrap();
    let update = composed.update(&scene(&target, &target, &multi)).unwrap();
    let p = update.grid.get(2, 2).unwrap();
    let shift = p.after - p.before;
    assert!((shift[0] - 1.5).abs() < 1e-9);
    assert!((shift[1] - 3.0).abs() < 1e-9);
}

#[test]
fn test_non_finite_points_stay_in_place() {
    let target = image(20, 20, 1);
    let mut ffd = covering_ffd(4, 4, 20, 20);
    ffd.set_coefficient(0, 0, 0, 0, Vector3::new([f64::NAN, 0.0, 0.0]));
    let view = DeformationView::new(ViewerConfig::default()).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    let corner = update.grid.get(0, 0).unwrap();
    assert_eq!(corner.after, corner.before);
    assert!(update.grid.degenerate_points() > 0);
    assert!(update.grid.iter().all(|p| p.after.is_finite()));
}

#[test]
fn test_xz_plane_samples_lattice_slice() {
    // Index x -> world x, index y -> world z; the plane sits at world y = 10.
    let x = Vector3::new([1.0, 0.0, 0.0]);
    let y = Vector3::new([0.0, 1.0, 0.0]);
    let z = Vector3::new([0.0, 0.0, 1.0]);
    let target = plane(21, Point3::new([0.0, 10.0, 0.0]), [x, z, -y]);
    let mut ffd = BSplineTransform::spanning([3, 4, 3], Point3::origin(), [20.0, 30.0, 20.0]).unwrap();
    ffd.fill(Vector3::new([1.0, 0.0, 0.0]));
    let view = DeformationView::new(ViewerConfig::default().with_view_axes(ViewPlaneAxes::XZ)).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    let roi = update.roi.unwrap();
    assert_eq!((roi.j1, roi.j2), (1, 1));
    assert_eq!(update.grid.dimensions(), (3, 3));
    for ((m, n), point) in update.grid.cells() {
        let expected = Point3::new([10.0 * m as f64, 10.0 * n as f64, 0.0]);
        assert!(point.before.distance(&expected) < 1e-9, "({}, {}) -> {:?}", m, n, point.before);
        let shift = point.after - point.before;
        assert!((shift[0] - 1.0).abs() < 1e-9 && shift[1].abs() < 1e-9 && shift[2].abs() < 1e-9);
    }
}

#[test]
fn test_yz_plane_samples_lattice_slice() {
    // Index x -> world y, index y -> world z; the plane sits at world x = 10.
    let x = Vector3::new([1.0, 0.0, 0.0]);
    let y = Vector3::new([0.0, 1.0, 0.0]);
    let z = Vector3::new([0.0, 0.0, 1.0]);
    let target = plane(21, Point3::new([10.0, 0.0, 0.0]), [y, z, x]);
    let mut ffd = BSplineTransform::spanning([3, 3, 3], Point3::origin(), [20.0, 20.0, 20.0]).unwrap();
    ffd.fill(Vector3::new([0.0, 1.0, 0.0]));
    let view = DeformationView::new(ViewerConfig::default().with_view_axes(ViewPlaneAxes::YZ)).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    let roi = update.roi.unwrap();
    assert_eq!((roi.i1, roi.i2), (1, 1));
    assert_eq!(update.grid.dimensions(), (3, 3));
    for ((m, n), point) in update.grid.cells() {
        let expected = Point3::new([10.0 * m as f64, 10.0 * n as f64, 0.0]);
        assert!(point.before.distance(&expected) < 1e-9, "({}, {}) -> {:?}", m, n, point.before);
        assert!((point.after[0] - point.before[0] - 1.0).abs() < 1e-9);
        assert!((point.after[1] - point.before[1]).abs() < 1e-9);
    }
}

#[test]
fn test_collapsed_axis_keeps_last_control_point() {
    // An XY slice viewed as XZ: the lattice rows along y collapse into one cell each.
    let target = image(21, 21, 1);
    let mut ffd = BSplineTransform::spanning([3, 3, 3], Point3::origin(), [20.0, 20.0, 20.0]).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            ffd.set_label(i, j, 0, j as i32);
        }
    }
    let view = DeformationView::new(ViewerConfig::default().with_view_axes(ViewPlaneAxes::XZ)).unwrap();

    let update = view.update(&scene(&target, &target, &ffd)).unwrap();

    assert_eq!(update.grid.dimensions(), (3, 1));
    for ((m, _), point) in update.grid.cells() {
        assert_eq!(point.label, 2);
        assert!(point.before.distance(&Point3::new([10.0 * m as f64, 20.0, 0.0])) < 1e-9);
    }
    let labels = update.labels.unwrap();
    assert_eq!((labels.min, labels.max), (0, 2));
}

#[test]
fn test_time_varying_lattice_follows_source_frame() {
    // Frame l of the lattice shifts every point by l + 1 along x.
    let extent = LatticeExtent::new(3, 3, 1).with_frames(3);
    let geometry = ImageMetadata::new(Point3::origin(), Spacing3::new([10.0, 10.0, 1.0]), Direction3::identity())
        .unwrap()
        .with_temporal_axis(TemporalAxis::new(0.0, 1.0, 3));
    let mut ffd = BSplineTransform::identity(extent, geometry).unwrap();
    for l in 0..3 {
        for j in 0..3 {
            for i in 0..3 {
                ffd.set_coefficient(i, j, 0, l, Vector3::new([(l + 1) as f64, 0.0, 0.0]));
            }
        }
    }
    let target = image(21, 21, 1).with_temporal_axis(TemporalAxis::new(0.0, 1.0, 3));
    let source = image(21, 21, 1).with_temporal_axis(TemporalAxis::new(0.0, 1.0, 3));
    let view = DeformationView::new(ViewerConfig::default()).unwrap();

    let shift_at = |source_frame: i64| {
        let update = view
            .update(&ViewScene {
                target: &target,
                target_frame: 0,
                source: &source,
                source_frame,
                transformation: &ffd,
            })
            .unwrap();
        assert_eq!(update.grid.dimensions(), (3, 3));
        let point = update.grid.get(1, 1).unwrap();
        (update.time_span.unwrap(), point.after[0] - point.before[0])
    };

    let (span, shift) = shift_at(0);
    assert_eq!(span, TimeSpan::new(0.0, 0.0));
    assert!((shift - 1.0).abs() < 1e-9);

    let (span, shift) = shift_at(1);
    assert_eq!(span.t2, 1.0);
    assert!((shift - 2.0).abs() < 1e-9);

    // Out of range: the last temporal control point.
    let (span, shift) = shift_at(9);
    assert_eq!(span.t2, 2.0);
    assert!((shift - 3.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn test_forward_then_inverse_recovers_before_points(
        sx in -3.0f64..3.0, sy in -3.0f64..3.0,
        nx in 2usize..8, ny in 2usize..8
    ) {
        let target = image(32, 24, 1);
        let ffd = shifted_ffd(nx, ny, 32, 24, Vector3::new([sx, sy, 0.0]));
        let view = DeformationView::new(ViewerConfig::default()).unwrap();

        let update = view.update(&scene(&target, &target, &ffd)).unwrap();
        prop_assert_eq!(update.grid.dimensions(), (nx, ny));

        for point in update.grid.iter() {
            let before = target.index_to_world(&point.before);
            let after = target.index_to_world(&point.after);
            let back = EvaluationDirection::Inverse.apply(&ffd, &after, 0.0, 0.0);
            prop_assert!(back.is_some());
            let back = back.unwrap();
            let scale = 1.0 + (before - Point3::origin()).norm();
            prop_assert!(back.distance(&before) <= 1e-6 * scale, "{:?} vs {:?}", back, before);
        }
    }
}
