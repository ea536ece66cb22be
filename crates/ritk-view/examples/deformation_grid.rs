//! Deformation Grid Example
//!
//! Builds a synthetic slice and a two-level free-form deformation, then
//! samples the deformation the way a viewer would: over the control points,
//! over a regular grid, and as a landmark-spanned tag grid.
//!
//! Usage:
//!   cargo run -p ritk-view --example deformation_grid

use burn::tensor::{Shape, Tensor, TensorData};
use burn_ndarray::NdArray;
use ritk_core::image::Image;
use ritk_core::spatial::{Direction3, Point2, Point3, Spacing3, Vector3};
use ritk_core::transform::{AffineTransform, BSplineTransform, MultiLevelTransform};
use ritk_view::overlay::isoline_segments;
use ritk_view::{DeformationView, EvaluationScope, ViewMode, ViewScene, ViewerConfig};

type Backend = NdArray<f32>;

const WIDTH: usize = 128;
const HEIGHT: usize = 96;

/// Bright disc in the middle of a dark slice.
fn disc_image() -> anyhow::Result<Image<Backend, 3>> {
    let device = Default::default();
    let (cx, cy, r) = (WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0, 30.0f32);
    let values: Vec<f32> = (0..WIDTH * HEIGHT)
        .map(|idx| {
            let (x, y) = ((idx % WIDTH) as f32, (idx / WIDTH) as f32);
            if (x - cx).powi(2) + (y - cy).powi(2) < r * r { 100.0 } else { 0.0 }
        })
        .collect();
    let data = Tensor::<Backend, 3>::from_data(TensorData::new(values, Shape::new([1, HEIGHT, WIDTH])), &device);
    Ok(Image::new(data, Point3::origin(), Spacing3::uniform(1.0), Direction3::identity())?)
}

/// Swirl-like lattice displacement scaled by `amplitude`.
fn swirl_level(n: usize, amplitude: f64) -> anyhow::Result<BSplineTransform> {
    let size = [(WIDTH - 1) as f64, (HEIGHT - 1) as f64, 0.0];
    let mut level = BSplineTransform::spanning([n, n, 1], Point3::origin(), size)?;
    let centre = (n - 1) as f64 / 2.0;
    for j in 0..n {
        for i in 0..n {
            let (dx, dy) = (i as f64 - centre, j as f64 - centre);
            level.set_coefficient(i, j, 0, 0, Vector3::new([-dy * amplitude, dx * amplitude, 0.0]));
        }
    }
    Ok(level)
}

fn main() -> anyhow::Result<()> {
    println!("RITK Deformation Grid Example");
    println!("=============================\n");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let image = disc_image()?;
    let transformation = MultiLevelTransform::new(
        AffineTransform::translation(Vector3::new([2.0, 0.0, 0.0])),
        vec![swirl_level(4, 1.5)?, swirl_level(7, 0.8)?],
    );
    let scene = ViewScene {
        target: &image,
        target_frame: 0,
        source: &image,
        source_frame: 0,
        transformation: &transformation,
    };
    let origin = Point2::new([0.0, 0.0]);

    // 1. Control points of the finest level
    let view = DeformationView::new(ViewerConfig::default().with_deformation_points(true))?;
    let update = view.update(&scene)?;
    let (nx, ny) = update.grid.dimensions();
    println!("Control-point grid: {}x{}, ROI {:?}", nx, ny, update.roi);
    if let Some(p) = update.grid.get(nx / 2, ny / 2) {
        println!("  centre point {:?} -> {:?}", p.before.to_array(), p.after.to_array());
    }
    let geometry = view.overlay_geometry(&update, origin);
    println!(
        "  overlay: {} grid lines, {} point markers",
        geometry.grid_lines.len(),
        geometry.points.len()
    );

    // 2. Regular grid through the whole transformation, shown over the source
    let config = ViewerConfig::default()
        .with_grid_resolution(16.0)
        .with_scope(EvaluationScope::Composed)
        .with_view_mode(ViewMode::Source)
        .with_deformation_arrows(true);
    let view = DeformationView::new(config)?;
    let update = view.update(&scene)?;
    println!(
        "\nRegular grid: {:?}, {} degenerate points",
        update.grid.dimensions(),
        update.grid.degenerate_points()
    );
    let geometry = view.overlay_geometry(&update, origin);
    let longest = geometry
        .arrows
        .iter()
        .map(|a| a.shaft.length())
        .fold(0.0f64, f64::max);
    println!("  {} arrows, longest {:.2} px", geometry.arrows.len(), longest);

    // 3. Tag grid over the disc
    let landmarks = [
        Point3::new([40.0, 24.0, 0.0]),
        Point3::new([88.0, 24.0, 0.0]),
        Point3::new([88.0, 72.0, 0.0]),
    ];
    if let Some(tags) = view.update_tag_grid(&scene, &landmarks)? {
        for slice in &tags.slices {
            println!("\nTag grid at z = {}: {:?}", slice.z, slice.grid.dimensions());
        }
    }

    // 4. Disc outline
    let contour = isoline_segments(&image, 50.0, origin)?;
    println!("\nIsoline at 50: {} segments", contour.len());

    Ok(())
}
