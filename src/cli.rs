use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use minibvh::{
    Camera, RenderSettings, Rgba, Scene,
    geometry::{ScreenSize, WorldPoint, WorldVector},
    render,
    scene::{
        Mesh, Shape,
        primitives::{Plane, Sphere},
    },
};
use rand::{Rng as _, SeedableRng as _, rngs::SmallRng};
use rand_distr::{Distribution as _, UnitDisc};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renders a field of random spheres around an icosahedron.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Samples per pixel
    #[arg(long, default_value_t = 16)]
    samples: u32,

    #[arg(long, default_value_t = 32)]
    tile_size: u32,

    /// Number of random spheres in the scene
    #[arg(long, default_value_t = 500)]
    spheres: usize,

    /// Seed for the scene layout
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Dump the scene hierarchy to stdout before rendering
    #[arg(long)]
    print_tree: bool,

    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug)]
enum Material {
    Ground,
    Matte(Rgba),
    Gem,
}

fn build_scene(sphere_count: usize, seed: u64) -> anyhow::Result<Scene<Material>> {
    const FIELD_RADIUS: f32 = 12.0;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut shapes: Vec<Shape<Material>> = (0..sphere_count)
        .map(|_| {
            let [x, z]: [f32; 2] = UnitDisc.sample(&mut rng);
            let radius = rng.random_range(0.1..0.4);
            let color = Rgba::new(
                rng.random_range(0.2..1.0),
                rng.random_range(0.2..1.0),
                rng.random_range(0.2..1.0),
                1.0,
            );
            Sphere::new(
                WorldPoint::new(x * FIELD_RADIUS, radius, z * FIELD_RADIUS),
                radius,
                Material::Matte(color),
            )
            .into()
        })
        .collect();
    shapes.push(Mesh::icosahedron(WorldPoint::new(0.0, 1.5, 0.0), 1.5, Material::Gem)?.into());

    let ground = Plane::new(
        WorldPoint::origin(),
        WorldVector::new(0.0, 1.0, 0.0),
        Material::Ground,
    );

    Ok(Scene::new(shapes, vec![ground])?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let scene = build_scene(args.spheres, args.seed).context("Failed to build the scene")?;
    if let Some(statistics) = scene.statistics() {
        info!("Scene hierarchy:\n{statistics}");
    }
    if args.print_tree {
        for shape in scene.shapes() {
            if let Shape::Mesh(mesh) = shape {
                info!("Mesh with {} faces:\n{}", mesh.face_count(), mesh.statistics());
            }
        }
        scene.print_tree();
    }

    let camera = Camera::builder()
        .center(WorldPoint::new(0.0, 4.0, 14.0))
        .forward(WorldVector::new(0.0, -0.3, -1.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .resolution(ScreenSize::new(args.width, args.height))
        .vertical_fov(45.0)
        .build();

    let settings = RenderSettings {
        tile_size: args
            .tile_size
            .try_into()
            .map_err(|_| anyhow!("Tile size must be positive"))?,
        sample_count: args
            .samples
            .try_into()
            .map_err(|_| anyhow!("Sample count must be positive"))?,
    };

    let bar = ProgressBar::no_length().with_style(
        ProgressStyle::with_template("{wide_bar} {pos}/{len} tiles, {elapsed} elapsed, ETA {eta}")
            .context("Invalid progress bar template")?,
    );
    let mut render_progress = render(
        scene,
        camera,
        settings,
        |_scene, ray, hit| {
            let shade = ray.direction.normalize().dot(&hit.normal.normalize()).abs();
            match hit.payload {
                Material::Ground => {
                    let checker = (hit.point.x.floor() + hit.point.z.floor()) as i64 % 2 == 0;
                    let v = (if checker { 0.8 } else { 0.4 }) * shade;
                    Rgba::new(v, v, v, 1.0)
                }
                Material::Matte(color) => color * shade,
                Material::Gem => Rgba::new(0.9 * shade, 0.3 * shade, 0.3, 1.0),
            }
        },
        {
            let bar = bar.clone();
            move |_tile| bar.inc(1)
        },
    )?;
    bar.set_length(render_progress.progress().1 as u64);

    render_progress.wait()?;
    bar.finish();

    let image = render_progress
        .image()
        .lock()
        .map_err(|_| anyhow!("Output image lock poisoned"))?;
    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    info!("Saved {}", args.output.display());

    Ok(())
}
