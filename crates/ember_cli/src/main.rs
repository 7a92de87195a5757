use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ember_renderer::{render_parallel, scenes, RenderConfig, Scene, DEFAULT_BUCKET_SIZE};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Log levels usable as a clap ValueEnum.
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SceneKind {
    RandomSpheres,
    PerlinSpheres,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    Final,
}

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "A CPU path tracer")]
struct Args {
    /// Scene to render
    #[arg(long, default_value = "cornell-box")]
    scene: SceneKind,

    /// Image width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "800")]
    height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100")]
    samples_per_pixel: u32,

    /// Maximum ray bounce depth
    #[arg(long, default_value = "50")]
    max_depth: u32,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Seed for scene construction (random scenes reproduce exactly)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path
    #[arg(short, long, default_value = "render.png")]
    output: String,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn build_scene(args: &Args) -> Result<Scene> {
    // The seed covers scene construction only; pixel sampling draws from
    // per-thread rngs.
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = match args.scene {
        SceneKind::RandomSpheres => scenes::random_spheres(args.width, args.height, &mut rng)?,
        SceneKind::PerlinSpheres => scenes::perlin_spheres(args.width, args.height, &mut rng)?,
        SceneKind::SimpleLight => scenes::simple_light(args.width, args.height, &mut rng)?,
        SceneKind::CornellBox => scenes::cornell_box(args.width, args.height)?,
        SceneKind::CornellSmoke => scenes::cornell_smoke(args.width, args.height)?,
        SceneKind::Final => scenes::final_scene(args.width, args.height, &mut rng)?,
    };
    Ok(scene)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.clone().into())
        .init();

    let scene = build_scene(&args)?;
    let config = RenderConfig {
        samples_per_pixel: args.samples_per_pixel,
        max_depth: args.max_depth,
        background: scene.background,
        use_sky_gradient: scene.use_sky_gradient,
    };

    log::info!(
        "rendering {:?} at {}x{}, {} spp, depth {}",
        args.scene,
        args.width,
        args.height,
        config.samples_per_pixel,
        config.max_depth
    );

    let start = Instant::now();
    let image = render_parallel(&scene.camera, &scene.world, &config, args.bucket_size);
    log::info!("render finished in {:.2}s", start.elapsed().as_secs_f32());

    image::save_buffer(
        &args.output,
        &image.to_rgba(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("failed to write {}", args.output))?;

    log::info!("wrote {}", args.output);
    Ok(())
}
