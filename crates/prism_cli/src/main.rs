//! prism: render a scene to an image file.
//!
//! Loads a JSON scene description (or the built-in demo scene), renders it
//! on all cores and writes a PNG or binary PPM depending on the output
//! extension. With `--time-limit` the render is stopped cooperatively and
//! the partial frame is saved.

mod description;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use description::SceneDescription;
use prism_tracer::{PixelBuffer, Renderer, ShadingMode};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Whitted,
    PathTraced,
}

impl From<Mode> for ShadingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Whitted => ShadingMode::Whitted,
            Mode::PathTraced => ShadingMode::PathTraced,
        }
    }
}

#[derive(Parser)]
#[command(name = "prism")]
#[command(version)]
#[command(about = "Octree-accelerated Whitted and path-traced renderer")]
struct Cli {
    /// JSON scene description (the built-in demo scene when omitted)
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output image; `.ppm` writes binary PPM, anything else goes through `image`
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 500)]
    width: u32,

    #[arg(long, default_value_t = 500)]
    height: u32,

    /// Override the scene's shading mode
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Override the scene's samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Override the scene's frame seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the render after this many seconds and save what is done
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<f64>,

    /// Apply gamma 2.0 when converting to 8 bits
    #[arg(long)]
    gamma: bool,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

fn load_description(path: Option<&Path>) -> Result<SceneDescription> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read scene file {}", path.display()))?;
            SceneDescription::from_json(&json)
                .with_context(|| format!("Failed to parse scene file {}", path.display()))
        }
        None => {
            log::info!("No scene file given, using the demo scene");
            Ok(SceneDescription::demo())
        }
    }
}

fn save_ppm(image: &PixelBuffer, path: &Path, gamma: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "P6\n{} {}\n255\n", image.width, image.height)?;
    writer.write_all(&image.to_rgb8(gamma))?;
    writer.flush()?;
    Ok(())
}

fn save_image(image: &PixelBuffer, path: &Path, gamma: bool) -> Result<()> {
    let is_ppm = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        return save_ppm(image, path, gamma);
    }

    let buffer = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8(gamma))
        .context("Pixel buffer does not match its resolution")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.map_or(log::LevelFilter::Info, Into::into))
        .init();

    log::info!("Starting prism");

    let description = load_description(cli.scene.as_deref())?;
    let mut config = description.render.clone();
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(samples) = cli.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let scene = Arc::new(description.build().context("Invalid scene")?);
    let stats = scene.octree().stats();
    log::info!(
        "Octree: {} nodes, {} leaves, depth {}",
        stats.nodes,
        stats.leaves,
        stats.depth
    );

    let time_limit = cli
        .time_limit
        .map(|seconds| {
            Duration::try_from_secs_f64(seconds)
                .with_context(|| format!("Invalid time limit {}", seconds))
        })
        .transpose()?;

    let renderer = Renderer::new(scene, description.camera.to_camera(), config)?;
    let handle = renderer.spawn(cli.width, cli.height)?;

    if let Some(limit) = time_limit {
        let deadline = Instant::now().checked_add(limit);
        while !handle.is_finished() {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log::info!("Time limit of {:.2?} reached, stopping", limit);
                handle.stop();
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    let image = handle.join()?;
    save_image(&image, &cli.output, cli.gamma)?;
    log::info!("Saved {}", cli.output.display());

    Ok(())
}
