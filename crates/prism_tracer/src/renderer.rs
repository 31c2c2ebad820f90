//! Frame driver.
//!
//! A [`Renderer`] shares a frozen [`Scene`] with a pool of rayon workers.
//! Buckets are rendered in spiral order into a pixel buffer behind an
//! `RwLock`, so [`Renderer::image`] can snapshot a frame that is still in
//! progress. Clearing the running flag with [`Renderer::stop`] makes every
//! worker finish its current scanline and start no new one.
//!
//! One frame runs at a time per renderer and its clones: starting a second
//! frame while one is in flight fails with [`RenderError::AlreadyRunning`].

use crate::bucket::{generate_buckets, render_bucket};
use crate::buffer::PixelBuffer;
use crate::camera::Camera;
use crate::config::{RenderConfig, ShadingMode};
use crate::error::{RenderError, RenderResult};
use crate::radiance::radiance;
use crate::sampling::pixel_rng;
use crate::whitted::trace_ray;
use prism_math::Color;
use prism_scene::Scene;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use std::time::Instant;

/// Render a single pixel.
///
/// Whitted mode traces one ray through the pixel centre. Path-traced mode
/// averages `samples_per_pixel` jittered samples drawn from a generator
/// seeded from the frame seed and the pixel index. The result is clamped
/// to [0, 1].
pub fn render_pixel(scene: &Scene, camera: &Camera, x: u32, y: u32, config: &RenderConfig) -> Color {
    let color = match config.mode {
        ShadingMode::Whitted => trace_ray(scene, &camera.primary_ray(x, y), 0, config),
        ShadingMode::PathTraced => {
            let pixel_index = y as u64 * camera.image_width as u64 + x as u64;
            let mut rng = pixel_rng(config.seed, pixel_index);
            let samples = config.samples_per_pixel.max(1);

            let mut sum = Color::ZERO;
            for _ in 0..samples {
                let ray = camera.get_ray(x, y, &mut rng);
                sum += radiance(scene, &ray, 0, 1.0, config, &mut rng);
            }
            sum / samples as f64
        }
    };

    color.clamp(Color::ZERO, Color::ONE)
}

/// Cancellable parallel renderer for one scene.
///
/// Cloning is cheap: clones share the scene, the running flag and the pixel
/// buffer, so they also share the one-frame-at-a-time restriction.
#[derive(Clone)]
pub struct Renderer {
    scene: Arc<Scene>,
    camera: Camera,
    config: RenderConfig,
    running: Arc<AtomicBool>,
    image: Arc<RwLock<PixelBuffer>>,
}

impl Renderer {
    /// Create a renderer. The camera's resolution is replaced per frame.
    pub fn new(scene: Arc<Scene>, camera: Camera, config: RenderConfig) -> RenderResult<Self> {
        if config.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        Ok(Self {
            scene,
            camera,
            config,
            running: Arc::new(AtomicBool::new(false)),
            image: Arc::new(RwLock::new(PixelBuffer::new(0, 0))),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Mark the renderer as running.
    ///
    /// Fails with [`RenderError::AlreadyRunning`] if a frame already holds
    /// the flag.
    pub fn start(&self) -> RenderResult<()> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| RenderError::AlreadyRunning)
    }

    /// Ask in-flight workers to stop after their current scanline.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Snapshot of the current frame. Safe to call during a render; every
    /// pixel is either black (not yet rendered) or final.
    pub fn image(&self) -> PixelBuffer {
        self.image
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Render a full frame on the calling thread (using the rayon pool) and
    /// return it. A concurrent [`stop`](Self::stop) returns the partial
    /// frame.
    pub fn render(&self, width: u32, height: u32) -> RenderResult<PixelBuffer> {
        let camera = self.prepare(width, height)?;
        Ok(self.render_frame(&camera))
    }

    /// Render a frame on a background thread.
    ///
    /// The renderer is marked running before the thread starts, so a
    /// [`stop`](Self::stop) issued right after this call is never lost.
    pub fn spawn(&self, width: u32, height: u32) -> RenderResult<RenderHandle> {
        let camera = self.prepare(width, height)?;

        let renderer = self.clone();
        let thread = std::thread::spawn(move || renderer.render_frame(&camera));
        Ok(RenderHandle {
            renderer: self.clone(),
            thread,
        })
    }

    /// Validate the resolution, claim the running flag, then build the
    /// frame camera and clear the buffer.
    fn prepare(&self, width: u32, height: u32) -> RenderResult<Camera> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        self.start()?;

        let mut camera = self.camera.clone().with_resolution(width, height);
        camera.initialize();

        *self
            .image
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = PixelBuffer::new(width, height);
        Ok(camera)
    }

    fn render_frame(&self, camera: &Camera) -> PixelBuffer {
        let (width, height) = (camera.image_width, camera.image_height);
        let buckets = generate_buckets(width, height, self.config.bucket_size);
        log::info!(
            "Rendering {}x{} ({:?}, {} spp, {} buckets)",
            width,
            height,
            self.config.mode,
            self.config.samples_per_pixel,
            buckets.len()
        );

        let start = Instant::now();
        let completed = buckets
            .par_iter()
            .filter(|bucket| {
                render_bucket(
                    bucket,
                    &self.scene,
                    camera,
                    &self.config,
                    &self.running,
                    &self.image,
                )
            })
            .count();

        if completed == buckets.len() {
            log::info!("Render finished in {:.2?}", start.elapsed());
        } else {
            log::info!(
                "Render cancelled after {:.2?} ({}/{} buckets complete)",
                start.elapsed(),
                completed,
                buckets.len()
            );
        }

        self.stop();
        self.image()
    }
}

/// A frame rendering on a background thread.
pub struct RenderHandle {
    renderer: Renderer,
    thread: JoinHandle<PixelBuffer>,
}

impl RenderHandle {
    /// Ask the render to stop early.
    pub fn stop(&self) {
        self.renderer.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Snapshot of the frame so far.
    pub fn image(&self) -> PixelBuffer {
        self.renderer.image()
    }

    /// Wait for the render to end and return the final (or partial) frame.
    pub fn join(self) -> RenderResult<PixelBuffer> {
        self.thread.join().map_err(|_| RenderError::WorkerPanicked)
    }
}
