//! Frame tiling.
//!
//! The frame is cut into buckets that rayon workers pick up independently.
//! Each bucket is rendered scanline by scanline so a stop request takes
//! effect within one row.

use crate::buffer::PixelBuffer;
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::renderer::render_pixel;
use prism_math::Color;
use prism_scene::Scene;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Square-ish tile of the frame, rendered as one unit of parallel work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance from the bucket centre to `(cx, cy)`.
    fn distance_squared(&self, cx: f64, cy: f64) -> f64 {
        let dx = self.x as f64 + self.width as f64 * 0.5 - cx;
        let dy = self.y as f64 + self.height as f64 * 0.5 - cy;
        dx * dx + dy * dy
    }
}

/// Default bucket edge in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Cover a `width` x `height` frame with buckets of edge `size` (clamped to
/// at least 1), ordered centre-out.
///
/// Edge buckets are cropped to the frame. Buckets at the same distance from
/// the centre keep row-major order.
pub fn generate_buckets(width: u32, height: u32, size: u32) -> Vec<Bucket> {
    let size = size.max(1);
    let (cx, cy) = (width as f64 * 0.5, height as f64 * 0.5);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| Bucket {
                x,
                y,
                width: size.min(width - x),
                height: size.min(height - y),
                index: 0,
            })
        })
        .collect();

    buckets.sort_by(|a, b| {
        a.distance_squared(cx, cy)
            .total_cmp(&b.distance_squared(cx, cy))
    });
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Render a single bucket into the shared buffer, one scanline at a time.
///
/// `running` is checked before every scanline; once it is cleared no new
/// scanline starts. Each scanline is written under a single write lock so
/// readers never see a partially written pixel. Returns `false` if the
/// bucket was cut short.
pub fn render_bucket(
    bucket: &Bucket,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    running: &AtomicBool,
    buffer: &RwLock<PixelBuffer>,
) -> bool {
    let mut row: Vec<Color> = Vec::with_capacity(bucket.width as usize);

    for local_y in 0..bucket.height {
        if !running.load(Ordering::Relaxed) {
            return false;
        }

        let global_y = bucket.y + local_y;
        row.clear();
        row.extend(
            (bucket.x..bucket.x + bucket.width)
                .map(|global_x| render_pixel(scene, camera, global_x, global_y, config)),
        );

        buffer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .set_row(bucket.x, global_y, &row);
    }

    log::trace!("Bucket {} done ({} px)", bucket.index, bucket.pixel_count());
    true
}
