//! Render settings.

use prism_math::Color;
use serde::{Deserialize, Serialize};

/// Light-transport algorithm used for every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Deterministic recursive ray tracing with point lights.
    #[default]
    Whitted,
    /// Monte Carlo path tracing with explicit sampling of Light-kind objects.
    PathTraced,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: ShadingMode,
    /// Samples per pixel. Only the path tracer jitters and averages;
    /// Whitted mode traces one ray through each pixel centre.
    pub samples_per_pixel: u32,
    /// Whitted recursion returns the background past this depth
    pub whitted_max_depth: u32,
    /// Path recursion returns black past this depth
    pub path_max_depth: u32,
    /// Russian roulette applies to every bounce past this depth
    pub roulette_depth: u32,
    /// Color of rays that hit nothing
    pub background: Color,
    /// Frame seed; each pixel derives its own generator from it
    pub seed: u64,
    /// Edge length of square render tiles in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: ShadingMode::Whitted,
            samples_per_pixel: 1,
            whitted_max_depth: 4,
            path_max_depth: 10,
            roulette_depth: 5,
            background: Color::splat(0.9),
            seed: 0,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
        }
    }
}
