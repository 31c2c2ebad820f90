//! Prism Tracer - light transport and the frame driver.
//!
//! Two shading modes share one nearest-hit query:
//!
//! - **Whitted** ([`trace_ray`]): deterministic recursion with point lights,
//!   shadows, mirror reflection and Snell refraction
//! - **Path traced** ([`radiance`]): Monte Carlo global illumination with
//!   Russian roulette, explicit sampling of Light-kind objects and Fresnel
//!   dielectrics
//!
//! [`Renderer`] splits the frame into buckets rendered in parallel with
//! rayon, and can be stopped between scanlines.

mod bucket;
mod buffer;
mod camera;
mod config;
mod error;
mod intersect;
mod optics;
mod radiance;
mod renderer;
mod sampling;
mod whitted;

pub use bucket::{generate_buckets, render_bucket, Bucket, DEFAULT_BUCKET_SIZE};
pub use buffer::{color_to_rgb, linear_to_gamma, PixelBuffer};
pub use camera::{Camera, DEFAULT_HALF_ANGLE};
pub use config::{RenderConfig, ShadingMode};
pub use error::{RenderError, RenderResult};
pub use intersect::{scene_intersect, LightVisibility, SurfaceInteraction, MAX_DISTANCE};
pub use optics::{face_forward, offset_origin, reflect, refract, schlick, SURFACE_OFFSET};
pub use radiance::radiance;
pub use renderer::{render_pixel, RenderHandle, Renderer};
pub use sampling::{cosine_hemisphere, gen_f64, pixel_rng, uniform_cone};
pub use whitted::{direct_lighting, trace_ray};

/// Re-export common math types from prism_math
pub use prism_math::{Color, DVec3, Ray};
