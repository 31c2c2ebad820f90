//! Random direction sampling for the path tracer.

use prism_math::{orthonormal_basis, DVec3};
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::f64::consts::PI;

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}

/// Deterministic generator for one pixel.
///
/// Every pixel gets its own stream derived from the frame seed, so a frame
/// renders the same regardless of how pixels are scheduled across threads.
pub fn pixel_rng(seed: u64, pixel_index: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(pixel_index.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Cosine-weighted direction in the hemisphere around the unit vector `w`.
pub fn cosine_hemisphere(w: DVec3, rng: &mut dyn RngCore) -> DVec3 {
    let r1 = 2.0 * PI * gen_f64(rng);
    let r2 = gen_f64(rng);
    let r2s = r2.sqrt();
    let (u, v) = orthonormal_basis(w);

    (u * r1.cos() * r2s + v * r1.sin() * r2s + w * (1.0 - r2).sqrt()).normalize()
}

/// Uniform direction inside the cone around the unit vector `w` whose
/// half-angle has cosine `cos_a_max`.
pub fn uniform_cone(w: DVec3, cos_a_max: f64, rng: &mut dyn RngCore) -> DVec3 {
    let eps1 = gen_f64(rng);
    let eps2 = gen_f64(rng);
    let cos_a = 1.0 - eps1 + eps1 * cos_a_max;
    let sin_a = (1.0 - cos_a * cos_a).max(0.0).sqrt();
    let phi = 2.0 * PI * eps2;
    let (u, v) = orthonormal_basis(w);

    (u * phi.cos() * sin_a + v * phi.sin() * sin_a + w * cos_a).normalize()
}

/// Random offset in [-0.5, 0.5)² for pixel jitter.
pub fn sample_square(rng: &mut dyn RngCore) -> (f64, f64) {
    (gen_f64(rng) - 0.5, gen_f64(rng) - 0.5)
}
