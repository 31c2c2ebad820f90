//! Double-precision math types shared by the scene and tracer crates.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// RGB color, each channel nominally in [0, 1].
pub type Color = DVec3;

/// Largest component of a vector.
#[inline]
pub fn max_component(v: DVec3) -> f64 {
    v.x.max(v.y).max(v.z)
}

/// Build an orthonormal basis `(u, v)` perpendicular to the unit vector `w`.
///
/// The helper axis is picked so it is never close to parallel with `w`.
pub fn orthonormal_basis(w: DVec3) -> (DVec3, DVec3) {
    let helper = if w.x.abs() > 0.1 { DVec3::Y } else { DVec3::X };
    let u = helper.cross(w).normalize();
    let v = w.cross(u);
    (u, v)
}
