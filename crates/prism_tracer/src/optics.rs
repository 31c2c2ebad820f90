//! Reflection, refraction and Fresnel helpers shared by both shading modes.

use prism_math::DVec3;

/// Distance secondary-ray origins are pushed off the surface.
pub const SURFACE_OFFSET: f64 = 1e-3;

/// Mirror `incident` about the normal `n`.
#[inline]
pub fn reflect(incident: DVec3, n: DVec3) -> DVec3 {
    incident - n * 2.0 * incident.dot(n)
}

/// Refract the unit direction `incident` through a surface with unit normal
/// `n` using Snell's law.
///
/// `eta_t` is the index on the far side of the surface and `eta_i` the index
/// the ray travels in, both relative to the side `n` points to. A ray
/// arriving from behind the normal is handled by flipping the normal and
/// swapping the indices. Returns `None` on total internal reflection.
pub fn refract(incident: DVec3, n: DVec3, eta_t: f64, eta_i: f64) -> Option<DVec3> {
    let cos_i = -incident.dot(n).clamp(-1.0, 1.0);
    if cos_i < 0.0 {
        return refract(incident, -n, eta_i, eta_t);
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some(incident * eta + n * (eta * cos_i - k.sqrt()))
    }
}

/// Schlick's approximation of the Fresnel reflectance between media with
/// indices `n1` and `n2`. `cos_theta` is measured on the less dense side.
#[inline]
pub fn schlick(cos_theta: f64, n1: f64, n2: f64) -> f64 {
    let r0 = ((n2 - n1) / (n2 + n1)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

/// Push `point` off the surface to the side `direction` leaves on.
#[inline]
pub fn offset_origin(point: DVec3, n: DVec3, direction: DVec3) -> DVec3 {
    if direction.dot(n) < 0.0 {
        point - n * SURFACE_OFFSET
    } else {
        point + n * SURFACE_OFFSET
    }
}

/// `n` flipped, if needed, to face against `direction`.
#[inline]
pub fn face_forward(n: DVec3, direction: DVec3) -> DVec3 {
    if n.dot(direction) < 0.0 {
        n
    } else {
        -n
    }
}
