//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::shape::{Culling, Intersect, ShapeHit, EPSILON};
use prism_math::{Aabb, DVec2, DVec3, Ray};

/// Raw Möller-Trumbore test.
///
/// Returns `(t, u, v)` where `u` weights `v1` and `v` weights `v2`.
/// Rejects rays parallel to the plane, hits outside the triangle, hits at
/// distance `<= EPSILON`, and (with [`Culling::BackFace`]) triangles seen
/// from behind.
pub fn moller_trumbore(
    ray: &Ray,
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    culling: Culling,
) -> Option<(f64, f64, f64)> {
    let ab = v1 - v0;
    let ac = v2 - v0;

    let n = ray.direction.cross(ac);
    let det = ab.dot(n);

    let rejected = match culling {
        Culling::BackFace => det < EPSILON,
        Culling::TwoSided => det.abs() < EPSILON,
    };
    // NaN determinants fall through both comparisons, so test explicitly.
    if rejected || !det.is_finite() {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(n) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(ab);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = ac.dot(q) * inv_det;
    if t > EPSILON && t.is_finite() {
        Some((t, u, v))
    } else {
        None
    }
}

/// A single triangle.
#[derive(Debug, Clone)]
pub struct Triangle {
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    /// Pre-computed face normal (unit length, counter-clockwise winding)
    normal: DVec3,
    culling: Culling,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new two-sided triangle from three vertices.
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        let bbox = Aabb::from_point_cloud([v0, v1, v2]);

        Self {
            v0,
            v1,
            v2,
            normal,
            culling: Culling::TwoSided,
            bbox,
        }
    }

    /// Set the culling policy.
    pub fn with_culling(mut self, culling: Culling) -> Self {
        self.culling = culling;
        self
    }

    pub fn vertices(&self) -> [DVec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn culling(&self) -> Culling {
        self.culling
    }

    pub fn centroid(&self) -> DVec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}

impl Intersect for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let (t, u, v) = moller_trumbore(ray, self.v0, self.v1, self.v2, self.culling)?;
        let barycentric = DVec2::new(u, v);

        Some(ShapeHit {
            t,
            normal: self.normal,
            barycentric,
            uv: barycentric,
            face: 0,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
