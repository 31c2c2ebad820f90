//! The ray-intersection contract shared by all primitives.

use crate::{Mesh, Sphere, Triangle};
use prism_math::{Aabb, DVec2, DVec3, Ray};
use serde::{Deserialize, Serialize};

/// Tolerance for the triangle determinant and the minimum accepted
/// triangle distance.
pub const EPSILON: f64 = 1e-7;

/// Result of a successful primitive intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Distance along the ray (ray-parameter units)
    pub t: f64,
    /// Geometric normal, unit length, pointing out of the primitive
    /// (not flipped toward the ray)
    pub normal: DVec3,
    /// Barycentric weights `(u, v)` of the hit for triangles and meshes
    pub barycentric: DVec2,
    /// Texture coordinate at the hit
    pub uv: DVec2,
    /// Winning face index for meshes, 0 otherwise
    pub face: usize,
}

/// Which triangle faces a ray may hit.
///
/// `BackFace` keeps one-sided geometry: a triangle is only visible from
/// the side its counter-clockwise winding normal points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Culling {
    #[default]
    TwoSided,
    BackFace,
}

/// Trait for primitives that can be hit by rays.
pub trait Intersect: Send + Sync {
    /// Closest hit with a positive, finite distance, if any.
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit>;

    /// Get the axis-aligned bounding box of this primitive.
    fn bounding_box(&self) -> Aabb;
}

/// Closed set of primitive kinds a scene object can carry.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Mesh(Mesh),
}

impl Shape {
    /// Reference point of the shape: sphere center, triangle centroid or
    /// mesh bounds center.
    pub fn position(&self) -> DVec3 {
        match self {
            Shape::Sphere(s) => s.center(),
            Shape::Triangle(t) => t.centroid(),
            Shape::Mesh(m) => m.center(),
        }
    }

    /// A sphere enclosing the shape, exact for spheres. Used to aim light
    /// samples at emissive objects.
    pub fn bounding_sphere(&self) -> (DVec3, f64) {
        match self {
            Shape::Sphere(s) => (s.center(), s.radius()),
            _ => {
                let bbox = self.bounding_box();
                (bbox.centroid(), bbox.diagonal().length() * 0.5)
            }
        }
    }

    /// True if every coordinate defining the shape is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Sphere(s) => s.center().is_finite() && s.radius().is_finite(),
            Shape::Triangle(t) => t.vertices().iter().all(|v| v.is_finite()),
            Shape::Mesh(m) => m.positions().iter().all(|v| v.is_finite()),
        }
    }
}

impl Intersect for Shape {
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        if ray.is_degenerate() {
            return None;
        }
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Triangle(t) => t.intersect(ray),
            Shape::Mesh(m) => m.intersect(ray),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Mesh(m) => m.bounding_box(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

impl From<Mesh> for Shape {
    fn from(m: Mesh) -> Self {
        Shape::Mesh(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_ray_never_hits() {
        let shape = Shape::from(Sphere::new(DVec3::ZERO, 1.0));
        let ray = Ray::new(DVec3::ZERO, DVec3::ZERO);
        assert!(shape.intersect(&ray).is_none());
    }

    #[test]
    fn test_bounding_sphere() {
        let sphere = Shape::from(Sphere::new(DVec3::new(1.0, 2.0, 3.0), 0.5));
        assert_eq!(sphere.bounding_sphere(), (DVec3::new(1.0, 2.0, 3.0), 0.5));

        let tri = Shape::from(Triangle::new(
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ));
        let (center, radius) = tri.bounding_sphere();
        for v in [
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ] {
            assert!((v - center).length() <= radius + 1e-9);
        }
    }

    #[test]
    fn test_non_finite_shape() {
        let shape = Shape::from(Sphere::new(DVec3::new(f64::NAN, 0.0, 0.0), 1.0));
        assert!(!shape.is_finite());
        assert!(Shape::from(Sphere::new(DVec3::ZERO, 1.0)).is_finite());
    }
}
