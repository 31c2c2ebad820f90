//! Sphere primitive.

use crate::shape::{Intersect, ShapeHit};
use prism_math::{Aabb, DVec2, DVec3, Ray};
use std::f64::consts::PI;

/// An implicit sphere.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: DVec3,
    radius: f64,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: DVec3, radius: f64) -> Self {
        let radius = radius.max(0.0);
        let rvec = DVec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            bbox,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: DVec3) -> DVec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        DVec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Intersect for Sphere {
    /// Geometric solution: project the center onto the ray, then step back
    /// and forth by the half chord. The nearer positive root wins; if both
    /// roots are behind the origin the sphere is not hit.
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let l = self.center - ray.origin;
        let tca = l.dot(ray.direction);
        let d2 = l.dot(l) - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }

        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        let t = if t0 > 0.0 {
            t0
        } else if t1 > 0.0 {
            t1
        } else {
            return None;
        };
        if !t.is_finite() {
            return None;
        }

        let outward = (ray.at(t) - self.center).normalize_or_zero();
        Some(ShapeHit {
            t,
            normal: outward,
            barycentric: DVec2::ZERO,
            uv: Self::get_sphere_uv(outward),
            face: 0,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_reports_entry_point() {
        let r = 1.5;
        let sphere = Sphere::new(DVec3::ZERO, r);
        let ray = Ray::new(DVec3::new(0.0, 0.0, -2.0 * r), DVec3::Z);

        let hit = sphere.intersect(&ray).expect("ray aimed at the center must hit");
        assert!((hit.t - r).abs() < 1e-12);
        assert!((hit.normal - (-DVec3::Z)).length() < 1e-12);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(DVec3::ZERO, 2.0);
        let ray = Ray::new(DVec3::ZERO, DVec3::X);

        let hit = sphere.intersect(&ray).expect("origin inside the sphere");
        assert!((hit.t - 2.0).abs() < 1e-12);
        // Normal stays outward
        assert!((hit.normal - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn test_sphere_behind_ray() {
        let sphere = Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(DVec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_bbox() {
        let sphere = Sphere::new(DVec3::new(1.0, 0.0, 0.0), 2.0);
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.min(), DVec3::new(-1.0, -2.0, -2.0));
        assert_eq!(bbox.max(), DVec3::new(3.0, 2.0, 2.0));
    }
}
