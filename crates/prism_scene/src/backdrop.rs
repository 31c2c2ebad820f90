//! Checkered background planes tested outside the octree.

use prism_math::{Aabb, Color, DVec3, Interval, Ray};

/// Rays whose direction component along a plane's axis is below this are
/// treated as parallel to it.
const PARALLEL_EPSILON: f64 = 1e-3;

/// A finite axis-aligned plane with a two-colour checker pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropPlane {
    /// Axis the plane is perpendicular to (0 = X, 1 = Y, 2 = Z)
    pub axis: usize,
    /// Plane coordinate along `axis`
    pub offset: f64,
    /// Facing normal reported on a hit
    pub normal: DVec3,
    /// Open region a hit point must lie in (the `axis` interval is ignored)
    pub extent: Aabb,
    /// The two in-plane axes fed to the checker function
    pub checker_axes: (usize, usize),
    /// Colours for odd and even checker cells
    pub colors: [Color; 2],
}

impl BackdropPlane {
    /// Distance along `ray` to this plane, if the hit lies inside its extent.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let dir = ray.direction[self.axis];
        if dir.abs() <= PARALLEL_EPSILON {
            return None;
        }

        let t = (self.offset - ray.origin[self.axis]) / dir;
        if !(t > 0.0 && t.is_finite()) {
            return None;
        }

        let p = ray.at(t);
        let inside = (0..3)
            .filter(|&axis| axis != self.axis)
            .all(|axis| self.extent.axis_interval(axis).surrounds(p[axis]));
        inside.then_some(t)
    }

    /// Checker colour at point `p` on the plane.
    pub fn color_at(&self, p: DVec3) -> Color {
        let (a, b) = self.checker_axes;
        let cell = (0.5 * p[a] + 1000.0) as i64 + (0.5 * p[b]) as i64;
        if cell & 1 == 1 {
            self.colors[0]
        } else {
            self.colors[1]
        }
    }
}

/// Result of a backdrop hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropHit {
    pub t: f64,
    pub point: DVec3,
    pub normal: DVec3,
    pub color: Color,
}

/// A fixed set of background planes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backdrop {
    planes: Vec<BackdropPlane>,
}

impl Backdrop {
    pub fn new(planes: Vec<BackdropPlane>) -> Self {
        Self { planes }
    }

    /// No background planes.
    pub fn none() -> Self {
        Self::default()
    }

    /// Open box of five walls around the region `|x| < 10`, `|y| < 10`,
    /// `-30 < z < 0`: back wall, floor, right wall, left wall and ceiling.
    pub fn cornell() -> Self {
        let extent = Aabb {
            x: Interval::new(-10.0, 10.0),
            y: Interval::new(-10.0, 10.0),
            z: Interval::new(-30.0, 0.0),
        };
        let plane = |axis, offset, normal, checker_axes, colors| BackdropPlane {
            axis,
            offset,
            normal,
            extent,
            checker_axes,
            colors,
        };
        let solid = |c: Color| [c, c];

        Self::new(vec![
            plane(2, -30.0, DVec3::Z, (0, 1), solid(Color::new(0.4, 0.4, 0.5))),
            plane(
                1,
                -10.0,
                DVec3::Y,
                (0, 2),
                [Color::new(0.3, 0.3, 0.3), Color::new(0.3, 0.2, 0.1)],
            ),
            plane(0, 10.0, -DVec3::X, (0, 2), solid(Color::new(0.1, 0.5, 0.1))),
            plane(0, -10.0, DVec3::X, (0, 2), solid(Color::new(0.5, 0.1, 0.1))),
            plane(1, 10.0, -DVec3::Y, (0, 2), solid(Color::new(0.2, 0.2, 0.5))),
        ])
    }

    pub fn planes(&self) -> &[BackdropPlane] {
        &self.planes
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Nearest plane hit closer than `max_t`.
    pub fn intersect(&self, ray: &Ray, max_t: f64) -> Option<BackdropHit> {
        let mut nearest: Option<BackdropHit> = None;

        for plane in &self.planes {
            let Some(t) = plane.intersect(ray) else {
                continue;
            };
            let closest = nearest.map_or(max_t, |hit| hit.t);
            if t < closest {
                let point = ray.at(t);
                nearest = Some(BackdropHit {
                    t,
                    point,
                    normal: plane.normal,
                    color: plane.color_at(point),
                });
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_wall_hit() {
        let backdrop = Backdrop::cornell();
        let ray = Ray::new(DVec3::new(0.5, 0.5, 0.0), -DVec3::Z);

        let hit = backdrop.intersect(&ray, f64::INFINITY).expect("back wall");
        assert!((hit.t - 30.0).abs() < 1e-12);
        assert_eq!(hit.normal, DVec3::Z);
        assert_eq!(hit.color, Color::new(0.4, 0.4, 0.5));
    }

    #[test]
    fn test_floor_checker() {
        let backdrop = Backdrop::cornell();
        let floor = &backdrop.planes()[1];

        // (int(0.5 + 1000) + int(-0.5)) & 1 == 1000 & 1 == 0
        assert_eq!(floor.color_at(DVec3::new(1.0, -10.0, -1.0)), Color::new(0.3, 0.2, 0.1));
        // (int(1.25 + 1000) + int(-0.5)) & 1 == 1
        assert_eq!(floor.color_at(DVec3::new(2.5, -10.0, -1.0)), Color::new(0.3, 0.3, 0.3));
    }

    #[test]
    fn test_nearest_plane_wins() {
        let backdrop = Backdrop::cornell();
        // Heading down and back: the floor is reached before the back wall
        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::new(0.0, -1.0, -1.0));
        let hit = backdrop.intersect(&ray, f64::INFINITY).expect("floor");
        assert_eq!(hit.normal, DVec3::Y);
        assert!((hit.point.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_distance_and_parallel_rays() {
        let backdrop = Backdrop::cornell();
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert!(backdrop.intersect(&ray, 10.0).is_none());

        // Parallel to the floor and ceiling, outside the side walls' region
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::Z);
        assert!(backdrop.intersect(&ray, f64::INFINITY).is_none());
    }

    #[test]
    fn test_none_is_empty() {
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert!(Backdrop::none().intersect(&ray, f64::INFINITY).is_none());
    }
}
