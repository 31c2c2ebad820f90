use crate::{DVec3, Interval, Ray};

/// Minimum extent of a padded box along any axis.
const MIN_EXTENT: f64 = 1e-4;

/// Axis-Aligned Bounding Box used for broad-phase pruning.
///
/// An AABB is defined by three intervals (one per axis). Boxes built from
/// points or geometry always satisfy `min <= max` on every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points, in any order.
    ///
    /// Flat boxes (a triangle lying in an axis plane) are padded so that
    /// every axis has a small non-zero extent.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box containing every point of the iterator. Returns
    /// [`Aabb::EMPTY`] for an empty iterator.
    pub fn from_point_cloud<I>(points: I) -> Self
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        let mut any = false;

        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }

        if any {
            Self::from_points(min, max)
        } else {
            Self::EMPTY
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Corner with the smallest coordinates.
    pub fn min(&self) -> DVec3 {
        DVec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Corner with the largest coordinates.
    pub fn max(&self) -> DVec3 {
        DVec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True if every bound is finite, `min <= max` holds on all three axes,
    /// and the box has non-zero volume.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|i| i.min.is_finite() && i.max.is_finite() && i.min < i.max)
    }

    /// True if the two boxes share at least one point.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y) && self.z.overlaps(&other.z)
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.x.min <= other.x.min
            && other.x.max <= self.x.max
            && self.y.min <= other.y.min
            && other.y.max <= self.y.max
            && self.z.min <= other.z.min
            && other.z.max <= self.z.max
    }

    /// One of the eight equal sub-boxes split at the centroid.
    ///
    /// Bit 0 of `index` selects the upper X half, bit 1 the upper Y half,
    /// bit 2 the upper Z half.
    pub fn octant(&self, index: usize) -> Aabb {
        let half = |interval: Interval, upper: bool| {
            let mid = interval.midpoint();
            if upper {
                Interval::new(mid, interval.max)
            } else {
                Interval::new(interval.min, mid)
            }
        };

        Aabb {
            x: half(self.x, index & 1 != 0),
            y: half(self.y, index & 2 != 0),
            z: half(self.z, index & 4 != 0),
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. NaN slab distances (ray origin on a slab plane
    /// with a zero direction component) leave the interval unchanged.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> DVec3 {
        DVec3::new(self.x.midpoint(), self.y.midpoint(), self.z.midpoint())
    }

    /// Vector from the min corner to the max corner.
    pub fn diagonal(&self) -> DVec3 {
        self.max() - self.min()
    }

    /// Static constants
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(DVec3::new(10.0, 0.0, 10.0), DVec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min(), DVec3::ZERO);
        assert_eq!(aabb.max(), DVec3::splat(10.0));
        assert!(aabb.is_valid());
    }

    #[test]
    fn test_flat_box_is_padded() {
        let aabb = Aabb::from_points(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0));
        assert!(aabb.z.size() > 0.0);
        assert!(aabb.is_valid());
    }

    #[test]
    fn test_from_point_cloud() {
        let aabb = Aabb::from_point_cloud([
            DVec3::new(-1.0, 2.0, 0.0),
            DVec3::new(3.0, -2.0, 1.0),
            DVec3::new(0.0, 0.0, 5.0),
        ]);
        assert_eq!(aabb.min(), DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max(), DVec3::new(3.0, 2.0, 5.0));

        assert_eq!(Aabb::from_point_cloud(Vec::new()), Aabb::EMPTY);
    }

    #[test]
    fn test_empty_is_not_valid() {
        assert!(!Aabb::EMPTY.is_valid());
        assert!(!Aabb::UNIVERSE.is_valid());
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(DVec3::ZERO, DVec3::splat(5.0));
        let box2 = Aabb::from_points(DVec3::splat(3.0), DVec3::splat(10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min(), DVec3::ZERO);
        assert_eq!(surrounding.max(), DVec3::splat(10.0));
        assert!(surrounding.contains_box(&box1));
        assert!(surrounding.contains_box(&box2));
        assert!(!box1.contains_box(&box2));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = Aabb::from_points(DVec3::ZERO, DVec3::splat(2.0));
        let b = Aabb::from_points(DVec3::splat(1.0), DVec3::splat(3.0));
        let c = Aabb::from_points(DVec3::splat(2.5), DVec3::splat(3.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_octants_partition_parent() {
        let parent = unit_box();
        let mut union = Aabb::EMPTY;

        for i in 0..8 {
            let child = parent.octant(i);
            assert!(parent.contains_box(&child));
            assert!((child.diagonal() - DVec3::ONE).length() < 1e-12);
            union = Aabb::surrounding(&union, &child);
        }

        assert_eq!(union, parent);
        assert_eq!(parent.octant(0).min(), DVec3::splat(-1.0));
        assert_eq!(parent.octant(7).max(), DVec3::splat(1.0));
        assert_eq!(parent.octant(1).min(), DVec3::new(0.0, -1.0, -1.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();
        let forward = Interval::new(0.0, f64::INFINITY);

        // Ray pointing at center
        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
        assert!(aabb.hit(&ray, forward));

        // Ray pointing away
        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), -DVec3::Z);
        assert!(!aabb.hit(&ray, forward));

        // Ray missing the box
        let ray = Ray::new(DVec3::new(10.0, 0.0, 0.0), DVec3::Z);
        assert!(!aabb.hit(&ray, forward));

        // Ray starting inside
        let ray = Ray::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0));
        assert!(aabb.hit(&ray, forward));
    }

    #[test]
    fn test_aabb_centroid() {
        let aabb = Aabb::from_points(DVec3::ZERO, DVec3::splat(10.0));
        assert_eq!(aabb.centroid(), DVec3::splat(5.0));
    }
}
