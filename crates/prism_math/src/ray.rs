use crate::DVec3;

/// A ray in 3D space: an origin point and a unit-length direction.
///
/// Rays are built per pixel or per bounce and never mutated afterwards.
/// Distances reported by intersection routines are in units of the ray
/// parameter, which equals world distance because the direction is unit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized; a zero-length
    /// direction yields a zero vector, which every intersection test rejects.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// True when the direction could not be normalized.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == DVec3::ZERO || !self.direction.is_finite()
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
