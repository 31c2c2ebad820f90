//! Pinhole camera for primary-ray generation.

use crate::sampling::sample_square;
use prism_math::{orthonormal_basis, DVec3, Ray};
use rand::RngCore;

/// Default vertical half-angle of the view frustum, in degrees.
pub const DEFAULT_HALF_ANGLE: f64 = 25.0;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    position: DVec3,
    look_at: DVec3,
    up_hint: DVec3,

    /// Vertical half-angle in degrees
    half_angle: f64,

    // Cached computed values (set by initialize())
    forward: DVec3,
    right: DVec3,
    up: DVec3,
    half_height: f64,
    half_width: f64,
}

impl Camera {
    /// Create a new camera at the origin looking down -Z.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            position: DVec3::ZERO,
            look_at: DVec3::new(0.0, 0.0, -1.0),
            up_hint: DVec3::Y,
            half_angle: DEFAULT_HALF_ANGLE,
            // Cached values (initialized to defaults)
            forward: -DVec3::Z,
            right: DVec3::X,
            up: DVec3::Y,
            half_height: 0.0,
            half_width: 0.0,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position and target.
    pub fn with_position(mut self, position: DVec3, look_at: DVec3) -> Self {
        self.position = position;
        self.look_at = look_at;
        self
    }

    /// Set the up hint used to orthonormalize the basis.
    pub fn with_up(mut self, up: DVec3) -> Self {
        self.up_hint = up;
        self
    }

    /// Set the vertical half-angle in degrees.
    pub fn with_half_angle(mut self, degrees: f64) -> Self {
        self.half_angle = degrees;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    ///
    /// Builds `right = forward x up` and `up = right x forward`. A target on
    /// the camera position falls back to -Z; an up hint parallel to the view
    /// direction falls back to an arbitrary perpendicular axis.
    pub fn initialize(&mut self) {
        self.forward = (self.look_at - self.position)
            .try_normalize()
            .unwrap_or(-DVec3::Z);
        self.right = self
            .forward
            .cross(self.up_hint)
            .try_normalize()
            .unwrap_or_else(|| orthonormal_basis(self.forward).0);
        self.up = self.right.cross(self.forward);

        let aspect = self.image_width as f64 / self.image_height.max(1) as f64;
        self.half_height = self.half_angle.to_radians().tan();
        self.half_width = self.half_height * aspect;
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    /// Ray through the image-plane point `(x, y)` in pixel units, with
    /// `(0, 0)` the top-left corner of the image.
    fn ray_through(&self, x: f64, y: f64) -> Ray {
        let sx = 2.0 * x / self.image_width as f64 - 1.0;
        let sy = -2.0 * y / self.image_height as f64 + 1.0;
        let dir = self.forward + self.right * (sx * self.half_width) + self.up * (sy * self.half_height);
        Ray::new(self.position, dir)
    }

    /// Ray through the centre of pixel (i, j).
    pub fn primary_ray(&self, i: u32, j: u32) -> Ray {
        self.ray_through(i as f64 + 0.5, j as f64 + 0.5)
    }

    /// Ray through a random point inside pixel (i, j).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let (ox, oy) = sample_square(rng);
        self.ray_through(i as f64 + 0.5 + ox, j as f64 + 0.5 + oy)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
