//! Surface materials.
//!
//! A material is plain data. The deterministic (Whitted) tracer reads the
//! color, the four albedo channels, the refractive index and the Phong
//! exponent; the path tracer dispatches on [`MaterialKind`] and adds the
//! emission term.

use prism_math::{Color, DVec3};
use serde::{Deserialize, Serialize};

/// Discrete material category used by the path tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Lambertian surface.
    #[default]
    Diffuse,
    /// Perfect mirror.
    Specular,
    /// Transparent surface. Shaded like a dielectric by the path tracer.
    Refractive,
    /// Glass-like interface with Fresnel-weighted reflection and refraction.
    Dielectric,
    /// Area light. Only contributes through its emission.
    Light,
}

/// Independent weights for the four Whitted contributions.
///
/// The channels need not sum to one; each scales its own term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Albedo {
    pub diffuse: f64,
    pub specular: f64,
    pub reflective: f64,
    pub refractive: f64,
}

impl Albedo {
    pub const fn new(diffuse: f64, specular: f64, reflective: f64, refractive: f64) -> Self {
        Self {
            diffuse,
            specular,
            reflective,
            refractive,
        }
    }

    /// Purely diffuse weighting, `[1, 0, 0, 0]`.
    pub const DIFFUSE: Albedo = Albedo::new(1.0, 0.0, 0.0, 0.0);

    fn channels(&self) -> [f64; 4] {
        [self.diffuse, self.specular, self.reflective, self.refractive]
    }
}

impl Default for Albedo {
    fn default() -> Self {
        Self::DIFFUSE
    }
}

impl From<[f64; 4]> for Albedo {
    fn from(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Albedo> for [f64; 4] {
    fn from(a: Albedo) -> Self {
        a.channels()
    }
}

/// Material properties of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// RGB reflectance
    pub color: Color,

    /// Diffuse / specular / reflective / refractive weights
    pub albedo: Albedo,

    /// Index of refraction of the medium behind the surface
    pub refractive_index: f64,

    /// Phong shininess
    pub specular_exponent: f64,

    /// Emitted radiance; non-zero only for lights
    pub emission: Color,

    pub kind: MaterialKind,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::ZERO,
            albedo: Albedo::DIFFUSE,
            refractive_index: 1.0,
            specular_exponent: 0.0,
            emission: Color::ZERO,
            kind: MaterialKind::Diffuse,
        }
    }
}

impl Material {
    /// Create a material from its Whitted parameters.
    pub fn new(
        color: Color,
        refractive_index: f64,
        albedo: Albedo,
        specular_exponent: f64,
        kind: MaterialKind,
    ) -> Self {
        Self {
            color,
            albedo,
            refractive_index,
            specular_exponent,
            emission: Color::ZERO,
            kind,
        }
    }

    /// A plain Lambertian material.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// A perfect mirror tinted by `color`.
    pub fn mirror(color: Color) -> Self {
        Self {
            color,
            albedo: Albedo::new(0.0, 10.0, 0.8, 0.0),
            specular_exponent: 1425.0,
            kind: MaterialKind::Specular,
            ..Default::default()
        }
    }

    /// Clear glass with the given index of refraction.
    pub fn glass(refractive_index: f64) -> Self {
        Self {
            color: DVec3::splat(0.999),
            albedo: Albedo::new(0.0, 0.5, 0.1, 0.8),
            refractive_index,
            specular_exponent: 125.0,
            kind: MaterialKind::Dielectric,
            ..Default::default()
        }
    }

    /// An area light emitting `emission`.
    pub fn light(emission: Color) -> Self {
        Self {
            albedo: Albedo::new(0.0, 0.0, 0.0, 0.0),
            emission,
            kind: MaterialKind::Light,
            ..Default::default()
        }
    }

    /// Set the emission color.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Set the material kind.
    pub fn with_kind(mut self, kind: MaterialKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this material is a Light-kind emitter.
    pub fn is_light(&self) -> bool {
        self.kind == MaterialKind::Light
    }

    /// Check if this material emits anything.
    pub fn is_emissive(&self) -> bool {
        self.emission.max_element() > 0.0
    }

    /// Check the material's invariants.
    pub fn validate(&self) -> Result<(), String> {
        let finite = self.color.is_finite()
            && self.emission.is_finite()
            && self.refractive_index.is_finite()
            && self.specular_exponent.is_finite()
            && self.albedo.channels().iter().all(|c| c.is_finite());
        if !finite {
            return Err("non-finite parameter".into());
        }
        if self.albedo.channels().iter().any(|c| *c < 0.0) {
            return Err("negative albedo channel".into());
        }
        if self.color.min_element() < 0.0 || self.emission.min_element() < 0.0 {
            return Err("negative color or emission".into());
        }
        if self.refractive_index <= 0.0 {
            return Err(format!(
                "refractive index must be positive, got {}",
                self.refractive_index
            ));
        }
        if self.specular_exponent < 0.0 {
            return Err(format!(
                "specular exponent must be non-negative, got {}",
                self.specular_exponent
            ));
        }
        Ok(())
    }
}
