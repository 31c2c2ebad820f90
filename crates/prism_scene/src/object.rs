//! Scene objects: a primitive plus its material.

use crate::material::Material;
use crate::shape::{Intersect, Shape, ShapeHit};
use prism_math::{Aabb, DVec3, Ray};

/// A renderable object. Immutable once the scene is built.
#[derive(Debug, Clone)]
pub struct SceneObject {
    shape: Shape,
    material: Material,
    bbox: Aabb,
    position: DVec3,
}

impl SceneObject {
    /// Create a new object from any primitive.
    pub fn new(shape: impl Into<Shape>, material: Material) -> Self {
        let shape = shape.into();
        let bbox = shape.bounding_box();
        let position = shape.position();

        Self {
            shape,
            material,
            bbox,
            position,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }

    /// Reference point of the object (sphere center, triangle centroid,
    /// mesh bounds center).
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Check if this object is an area light.
    pub fn is_light(&self) -> bool {
        self.material.is_light()
    }

    /// Closest hit of `ray` with this object's primitive.
    pub fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        self.shape.intersect(ray)
    }
}
