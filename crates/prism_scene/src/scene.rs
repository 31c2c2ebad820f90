//! Scene assembly.
//!
//! Objects and point lights are collected by a [`SceneBuilder`], validated,
//! and frozen into a [`Scene`] whose octree is read-only from then on.

use crate::backdrop::Backdrop;
use crate::error::{SceneError, SceneResult};
use crate::light::PointLight;
use crate::object::SceneObject;
use crate::octree::{Octree, OctreeConfig};
use prism_math::{Aabb, Ray};

/// Collects objects and lights before the octree is built.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    objects: Vec<SceneObject>,
    lights: Vec<PointLight>,
    bounds: Option<Aabb>,
    backdrop: Backdrop,
    octree_config: OctreeConfig,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: SceneObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Add a point light to the scene.
    pub fn add_light(&mut self, light: PointLight) -> &mut Self {
        self.lights.push(light);
        self
    }

    /// Root region of the octree. Defaults to the box around all objects.
    pub fn with_bounds(&mut self, bounds: Aabb) -> &mut Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_backdrop(&mut self, backdrop: Backdrop) -> &mut Self {
        self.backdrop = backdrop;
        self
    }

    pub fn with_octree_config(&mut self, config: OctreeConfig) -> &mut Self {
        self.octree_config = config;
        self
    }

    /// Get the number of objects added so far.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Validate the collected objects and build the octree.
    pub fn build(self) -> SceneResult<Scene> {
        if self.objects.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        for (index, object) in self.objects.iter().enumerate() {
            if !object.shape().is_finite() {
                return Err(SceneError::NonFiniteGeometry { index });
            }
            object
                .material()
                .validate()
                .map_err(|reason| SceneError::InvalidMaterial { index, reason })?;
            if object.is_light() && !object.material().is_emissive() {
                return Err(SceneError::InvalidLight { index });
            }
        }

        let bounds = self.bounds.unwrap_or_else(|| {
            self.objects
                .iter()
                .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bbox()))
        });

        let light_ids: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_light())
            .map(|(id, _)| id)
            .collect();

        log::info!(
            "Building scene: {} objects, {} point lights, {} area lights",
            self.objects.len(),
            self.lights.len(),
            light_ids.len()
        );

        let octree = Octree::build(bounds, self.objects, self.octree_config)?;

        Ok(Scene {
            octree,
            lights: self.lights,
            light_ids,
            backdrop: self.backdrop,
        })
    }
}

/// A frozen scene: objects indexed by an octree, point lights and
/// background planes. Shared read-only by all render workers.
#[derive(Debug)]
pub struct Scene {
    octree: Octree,
    lights: Vec<PointLight>,
    /// Ids of Light-kind objects, for explicit light sampling
    light_ids: Vec<usize>,
    backdrop: Backdrop,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.octree.objects()
    }

    pub fn object(&self, id: usize) -> Option<&SceneObject> {
        self.octree.object(id)
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn light_ids(&self) -> &[usize] {
        &self.light_ids
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Candidate object ids for `ray` (broad phase only).
    pub fn candidates(&self, ray: &Ray) -> Vec<usize> {
        self.octree.candidate_ids(ray)
    }
}
