//! Nearest-hit resolution against the octree and the backdrop planes.

use prism_math::{DVec2, DVec3, Ray};
use prism_scene::{Material, Scene};

/// Hits at or beyond this distance count as background.
pub const MAX_DISTANCE: f64 = 1000.0;

/// Everything the shaders need to know about a ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInteraction {
    /// Distance along the ray
    pub t: f64,
    pub point: DVec3,
    /// Unit normal pointing out of the surface
    pub normal: DVec3,
    pub uv: DVec2,
    pub material: Material,
    /// Scene object id, `None` for backdrop planes
    pub object: Option<usize>,
}

/// Which objects a ray may stop at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightVisibility {
    /// Light-kind objects are solid (path tracing)
    Solid,
    /// Light-kind objects are skipped (Whitted shading)
    Skip,
}

/// Find the nearest surface along `ray`.
///
/// Candidates come from the octree; each is tested exactly and the smallest
/// positive finite distance wins. Backdrop planes then override the result
/// if they are closer. Hits at [`MAX_DISTANCE`] or further are discarded.
pub fn scene_intersect(
    scene: &Scene,
    ray: &Ray,
    lights: LightVisibility,
) -> Option<SurfaceInteraction> {
    if ray.is_degenerate() {
        return None;
    }

    let mut nearest: Option<SurfaceInteraction> = None;
    let mut nearest_t = MAX_DISTANCE;

    for id in scene.candidates(ray) {
        let Some(object) = scene.object(id) else {
            continue;
        };
        if lights == LightVisibility::Skip && object.is_light() {
            continue;
        }
        let Some(hit) = object.intersect(ray) else {
            continue;
        };
        if hit.t > 0.0 && hit.t.is_finite() && hit.t < nearest_t {
            nearest_t = hit.t;
            nearest = Some(SurfaceInteraction {
                t: hit.t,
                point: ray.at(hit.t),
                normal: hit.normal,
                uv: hit.uv,
                material: *object.material(),
                object: Some(id),
            });
        }
    }

    if let Some(plane) = scene.backdrop().intersect(ray, nearest_t) {
        nearest = Some(SurfaceInteraction {
            t: plane.t,
            point: plane.point,
            normal: plane.normal,
            uv: DVec2::ZERO,
            material: Material::diffuse(plane.color),
            object: None,
        });
    }

    nearest
}
