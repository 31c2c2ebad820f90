//! Deterministic recursive shading (Whitted mode).
//!
//! Point lights give Lambert diffuse and Phong specular terms, tested for
//! shadows; mirror reflection and Snell refraction recurse. The four albedo
//! channels weight the four terms independently.

use crate::config::RenderConfig;
use crate::intersect::{scene_intersect, LightVisibility, SurfaceInteraction};
use crate::optics::{face_forward, offset_origin, reflect, refract};
use prism_math::{Color, DVec3, Ray};
use prism_scene::Scene;

/// Compute the color seen by a ray.
///
/// Returns the background once `depth` exceeds the configured limit or when
/// nothing is hit. Light-kind objects are invisible to this mode.
pub fn trace_ray(scene: &Scene, ray: &Ray, depth: u32, config: &RenderConfig) -> Color {
    if depth > config.whitted_max_depth {
        return config.background;
    }
    let Some(hit) = scene_intersect(scene, ray, LightVisibility::Skip) else {
        return config.background;
    };

    let material = hit.material;
    let albedo = material.albedo;
    let dir = ray.direction;

    let reflect_color = if albedo.reflective > 0.0 {
        let reflect_dir = reflect(dir, hit.normal).normalize();
        let reflect_ray = Ray::new(offset_origin(hit.point, hit.normal, reflect_dir), reflect_dir);
        trace_ray(scene, &reflect_ray, depth + 1, config)
    } else {
        Color::ZERO
    };

    // Total internal reflection leaves the refraction term empty
    let refract_color = match refract(dir, hit.normal, material.refractive_index, 1.0) {
        Some(refract_dir) if albedo.refractive > 0.0 => {
            let refract_dir = refract_dir.normalize();
            let refract_ray =
                Ray::new(offset_origin(hit.point, hit.normal, refract_dir), refract_dir);
            trace_ray(scene, &refract_ray, depth + 1, config)
        }
        _ => Color::ZERO,
    };

    let (diffuse, specular) = direct_lighting(scene, &hit, dir);

    material.color * diffuse * albedo.diffuse
        + Color::ONE * specular * albedo.specular
        + reflect_color * albedo.reflective
        + refract_color * albedo.refractive
}

/// Summed Lambert and Phong intensities of every unshadowed point light.
///
/// A light is shadowed when the ray toward it stops at any surface closer
/// than the light itself; it then contributes nothing at all.
pub fn direct_lighting(scene: &Scene, hit: &SurfaceInteraction, view_dir: DVec3) -> (f64, f64) {
    let n = face_forward(hit.normal, view_dir);
    let mut diffuse = 0.0;
    let mut specular = 0.0;

    for light in scene.lights() {
        let to_light = light.position - hit.point;
        let light_distance = to_light.length();
        let Some(light_dir) = to_light.try_normalize() else {
            continue;
        };

        let shadow_origin = offset_origin(hit.point, n, light_dir);
        let shadow_ray = Ray::new(shadow_origin, light_dir);
        if let Some(blocker) = scene_intersect(scene, &shadow_ray, LightVisibility::Skip) {
            if (blocker.point - shadow_origin).length() < light_distance {
                continue;
            }
        }

        diffuse += light.intensity * light_dir.dot(n).max(0.0);
        specular += (-reflect(-light_dir, n))
            .dot(view_dir)
            .max(0.0)
            .powf(hit.material.specular_exponent)
            * light.intensity;
    }

    (diffuse, specular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_scene::{Albedo, Material, MaterialKind, PointLight, SceneObject, Sphere};

    fn config() -> RenderConfig {
        RenderConfig::default()
    }

    #[test]
    fn test_miss_returns_background() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::diffuse(Color::ONE),
        ));
        let scene = builder.build().expect("valid scene");

        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert_eq!(trace_ray(&scene, &ray, 0, &config()), Color::splat(0.9));
    }

    #[test]
    fn test_depth_limit_returns_background() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::diffuse(Color::ONE),
        ));
        let scene = builder.build().expect("valid scene");

        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert_eq!(trace_ray(&scene, &ray, 5, &config()), Color::splat(0.9));
    }

    #[test]
    fn test_lit_diffuse_sphere() {
        let mut builder = Scene::builder();
        builder
            .add_object(SceneObject::new(
                Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
                Material::diffuse(Color::new(1.0, 0.5, 0.25)),
            ))
            .add_light(PointLight::new(DVec3::ZERO, 2.0));
        let scene = builder.build().expect("valid scene");

        // Light sits at the eye: N.L = 1 at the front of the sphere
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        let color = trace_ray(&scene, &ray, 0, &config());
        assert!((color - Color::new(2.0, 1.0, 0.5)).length() < 1e-9);
    }

    #[test]
    fn test_specular_highlight() {
        let material = Material::new(
            Color::ZERO,
            1.0,
            Albedo::new(0.0, 1.0, 0.0, 0.0),
            10.0,
            MaterialKind::Specular,
        );
        let mut builder = Scene::builder();
        builder
            .add_object(SceneObject::new(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0), material))
            .add_light(PointLight::new(DVec3::ZERO, 1.0));
        let scene = builder.build().expect("valid scene");

        // Mirror direction of the light points straight back at the eye
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        let color = trace_ray(&scene, &ray, 0, &config());
        assert!((color - Color::ONE).length() < 1e-9);
    }

    #[test]
    fn test_mirror_reflects_background() {
        let material = Material::new(
            Color::ZERO,
            1.0,
            Albedo::new(0.0, 0.0, 0.5, 0.0),
            0.0,
            MaterialKind::Specular,
        );
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0), material));
        let scene = builder.build().expect("valid scene");

        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        let color = trace_ray(&scene, &ray, 0, &config());
        assert!((color - Color::splat(0.45)).length() < 1e-9);
    }

    #[test]
    fn test_transparent_sphere_shows_background() {
        let material = Material::new(
            Color::ZERO,
            1.5,
            Albedo::new(0.0, 0.0, 0.0, 1.0),
            0.0,
            MaterialKind::Refractive,
        );
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0), material));
        let scene = builder.build().expect("valid scene");

        // Head-on: in through the front, out through the back
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        let color = trace_ray(&scene, &ray, 0, &config());
        assert!((color - Color::splat(0.9)).length() < 1e-9);
    }

    #[test]
    fn test_total_internal_reflection_drops_refraction() {
        // Pure refractor: no diffuse, specular or mirror term to hide behind
        let material = Material::new(
            Color::ONE,
            1.5,
            Albedo::new(0.0, 0.0, 0.0, 1.0),
            0.0,
            MaterialKind::Dielectric,
        );
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(Sphere::new(DVec3::ZERO, 1.0), material));
        let scene = builder.build().expect("valid scene");

        // Leaving through the surface head-on refracts out to the background
        let straight = Ray::new(DVec3::ZERO, DVec3::X);
        let color = trace_ray(&scene, &straight, 0, &config());
        assert!((color - Color::splat(0.9)).length() < 1e-9);

        // About 64 degrees from the normal, past the critical angle
        let grazing = Ray::new(DVec3::new(0.0, 0.9, 0.0), DVec3::X);
        assert_eq!(trace_ray(&scene, &grazing, 0, &config()), Color::ZERO);
    }
}
