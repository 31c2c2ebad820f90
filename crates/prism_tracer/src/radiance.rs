//! Stochastic path tracing (radiance mode).
//!
//! Diffuse bounces sample the cosine-weighted hemisphere and add explicit
//! samples of every Light-kind object; the recursive call then ignores
//! emission (`E = 0`) so direct light is not counted twice. Mirrors recurse
//! once. Dielectrics split into Fresnel-weighted reflection and refraction,
//! stochastically past depth 2.

use crate::config::RenderConfig;
use crate::intersect::{scene_intersect, LightVisibility, SurfaceInteraction};
use crate::optics::{face_forward, offset_origin, reflect, refract, schlick};
use crate::sampling::{cosine_hemisphere, gen_f64, uniform_cone};
use prism_math::{max_component, Color, DVec3, Ray};
use prism_scene::{MaterialKind, Scene};
use rand::RngCore;
use std::f64::consts::{FRAC_1_PI, PI};

/// Index of refraction outside every dielectric.
const AIR_INDEX: f64 = 1.0;

/// Estimate the radiance arriving along `ray`.
///
/// `emission_weight` scales the emission of the surface that is hit; it is
/// 0 after a diffuse bounce whose lights were already sampled explicitly.
pub fn radiance(
    scene: &Scene,
    ray: &Ray,
    depth: u32,
    emission_weight: f64,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(hit) = scene_intersect(scene, ray, LightVisibility::Solid) else {
        return config.background;
    };

    let depth = depth + 1;
    if depth > config.path_max_depth {
        return Color::ZERO;
    }

    let material = hit.material;
    let Some(scatter) = Scatter::of(material.kind) else {
        return material.emission * emission_weight;
    };

    let mut f = material.color;
    let p = max_component(f);
    if depth > config.roulette_depth || p <= 0.0 {
        if p > 0.0 && gen_f64(rng) < p {
            f /= p;
        } else {
            return material.emission * emission_weight;
        }
    }

    match scatter {
        Scatter::Mirror => {
            let dir = reflect(ray.direction, hit.normal).normalize();
            let bounce = Ray::new(offset_origin(hit.point, hit.normal, dir), dir);
            material.emission + f * radiance(scene, &bounce, depth, 1.0, config, rng)
        }
        Scatter::Dielectric => {
            material.emission + f * dielectric(scene, ray, &hit, depth, config, rng)
        }
        Scatter::Diffuse => {
            let nl = face_forward(hit.normal, ray.direction);
            let dir = cosine_hemisphere(nl, rng);
            let bounce = Ray::new(offset_origin(hit.point, hit.normal, dir), dir);
            let direct = sample_lights(scene, &hit, nl, f, rng);

            material.emission * emission_weight
                + direct
                + f * radiance(scene, &bounce, depth, 0.0, config, rng)
        }
    }
}

/// How a non-emitter continues a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scatter {
    Mirror,
    Dielectric,
    Diffuse,
}

impl Scatter {
    /// `None` for Light-kind surfaces, which end the path.
    fn of(kind: MaterialKind) -> Option<Self> {
        match kind {
            MaterialKind::Light => None,
            MaterialKind::Specular => Some(Scatter::Mirror),
            MaterialKind::Dielectric | MaterialKind::Refractive => Some(Scatter::Dielectric),
            MaterialKind::Diffuse => Some(Scatter::Diffuse),
        }
    }
}

/// Explicit light sampling for a diffuse hit.
///
/// Each Light-kind object is approximated by its bounding sphere; one
/// direction is drawn inside the cone the sphere subtends, and the sample
/// counts only if the nearest surface along it is that same light.
fn sample_lights(
    scene: &Scene,
    hit: &SurfaceInteraction,
    nl: DVec3,
    f: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let mut direct = Color::ZERO;

    for &id in scene.light_ids() {
        if hit.object == Some(id) {
            continue;
        }
        let Some(light) = scene.object(id) else {
            continue;
        };

        let (center, radius) = light.shape().bounding_sphere();
        let to_center = center - hit.point;
        let dist2 = to_center.length_squared();
        if dist2 <= radius * radius {
            continue;
        }

        let cos_a_max = (1.0 - radius * radius / dist2).sqrt();
        let l = uniform_cone(to_center / dist2.sqrt(), cos_a_max, rng);
        let shadow_ray = Ray::new(offset_origin(hit.point, hit.normal, l), l);

        let visible = scene_intersect(scene, &shadow_ray, LightVisibility::Solid)
            .is_some_and(|blocker| blocker.object == Some(id));
        if visible {
            let omega = 2.0 * PI * (1.0 - cos_a_max);
            direct += f * light.material().emission * l.dot(nl).max(0.0) * omega * FRAC_1_PI;
        }
    }

    direct
}

/// Fresnel-weighted reflection and refraction through a dielectric surface.
fn dielectric(
    scene: &Scene,
    ray: &Ray,
    hit: &SurfaceInteraction,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let n = hit.normal;
    let nl = face_forward(n, ray.direction);
    let ior = hit.material.refractive_index;

    let reflect_dir = reflect(ray.direction, n).normalize();
    let reflect_ray = Ray::new(offset_origin(hit.point, n, reflect_dir), reflect_dir);

    let Some(refract_dir) = refract(ray.direction, n, ior, AIR_INDEX) else {
        return radiance(scene, &reflect_ray, depth, 1.0, config, rng);
    };
    let refract_dir = refract_dir.normalize();
    let refract_ray = Ray::new(offset_origin(hit.point, n, refract_dir), refract_dir);

    // Schlick's cosine is taken on the air side of the interface
    let entering = n.dot(nl) > 0.0;
    let cos_theta = if entering {
        -ray.direction.dot(nl)
    } else {
        refract_dir.dot(n)
    };
    let re = schlick(cos_theta, AIR_INDEX, ior);
    let tr = 1.0 - re;

    if depth > 2 {
        let p = 0.25 + 0.5 * re;
        if gen_f64(rng) < p {
            radiance(scene, &reflect_ray, depth, 1.0, config, rng) * (re / p)
        } else {
            radiance(scene, &refract_ray, depth, 1.0, config, rng) * (tr / (1.0 - p))
        }
    } else {
        radiance(scene, &reflect_ray, depth, 1.0, config, rng) * re
            + radiance(scene, &refract_ray, depth, 1.0, config, rng) * tr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShadingMode;
    use crate::sampling::pixel_rng;
    use prism_scene::{Material, SceneObject, Sphere, Triangle};

    fn config() -> RenderConfig {
        RenderConfig {
            mode: ShadingMode::PathTraced,
            ..Default::default()
        }
    }

    #[test]
    fn test_miss_returns_background() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::diffuse(Color::ONE),
        ));
        let scene = builder.build().expect("valid scene");

        let mut rng = pixel_rng(0, 0);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert_eq!(radiance(&scene, &ray, 0, 1.0, &config(), &mut rng), Color::splat(0.9));
    }

    #[test]
    fn test_light_hit_is_weighted_by_e() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::light(Color::splat(4.0)),
        ));
        let scene = builder.build().expect("valid scene");

        let mut rng = pixel_rng(0, 0);
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert_eq!(radiance(&scene, &ray, 0, 1.0, &config(), &mut rng), Color::splat(4.0));
        assert_eq!(radiance(&scene, &ray, 0, 0.0, &config(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_depth_cap_returns_black() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::diffuse(Color::ONE),
        ));
        let scene = builder.build().expect("valid scene");

        let mut rng = pixel_rng(0, 0);
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert_eq!(radiance(&scene, &ray, 10, 1.0, &config(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_black_surface_terminates_with_emission() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::diffuse(Color::ZERO).with_emission(Color::splat(0.3)),
        ));
        let scene = builder.build().expect("valid scene");

        let mut rng = pixel_rng(0, 0);
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert_eq!(radiance(&scene, &ray, 0, 1.0, &config(), &mut rng), Color::splat(0.3));
    }

    #[test]
    fn test_explicit_light_sampling() {
        // Diffuse sphere lit by a small light; the bounce escapes to a black
        // background, so only the explicit sample can contribute.
        let mut builder = Scene::builder();
        builder
            .add_object(SceneObject::new(
                Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
                Material::diffuse(Color::splat(0.5)),
            ))
            .add_object(SceneObject::new(
                Sphere::new(DVec3::new(0.0, 0.0, -1.0), 0.25),
                Material::light(Color::ONE),
            ));
        let scene = builder.build().expect("valid scene");
        let config = RenderConfig {
            background: Color::ZERO,
            ..config()
        };

        let mut rng = pixel_rng(9, 0);
        let ray = Ray::new(DVec3::new(0.0, 0.5, 0.0), DVec3::new(0.0, -0.5, -4.5));
        let color = radiance(&scene, &ray, 0, 1.0, &config, &mut rng);
        assert!(color.x > 0.0);
    }

    #[test]
    fn test_glass_sphere_is_not_black() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::glass(1.5),
        ));
        let scene = builder.build().expect("valid scene");

        let mut rng = pixel_rng(4, 0);
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        let color = radiance(&scene, &ray, 0, 1.0, &config(), &mut rng);
        // Both branches end in the background at depth <= 2
        assert!(color.x > 0.5 && color.x < 1.0);
    }

    #[test]
    fn test_roulette_rescales_survivors() {
        // Half-silvered mirror whose reflection escapes to the background
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
            Material::mirror(Color::splat(0.5)),
        ));
        let scene = builder.build().expect("valid scene");
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        let mut rng = pixel_rng(11, 0);

        let early = radiance(&scene, &ray, 0, 1.0, &config(), &mut rng);
        assert!((early - Color::splat(0.45)).length() < 1e-12);

        let config = RenderConfig {
            roulette_depth: 0,
            ..config()
        };
        let samples = 4000;
        let mut survivors = 0;
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            let color = radiance(&scene, &ray, 0, 1.0, &config, &mut rng);
            if color != Color::ZERO {
                // Divided by p = 0.5, so the full background comes back
                assert!((color - Color::splat(0.9)).length() < 1e-12);
                survivors += 1;
            }
            sum += color;
        }

        assert!(survivors > 0 && survivors < samples);
        let mean = sum / samples as f64;
        assert!((mean.x - 0.45).abs() < 0.03, "mean {:?}", mean);
    }

    #[test]
    fn test_deep_dielectric_picks_one_branch() {
        // Glass pane facing the camera with a light behind it; reflection
        // escapes to the background, refraction reaches the light.
        let mut builder = Scene::builder();
        builder
            .add_object(SceneObject::new(
                Triangle::new(
                    DVec3::new(-4.0, -4.0, -3.0),
                    DVec3::new(4.0, -4.0, -3.0),
                    DVec3::new(0.0, 4.0, -3.0),
                ),
                Material::glass(1.5),
            ))
            .add_object(SceneObject::new(
                Sphere::new(DVec3::new(0.0, 0.0, -10.0), 2.0),
                Material::light(Color::splat(2.0)),
            ));
        let scene = builder.build().expect("valid scene");
        let config = config();
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);

        let re = schlick(1.0, AIR_INDEX, 1.5);
        let expected =
            Material::glass(1.5).color * (config.background * re + Color::splat(2.0) * (1.0 - re));

        // Shallow hits add both branches
        let mut rng = pixel_rng(5, 0);
        let shallow = radiance(&scene, &ray, 0, 1.0, &config, &mut rng);
        assert!((shallow - expected).length() < 1e-9);

        // Past depth 2 a single branch is followed and reweighted
        let samples = 4000;
        let mut reflected = 0;
        let mut sum = Color::ZERO;
        for _ in 0..samples {
            let color = radiance(&scene, &ray, 2, 1.0, &config, &mut rng);
            if color.x < 1.0 {
                reflected += 1;
            }
            sum += color;
        }

        let p = 0.25 + 0.5 * re;
        let fraction = reflected as f64 / samples as f64;
        assert!((fraction - p).abs() < 0.05, "reflected {}", fraction);
        let mean = sum / samples as f64;
        assert!((mean - expected).length() < 0.15, "mean {:?}, expected {:?}", mean, expected);
    }

    #[test]
    fn test_total_internal_reflection_stays_inside() {
        let mut builder = Scene::builder();
        builder.add_object(SceneObject::new(
            Sphere::new(DVec3::ZERO, 1.0),
            Material::glass(1.5),
        ));
        let scene = builder.build().expect("valid scene");
        let mut rng = pixel_rng(2, 0);

        // Head-on exit refracts out to the background
        let straight = Ray::new(DVec3::ZERO, DVec3::X);
        let color = radiance(&scene, &straight, 0, 1.0, &config(), &mut rng);
        assert!(color.x > 0.5);

        // Past the critical angle every bounce reflects back in and the path
        // never reaches the background
        let grazing = Ray::new(DVec3::new(0.0, 0.9, 0.0), DVec3::X);
        for _ in 0..16 {
            assert_eq!(
                radiance(&scene, &grazing, 0, 1.0, &config(), &mut rng),
                Color::ZERO
            );
        }
    }

    #[test]
    fn test_only_light_kind_ends_the_path() {
        assert_eq!(Scatter::of(MaterialKind::Light), None);
        assert_eq!(Scatter::of(MaterialKind::Diffuse), Some(Scatter::Diffuse));
        assert_eq!(Scatter::of(MaterialKind::Specular), Some(Scatter::Mirror));
        assert_eq!(Scatter::of(MaterialKind::Refractive), Some(Scatter::Dielectric));
        assert_eq!(Scatter::of(MaterialKind::Dielectric), Some(Scatter::Dielectric));
    }
}
