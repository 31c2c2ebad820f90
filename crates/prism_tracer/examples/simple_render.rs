//! Simple Whitted render example.
//!
//! Renders a few spheres inside the checkered backdrop and saves to PPM format.

use prism_scene::{Backdrop, Material, PointLight, Scene, SceneObject, Sphere};
use prism_tracer::{color_to_rgb, Camera, Color, DVec3, PixelBuffer, RenderConfig, Renderer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

fn main() {
    println!("Prism Tracer - Simple Example");
    println!("=============================");

    // Build the scene
    let start = std::time::Instant::now();
    let scene = Arc::new(build_scene());
    println!(
        "Scene built in {:?} ({} octree nodes)",
        start.elapsed(),
        scene.octree().stats().nodes
    );

    // Set up camera
    let camera = Camera::new().with_position(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

    // Render configuration
    let config = RenderConfig::default();
    let renderer = Renderer::new(scene, camera, config).expect("valid render config");

    let (width, height) = (640, 480);
    println!("Rendering {}x{}...", width, height);

    // Render
    let start = std::time::Instant::now();
    let image = renderer.render(width, height).expect("valid resolution");
    println!("Rendered in {:?}", start.elapsed());

    // Save as PPM
    let filename = "output.ppm";
    save_ppm(&image, filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut builder = Scene::builder();

    builder
        .add_object(SceneObject::new(
            Sphere::new(DVec3::new(-3.0, 0.0, -16.0), 2.0),
            Material::diffuse(Color::new(0.4, 0.4, 0.3)),
        ))
        .add_object(SceneObject::new(
            Sphere::new(DVec3::new(-1.0, -1.5, -12.0), 2.0),
            Material::glass(1.5),
        ))
        .add_object(SceneObject::new(
            Sphere::new(DVec3::new(1.5, -0.5, -18.0), 3.0),
            Material::diffuse(Color::new(0.3, 0.1, 0.1)),
        ))
        .add_object(SceneObject::new(
            Sphere::new(DVec3::new(7.0, 5.0, -18.0), 4.0),
            Material::mirror(Color::ONE),
        ));

    // Lights
    builder
        .add_light(PointLight::new(DVec3::new(-20.0, 20.0, 20.0), 1.5))
        .add_light(PointLight::new(DVec3::new(30.0, 50.0, -25.0), 1.8))
        .add_light(PointLight::new(DVec3::new(30.0, 20.0, 30.0), 1.7))
        .with_backdrop(Backdrop::cornell());

    println!("Created {} objects", builder.object_count());
    builder.build().expect("valid scene")
}

fn save_ppm(image: &PixelBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgb = color_to_rgb(image.get(x, y), false);
            writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
        }
    }

    Ok(())
}
