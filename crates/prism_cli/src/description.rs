//! JSON scene descriptions.
//!
//! Vectors are written as `[x, y, z]` arrays. Every section is optional:
//!
//! ```json
//! {
//!   "camera": { "position": [-10, 0, 0], "look_at": [0, 0, 0] },
//!   "objects": [
//!     { "type": "sphere", "center": [10, 0, 0], "radius": 1,
//!       "material": { "color": [0, 1, 0] } },
//!     { "type": "poly_sphere", "center": [10, 0, 3], "radius": 1, "divisions": 12,
//!       "material": { "kind": "light", "emission": [4, 4, 4] } }
//!   ],
//!   "lights": [ { "position": [10, 10, 10], "intensity": 1 } ],
//!   "backdrop": false,
//!   "render": { "mode": "path_traced", "samples_per_pixel": 16 }
//! }
//! ```

use prism_math::{Aabb, DVec2, DVec3};
use prism_scene::{
    Backdrop, Culling, Material, Mesh, OctreeConfig, PointLight, Scene, SceneObject,
    SceneResult, Shape, Sphere, Triangle,
};
use prism_tracer::{Camera, RenderConfig, DEFAULT_HALF_ANGLE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: DVec3,
    pub look_at: DVec3,
    pub up: DVec3,
    /// Vertical half-angle in degrees
    pub half_angle: f64,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            look_at: DVec3::new(0.0, 0.0, -1.0),
            up: DVec3::Y,
            half_angle: DEFAULT_HALF_ANGLE,
        }
    }
}

impl CameraDescription {
    pub fn to_camera(&self) -> Camera {
        Camera::new()
            .with_position(self.position, self.look_at)
            .with_up(self.up)
            .with_half_angle(self.half_angle)
    }
}

/// Geometry of one object, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere {
        center: DVec3,
        radius: f64,
    },
    Triangle {
        vertices: [DVec3; 3],
        #[serde(default)]
        culling: Culling,
    },
    PolySphere {
        center: DVec3,
        radius: f64,
        divisions: u32,
        #[serde(default)]
        culling: Culling,
    },
    /// Without `face_counts`, `indices` lists triangles and `normals`/`uvs`
    /// are per vertex. With `face_counts`, `indices` lists polygon corners
    /// and `normals`/`uvs` are per corner.
    Mesh {
        positions: Vec<DVec3>,
        indices: Vec<u32>,
        #[serde(default)]
        face_counts: Option<Vec<u32>>,
        #[serde(default)]
        normals: Option<Vec<DVec3>>,
        #[serde(default)]
        uvs: Option<Vec<DVec2>>,
        #[serde(default)]
        culling: Culling,
    },
}

impl ShapeDescription {
    pub fn to_shape(&self) -> SceneResult<Shape> {
        let shape: Shape = match self {
            ShapeDescription::Sphere { center, radius } => Sphere::new(*center, *radius).into(),
            ShapeDescription::Triangle { vertices, culling } => {
                let [v0, v1, v2] = *vertices;
                Triangle::new(v0, v1, v2).with_culling(*culling).into()
            }
            ShapeDescription::PolySphere {
                center,
                radius,
                divisions,
                culling,
            } => Mesh::poly_sphere(*center, *radius, *divisions)?
                .with_culling(*culling)
                .into(),
            ShapeDescription::Mesh {
                positions,
                indices,
                face_counts: None,
                normals,
                uvs,
                culling,
            } => Mesh::new(positions.clone(), indices.clone(), normals.clone(), uvs.clone())?
                .with_culling(*culling)
                .into(),
            ShapeDescription::Mesh {
                positions,
                indices,
                face_counts: Some(face_counts),
                normals,
                uvs,
                culling,
            } => Mesh::from_polygons(
                face_counts,
                indices,
                positions.clone(),
                normals.as_deref(),
                uvs.as_deref(),
            )?
            .with_culling(*culling)
            .into(),
        };
        Ok(shape)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    #[serde(flatten)]
    pub shape: ShapeDescription,
    #[serde(default)]
    pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsDescription {
    pub min: DVec3,
    pub max: DVec3,
}

/// A complete scene file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub objects: Vec<ObjectDescription>,
    pub lights: Vec<PointLight>,
    /// Enclose the scene in the checkered five-plane box
    pub backdrop: bool,
    /// Octree root bounds; the union of the object boxes when absent
    pub bounds: Option<BoundsDescription>,
    pub octree: OctreeConfig,
    /// Render settings; command-line flags override individual fields
    pub render: RenderConfig,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The built-in scene: four coloured spheres and two triangles in a
    /// ring around x = 10, a glass poly-sphere in the middle and one small
    /// emissive sphere for the path tracer, viewed from x = -10.
    pub fn demo() -> Self {
        let sphere = |center: DVec3, color: DVec3| ObjectDescription {
            shape: ShapeDescription::Sphere {
                center,
                radius: 1.0,
            },
            material: Material::diffuse(color),
        };
        let triangle = |vertices: [DVec3; 3], color: DVec3| ObjectDescription {
            shape: ShapeDescription::Triangle {
                vertices,
                culling: Culling::TwoSided,
            },
            material: Material::diffuse(color),
        };

        let objects = vec![
            sphere(DVec3::new(10.0, -2.0, 0.0), DVec3::new(0.0, 1.0, 0.0)),
            sphere(DVec3::new(10.0, 0.0, -2.0), DVec3::new(0.0, 0.0, 1.0)),
            sphere(DVec3::new(10.0, 2.0, 0.0), DVec3::new(1.0, 0.0, 0.0)),
            sphere(DVec3::new(10.0, 0.0, 2.0), DVec3::new(0.9, 0.9, 0.1)),
            triangle(
                [
                    DVec3::new(10.0, 0.0, -2.0),
                    DVec3::new(10.0, 2.0, -2.0),
                    DVec3::new(10.0, 0.0, -4.0),
                ],
                DVec3::new(0.0, 0.0, 1.0),
            ),
            triangle(
                [
                    DVec3::new(10.0, 1.0, 2.0),
                    DVec3::new(10.0, -1.0, 2.0),
                    DVec3::new(10.0, 1.0, 4.0),
                ],
                DVec3::new(1.0, 0.0, 0.0),
            ),
            ObjectDescription {
                shape: ShapeDescription::PolySphere {
                    center: DVec3::new(10.0, 0.0, 0.0),
                    radius: 0.8,
                    divisions: 16,
                    culling: Culling::TwoSided,
                },
                material: Material::glass(1.5),
            },
            ObjectDescription {
                shape: ShapeDescription::Sphere {
                    center: DVec3::new(6.0, 5.0, 0.0),
                    radius: 0.5,
                },
                material: Material::light(DVec3::splat(20.0)),
            },
        ];

        Self {
            camera: CameraDescription {
                position: DVec3::new(-10.0, 0.0, 0.0),
                look_at: DVec3::ZERO,
                ..Default::default()
            },
            objects,
            lights: vec![PointLight::new(DVec3::new(10.0, 10.0, 10.0), 1.0)],
            backdrop: false,
            bounds: Some(BoundsDescription {
                min: DVec3::splat(-20.0),
                max: DVec3::splat(20.0),
            }),
            octree: OctreeConfig::default(),
            render: RenderConfig::default(),
        }
    }

    /// Build the frozen scene.
    pub fn build(&self) -> SceneResult<Scene> {
        let mut builder = Scene::builder();
        for object in &self.objects {
            builder.add_object(SceneObject::new(object.shape.to_shape()?, object.material));
        }
        for light in &self.lights {
            builder.add_light(*light);
        }
        if self.backdrop {
            builder.with_backdrop(Backdrop::cornell());
        }
        if let Some(bounds) = self.bounds {
            builder.with_bounds(Aabb::from_points(bounds.min, bounds.max));
        }
        builder.with_octree_config(self.octree);
        builder.build()
    }
}
