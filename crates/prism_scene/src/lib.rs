//! Prism Scene - geometry, materials and the octree spatial index.
//!
//! This crate provides:
//!
//! - **Primitives**: [`Sphere`], [`Triangle`] and polygon [`Mesh`], each
//!   answering "closest hit along this ray" through [`Intersect`]
//! - **Materials**: color, four albedo channels, refractive index, Phong
//!   exponent, emission and a [`MaterialKind`] tag
//! - **Scene assembly**: [`SceneBuilder`] validates objects and freezes them
//!   into a [`Scene`] backed by an [`Octree`]
//!
//! # Example
//!
//! ```
//! use prism_math::{Color, DVec3};
//! use prism_scene::{Material, PointLight, Scene, SceneObject, Sphere};
//!
//! let mut builder = Scene::builder();
//! builder
//!     .add_object(SceneObject::new(
//!         Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0),
//!         Material::diffuse(Color::new(0.8, 0.2, 0.2)),
//!     ))
//!     .add_light(PointLight::new(DVec3::new(0.0, 5.0, 0.0), 1.5));
//! let scene = builder.build()?;
//! assert_eq!(scene.objects().len(), 1);
//! # Ok::<(), prism_scene::SceneError>(())
//! ```

pub mod backdrop;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod octree;
pub mod scene;
pub mod shape;
pub mod sphere;
pub mod triangle;

// Re-export commonly used types
pub use backdrop::{Backdrop, BackdropHit, BackdropPlane};
pub use error::{SceneError, SceneResult};
pub use light::PointLight;
pub use material::{Albedo, Material, MaterialKind};
pub use mesh::Mesh;
pub use object::SceneObject;
pub use octree::{Octree, OctreeConfig, OctreeStats};
pub use scene::{Scene, SceneBuilder};
pub use shape::{Culling, Intersect, Shape, ShapeHit};
pub use sphere::Sphere;
pub use triangle::{moller_trumbore, Triangle};
