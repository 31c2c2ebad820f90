//! Errors raised while building a scene.
//!
//! Only construction can fail. Once a [`Scene`](crate::Scene) exists, every
//! query resolves to a defined value (a hit, no hit, or a fallback color).

use thiserror::Error;

/// Errors that can occur while assembling a scene or its geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Scene contains no objects")]
    EmptyScene,

    #[error("Degenerate scene bounds: min {min:?}, max {max:?}")]
    DegenerateBounds { min: [f64; 3], max: [f64; 3] },

    #[error("Object {index} has non-finite geometry")]
    NonFiniteGeometry { index: usize },

    #[error("Light-kind object {index} has no emission")]
    InvalidLight { index: usize },

    #[error("Invalid material on object {index}: {reason}")]
    InvalidMaterial { index: usize, reason: String },

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
