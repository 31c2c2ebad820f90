//! Point lights for the deterministic shading mode.

use prism_math::DVec3;
use serde::{Deserialize, Serialize};

/// An infinitesimal light with a scalar intensity.
///
/// Point lights are independent of Light-kind scene objects: the Whitted
/// tracer uses point lights only, the path tracer samples Light-kind
/// objects. A scene may carry both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: DVec3,
    pub intensity: f64,
}

impl PointLight {
    pub fn new(position: DVec3, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}
