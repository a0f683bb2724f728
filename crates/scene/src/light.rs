use glam::Vec3;
use serde::{Deserialize, Serialize};
use vista_common::Color;

/// Scene light sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    /// Sky/ground gradient ambient: surfaces facing up get `sky`, facing
    /// down get `ground`, blended by the normal's Y component.
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    /// Parallel rays travelling from `position` towards `target`.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
        target: Vec3,
    },
}

impl Light {
    /// Unit vector pointing from the surface towards a directional light.
    /// `None` for lights without a direction or with coincident endpoints.
    pub fn direction_to_light(&self) -> Option<Vec3> {
        match self {
            Light::Directional {
                position, target, ..
            } => {
                let dir = *position - *target;
                (dir.length_squared() > 0.0).then(|| dir.normalize())
            }
            Light::Hemisphere { .. } => None,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Hemisphere { intensity, .. } | Light::Directional { intensity, .. } => {
                *intensity
            }
        }
    }
}
