//! The collision queries the character core needs from the level.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of a ray cast against the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub surface: Entity,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    pub normal: Vec2,
}

/// Per-surface wall jump override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum WallJumpOverride {
    /// Keep the character's own setting.
    #[default]
    Default,
    Allow,
    Deny,
}

/// Surface properties that override character tuning on contact.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SurfaceMaterial {
    /// Use the friction values below when standing on this surface.
    pub override_friction: bool,
    pub dynamic_friction: f32,
    pub static_friction: f32,
    pub wall_jump: WallJumpOverride,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            override_friction: false,
            dynamic_friction: 1.0,
            static_friction: 1.0,
            wall_jump: WallJumpOverride::Default,
        }
    }
}

impl SurfaceMaterial {
    /// Slippery ground, e.g. ice.
    pub fn friction(dynamic_friction: f32, static_friction: f32) -> Self {
        Self {
            override_friction: true,
            dynamic_friction,
            static_friction,
            ..default()
        }
    }

    pub fn wall_jump(wall_jump: WallJumpOverride) -> Self {
        Self {
            wall_jump,
            ..default()
        }
    }
}

/// Spatial queries against the level, plus lookups of surface properties.
///
/// Overlap results must come back in a stable order so hit notification
/// order is reproducible.
pub trait CollisionWorld {
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<SurfaceHit>;

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Entity>;

    /// True when anything on `mask` overlaps the rectangle spanned by the two corners.
    fn overlap_area(&self, a: Vec2, b: Vec2, mask: LayerMask) -> bool;

    fn material(&self, _surface: Entity) -> Option<SurfaceMaterial> {
        None
    }

    /// Measured velocity when the surface is a carrier.
    fn carrier_velocity(&self, _surface: Entity) -> Option<Vec2> {
        None
    }

    fn is_hitable(&self, _surface: Entity) -> bool {
        false
    }
}
