//! Physics domain: collision layers, level queries and contact probing.

mod aabb;
mod layers;
pub mod probe;
mod spatial;
mod world;

#[cfg(test)]
mod tests;

pub use aabb::{AabbCollider, AabbWorld};
pub use layers::{GameLayer, layer_mask, mask_matches};
pub use probe::{GROUND_SNAP_THRESHOLD, ProbeBox, RayHit, RayType};
pub use spatial::{PhysicsView, PhysicsWorld};
pub use world::{CollisionWorld, SurfaceHit, SurfaceMaterial, WallJumpOverride};

use avian2d::prelude::*;
use bevy::prelude::*;

/// Sets up avian2d for spatial queries. Characters are moved kinematically by
/// their motor, so only props and platforms are simulated by avian.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default().with_length_unit(1.0))
            .insert_resource(Gravity(Vec2::NEG_Y * 50.0));
    }
}
