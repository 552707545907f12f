//! Kinematic 2D platformer character: ray-probed motor, state machine,
//! jumps, wall jumps, crouch, moving platforms and melee attacks.
//!
//! The core types ([`character::CharacterController`], [`motor::Motor`]) are
//! plain structs driven through [`physics::CollisionWorld`]; the plugins wire
//! them into a Bevy app on top of avian2d spatial queries.

pub mod carrier;
pub mod character;
pub mod combat;
pub mod content;
#[cfg(feature = "dev-tools")]
pub mod debug;
pub mod input;
pub mod motor;
pub mod physics;

use bevy::prelude::*;

pub mod prelude {
    pub use crate::PlatformerPlugin;
    pub use crate::carrier::Carrier;
    pub use crate::character::{
        CharacterAnimation, CharacterController, CharacterEvent, CharacterNotification,
        CharacterSet, CharacterState, ExternalControl, character_bundle,
    };
    pub use crate::combat::{HitTarget, Hitable, HitableAppExt, MeleeAttackHit, MeleeHit};
    pub use crate::content::CharacterConfig;
    pub use crate::input::{InputSnapshot, KeyboardControlled};
    pub use crate::motor::Motor;
    pub use crate::physics::{GameLayer, RayType, SurfaceMaterial, WallJumpOverride};
}

/// Everything needed to run characters in an app.
pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            physics::PhysicsPlugin,
            content::ContentPlugin,
            input::InputPlugin,
            combat::CombatPlugin,
            carrier::CarrierPlugin,
            character::CharacterPlugin,
        ));

        #[cfg(feature = "dev-tools")]
        app.add_plugins(debug::DebugPlugin);
    }
}
