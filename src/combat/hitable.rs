//! Combat domain: the contract for objects that react to hits and touches.

use bevy::ecs::component::Mutable;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::events::{CharacterTouch, MeleeAttackHit};
use super::resolver::MeleeHit;
use crate::physics::RayType;

/// Marks an entity as a valid melee and touch target.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct HitTarget;

/// Reactions of a world object to characters. Both callbacks default to no-ops.
pub trait Hitable {
    /// `launcher` hit us with one of its attack zones.
    fn on_melee_attack_hit(&mut self, _launcher: Entity, _hit: &MeleeHit) {}

    /// `launcher` touched us with a probe ray of `ray_type`.
    fn on_character_touch(&mut self, _launcher: Entity, _ray_type: RayType) {}
}

/// Forward hit and touch messages to every `T` they target.
pub fn dispatch_hitable<T: Hitable + Component<Mutability = Mutable>>(
    mut hits: MessageReader<MeleeAttackHit>,
    mut touches: MessageReader<CharacterTouch>,
    mut targets: Query<&mut T>,
) {
    for message in hits.read() {
        if let Ok(mut target) = targets.get_mut(message.hit.target) {
            target.on_melee_attack_hit(message.launcher, &message.hit);
        }
    }

    for message in touches.read() {
        if let Ok(mut target) = targets.get_mut(message.target) {
            target.on_character_touch(message.launcher, message.ray_type);
        }
    }
}
