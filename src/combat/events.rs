//! Combat domain: hit and touch messages.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use super::resolver::MeleeHit;
use crate::physics::RayType;

/// A melee hit zone of `launcher` found a new target.
#[derive(Debug, Clone, Copy)]
pub struct MeleeAttackHit {
    pub launcher: Entity,
    pub hit: MeleeHit,
}

impl Message for MeleeAttackHit {}

/// A probe ray of `launcher` is in contact with `target`.
#[derive(Debug, Clone, Copy)]
pub struct CharacterTouch {
    pub launcher: Entity,
    pub target: Entity,
    pub ray_type: RayType,
}

impl Message for CharacterTouch {}
