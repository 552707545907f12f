//! Combat domain: hit detection for the active melee attack.

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use super::attack::MeleeAttack;
use crate::physics::CollisionWorld;

/// A hitable target newly overlapped by a hit zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeHit {
    pub attack: usize,
    pub zone: usize,
    pub target: Entity,
    /// World center of the zone when the hit was found.
    pub center: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// Query every active zone of `attack` and report targets not yet hit in
/// this activation, in query order.
pub fn resolve_melee_hits(
    world: &dyn CollisionWorld,
    attack_index: usize,
    attack: &mut MeleeAttack,
    origin: Vec2,
    facing: f32,
    mask: LayerMask,
) -> Vec<MeleeHit> {
    let mut hits = Vec::new();

    for (zone_index, zone) in attack.hit_zones.iter_mut().enumerate() {
        if !zone.active || zone.radius <= 0.0 {
            continue;
        }

        let center = zone.world_center(origin, facing);
        for target in world.overlap_circle(center, zone.radius, mask) {
            if !world.is_hitable(target) || !zone.record_hit(target) {
                continue;
            }
            hits.push(MeleeHit {
                attack: attack_index,
                zone: zone_index,
                target,
                center,
                radius: zone.radius,
                damage: zone.damage,
            });
        }
    }

    hits
}
