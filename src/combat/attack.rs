//! Combat domain: runtime melee attacks and their hit zones.

use bevy::prelude::*;

use crate::content::{HitZoneDef, MeleeAttackDef};

/// How long a button press stays latched for the fixed step to consume.
pub const INPUT_LATCH_DURATION: f32 = 0.1;

/// Posture an attack is launched from; picks the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPosture {
    Standing,
    Crouched,
    InAir,
}

/// A circle, relative to the character, that reports overlapping targets.
#[derive(Debug, Clone, PartialEq)]
pub struct HitZone {
    /// Offset from the character origin when facing right.
    pub offset: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub active: bool,
    hits: Vec<Entity>,
}

impl HitZone {
    pub fn new(offset: Vec2, radius: f32, damage: f32) -> Self {
        Self {
            offset,
            radius,
            damage,
            active: true,
            hits: Vec::new(),
        }
    }

    pub fn from_def(def: &HitZoneDef) -> Self {
        Self {
            active: def.active,
            ..Self::new(def.offset, def.radius, def.damage)
        }
    }

    /// World center for a character at `origin` facing `facing` (1 or -1).
    pub fn world_center(&self, origin: Vec2, facing: f32) -> Vec2 {
        origin + Vec2::new(self.offset.x * facing, self.offset.y)
    }

    /// Targets already hit during the current activation.
    pub fn hits(&self) -> &[Entity] {
        &self.hits
    }

    /// Record `target`; false when it was already hit this activation.
    pub fn record_hit(&mut self, target: Entity) -> bool {
        if self.hits.contains(&target) {
            return false;
        }
        self.hits.push(target);
        true
    }

    pub fn clear_hits(&mut self) {
        self.hits.clear();
    }
}

/// One configured melee attack and its input latch.
#[derive(Debug, Clone, PartialEq)]
pub struct MeleeAttack {
    pub button: String,
    pub anim_stand: String,
    pub anim_crouched: String,
    pub anim_in_air: String,
    /// Time after which the attack ends by itself.
    pub duration: Option<f32>,
    pub hit_zones: Vec<HitZone>,
    latched_at: Option<f32>,
}

impl MeleeAttack {
    pub fn from_def(def: &MeleeAttackDef) -> Self {
        Self {
            button: def.button.clone(),
            anim_stand: def.anim_stand.clone(),
            anim_crouched: def.anim_crouched.clone(),
            anim_in_air: def.anim_in_air.clone(),
            duration: def.duration,
            hit_zones: def.hit_zones.iter().map(HitZone::from_def).collect(),
            latched_at: None,
        }
    }

    /// Animation for `posture`; empty means the attack is unavailable there.
    pub fn animation(&self, posture: AttackPosture) -> &str {
        match posture {
            AttackPosture::Standing => &self.anim_stand,
            AttackPosture::Crouched => &self.anim_crouched,
            AttackPosture::InAir => &self.anim_in_air,
        }
    }

    pub fn latch(&mut self, now: f32) {
        self.latched_at = Some(now);
    }

    pub fn is_latched(&self) -> bool {
        self.latched_at.is_some()
    }

    /// Drop the latch once it is older than [`INPUT_LATCH_DURATION`].
    pub fn expire_latch(&mut self, now: f32) {
        if self
            .latched_at
            .is_some_and(|at| now >= at + INPUT_LATCH_DURATION)
        {
            self.latched_at = None;
        }
    }

    pub fn clear_latch(&mut self) {
        self.latched_at = None;
    }

    /// Start a new activation: no zone remembers earlier targets.
    pub fn begin_activation(&mut self) {
        for zone in &mut self.hit_zones {
            zone.clear_hits();
        }
    }
}
