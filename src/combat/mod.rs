//! Combat domain: melee attacks, hit resolution and the hitable contract.

mod attack;
mod events;
mod hitable;
mod resolver;


pub use attack::{AttackPosture, HitZone, INPUT_LATCH_DURATION, MeleeAttack};
pub use events::{CharacterTouch, MeleeAttackHit};
pub use hitable::{HitTarget, Hitable, dispatch_hitable};
pub use resolver::{MeleeHit, resolve_melee_hits};

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

/// Systems delivering hit and touch messages to hitable components.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct HitDispatchSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<MeleeAttackHit>()
            .add_message::<CharacterTouch>();
    }
}

/// Registration of [`Hitable`] components.
pub trait HitableAppExt {
    /// Deliver hits and touches to `T`. Entities with `T` become hit targets.
    fn add_hitable<T: Hitable + Component<Mutability = Mutable>>(&mut self) -> &mut Self;
}

impl HitableAppExt for App {
    fn add_hitable<T: Hitable + Component<Mutability = Mutable>>(&mut self) -> &mut Self {
        self.register_required_components::<T, HitTarget>();
        self.add_systems(FixedUpdate, dispatch_hitable::<T>.in_set(HitDispatchSet))
    }
}
