//! Character domain: state machine, movement rules and ECS integration.

mod animation;
mod controller;
mod events;
mod fsm;
mod jump;
mod locomotion;
mod melee;
mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use animation::CharacterAnimation;
pub use controller::{
    CharacterController, Frame, MAX_AIR_VEL_DAMPING, MAX_ATTACK_DURATION, MIN_JUMP_INTERVAL,
};
pub use events::{AnimationCommand, CharacterEvent, CharacterNotification, FrameOutput};
pub use fsm::{Fsm, Transition};
pub use jump::jump_vertical_speed;
pub use locomotion::{apply_damping, clamp_with_damping, slope_angle};
pub use state::{CharacterState, StateHandler, StateHandlers};

use bevy::prelude::*;

use crate::carrier::MeasureCarriersSet;
use crate::combat::HitDispatchSet;
use crate::content::CharacterConfig;
use crate::input::{InputSnapshot, ReadInputSet};
use crate::motor::Motor;

/// While present, the character is driven by something else (cutscene,
/// ladder script). Removing it resets the controller.
#[derive(Component, Debug, Default)]
pub struct ExternalControl;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    /// Apply external control changes.
    Control,
    /// Run the controllers and emit their messages.
    Step,
    /// Write motor positions to transforms.
    Sync,
}

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CharacterNotification>()
            .configure_sets(
                FixedUpdate,
                (CharacterSet::Control, CharacterSet::Step, CharacterSet::Sync).chain(),
            )
            .configure_sets(FixedUpdate, HitDispatchSet.after(CharacterSet::Step))
            .add_systems(Update, systems::latch_character_inputs.after(ReadInputSet))
            .add_systems(
                FixedUpdate,
                (
                    systems::sync_external_control.in_set(CharacterSet::Control),
                    systems::step_characters.in_set(CharacterSet::Step),
                    systems::sync_character_transforms.in_set(CharacterSet::Sync),
                ),
            )
            .add_systems(
                PostUpdate,
                (
                    systems::animate_characters,
                    systems::carry_characters,
                    systems::sync_character_transforms,
                )
                    .chain()
                    .after(MeasureCarriersSet),
            );
    }
}

/// Components of a controllable character standing at `position`.
pub fn character_bundle(config: &CharacterConfig, position: Vec2) -> impl Bundle {
    (
        Name::new("Character"),
        CharacterController::new(config.clone()),
        Motor::new(&config.motor, position),
        InputSnapshot::default(),
        CharacterAnimation::default(),
        Transform::from_translation(position.extend(0.0)),
    )
}
