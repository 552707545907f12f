//! Character domain: locomotion clip selection and the animation player state.

use bevy::prelude::*;

use super::controller::CharacterController;
use super::events::{AnimationCommand, FrameOutput};
use super::state::CharacterState;
use crate::motor::Motor;

/// Playback speeds below this show the stand clip.
const MIN_PLAYBACK_SPEED: f32 = 1e-3;

impl CharacterController {
    /// Pick the stand, run or in-air clip for the `Standard` state.
    ///
    /// Other states drive their clips from their enter handlers.
    pub fn select_animation(&self, motor: &Motor, out: &mut FrameOutput) {
        if self.is_controlled() {
            return;
        }

        out.animations.push(AnimationCommand::SetSpeed(1.0));
        if self.state() != CharacterState::Standard {
            return;
        }

        let anims = &self.config.animations;
        if !self.on_ground() && self.runtime.anim_air_time >= anims.min_air_time {
            out.play(&anims.in_air, None);
            return;
        }

        let filtered = self.axis_x.value().abs();
        let from_input = anims.anim_from_input.evaluate(filtered);

        let speed = if anims.walk_anim_from_input {
            from_input
        } else {
            let ground_speed = if self.on_ground() {
                motor.velocity_on_ground().length()
            } else {
                motor.velocity.x.abs()
            };
            let from_speed = anims.anim_from_speed.evaluate(ground_speed);

            if self.is_sliding() { from_input } else { from_speed }
        };

        if speed < MIN_PLAYBACK_SPEED {
            out.play(&anims.stand, None);
        } else {
            out.play(&anims.run, None);
            out.animations.push(AnimationCommand::SetSpeed(speed.abs()));
        }
    }
}

/// What the animation player should be showing.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CharacterAnimation {
    pub clip: String,
    pub speed: f32,
    /// Playback position in [0, 1] at the last restart.
    pub normalized_time: f32,
}

impl Default for CharacterAnimation {
    fn default() -> Self {
        Self {
            clip: String::new(),
            speed: 1.0,
            normalized_time: 0.0,
        }
    }
}

impl CharacterAnimation {
    pub fn apply(&mut self, command: &AnimationCommand) {
        match command {
            AnimationCommand::Play {
                clip,
                normalized_time: Some(time),
            } => {
                self.clip.clone_from(clip);
                self.normalized_time = *time;
            }
            AnimationCommand::Play {
                clip,
                normalized_time: None,
            } => {
                if self.clip != *clip {
                    self.clip.clone_from(clip);
                    self.normalized_time = 0.0;
                }
            }
            AnimationCommand::SetSpeed(speed) => self.speed = *speed,
        }
    }
}
