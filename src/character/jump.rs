//! Character domain: ground jumps, variable jump height and wall jumps.

use bevy::prelude::*;

use super::controller::{CharacterController, Frame, MIN_JUMP_INTERVAL};
use super::events::CharacterEvent;
use super::state::CharacterState;
use crate::motor::Motor;
use crate::physics::RayType;
use crate::physics::probe::wall_jump_allowed;

/// Launch speed reaching `height` under `gravity`.
pub fn jump_vertical_speed(height: f32, gravity: f32) -> f32 {
    (2.0 * height * gravity).max(0.0).sqrt()
}

impl CharacterController {
    fn jump_interval_elapsed(&self) -> bool {
        self.runtime
            .last_jump_time
            .is_none_or(|last| self.clock() - last > MIN_JUMP_INTERVAL)
    }

    pub(crate) fn handle_jump(&mut self, f: &mut Frame) {
        let settings = &self.config.jump;
        if settings.button.is_empty() {
            return;
        }

        if settings.enabled && self.jump_latched() && self.runtime.on_ground && self.jump_interval_elapsed() {
            if !self.is_crouched() || self.can_uncrouch(f) {
                self.uncrouch(f);
                self.jump(f.motor, 1.0);

                // keep slopes from launching the character too fast
                f.motor.velocity.x *= self.runtime.speed_factor;

                f.out.events.push(CharacterEvent::Jumped);
                debug!("Jump at {:.2}s, vy = {:.2}", self.clock(), f.motor.velocity.y);
                return;
            }
        }

        // hold the button to go higher: cancel gravity inside the window
        let settings = &self.config.jump;
        if let Some(last) = self.runtime.last_jump_time
            && !self.runtime.on_ground
            && f.input.button_held(&settings.button)
            && !f.motor.touch_head()
        {
            let gravity = self.config.movement.gravity;
            let min_speed = jump_vertical_speed(settings.min_height, gravity);
            if min_speed > 0.0 && self.clock() < last + (settings.max_height - settings.min_height) / min_speed {
                f.motor.velocity.y += gravity * f.dt;
            }
        }
    }

    /// Jump right away to `ratio` times the minimum jump height, inheriting
    /// the horizontal velocity of the carrier under the character.
    pub fn jump(&mut self, motor: &mut Motor, ratio: f32) {
        self.runtime.last_jump_time = Some(self.clock());
        self.runtime.anim_air_time = self.config.animations.min_air_time;
        motor.velocity.y = jump_vertical_speed(self.config.jump.min_height * ratio, self.config.movement.gravity);

        if self.runtime.carrier.is_some() {
            motor.velocity.x += self.runtime.carrier_velocity.x;
        }
    }

    pub(crate) fn handle_wall_jump(&mut self, f: &mut Frame) {
        let settings = &self.config.wall_jump;
        if settings.button.is_empty()
            || !self.wall_jump_latched()
            || self.is_crouched()
            || self.runtime.on_ground
            || self.fsm.is_transition_pending()
        {
            return;
        }

        let allowed = wall_jump_allowed(
            f.world,
            f.motor.rays(RayType::Front),
            &settings.ray_indexes,
            settings.enabled,
        );

        if allowed && self.jump_interval_elapsed() {
            self.runtime.last_jump_time = Some(self.clock());
            self.runtime.anim_air_time = self.config.animations.min_air_time;
            self.request(CharacterState::WallJump);
            debug!("Wall jump at {:.2}s", self.clock());
        }
    }
}
