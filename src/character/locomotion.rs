//! Character domain: horizontal movement, slopes, friction and carriers.

use bevy::prelude::*;

use super::controller::{CharacterController, Frame, MAX_AIR_VEL_DAMPING};
use crate::input::{InputSource, filter_step};
use crate::motor::Motor;
use crate::physics::{CollisionWorld, RayType};
use crate::physics::probe::ground_frictions;

/// Exponential decay of `value` over `dt`.
pub fn apply_damping(value: f32, damping: f32, dt: f32) -> f32 {
    value * (-damping * dt).exp()
}

/// Damp `value` back toward `[min, max]` when outside, never past the bound.
pub fn clamp_with_damping(value: f32, damping: f32, min: f32, max: f32, dt: f32) -> f32 {
    if value > max {
        max.max(apply_damping(value, damping, dt))
    } else if value < min {
        min.min(apply_damping(value, damping, dt))
    } else {
        value
    }
}

/// Signed slope angle in degrees under a character moving along `move_dir`:
/// positive uphill, negative downhill.
pub fn slope_angle(ground_normal: Vec2, move_dir: f32) -> f32 {
    let angle = ground_normal.y.clamp(-1.0, 1.0).acos().to_degrees();
    if move_dir != ground_normal.x.signum() { angle } else { -angle }
}

impl CharacterController {
    fn running(&self, input: &dyn InputSource) -> bool {
        let movement = &self.config.movement;
        movement.always_run || input.button_held(&self.config.input.run_button)
    }

    /// Speed cap for the current ground status and run input.
    pub fn max_speed(&self, input: &dyn InputSource) -> f32 {
        let movement = &self.config.movement;
        if !self.runtime.on_ground {
            movement.max_air_speed
        } else if self.running(input) {
            movement.run_speed
        } else {
            movement.walk_speed
        }
    }

    pub(crate) fn handle_horizontal_move(&mut self, f: &mut Frame) {
        self.runtime.sliding = false;
        let max_speed = self.max_speed(f.input);
        let dt = f.dt;

        let input = self.axis_x.value();
        let move_dir = if input != 0.0 { input.signum() } else { f.motor.facing() };
        let normal = f.motor.ground_normal();

        self.runtime.speed_factor = 1.0;
        if self.runtime.on_ground {
            let angle = slope_angle(normal, move_dir);
            self.runtime.speed_factor = self
                .config
                .movement
                .slope_speed_multiplier
                .evaluate(angle)
                .clamp(0.0, 1.0);
        }

        let mut direction = Vec2::new(move_dir, 0.0);
        let abs_input = input.abs();
        let mut target = abs_input * max_speed * self.runtime.speed_factor;

        let crouched = self.is_crouched();
        let attacking = self.is_attacking();
        if self.runtime.on_ground {
            // follow the ground plane
            if direction.dot(normal).abs() > f32::EPSILON {
                let normal3 = normal.extend(0.0);
                let perpendicular = direction.extend(0.0).cross(normal3);
                direction = normal3.cross(perpendicular).truncate().normalize_or_zero();
            }

            if crouched || attacking {
                target = 0.0;
            }
        }

        let movement = &self.config.movement;
        if self.runtime.on_ground {
            let (dynamic_friction, static_friction) = ground_frictions(
                f.world,
                f.motor.rays(RayType::Ground),
                movement.friction_dynamic,
                movement.friction_static,
            );
            self.runtime.sliding = dynamic_friction < 1.0;

            let along = f.motor.velocity.dot(direction);
            let mut speed = along;
            if self.runtime.sliding {
                if !crouched && !attacking && abs_input > 0.0 {
                    let headroom = max_speed - along;
                    if headroom > 0.0 {
                        speed = along + headroom.min(abs_input * dynamic_friction * dt * 20.0);
                    }
                } else {
                    speed = apply_damping(along, static_friction, dt);
                }
            } else {
                let deceleration = if crouched || attacking {
                    movement.deceleration * 2.0
                } else {
                    movement.deceleration
                };
                speed = filter_step(along, target, true, movement.acceleration, deceleration, dt);
            }

            let speed = clamp_with_damping(speed, MAX_AIR_VEL_DAMPING, -max_speed, max_speed, dt);
            f.motor.velocity = direction * speed;
            self.runtime.ground_speed = speed.abs();
        } else {
            let along = f.motor.velocity.dot(direction);
            let max_accel = movement.air_power * dt;
            let change = (target - along).clamp(-max_accel, max_accel);

            let velocity = &mut f.motor.velocity;
            *velocity += direction * change;
            velocity.x = clamp_with_damping(
                velocity.x,
                MAX_AIR_VEL_DAMPING,
                -movement.max_air_speed,
                movement.max_air_speed,
                dt,
            );
            velocity.y = clamp_with_damping(
                velocity.y,
                MAX_AIR_VEL_DAMPING,
                -movement.max_fall_speed,
                movement.max_fall_speed,
                dt,
            );
            self.runtime.ground_speed = 0.0;
        }
    }

    /// Face the raw horizontal input.
    pub(crate) fn handle_auto_rotate(&mut self, f: &mut Frame) {
        if !self.runtime.auto_rotate {
            return;
        }

        let raw = self.axis_x.raw();
        if (raw > 0.0 && !f.motor.face_right()) || (raw < 0.0 && f.motor.face_right()) {
            f.motor.flip();
        }
    }

    /// Move the character with the carrier under its ground rays.
    ///
    /// When several carriers are touched, the ray that carried last time wins.
    pub fn handle_carry(&mut self, motor: &mut Motor, world: &dyn CollisionWorld, dt: f32) {
        self.runtime.carrier = None;
        if self.controlled_or_airborne() {
            return;
        }

        let preferred = self.runtime.carry_ray_index;
        for ray in motor.rays(RayType::Ground) {
            let Some(surface) = ray.surface else {
                continue;
            };
            let Some(velocity) = world.carrier_velocity(surface) else {
                continue;
            };
            if self.runtime.carrier.is_none() || ray.index == preferred {
                self.runtime.carrier = Some(surface);
                self.runtime.carrier_velocity = velocity;
                self.runtime.carry_ray_index = ray.index;
            }
        }

        if self.runtime.carrier.is_some() {
            motor.position += self.runtime.carrier_velocity * dt;
        }
    }

    fn controlled_or_airborne(&self) -> bool {
        self.is_controlled() || !self.runtime.on_ground
    }
}
