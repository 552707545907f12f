//! Character domain: the controller driving a motor from input.

use bevy::prelude::*;

use super::events::{CharacterEvent, FrameOutput};
use super::fsm::Fsm;
use super::state::CharacterState;
use crate::combat::{INPUT_LATCH_DURATION, MeleeAttack};
use crate::content::CharacterConfig;
use crate::input::{InputAxis, InputSource};
use crate::motor::Motor;
use crate::physics::CollisionWorld;
use crate::physics::probe::is_grounded;

/// Minimum time between two jumps (ground or wall).
pub const MIN_JUMP_INTERVAL: f32 = 0.1;
/// Damping applied while a speed cap is exceeded.
pub const MAX_AIR_VEL_DAMPING: f32 = 0.5;
/// Attacks lasting longer than this return to the previous state.
pub const MAX_ATTACK_DURATION: f32 = 10.0;
/// Raw vertical input below this crouches.
const CROUCH_INPUT_THRESHOLD: f32 = -0.5;
/// Shrink factor of the box tested before standing up.
const UNCROUCH_TEST_SCALE: f32 = 0.9;

/// Everything a state handler may touch during one update.
pub struct Frame<'a> {
    pub motor: &'a mut Motor,
    pub world: &'a dyn CollisionWorld,
    pub input: &'a dyn InputSource,
    pub dt: f32,
    pub out: &'a mut FrameOutput,
}

/// Full-height box saved while crouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CrouchBackup {
    pub size_y: f32,
    pub center_y: f32,
}

/// Values rebuilt from scratch whenever external control is released.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Runtime {
    pub on_ground: bool,
    pub ground_speed: f32,
    pub speed_factor: f32,
    pub sliding: bool,
    pub auto_rotate: bool,
    pub last_jump_time: Option<f32>,
    pub anim_air_time: f32,
    pub jump_latched_at: Option<f32>,
    pub wall_jump_latched_at: Option<f32>,
    pub crouch_backup: Option<CrouchBackup>,
    pub carrier: Option<Entity>,
    pub carrier_velocity: Vec2,
    pub carry_ray_index: usize,
    pub wall_jump_flip_done: bool,
    pub wall_jump_auto_rotate: bool,
    pub current_attack: Option<usize>,
    pub attack_animation: String,
    pub attack_crouched: bool,
}

impl Runtime {
    fn new(config: &CharacterConfig) -> Self {
        Self {
            on_ground: false,
            ground_speed: 0.0,
            speed_factor: 1.0,
            sliding: false,
            auto_rotate: config.movement.auto_rotate,
            last_jump_time: None,
            anim_air_time: config.animations.min_air_time,
            jump_latched_at: None,
            wall_jump_latched_at: None,
            crouch_backup: None,
            carrier: None,
            carrier_velocity: Vec2::ZERO,
            carry_ray_index: 0,
            wall_jump_flip_done: false,
            wall_jump_auto_rotate: config.movement.auto_rotate,
            current_attack: None,
            attack_animation: String::new(),
            attack_crouched: false,
        }
    }
}

/// Platformer character controller.
///
/// Owns the tuning, the filtered input axes, the melee attacks and the state
/// machine. The [`Motor`] is passed in each update; the controller only
/// writes its velocity, facing and box.
#[derive(Component, Debug, Clone)]
pub struct CharacterController {
    pub config: CharacterConfig,
    pub axis_x: InputAxis,
    pub axis_y: InputAxis,
    pub(crate) attacks: Vec<MeleeAttack>,
    pub(crate) fsm: Fsm<CharacterState>,
    pub(crate) runtime: Runtime,
    clock: f32,
    controlled: bool,
}

impl CharacterController {
    pub fn new(config: CharacterConfig) -> Self {
        Self {
            axis_x: InputAxis::from_settings(&config.input.axis_x),
            axis_y: InputAxis::from_settings(&config.input.axis_y),
            attacks: config.melee.attacks.iter().map(MeleeAttack::from_def).collect(),
            fsm: Fsm::new(CharacterState::Standard),
            runtime: Runtime::new(&config),
            clock: 0.0,
            controlled: false,
            config,
        }
    }

    // ---- queries ----

    pub fn state(&self) -> CharacterState {
        self.fsm.current()
    }

    pub fn previous_state(&self) -> CharacterState {
        self.fsm.previous()
    }

    pub fn requested_state(&self) -> CharacterState {
        self.fsm.requested()
    }

    pub fn state_time(&self) -> f32 {
        self.fsm.state_time()
    }

    pub fn on_ground(&self) -> bool {
        self.runtime.on_ground
    }

    pub fn ground_speed(&self) -> f32 {
        self.runtime.ground_speed
    }

    pub fn is_sliding(&self) -> bool {
        self.runtime.sliding
    }

    pub fn auto_rotate(&self) -> bool {
        self.runtime.auto_rotate
    }

    /// Time since the controller was created.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn last_jump_time(&self) -> Option<f32> {
        self.runtime.last_jump_time
    }

    /// Carrier the character stood on during the last carry pass.
    pub fn carrier(&self) -> Option<Entity> {
        self.runtime.carrier
    }

    pub fn attacks(&self) -> &[MeleeAttack] {
        &self.attacks
    }

    /// Index of the attack being played.
    pub fn current_attack(&self) -> Option<usize> {
        self.runtime.current_attack
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn is_attacking(&self) -> bool {
        self.state() == CharacterState::MeleeAttack
            || self.requested_state() == CharacterState::MeleeAttack
    }

    pub fn is_attacking_crouched(&self) -> bool {
        self.is_attacking() && self.runtime.attack_crouched
    }

    pub fn is_crouched(&self) -> bool {
        self.state() == CharacterState::Crouch
            || self.requested_state() == CharacterState::Crouch
            || self.is_attacking_crouched()
    }

    pub(crate) fn request(&mut self, state: CharacterState) {
        self.fsm.request(state);
    }

    // ---- input latching ----

    /// Latch button presses so the next fixed steps see them.
    pub fn latch_inputs(&mut self, input: &dyn InputSource) {
        let now = self.clock;
        if input.button_pressed(&self.config.jump.button) {
            self.runtime.jump_latched_at = Some(now);
        }
        if input.button_pressed(&self.config.wall_jump.button) {
            self.runtime.wall_jump_latched_at = Some(now);
        }
        for attack in &mut self.attacks {
            if input.button_pressed(&attack.button) {
                attack.latch(now);
            }
        }
    }

    pub(crate) fn jump_latched(&self) -> bool {
        self.runtime.jump_latched_at.is_some()
    }

    pub(crate) fn wall_jump_latched(&self) -> bool {
        self.runtime.wall_jump_latched_at.is_some()
    }

    fn expire_latches(&mut self) {
        let now = self.clock;
        let expired = |at: Option<f32>| at.filter(|at| now < at + INPUT_LATCH_DURATION);
        self.runtime.jump_latched_at = expired(self.runtime.jump_latched_at);
        self.runtime.wall_jump_latched_at = expired(self.runtime.wall_jump_latched_at);
        for attack in &mut self.attacks {
            attack.expire_latch(now);
        }
    }

    // ---- external control ----

    /// Hand the character to (or take it back from) an external controller.
    ///
    /// Releasing control resets every runtime value, stands the box back up
    /// and clears the button latches.
    pub fn set_controlled(&mut self, controlled: bool, motor: &mut Motor) {
        if self.controlled && !controlled {
            self.reset(motor);
        }
        self.controlled = controlled;
    }

    fn reset(&mut self, motor: &mut Motor) {
        if let Some(backup) = self.runtime.crouch_backup {
            restore_box(motor, backup);
        }
        self.runtime = Runtime::new(&self.config);
        for attack in &mut self.attacks {
            attack.clear_latch();
        }
        self.request(CharacterState::Standard);
        debug!("Character runtime reset after external control");
    }

    // ---- frame update ----

    /// Run one fixed step: filter input, update the current state, move the
    /// motor and refresh the ground status.
    pub fn update(
        &mut self,
        motor: &mut Motor,
        world: &dyn CollisionWorld,
        input: &dyn InputSource,
        dt: f32,
    ) -> FrameOutput {
        let mut out = FrameOutput::default();
        self.clock += dt;

        let raw_x = input.axis_raw(&self.axis_x.name);
        let raw_y = input.axis_raw(&self.axis_y.name);
        self.axis_x.update(raw_x, dt);
        self.axis_y.update(raw_y, dt);

        if !self.controlled {
            let mut frame = Frame {
                motor,
                world,
                input,
                dt,
                out: &mut out,
            };
            self.run_state_machine(&mut frame);

            frame.motor.move_by(world, dt);
            self.update_ground_status(&mut frame);
            out.touches.extend_from_slice(motor.touches());
        }

        self.expire_latches();
        out
    }

    fn run_state_machine(&mut self, frame: &mut Frame) {
        if let Some(transition) = self.fsm.begin_update(frame.dt) {
            debug!("Character state {:?} -> {:?}", transition.from, transition.to);
            (transition.from.handlers().leave)(self, frame);
            (transition.to.handlers().enter)(self, frame);
        }
        (self.state().handlers().update)(self, frame);
    }

    pub(crate) fn apply_gravity(&mut self, frame: &mut Frame) {
        if !self.runtime.on_ground {
            frame.motor.velocity.y -= self.config.movement.gravity * frame.dt;
        }
    }

    fn update_ground_status(&mut self, frame: &mut Frame) {
        let motor = &mut *frame.motor;
        let grounded = is_grounded(motor.touch_ground(), motor.velocity, motor.ground_normal());

        if grounded && !self.runtime.on_ground {
            motor.velocity.y = 0.0;
            self.runtime.anim_air_time = 0.0;
            motor.snap_to_ground();
        }

        if !grounded {
            self.runtime.anim_air_time += frame.dt;
        }

        if self.runtime.on_ground != grounded {
            self.runtime.on_ground = grounded;
            frame.out.events.push(if grounded {
                CharacterEvent::Landed
            } else {
                CharacterEvent::BecameAirborne
            });
        }

        if self.runtime.on_ground {
            self.runtime.last_jump_time = None;
        }
    }

    // ---- crouch ----

    fn wants_crouch(&self) -> bool {
        self.axis_y.raw() < CROUCH_INPUT_THRESHOLD
    }

    pub(crate) fn handle_crouch(&mut self, frame: &mut Frame) {
        if self.fsm.is_transition_pending() {
            return;
        }

        if !self.is_crouched() && self.runtime.on_ground && self.wants_crouch() {
            self.crouch(frame);
        } else if self.is_crouched() && !self.wants_crouch() && self.can_uncrouch(frame) {
            self.uncrouch(frame);
        }
    }

    /// Shrink the box toward its base and enter `Crouch`.
    pub(crate) fn crouch(&mut self, frame: &mut Frame) {
        if self.is_crouched() {
            return;
        }

        let percent = self.config.movement.crouch_size_percent;
        let size = frame.motor.box_size();
        let center = frame.motor.box_center();
        self.runtime.crouch_backup = Some(CrouchBackup {
            size_y: size.y,
            center_y: center.y,
        });

        let vertical_offset = (percent - 1.0) * size.y * 0.5;
        frame.motor.set_box(
            Vec2::new(size.x, size.y * percent),
            Vec2::new(center.x, center.y + vertical_offset),
        );
        frame
            .motor
            .set_scale_offset(Vec2::new(1.0, percent), Vec2::new(0.0, vertical_offset));

        self.request(CharacterState::Crouch);
    }

    /// Restore the full box and go back to `Standard`.
    pub(crate) fn uncrouch(&mut self, frame: &mut Frame) {
        if !self.is_crouched() {
            return;
        }

        if let Some(backup) = self.runtime.crouch_backup.take() {
            restore_box(frame.motor, backup);
        }
        frame.out.events.push(CharacterEvent::Uncrouched);
        self.request(CharacterState::Standard);
    }

    /// True when the full-height box, slightly shrunk, would not overlap anything.
    pub(crate) fn can_uncrouch(&self, frame: &Frame) -> bool {
        let Some(backup) = self.runtime.crouch_backup else {
            return true;
        };

        let motor = &*frame.motor;
        let size = motor.box_size();
        let top = backup.center_y + 0.5 * backup.size_y;
        let a = motor.box_center() + size * UNCROUCH_TEST_SCALE * Vec2::new(-0.5, 0.5);
        let b = Vec2::new(a.x + size.x * UNCROUCH_TEST_SCALE, top);

        !frame
            .world
            .overlap_area(motor.position + a, motor.position + b, motor.mask())
    }

    // ---- melee ----

    /// End the running attack and return to the state it was launched from.
    pub fn finish_melee_attack(&mut self) {
        if self.state() == CharacterState::MeleeAttack {
            self.request(self.previous_state());
        }
    }
}

fn restore_box(motor: &mut Motor, backup: CrouchBackup) {
    let size = motor.box_size();
    let center = motor.box_center();
    motor.set_box(
        Vec2::new(size.x, backup.size_y),
        Vec2::new(center.x, backup.center_y),
    );
    motor.set_scale_offset(Vec2::ONE, Vec2::ZERO);
}
