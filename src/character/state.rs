//! Character domain: states and their enter/update/leave handlers.

use bevy::prelude::Vec2;

use super::controller::{CharacterController, Frame, MAX_ATTACK_DURATION};
use super::events::CharacterEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    #[default]
    Standard,
    Crouch,
    WallJump,
    WallJumpInAir,
    MeleeAttack,
}

pub type StateHandler = fn(&mut CharacterController, &mut Frame);

/// Handlers of one state.
#[derive(Clone, Copy)]
pub struct StateHandlers {
    pub enter: StateHandler,
    pub update: StateHandler,
    pub leave: StateHandler,
}

impl CharacterState {
    pub fn handlers(self) -> StateHandlers {
        match self {
            Self::Standard => StateHandlers {
                enter: nothing,
                update: standard_update,
                leave: nothing,
            },
            Self::Crouch => StateHandlers {
                enter: crouch_enter,
                update: crouch_update,
                leave: nothing,
            },
            Self::WallJump => StateHandlers {
                enter: wall_jump_enter,
                update: wall_jump_update,
                leave: restore_auto_rotate,
            },
            Self::WallJumpInAir => StateHandlers {
                enter: wall_jump_in_air_enter,
                update: wall_jump_in_air_update,
                leave: restore_auto_rotate,
            },
            Self::MeleeAttack => StateHandlers {
                enter: melee_attack_enter,
                update: melee_attack_update,
                leave: melee_attack_leave,
            },
        }
    }
}

fn nothing(_: &mut CharacterController, _: &mut Frame) {}

// ---- Standard ----

fn standard_update(c: &mut CharacterController, f: &mut Frame) {
    c.apply_gravity(f);
    c.handle_crouch(f);
    c.handle_horizontal_move(f);
    c.handle_jump(f);
    c.handle_wall_jump(f);
    c.handle_melee_attack(f);
    c.handle_auto_rotate(f);
}

// ---- Crouch ----

fn crouch_enter(c: &mut CharacterController, f: &mut Frame) {
    f.out.events.push(CharacterEvent::Crouched);
    // back from a crouched attack: hold the last crouch frame
    let time = if c.previous_state() == CharacterState::MeleeAttack { 1.0 } else { 0.0 };
    f.out.play(&c.config.animations.crouch, Some(time));
}

fn crouch_update(c: &mut CharacterController, f: &mut Frame) {
    c.apply_gravity(f);
    c.handle_crouch(f);
    c.handle_horizontal_move(f);
    c.handle_jump(f);
    c.handle_melee_attack(f);

    if c.config.movement.crouched_auto_rotate {
        c.handle_auto_rotate(f);
    }
}

// ---- WallJump ----

/// Save auto-rotate and suppress it until the state is left.
fn suppress_auto_rotate(c: &mut CharacterController) {
    c.runtime.wall_jump_auto_rotate = c.runtime.auto_rotate;
    if c.runtime.wall_jump_auto_rotate {
        c.runtime.auto_rotate = false;
    }
}

fn restore_auto_rotate(c: &mut CharacterController, _: &mut Frame) {
    c.runtime.auto_rotate = c.runtime.wall_jump_auto_rotate;
}

fn wall_jump_enter(c: &mut CharacterController, f: &mut Frame) {
    f.out.events.push(CharacterEvent::WallJumped);
    f.out.play(&c.config.animations.wall_jump, Some(0.0));
    suppress_auto_rotate(c);
}

fn wall_jump_update(c: &mut CharacterController, f: &mut Frame) {
    f.motor.velocity = Vec2::ZERO;

    if c.state_time() >= c.config.wall_jump.time_before_jump {
        let power = c.config.wall_jump.jump_power;
        // away from the wall we are facing
        f.motor.velocity.x = power.x * -f.motor.facing();
        f.motor.velocity.y = power.y;
        c.request(CharacterState::WallJumpInAir);
    }
}

// ---- WallJumpInAir ----

fn wall_jump_in_air_enter(c: &mut CharacterController, _: &mut Frame) {
    suppress_auto_rotate(c);
    c.runtime.wall_jump_flip_done = false;
}

fn wall_jump_in_air_update(c: &mut CharacterController, f: &mut Frame) {
    if c.on_ground() {
        c.request(CharacterState::Standard);
        return;
    }

    let settings = &c.config.wall_jump;
    let flip_enabled = settings.time_before_flip >= 0.0;
    let time = c.state_time();

    if !c.runtime.wall_jump_flip_done && flip_enabled && time >= settings.time_before_flip {
        f.motor.flip();
        c.runtime.wall_jump_flip_done = true;
    }

    let flip_settled = c.runtime.wall_jump_flip_done || !flip_enabled;
    if c.runtime.wall_jump_auto_rotate
        && !c.runtime.auto_rotate
        && time >= settings.disable_auto_rotate_time
        && flip_settled
    {
        c.runtime.auto_rotate = true;
    }

    standard_update(c, f);

    let flip_settled = c.runtime.wall_jump_flip_done || !flip_enabled;
    let rotate_settled = !c.runtime.wall_jump_auto_rotate || c.runtime.auto_rotate;
    if !c.fsm.is_transition_pending() && flip_settled && rotate_settled {
        c.request(CharacterState::Standard);
    }
}

// ---- MeleeAttack ----

fn melee_attack_enter(c: &mut CharacterController, f: &mut Frame) {
    f.out.events.push(CharacterEvent::MeleeAttackStarted);
    f.out.play(&c.runtime.attack_animation, Some(0.0));

    if let Some(attack) = c.runtime.current_attack.and_then(|i| c.attacks.get_mut(i)) {
        attack.begin_activation();
    }
}

fn melee_attack_update(c: &mut CharacterController, f: &mut Frame) {
    c.apply_gravity(f);
    c.handle_horizontal_move(f);
    c.resolve_attack_hits(f);

    let time = c.state_time();
    let finished = c
        .runtime
        .current_attack
        .and_then(|i| c.attacks.get(i))
        .and_then(|attack| attack.duration)
        .is_some_and(|duration| time >= duration);

    if finished || time > MAX_ATTACK_DURATION {
        c.request(c.previous_state());
    }
}

fn melee_attack_leave(c: &mut CharacterController, _: &mut Frame) {
    c.runtime.current_attack = None;
}
