//! Character domain: tests for the state machine, movement rules and attacks.

use bevy::prelude::{Entity, Vec2, World};

use super::{
    AnimationCommand, CharacterController, CharacterEvent, CharacterState, Fsm, FrameOutput,
    Transition, apply_damping, clamp_with_damping, jump_vertical_speed, slope_angle,
};
use crate::content::{CharacterConfig, HitZoneDef, MeleeAttackDef};
use crate::input::{InputSnapshot, InputSource};
use crate::motor::Motor;
use crate::physics::{AabbCollider, AabbWorld, GameLayer, SurfaceMaterial};

const DT: f32 = 1.0 / 60.0;
const BUTTONS: [&str; 2] = ["Jump", "Attack"];

/// A character in a box world driven by a scripted input snapshot.
struct Rig {
    ids: World,
    world: AabbWorld,
    motor: Motor,
    controller: CharacterController,
    input: InputSnapshot,
}

impl Rig {
    fn new(config: CharacterConfig, position: Vec2) -> Self {
        Self {
            ids: World::new(),
            world: AabbWorld::new(),
            motor: Motor::new(&config.motor, position),
            controller: CharacterController::new(config),
            input: InputSnapshot::default(),
        }
    }

    /// Add a box to the level and refresh the probe rays.
    fn add(&mut self, collider: impl FnOnce(Entity) -> AabbCollider) -> Entity {
        let entity = self.ids.spawn_empty().id();
        self.world.insert(collider(entity));
        self.motor.refresh_contacts(&self.world);
        entity
    }

    /// Floor whose top is at y = 0.
    fn add_floor(&mut self) -> Entity {
        self.add(|e| AabbCollider::new(e, Vec2::new(0.0, -0.5), Vec2::new(200.0, 1.0), GameLayer::Ground))
    }

    /// Standing on the floor.
    fn on_floor(config: CharacterConfig) -> Self {
        let mut rig = Self::new(config, Vec2::ZERO);
        rig.add_floor();
        rig.run(5);
        assert!(rig.controller.on_ground());
        rig
    }

    /// Airborne at `position` above the floor.
    fn above_floor(config: CharacterConfig, position: Vec2) -> Self {
        let mut rig = Self::new(config, position);
        rig.add_floor();
        rig
    }

    fn step(&mut self) -> FrameOutput {
        self.controller.latch_inputs(&self.input);
        // press edges last one frame
        for button in BUTTONS {
            let held = self.input.button_held(button);
            self.input.set_button(button, held);
        }
        self.controller
            .update(&mut self.motor, &self.world, &self.input, DT)
    }

    fn run(&mut self, frames: usize) -> Vec<FrameOutput> {
        (0..frames).map(|_| self.step()).collect()
    }
}

fn events(outputs: &[FrameOutput]) -> Vec<CharacterEvent> {
    outputs.iter().flat_map(|o| o.events.iter().copied()).collect()
}

fn melee_config(duration: Option<f32>) -> CharacterConfig {
    let mut config = CharacterConfig::default();
    config.melee.enabled = true;
    config.melee.attacks = vec![MeleeAttackDef {
        duration,
        hit_zones: vec![HitZoneDef {
            offset: Vec2::new(0.6, 0.9),
            radius: 0.4,
            damage: 1.0,
            active: true,
        }],
        ..Default::default()
    }];
    config
}

// -----------------------------------------------------------------------------
// Fsm
// -----------------------------------------------------------------------------

#[test]
fn test_fsm_last_request_wins() {
    let mut fsm = Fsm::new(CharacterState::Standard);
    fsm.request(CharacterState::Crouch);
    fsm.request(CharacterState::WallJump);
    assert!(fsm.is_transition_pending());

    let transition = fsm.begin_update(0.5);
    assert_eq!(
        transition,
        Some(Transition {
            from: CharacterState::Standard,
            to: CharacterState::WallJump,
        })
    );
    assert_eq!(fsm.current(), CharacterState::WallJump);
    assert_eq!(fsm.previous(), CharacterState::Standard);
    assert_eq!(fsm.state_time(), 0.5);

    assert_eq!(fsm.begin_update(0.25), None);
    assert_eq!(fsm.state_time(), 0.75);
}

#[test]
fn test_fsm_request_back_to_current_cancels() {
    let mut fsm = Fsm::new(CharacterState::Standard);
    fsm.request(CharacterState::Crouch);
    fsm.request(CharacterState::Standard);
    assert!(!fsm.is_transition_pending());
    assert_eq!(fsm.begin_update(DT), None);
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

#[test]
fn test_jump_speed_from_height() {
    assert!((jump_vertical_speed(3.0, 50.0) - 17.320_508).abs() < 1e-3);
    assert_eq!(jump_vertical_speed(0.0, 50.0), 0.0);
}

#[test]
fn test_clamp_with_damping_is_gradual() {
    let damped = clamp_with_damping(12.0, 0.5, -8.0, 8.0, 0.1);
    assert!((damped - 12.0 * (-0.05f32).exp()).abs() < 1e-5);
    assert!(damped > 8.0);

    assert_eq!(clamp_with_damping(8.1, 100.0, -8.0, 8.0, 0.1), 8.0);
    assert_eq!(clamp_with_damping(-8.1, 100.0, -8.0, 8.0, 0.1), -8.0);
    assert_eq!(clamp_with_damping(3.0, 0.5, -8.0, 8.0, 0.1), 3.0);
    assert!((apply_damping(2.0, 1.0, 1.0) - 2.0 / std::f32::consts::E).abs() < 1e-5);
}

#[test]
fn test_slope_angle_sign() {
    // Ground rising to the right
    let normal = Vec2::new(-0.5, 3f32.sqrt() / 2.0);
    assert!((slope_angle(normal, 1.0) - 30.0).abs() < 1e-3);
    assert!((slope_angle(normal, -1.0) + 30.0).abs() < 1e-3);
    assert_eq!(slope_angle(Vec2::Y, 1.0).abs(), 0.0);
}

// -----------------------------------------------------------------------------
// Ground status
// -----------------------------------------------------------------------------

#[test]
fn test_landing_zeroes_vertical_velocity() {
    let mut rig = Rig::above_floor(CharacterConfig::default(), Vec2::new(0.0, 2.0));

    let mut landed = false;
    for _ in 0..120 {
        let out = rig.step();
        if out.events.contains(&CharacterEvent::Landed) {
            assert_eq!(rig.motor.velocity.y, 0.0);
            assert!(rig.motor.position.y.abs() < 1e-4);
            landed = true;
            break;
        }
        assert!(rig.motor.velocity.y <= 0.0);
    }
    assert!(landed);
    assert!(rig.controller.on_ground());
    assert_eq!(rig.controller.last_jump_time(), None);
}

#[test]
fn test_standing_does_not_accumulate_gravity() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    let outputs = rig.run(60);

    assert!(events(&outputs).is_empty());
    assert_eq!(rig.motor.velocity, Vec2::ZERO);
    assert!(rig.motor.position.y.abs() < 1e-4);
}

// -----------------------------------------------------------------------------
// Horizontal movement
// -----------------------------------------------------------------------------

#[test]
fn test_accelerates_to_run_speed() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    rig.input.set_axis("Horizontal", 1.0);

    rig.step();
    assert!((rig.motor.velocity.x - 30.0 * DT).abs() < 1e-4);

    rig.run(60);
    assert!((rig.motor.velocity.x - 8.0).abs() < 1e-4);
    assert!((rig.controller.ground_speed() - 8.0).abs() < 1e-4);
    assert!(rig.motor.position.x > 5.0);
}

#[test]
fn test_walk_speed_without_run() {
    let mut config = CharacterConfig::default();
    config.movement.always_run = false;
    config.input.run_button = "Run".to_string();
    let mut rig = Rig::on_floor(config);
    rig.input.set_axis("Horizontal", 1.0);

    rig.run(60);
    assert!((rig.motor.velocity.x - 5.0).abs() < 1e-4);

    rig.input.set_button("Run", true);
    rig.run(60);
    assert!((rig.motor.velocity.x - 8.0).abs() < 1e-4);
}

#[test]
fn test_auto_rotate_follows_raw_input() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    assert!(rig.motor.face_right());

    rig.input.set_axis("Horizontal", -1.0);
    rig.step();
    assert!(!rig.motor.face_right());
    assert!(rig.controller.axis_x.value() > -0.5);
}

#[test]
fn test_ice_slides_with_static_friction_damping() {
    let mut rig = Rig::new(CharacterConfig::default(), Vec2::ZERO);
    rig.add(|e| {
        AabbCollider::new(e, Vec2::new(0.0, -0.5), Vec2::new(200.0, 1.0), GameLayer::Ground)
            .with_material(SurfaceMaterial::friction(0.2, 0.5))
    });
    rig.run(5);

    rig.motor.velocity = Vec2::new(8.0, 0.0);
    rig.step();
    assert!(rig.controller.is_sliding());
    assert!((rig.motor.velocity.x - 8.0 * (-0.5 * DT).exp()).abs() < 1e-4);
}

#[test]
fn test_release_decelerates_on_normal_ground() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    rig.motor.velocity = Vec2::new(8.0, 0.0);
    rig.step();

    assert!(!rig.controller.is_sliding());
    assert!((rig.motor.velocity.x - (8.0 - 20.0 * DT)).abs() < 1e-4);
}

// -----------------------------------------------------------------------------
// Crouch
// -----------------------------------------------------------------------------

#[test]
fn test_crouch_round_trip() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    let size = rig.motor.box_size();
    let center = rig.motor.box_center();

    rig.input.set_axis("Vertical", -1.0);
    let outputs = rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::Crouch);
    assert!(events(&outputs).contains(&CharacterEvent::Crouched));
    assert!((rig.motor.box_size().y - size.y * 0.5).abs() < 1e-5);
    assert!((rig.motor.box_center().y - center.y * 0.5).abs() < 1e-5);
    assert_eq!(rig.motor.scale(), Vec2::new(1.0, 0.5));

    rig.input.set_axis("Vertical", 0.0);
    let outputs = rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::Standard);
    assert!(events(&outputs).contains(&CharacterEvent::Uncrouched));
    assert_eq!(rig.motor.box_size(), size);
    assert_eq!(rig.motor.box_center(), center);
    assert_eq!(rig.motor.scale(), Vec2::ONE);
    assert_eq!(rig.motor.offset(), Vec2::ZERO);
    assert!(rig.controller.on_ground());
}

#[test]
fn test_stays_crouched_under_low_ceiling() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    rig.input.set_axis("Vertical", -1.0);
    rig.run(2);

    let ceiling =
        rig.add(|e| AabbCollider::new(e, Vec2::new(0.0, 1.7), Vec2::new(4.0, 1.0), GameLayer::Ground));

    rig.input.set_axis("Vertical", 0.0);
    rig.run(5);
    assert_eq!(rig.controller.state(), CharacterState::Crouch);

    rig.world.remove(ceiling);
    rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::Standard);
}

#[test]
fn test_crouch_cancels_ground_movement() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    rig.input.set_axis("Vertical", -1.0);
    rig.input.set_axis("Horizontal", 1.0);
    rig.run(30);

    assert_eq!(rig.controller.state(), CharacterState::Crouch);
    assert_eq!(rig.motor.velocity.x, 0.0);
}

// -----------------------------------------------------------------------------
// Jump
// -----------------------------------------------------------------------------

#[test]
fn test_jump_launch_speed() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    rig.input.set_button("Jump", true);

    let out = rig.step();
    assert!(out.events.contains(&CharacterEvent::Jumped));
    assert!(out.events.contains(&CharacterEvent::BecameAirborne));
    assert!((rig.motor.velocity.y - 17.320_508).abs() < 1e-3);
    assert!(!rig.controller.on_ground());
    assert!(rig.controller.last_jump_time().is_some());
}

#[test]
fn test_holding_jump_extends_height() {
    let mut config = CharacterConfig::default();
    config.jump.min_height = 1.0;
    config.jump.max_height = 3.0;

    let mut held = Rig::on_floor(config.clone());
    let mut tapped = Rig::on_floor(config);
    held.input.set_button("Jump", true);
    tapped.input.set_button("Jump", true);
    held.step();
    tapped.step();
    tapped.input.set_button("Jump", false);

    held.run(10);
    tapped.run(10);

    assert!((held.motor.velocity.y - 10.0).abs() < 1e-3);
    assert!((tapped.motor.velocity.y - (10.0 - 10.0 * 50.0 * DT)).abs() < 1e-3);
}

#[test]
fn test_no_jump_in_air() {
    let mut rig = Rig::above_floor(CharacterConfig::default(), Vec2::new(0.0, 5.0));
    rig.input.set_button("Jump", true);

    let out = rig.step();
    assert!(!out.events.contains(&CharacterEvent::Jumped));
    assert!(rig.motor.velocity.y < 0.0);
}

#[test]
fn test_empty_jump_binding_disables_jump() {
    let mut config = CharacterConfig::default();
    config.jump.button.clear();
    let mut rig = Rig::on_floor(config);
    rig.input.set_button("Jump", true);

    let outputs = rig.run(3);
    assert!(!events(&outputs).contains(&CharacterEvent::Jumped));
    assert!(rig.controller.on_ground());
}

fn moving_platform(entity: Entity) -> AabbCollider {
    AabbCollider::new(entity, Vec2::new(0.0, -0.5), Vec2::new(200.0, 1.0), GameLayer::Platform)
        .with_carrier_velocity(Vec2::new(2.0, 0.0))
}

#[test]
fn test_jump_inherits_carrier_velocity() {
    let mut rig = Rig::new(CharacterConfig::default(), Vec2::ZERO);
    let platform = rig.add(moving_platform);
    rig.run(3);

    rig.controller.handle_carry(&mut rig.motor, &rig.world, 0.5);
    assert_eq!(rig.controller.carrier(), Some(platform));
    assert!((rig.motor.position.x - 1.0).abs() < 1e-5);

    rig.input.set_button("Jump", true);
    rig.step();
    assert!((rig.motor.velocity.x - 2.0).abs() < 1e-4);
}

#[test]
fn test_no_carry_in_air() {
    let mut rig = Rig::new(CharacterConfig::default(), Vec2::new(0.0, 5.0));
    rig.add(moving_platform);
    rig.step();

    rig.controller.handle_carry(&mut rig.motor, &rig.world, 0.5);
    assert_eq!(rig.controller.carrier(), None);
    assert_eq!(rig.motor.position.x, 0.0);
}

// -----------------------------------------------------------------------------
// Wall jump
// -----------------------------------------------------------------------------

/// Airborne next to a wall on the right, given as (center, size).
fn wall_rig(config: CharacterConfig, wall_center: Vec2, wall_size: Vec2) -> Rig {
    let mut rig = Rig::new(config, Vec2::new(0.6, 3.0));
    rig.add(|e| AabbCollider::new(e, wall_center, wall_size, GameLayer::Ground));
    rig
}

#[test]
fn test_wall_jump_flow() {
    let mut rig = wall_rig(CharacterConfig::default(), Vec2::new(1.5, 5.0), Vec2::new(1.0, 10.0));
    rig.input.set_button("Jump", true);

    rig.step();
    assert_eq!(rig.controller.requested_state(), CharacterState::WallJump);

    let out = rig.step();
    assert_eq!(rig.controller.state(), CharacterState::WallJump);
    assert!(out.events.contains(&CharacterEvent::WallJumped));
    assert!(!rig.controller.auto_rotate());
    assert_eq!(rig.motor.velocity, Vec2::ZERO);

    let mut launched = false;
    for _ in 0..20 {
        rig.step();
        if rig.controller.requested_state() == CharacterState::WallJumpInAir {
            assert_eq!(rig.motor.velocity, Vec2::new(-10.0, 8.0));
            launched = true;
            break;
        }
    }
    assert!(launched);

    let mut back_to_standard = false;
    for _ in 0..60 {
        rig.step();
        if rig.controller.state() == CharacterState::Standard {
            back_to_standard = true;
            break;
        }
    }
    assert!(back_to_standard);
    assert!(!rig.motor.face_right());
    assert!(rig.controller.auto_rotate());
}

#[test]
fn test_wall_jump_uses_selected_ray_indexes() {
    let mut config = CharacterConfig::default();
    config.wall_jump.ray_indexes = vec![0, 1];

    // Only the top ray (index 2) touches the wall
    let mut rig = wall_rig(config.clone(), Vec2::new(1.5, 7.25), Vec2::new(1.0, 5.5));
    rig.input.set_button("Jump", true);
    rig.step();
    assert_eq!(rig.controller.requested_state(), CharacterState::Standard);

    // Rays 0 and 1 touch it
    let mut rig = wall_rig(config, Vec2::new(1.5, 2.1), Vec2::new(1.0, 4.2));
    rig.input.set_button("Jump", true);
    rig.step();
    assert_eq!(rig.controller.requested_state(), CharacterState::WallJump);
}

#[test]
fn test_wall_jump_disabled_without_material_override() {
    let mut config = CharacterConfig::default();
    config.wall_jump.enabled = false;
    let mut rig = wall_rig(config, Vec2::new(1.5, 5.0), Vec2::new(1.0, 10.0));
    rig.input.set_button("Jump", true);

    rig.step();
    assert_eq!(rig.controller.requested_state(), CharacterState::Standard);
}

// -----------------------------------------------------------------------------
// Melee
// -----------------------------------------------------------------------------

fn with_target(rig: &mut Rig) -> Entity {
    rig.add(|e| AabbCollider::new(e, Vec2::new(0.9, 0.9), Vec2::splat(0.4), GameLayer::Prop).hitable())
}

#[test]
fn test_attack_hits_each_target_once() {
    let mut rig = Rig::on_floor(melee_config(Some(0.3)));
    let target = with_target(&mut rig);
    rig.input.set_button("Attack", true);

    let outputs = rig.run(40);
    let hits: Vec<Entity> = outputs.iter().flat_map(|o| o.hits.iter().map(|h| h.target)).collect();
    assert_eq!(hits, vec![target]);
    assert!(events(&outputs).contains(&CharacterEvent::MeleeAttackStarted));
    assert!(outputs.iter().any(|o| o.animations.contains(&AnimationCommand::Play {
        clip: "AttackStand".to_string(),
        normalized_time: Some(0.0),
    })));
    assert_eq!(rig.controller.state(), CharacterState::Standard);
    assert_eq!(rig.controller.current_attack(), None);
}

#[test]
fn test_attack_safety_timeout() {
    let mut rig = Rig::on_floor(melee_config(None));
    with_target(&mut rig);
    rig.input.set_button("Attack", true);

    rig.run(590);
    assert_eq!(rig.controller.state(), CharacterState::MeleeAttack);
    assert!(rig.controller.is_attacking());

    rig.run(30);
    assert_eq!(rig.controller.state(), CharacterState::Standard);
}

#[test]
fn test_finished_crouched_attack_returns_to_crouch() {
    let mut rig = Rig::on_floor(melee_config(None));
    rig.input.set_axis("Vertical", -1.0);
    rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::Crouch);

    rig.input.set_button("Attack", true);
    rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::MeleeAttack);
    assert!(rig.controller.is_attacking_crouched());
    assert!(rig.controller.is_crouched());

    rig.controller.finish_melee_attack();
    let out = rig.step();
    assert_eq!(rig.controller.state(), CharacterState::Crouch);
    assert!(out.animations.contains(&AnimationCommand::Play {
        clip: "Crouch".to_string(),
        normalized_time: Some(1.0),
    }));
}

#[test]
fn test_attack_without_air_animation_not_launched_in_air() {
    let mut config = melee_config(Some(0.3));
    config.melee.attacks[0].anim_in_air.clear();
    let mut rig = Rig::above_floor(config, Vec2::new(0.0, 5.0));
    rig.input.set_button("Attack", true);

    rig.run(3);
    assert!(!rig.controller.is_attacking());
}

#[test]
fn test_attack_disabled_by_default() {
    let mut config = melee_config(Some(0.3));
    config.melee.enabled = false;
    let mut rig = Rig::on_floor(config);
    rig.input.set_button("Attack", true);

    rig.run(3);
    assert!(!rig.controller.is_attacking());
}

// -----------------------------------------------------------------------------
// External control
// -----------------------------------------------------------------------------

#[test]
fn test_releasing_control_resets_runtime() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    let size = rig.motor.box_size();
    rig.input.set_axis("Vertical", -1.0);
    rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::Crouch);

    rig.controller.set_controlled(true, &mut rig.motor);
    rig.motor.velocity = Vec2::new(3.0, 0.0);
    let out = rig.step();
    assert!(out.events.is_empty());
    assert_eq!(rig.motor.velocity, Vec2::new(3.0, 0.0));
    assert_eq!(rig.controller.state(), CharacterState::Crouch);

    rig.input.set_axis("Vertical", 0.0);
    rig.controller.set_controlled(false, &mut rig.motor);
    assert!(!rig.controller.on_ground());
    assert_eq!(rig.controller.requested_state(), CharacterState::Standard);
    assert_eq!(rig.motor.box_size(), size);
    assert_eq!(rig.motor.scale(), Vec2::ONE);

    rig.motor.velocity = Vec2::ZERO;
    rig.step();
    assert_eq!(rig.controller.state(), CharacterState::Standard);
    assert!(rig.controller.on_ground());
}

#[test]
fn test_releasing_control_mid_wall_jump_keeps_auto_rotate() {
    let mut rig = wall_rig(CharacterConfig::default(), Vec2::new(1.5, 5.0), Vec2::new(1.0, 10.0));
    rig.add_floor();
    rig.input.set_button("Jump", true);
    rig.run(2);
    assert_eq!(rig.controller.state(), CharacterState::WallJump);
    assert!(!rig.controller.auto_rotate());

    rig.controller.set_controlled(true, &mut rig.motor);
    rig.controller.set_controlled(false, &mut rig.motor);
    assert!(rig.controller.auto_rotate());

    rig.input.set_button("Jump", false);
    rig.run(120);
    assert_eq!(rig.controller.state(), CharacterState::Standard);
    assert!(rig.controller.on_ground());
    assert!(rig.controller.auto_rotate());
}

// -----------------------------------------------------------------------------
// Animation selection
// -----------------------------------------------------------------------------

fn played(out: &FrameOutput) -> Option<&str> {
    out.animations.iter().rev().find_map(|c| match c {
        AnimationCommand::Play { clip, .. } => Some(clip.as_str()),
        AnimationCommand::SetSpeed(_) => None,
    })
}

#[test]
fn test_locomotion_clips() {
    let mut rig = Rig::on_floor(CharacterConfig::default());
    let mut out = FrameOutput::default();
    rig.controller.select_animation(&rig.motor, &mut out);
    assert_eq!(played(&out), Some("Stand"));

    rig.input.set_axis("Horizontal", 1.0);
    rig.run(60);
    out.clear();
    rig.controller.select_animation(&rig.motor, &mut out);
    assert_eq!(played(&out), Some("Run"));
    match out.animations.last() {
        Some(AnimationCommand::SetSpeed(speed)) => assert!((speed - 1.0).abs() < 1e-4),
        other => panic!("expected a playback speed, got {other:?}"),
    }
}

#[test]
fn test_in_air_clip_after_min_air_time() {
    let mut rig = Rig::above_floor(CharacterConfig::default(), Vec2::new(0.0, 20.0));
    rig.run(30);

    let mut out = FrameOutput::default();
    rig.controller.select_animation(&rig.motor, &mut out);
    assert_eq!(played(&out), Some("InAir"));
}
