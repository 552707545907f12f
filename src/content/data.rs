//! Data structures for character tuning loaded from RON files.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::curve::{CurveKey, ResponseCurve};
use crate::physics::GameLayer;

/// Complete tuning for one character controller.
#[derive(Resource, Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub input: InputSettings,
    pub movement: MovementSettings,
    pub animations: AnimationSettings,
    pub jump: JumpSettings,
    pub wall_jump: WallJumpSettings,
    pub melee: MeleeSettings,
    pub motor: MotorSettings,
}

// -----------------------------------------------------------------------------
// Input
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AxisSettings {
    pub name: String,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Drop the filtered value to zero when the raw input reverses sign.
    pub snap: bool,
}

impl AxisSettings {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..default()
        }
    }
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            name: "axis".to_string(),
            acceleration: 10.0,
            deceleration: 10.0,
            snap: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputSettings {
    pub axis_x: AxisSettings,
    pub axis_y: AxisSettings,
    /// Held to run when `always_run` is off. Empty disables running.
    pub run_button: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            axis_x: AxisSettings::named("Horizontal"),
            axis_y: AxisSettings::named("Vertical"),
            run_button: String::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Movement
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MovementSettings {
    pub always_run: bool,
    /// m/s
    pub walk_speed: f32,
    /// m/s
    pub run_speed: f32,
    /// m/s²
    pub acceleration: f32,
    /// m/s²
    pub deceleration: f32,
    /// Ground friction while accelerating. Below 1 the character slides.
    pub friction_dynamic: f32,
    /// Ground friction while releasing input or moving against velocity.
    pub friction_static: f32,
    pub auto_rotate: bool,
    /// m/s²
    pub gravity: f32,
    /// Horizontal acceleration while airborne.
    pub air_power: f32,
    pub max_air_speed: f32,
    pub max_fall_speed: f32,
    /// Collision box height factor while crouched.
    pub crouch_size_percent: f32,
    pub crouched_auto_rotate: bool,
    /// Max speed factor by ground slope angle in degrees (negative = downslope).
    /// Output is clamped to [0, 1].
    pub slope_speed_multiplier: ResponseCurve,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            always_run: true,
            walk_speed: 5.0,
            run_speed: 8.0,
            acceleration: 30.0,
            deceleration: 20.0,
            friction_dynamic: 1.0,
            friction_static: 1.0,
            auto_rotate: true,
            gravity: 50.0,
            air_power: 10.0,
            max_air_speed: 8.0,
            max_fall_speed: 20.0,
            crouch_size_percent: 0.5,
            crouched_auto_rotate: true,
            slope_speed_multiplier: ResponseCurve::new([
                CurveKey::new(-90.0, 1.0),
                CurveKey::new(0.0, 1.0),
                CurveKey::new(45.0, 1.0),
                CurveKey::new(60.0, 0.0),
            ]),
        }
    }
}

// -----------------------------------------------------------------------------
// Animations
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub stand: String,
    pub run: String,
    pub crouch: String,
    pub in_air: String,
    pub wall_jump: String,
    /// Time spent airborne before the in-air clip starts.
    pub min_air_time: f32,
    /// Drive run playback from filtered input instead of ground speed.
    pub walk_anim_from_input: bool,
    /// Playback speed by filtered input, 0 means stand.
    pub anim_from_input: ResponseCurve,
    /// Playback speed by ground speed.
    pub anim_from_speed: ResponseCurve,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            stand: "Stand".to_string(),
            run: "Run".to_string(),
            crouch: "Crouch".to_string(),
            in_air: "InAir".to_string(),
            wall_jump: "WallJump".to_string(),
            min_air_time: 0.2,
            walk_anim_from_input: false,
            anim_from_input: ResponseCurve::linear(0.0, 0.0, 1.0, 1.0),
            anim_from_speed: ResponseCurve::linear(0.0, 0.0, 8.0, 1.0),
        }
    }
}

// -----------------------------------------------------------------------------
// Jumps
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JumpSettings {
    pub enabled: bool,
    /// Empty disables jumping.
    pub button: String,
    pub min_height: f32,
    /// Reached by holding the jump button.
    pub max_height: f32,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            button: "Jump".to_string(),
            min_height: 3.0,
            max_height: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WallJumpSettings {
    pub enabled: bool,
    /// Empty disables wall jumping.
    pub button: String,
    /// Launch velocity away from the wall (x) and upward (y).
    pub jump_power: Vec2,
    /// Time spent snapped to the wall before launching.
    pub time_before_jump: f32,
    /// Time after launch before flipping; negative disables the flip.
    pub time_before_flip: f32,
    /// Minimum time after launch before auto rotate comes back.
    pub disable_auto_rotate_time: f32,
    /// Front ray indexes used for wall detection, empty means all rays.
    pub ray_indexes: Vec<usize>,
}

impl Default for WallJumpSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            button: "Jump".to_string(),
            jump_power: Vec2::new(10.0, 8.0),
            time_before_jump: 0.1,
            time_before_flip: 0.1,
            disable_auto_rotate_time: 0.3,
            ray_indexes: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Melee
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HitZoneDef {
    /// Offset from the character position, for a character facing right.
    pub offset: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub active: bool,
}

impl Default for HitZoneDef {
    fn default() -> Self {
        Self {
            offset: Vec2::new(0.6, 0.0),
            radius: 0.4,
            damage: 1.0,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MeleeAttackDef {
    pub button: String,
    /// Empty disables the attack while standing.
    pub anim_stand: String,
    /// Empty disables the attack while crouched.
    pub anim_crouched: String,
    /// Empty disables the attack while airborne.
    pub anim_in_air: String,
    /// Attack length. `None` waits for `finish_melee_attack`.
    pub duration: Option<f32>,
    pub hit_zones: Vec<HitZoneDef>,
}

impl Default for MeleeAttackDef {
    fn default() -> Self {
        Self {
            button: "Attack".to_string(),
            anim_stand: "AttackStand".to_string(),
            anim_crouched: "AttackCrouched".to_string(),
            anim_in_air: "AttackInAir".to_string(),
            duration: Some(0.3),
            hit_zones: vec![HitZoneDef::default()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MeleeSettings {
    pub enabled: bool,
    pub attacks: Vec<MeleeAttackDef>,
}

// -----------------------------------------------------------------------------
// Motor
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MotorSettings {
    /// Standing collision box size.
    pub box_size: Vec2,
    /// Collision box centre relative to the character position.
    pub box_center: Vec2,
    pub ground_rays: usize,
    pub head_rays: usize,
    pub front_rays: usize,
    pub back_rays: usize,
    /// Inset of the outer rays from the box corners.
    pub skin_width: f32,
    /// How far beyond the box faces contacts are detected.
    pub probe_distance: f32,
    /// Steepest slope in degrees that does not block horizontal motion.
    pub max_walkable_slope: f32,
    /// Layers hit by probe rays, crouch checks and hit zones.
    pub ray_layers: Vec<GameLayer>,
}

impl Default for MotorSettings {
    fn default() -> Self {
        Self {
            box_size: Vec2::new(0.8, 1.8),
            box_center: Vec2::new(0.0, 0.9),
            ground_rays: 3,
            head_rays: 3,
            front_rays: 3,
            back_rays: 3,
            skin_width: 0.02,
            probe_distance: 0.1,
            max_walkable_slope: 60.0,
            ray_layers: vec![GameLayer::Ground, GameLayer::Platform, GameLayer::Prop],
        }
    }
}
