//! Load-time validation of character tuning.
//!
//! Nothing here runs per frame. Problems are reported once so the frame loop
//! can treat odd values as "feature disabled" instead of failing.

use super::curve::ResponseCurve;
use super::data::CharacterConfig;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub section: &'static str,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.field, self.message)
    }
}

/// Helper macro for checking a value is not negative
macro_rules! check_non_negative {
    ($errors:expr, $section:expr, $owner:expr, $field:ident) => {
        if $owner.$field < 0.0 {
            $errors.push(ConfigError {
                section: $section,
                field: stringify!($field).to_string(),
                message: format!("must not be negative (got {})", $owner.$field),
            });
        }
    };
}

fn check_curve(errors: &mut Vec<ConfigError>, section: &'static str, field: &str, curve: &ResponseCurve) {
    if !curve.is_sorted() {
        errors.push(ConfigError {
            section,
            field: field.to_string(),
            message: "curve keys must be sorted by input".to_string(),
        });
    }
}

/// Validate a character config.
/// Returns a list of validation errors, empty if the config is sound.
pub fn validate_config(config: &CharacterConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    // Input filters
    for (field, axis) in [("axis_x", &config.input.axis_x), ("axis_y", &config.input.axis_y)] {
        if axis.acceleration < 0.0 || axis.deceleration < 0.0 {
            errors.push(ConfigError {
                section: "input",
                field: field.to_string(),
                message: "acceleration and deceleration must not be negative".to_string(),
            });
        }
    }

    // Movement
    let movement = &config.movement;
    check_non_negative!(errors, "movement", movement, walk_speed);
    check_non_negative!(errors, "movement", movement, run_speed);
    check_non_negative!(errors, "movement", movement, acceleration);
    check_non_negative!(errors, "movement", movement, deceleration);
    check_non_negative!(errors, "movement", movement, friction_dynamic);
    check_non_negative!(errors, "movement", movement, friction_static);
    check_non_negative!(errors, "movement", movement, gravity);
    check_non_negative!(errors, "movement", movement, air_power);
    check_non_negative!(errors, "movement", movement, max_air_speed);
    check_non_negative!(errors, "movement", movement, max_fall_speed);
    if movement.crouch_size_percent <= 0.0 || movement.crouch_size_percent > 1.0 {
        errors.push(ConfigError {
            section: "movement",
            field: "crouch_size_percent".to_string(),
            message: format!("must be in (0, 1] (got {})", movement.crouch_size_percent),
        });
    }
    check_curve(&mut errors, "movement", "slope_speed_multiplier", &movement.slope_speed_multiplier);

    // Animations
    let animations = &config.animations;
    check_non_negative!(errors, "animations", animations, min_air_time);
    check_curve(&mut errors, "animations", "anim_from_input", &animations.anim_from_input);
    check_curve(&mut errors, "animations", "anim_from_speed", &animations.anim_from_speed);

    // Jump
    let jump = &config.jump;
    check_non_negative!(errors, "jump", jump, min_height);
    if jump.max_height < jump.min_height {
        errors.push(ConfigError {
            section: "jump",
            field: "max_height".to_string(),
            message: format!(
                "must be >= min_height ({} < {})",
                jump.max_height, jump.min_height
            ),
        });
    }

    // Wall jump
    let wall_jump = &config.wall_jump;
    check_non_negative!(errors, "wall_jump", wall_jump, time_before_jump);
    check_non_negative!(errors, "wall_jump", wall_jump, disable_auto_rotate_time);
    for &index in &wall_jump.ray_indexes {
        if index >= config.motor.front_rays {
            errors.push(ConfigError {
                section: "wall_jump",
                field: "ray_indexes".to_string(),
                message: format!(
                    "ray index {} out of range for {} front rays",
                    index, config.motor.front_rays
                ),
            });
        }
    }

    // Melee
    for (attack_index, attack) in config.melee.attacks.iter().enumerate() {
        if let Some(duration) = attack.duration
            && duration < 0.0
        {
            errors.push(ConfigError {
                section: "melee",
                field: format!("attacks[{}].duration", attack_index),
                message: format!("must not be negative (got {})", duration),
            });
        }
        for (zone_index, zone) in attack.hit_zones.iter().enumerate() {
            if zone.radius < 0.0 {
                errors.push(ConfigError {
                    section: "melee",
                    field: format!("attacks[{}].hit_zones[{}].radius", attack_index, zone_index),
                    message: format!("must not be negative (got {})", zone.radius),
                });
            }
        }
    }

    // Motor
    let motor = &config.motor;
    if motor.box_size.x <= 0.0 || motor.box_size.y <= 0.0 {
        errors.push(ConfigError {
            section: "motor",
            field: "box_size".to_string(),
            message: format!("must be positive (got {:?})", motor.box_size),
        });
    }
    check_non_negative!(errors, "motor", motor, skin_width);
    check_non_negative!(errors, "motor", motor, probe_distance);

    errors
}
