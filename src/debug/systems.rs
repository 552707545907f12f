//! Debug domain: hotkeys, gizmos and the info overlay.

use bevy::prelude::*;

use super::state::DebugState;
use super::ui::{DebugInfoOverlay, DebugInfoText, spawn_debug_info_overlay};
use crate::character::{CharacterController, ExternalControl};
use crate::content::{CharacterConfig, CharacterConfigPath, load_character_config, validate_config};
use crate::input::KeyboardControlled;
use crate::motor::Motor;
use crate::physics::RayType;

const RAY_HIT_COLOR: Color = Color::srgb(0.2, 0.9, 0.3);
const RAY_MISS_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
const BOX_COLOR: Color = Color::srgb(0.3, 0.6, 1.0);
const HIT_ZONE_COLOR: Color = Color::srgb(1.0, 0.3, 0.2);

/// F1 toggles probes, F2 the info overlay, F3 hit zones.
pub(crate) fn handle_debug_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    path: Res<CharacterConfigPath>,
    mut config: ResMut<CharacterConfig>,
    mut characters: Query<
        (Entity, &mut CharacterController, &mut Motor, Has<ExternalControl>),
        With<KeyboardControlled>,
    >,
) {
    if keyboard.just_pressed(KeyCode::F1) || keyboard.just_pressed(KeyCode::Backquote) {
        debug_state.show_probes = !debug_state.show_probes;
    }
    if keyboard.just_pressed(KeyCode::F2) {
        debug_state.show_info = !debug_state.show_info;
    }
    if keyboard.just_pressed(KeyCode::F3) {
        debug_state.show_hit_zones = !debug_state.show_hit_zones;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    // Ctrl+E: hand the player to (or take it back from) external control
    if keyboard.just_pressed(KeyCode::KeyE) {
        for (entity, _, _, controlled) in &characters {
            if controlled {
                commands.entity(entity).remove::<ExternalControl>();
            } else {
                commands.entity(entity).insert(ExternalControl);
            }
            let msg = if controlled { "External control OFF" } else { "External control ON" };
            debug_state.set_message(msg, 2.0);
            info!("[DEBUG] {}", msg);
        }
    }

    // Ctrl+R: reload the tuning file and rebuild the player
    if keyboard.just_pressed(KeyCode::KeyR) {
        match load_character_config(&path.0) {
            Ok(loaded) => {
                let errors = validate_config(&loaded);
                for e in &errors {
                    warn!("[DEBUG] {}", e);
                }
                for (_, mut controller, mut motor, _) in &mut characters {
                    *controller = CharacterController::new(loaded.clone());
                    let position = motor.position;
                    *motor = Motor::new(&loaded.motor, position);
                }
                *config = loaded;
                debug_state.set_message(format!("Config reloaded ({} error(s))", errors.len()), 2.0);
            }
            Err(e) => {
                warn!("[DEBUG] {}", e);
                debug_state.set_message("Config reload failed", 2.0);
            }
        }
    }
}

pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    if let Some((_, remaining)) = &mut debug_state.status_message {
        *remaining -= time.delta_secs();
        if *remaining <= 0.0 {
            debug_state.status_message = None;
        }
    }
}

pub(crate) fn draw_probes(mut gizmos: Gizmos, motors: Query<&Motor>) {
    for motor in &motors {
        let probe = motor.probe_box();
        gizmos.rect_2d(probe.center, probe.half_size * 2.0, BOX_COLOR);

        for ray_type in [RayType::Ground, RayType::Head, RayType::Front, RayType::Back] {
            for ray in motor.rays(ray_type) {
                let end = ray.origin + ray.direction * (ray.face_offset + ray.distance);
                let color = if ray.hit() { RAY_HIT_COLOR } else { RAY_MISS_COLOR };
                gizmos.line_2d(ray.origin, end, color);
            }
        }
    }
}

pub(crate) fn draw_hit_zones(mut gizmos: Gizmos, characters: Query<(&CharacterController, &Motor)>) {
    for (controller, motor) in &characters {
        let Some(attack) = controller.current_attack().and_then(|i| controller.attacks().get(i)) else {
            continue;
        };
        for zone in attack.hit_zones.iter().filter(|z| z.active) {
            let center = zone.world_center(motor.position, motor.facing());
            gizmos.circle_2d(center, zone.radius, HIT_ZONE_COLOR);
        }
    }
}

pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    debug_state: Res<DebugState>,
    player_query: Query<(&CharacterController, &Motor), With<KeyboardControlled>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoText>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    if let (Some((controller, motor)), Ok(mut text)) =
        (player_query.iter().next(), overlay_query.single_mut())
    {
        let message = debug_state
            .status_message
            .as_ref()
            .map_or("", |(msg, _)| msg.as_str());
        **text = format!(
            "Pos: ({:.2}, {:.2})\nVel: ({:.2}, {:.2})\nState: {:?} ({:.2}s)\nGround: {} Sliding: {}\nCarrier: {:?}\n{}",
            motor.position.x,
            motor.position.y,
            motor.velocity.x,
            motor.velocity.y,
            controller.state(),
            controller.state_time(),
            controller.on_ground(),
            controller.is_sliding(),
            controller.carrier(),
            message,
        );
    }
}
