//! Character domain: ECS adapters around the controller.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::character::{
    CharacterAnimation, CharacterController, CharacterNotification, ExternalControl, FrameOutput,
};
use crate::combat::{CharacterTouch, MeleeAttackHit};
use crate::input::InputSnapshot;
use crate::motor::Motor;
use crate::physics::PhysicsWorld;

pub(crate) fn latch_character_inputs(mut characters: Query<(&mut CharacterController, &InputSnapshot)>) {
    for (mut controller, input) in &mut characters {
        controller.latch_inputs(input);
    }
}

/// Hand characters to external controllers and back. While controlled, the
/// transform is the source of truth.
pub(crate) fn sync_external_control(
    mut characters: Query<(&mut CharacterController, &mut Motor, &Transform, Has<ExternalControl>)>,
) {
    for (mut controller, mut motor, transform, external) in &mut characters {
        if controller.is_controlled() != external {
            controller.set_controlled(external, &mut motor);
        }
        if external {
            motor.position = transform.translation.truncate();
        }
    }
}

pub(crate) fn step_characters(
    time: Res<Time>,
    physics: PhysicsWorld,
    mut characters: Query<(
        Entity,
        &mut CharacterController,
        &mut Motor,
        &InputSnapshot,
        Option<&mut CharacterAnimation>,
    )>,
    mut notifications: MessageWriter<CharacterNotification>,
    mut hits: MessageWriter<MeleeAttackHit>,
    mut touches: MessageWriter<CharacterTouch>,
) {
    let dt = time.delta_secs();

    for (entity, mut controller, mut motor, input, animation) in &mut characters {
        let world = physics.view(entity);
        let out = controller.update(&mut motor, &world, input, dt);

        for event in &out.events {
            notifications.write(CharacterNotification {
                character: entity,
                event: *event,
            });
        }
        for hit in &out.hits {
            debug!("Melee hit {:?} -> {:?}", entity, hit.target);
            hits.write(MeleeAttackHit {
                launcher: entity,
                hit: *hit,
            });
        }
        for touch in &out.touches {
            touches.write(CharacterTouch {
                launcher: entity,
                target: touch.surface,
                ray_type: touch.ray_type,
            });
        }

        if let Some(mut animation) = animation {
            for command in &out.animations {
                animation.apply(command);
            }
        }
    }
}

pub(crate) fn animate_characters(
    mut characters: Query<(&CharacterController, &Motor, &mut CharacterAnimation)>,
) {
    let mut out = FrameOutput::default();
    for (controller, motor, mut animation) in &mut characters {
        out.clear();
        controller.select_animation(motor, &mut out);
        for command in &out.animations {
            animation.apply(command);
        }
    }
}

pub(crate) fn carry_characters(
    time: Res<Time>,
    physics: PhysicsWorld,
    mut characters: Query<(Entity, &mut CharacterController, &mut Motor)>,
) {
    let dt = time.delta_secs();
    for (entity, mut controller, mut motor) in &mut characters {
        let world = physics.view(entity);
        controller.handle_carry(&mut motor, &world, dt);
    }
}

pub(crate) fn sync_character_transforms(
    mut characters: Query<(&Motor, &mut Transform), Without<ExternalControl>>,
) {
    for (motor, mut transform) in &mut characters {
        transform.translation.x = motor.position.x;
        transform.translation.y = motor.position.y;
        transform.scale.x = motor.scale().x * motor.facing();
        transform.scale.y = motor.scale().y;
    }
}
