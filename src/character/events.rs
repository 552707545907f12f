//! Character domain: notifications and per-frame output.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::combat::MeleeHit;
use crate::motor::Touch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterEvent {
    Jumped,
    Landed,
    BecameAirborne,
    Crouched,
    Uncrouched,
    WallJumped,
    MeleeAttackStarted,
}

/// Request to the animation player.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationCommand {
    /// Play `clip`, restarting at `normalized_time` when given, otherwise
    /// continuing if it is already playing.
    Play { clip: String, normalized_time: Option<f32> },
    SetSpeed(f32),
}

/// Everything a character produced during one update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    pub events: Vec<CharacterEvent>,
    pub hits: Vec<MeleeHit>,
    pub touches: Vec<Touch>,
    pub animations: Vec<AnimationCommand>,
}

impl FrameOutput {
    pub(crate) fn play(&mut self, clip: &str, normalized_time: Option<f32>) {
        if clip.is_empty() {
            return;
        }
        self.animations.push(AnimationCommand::Play {
            clip: clip.to_string(),
            normalized_time,
        });
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.hits.clear();
        self.touches.clear();
        self.animations.clear();
    }
}

/// A character event, broadcast to whoever listens.
#[derive(Debug, Clone, Copy)]
pub struct CharacterNotification {
    pub character: Entity,
    pub event: CharacterEvent,
}

impl Message for CharacterNotification {}
