//! Named axes and buttons the character core reads each frame.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

/// Raw input by name. Unknown or empty names read as idle.
pub trait InputSource {
    /// Raw analog value in [-1, 1].
    fn axis_raw(&self, name: &str) -> f32;
    /// Went down this frame.
    fn button_pressed(&self, name: &str) -> bool;
    fn button_held(&self, name: &str) -> bool;
    /// Went up this frame.
    fn button_released(&self, name: &str) -> bool;
}

/// Input state for one character for the current frame.
#[derive(Component, Debug, Clone, Default)]
pub struct InputSnapshot {
    axes: HashMap<String, f32>,
    pressed: HashSet<String>,
    held: HashSet<String>,
    released: HashSet<String>,
}

impl InputSnapshot {
    pub fn set_axis(&mut self, name: &str, value: f32) {
        self.axes.insert(name.to_string(), value.clamp(-1.0, 1.0));
    }

    /// Record the button level for this frame, deriving press and release edges
    /// from the previous level.
    pub fn set_button(&mut self, name: &str, down: bool) {
        let was_down = self.held.contains(name);
        self.pressed.remove(name);
        self.released.remove(name);

        if down {
            if !was_down {
                self.pressed.insert(name.to_string());
            }
            self.held.insert(name.to_string());
        } else {
            if was_down {
                self.released.insert(name.to_string());
            }
            self.held.remove(name);
        }
    }

    pub fn clear(&mut self) {
        self.axes.clear();
        self.pressed.clear();
        self.held.clear();
        self.released.clear();
    }
}

impl InputSource for InputSnapshot {
    fn axis_raw(&self, name: &str) -> f32 {
        self.axes.get(name).copied().unwrap_or(0.0)
    }

    fn button_pressed(&self, name: &str) -> bool {
        !name.is_empty() && self.pressed.contains(name)
    }

    fn button_held(&self, name: &str) -> bool {
        !name.is_empty() && self.held.contains(name)
    }

    fn button_released(&self, name: &str) -> bool {
        !name.is_empty() && self.released.contains(name)
    }
}

/// Keys driving a digital axis.
#[derive(Debug, Clone)]
pub struct AxisBinding {
    pub negative: Vec<KeyCode>,
    pub positive: Vec<KeyCode>,
}

/// Keyboard bindings for the player-controlled character.
#[derive(Resource, Debug, Clone)]
pub struct InputBindings {
    pub axes: Vec<(String, AxisBinding)>,
    pub buttons: Vec<(String, Vec<KeyCode>)>,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            axes: vec![
                (
                    "Horizontal".to_string(),
                    AxisBinding {
                        negative: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
                        positive: vec![KeyCode::KeyD, KeyCode::ArrowRight],
                    },
                ),
                (
                    "Vertical".to_string(),
                    AxisBinding {
                        negative: vec![KeyCode::KeyS, KeyCode::ArrowDown],
                        positive: vec![KeyCode::KeyW, KeyCode::ArrowUp],
                    },
                ),
            ],
            buttons: vec![
                ("Jump".to_string(), vec![KeyCode::Space, KeyCode::KeyK]),
                ("Attack".to_string(), vec![KeyCode::KeyJ]),
                ("Run".to_string(), vec![KeyCode::ShiftLeft]),
            ],
        }
    }
}
