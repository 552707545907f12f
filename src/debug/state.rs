//! Debug domain: overlay toggles.

use bevy::prelude::*;

/// Resource tracking which debug overlays are shown
#[derive(Resource, Debug)]
pub struct DebugState {
    /// Draw the collision box and probe rays of every character
    pub show_probes: bool,
    /// Draw active melee hit zones
    pub show_hit_zones: bool,
    /// Show the text overlay (state, velocity, contacts)
    pub show_info: bool,
    /// Message to display temporarily in the overlay
    pub status_message: Option<(String, f32)>,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            show_probes: false,
            show_hit_zones: true,
            show_info: false,
            status_message: None,
        }
    }
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        self.status_message = Some((message.into(), duration));
    }
}
