//! Debug overlays for tuning characters (dev-tools builds only).
//!
//! - F1 / `: collision boxes and probe rays
//! - F2: state overlay for the player
//! - F3: active melee hit zones
//! - Ctrl+E: toggle external control of the player
//! - Ctrl+R: reload the character tuning file

mod state;
mod systems;
mod ui;

pub use state::DebugState;
pub use ui::{DebugInfoOverlay, DebugInfoText};

use bevy::prelude::*;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(
                Update,
                (
                    systems::handle_debug_hotkeys,
                    systems::update_status_message,
                    systems::update_debug_info_overlay,
                )
                    .chain(),
            )
            .add_systems(
                PostUpdate,
                (
                    systems::draw_probes.run_if(|state: Res<DebugState>| state.show_probes),
                    systems::draw_hit_zones.run_if(|state: Res<DebugState>| state.show_hit_zones),
                ),
            );
    }
}
