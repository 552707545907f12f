//! Input domain: named axes and buttons, and the rate-limited axis filter.

mod filter;
mod source;
mod systems;


pub use filter::{InputAxis, filter_step};
pub use source::{AxisBinding, InputBindings, InputSnapshot, InputSource};

use bevy::prelude::*;

/// Characters whose snapshot is filled from the keyboard.
#[derive(Component, Debug, Default)]
pub struct KeyboardControlled;

/// Reads the keyboard into input snapshots before the characters latch them.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadInputSet;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputBindings>()
            .add_systems(Update, systems::read_keyboard_input.in_set(ReadInputSet));
    }
}
