//! Input domain: keyboard polling into per-character snapshots.

use bevy::prelude::*;

use crate::input::{InputBindings, InputSnapshot, KeyboardControlled};

/// Value of a digital axis from its negative and positive keys.
pub(crate) fn digital_axis(keys: &ButtonInput<KeyCode>, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
    let mut value = 0.0;
    if keys.any_pressed(negative.iter().copied()) {
        value -= 1.0;
    }
    if keys.any_pressed(positive.iter().copied()) {
        value += 1.0;
    }
    value
}

pub(crate) fn read_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut query: Query<&mut InputSnapshot, With<KeyboardControlled>>,
) {
    for mut snapshot in &mut query {
        for (name, binding) in &bindings.axes {
            snapshot.set_axis(name, digital_axis(&keys, &binding.negative, &binding.positive));
        }
        for (name, codes) in &bindings.buttons {
            snapshot.set_button(name, keys.any_pressed(codes.iter().copied()));
        }
    }
}
