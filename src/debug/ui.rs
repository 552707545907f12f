//! Debug domain: character info panel.

use bevy::prelude::*;

const PANEL_BACKGROUND: Color = Color::srgba(0.05, 0.07, 0.1, 0.8);
const TITLE_COLOR: Color = Color::srgb(1.0, 0.85, 0.4);
const BODY_COLOR: Color = Color::srgb(0.85, 0.9, 0.95);

/// Root node of the info panel. Despawning it removes the whole panel.
#[derive(Component, Debug)]
pub struct DebugInfoOverlay;

/// Text node rewritten every frame with the player's state.
#[derive(Component, Debug)]
pub struct DebugInfoText;

pub(crate) fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands
        .spawn((
            DebugInfoOverlay,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                right: Val::Px(8.0),
                min_width: Val::Px(220.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            GlobalZIndex(100),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Player (F2)"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TITLE_COLOR),
            ));
            panel.spawn((
                DebugInfoText,
                Text::default(),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(BODY_COLOR),
            ));
        });
}
