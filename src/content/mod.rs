//! Content domain: character tuning data, loading and validation.

mod curve;
mod data;
mod loader;
mod validation;


pub use curve::{CurveKey, ResponseCurve};
pub use data::{
    AnimationSettings, AxisSettings, CharacterConfig, HitZoneDef, InputSettings, JumpSettings,
    MeleeAttackDef, MeleeSettings, MotorSettings, MovementSettings, WallJumpSettings,
};
pub use loader::{ConfigLoadError, load_character_config, parse_character_config};
pub use validation::{ConfigError, validate_config};

use bevy::prelude::*;
use std::path::PathBuf;

/// Where the startup loader looks for the character tuning file.
#[derive(Resource, Debug, Clone)]
pub struct CharacterConfigPath(pub PathBuf);

impl Default for CharacterConfigPath {
    fn default() -> Self {
        Self(PathBuf::from("assets/data/character.ron"))
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CharacterConfigPath>()
            .init_resource::<CharacterConfig>()
            .add_systems(PreStartup, load_config_on_startup);
    }
}

/// Load and validate the character config once, before anything spawns.
fn load_config_on_startup(path: Res<CharacterConfigPath>, mut config: ResMut<CharacterConfig>) {
    let loaded = match load_character_config(&path.0) {
        Ok(loaded) => {
            info!("Loaded character config from {}", path.0.display());
            loaded
        }
        Err(e) => {
            warn!("{}; using default character config", e);
            CharacterConfig::default()
        }
    };

    let errors = validate_config(&loaded);
    if !errors.is_empty() {
        error!("Character config has {} validation error(s):", errors.len());
        for e in &errors {
            error!("  - {}", e);
        }
    }

    *config = loaded;
}
