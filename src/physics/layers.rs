//! Collision layers for filtering probe rays and hit queries.

use avian2d::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(PhysicsLayer, Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum GameLayer {
    #[default]
    Default,
    /// Static level geometry (floors, walls, ceilings)
    Ground,
    /// Controlled characters
    Character,
    /// Props that can be hit or touched (crates, enemies)
    Prop,
    /// Moving platforms that carry riders
    Platform,
}

/// Combine a list of layers into a single mask.
pub fn layer_mask(layers: &[GameLayer]) -> LayerMask {
    layers
        .iter()
        .fold(LayerMask::NONE, |mask, layer| LayerMask(mask.0 | LayerMask::from(*layer).0))
}

/// True when any bit of `memberships` is in `mask`.
pub fn mask_matches(mask: LayerMask, memberships: LayerMask) -> bool {
    mask.0 & memberships.0 != 0
}
