//! Carrier domain: moving platforms that measure their own velocity.

mod systems;


use bevy::prelude::*;

/// Measures how far a platform moved during the current frame.
///
/// `begin_frame` records the position before the platform's own logic runs,
/// `measure` is called once afterwards; riders read [`Carrier::velocity`].
#[derive(Component, Debug, Clone, Default)]
pub struct Carrier {
    previous: Vec2,
    velocity: Vec2,
    pending: bool,
}

impl Carrier {
    pub fn new(position: Vec2) -> Self {
        Self {
            previous: position,
            velocity: Vec2::ZERO,
            pending: false,
        }
    }

    pub fn begin_frame(&mut self, position: Vec2) {
        self.previous = position;
        self.pending = true;
    }

    /// Velocity over the frame started by `begin_frame`. Measures at most once
    /// per frame; a non-positive `dt` keeps the previous reading.
    pub fn measure(&mut self, position: Vec2, dt: f32) -> Vec2 {
        if self.pending && dt > 0.0 {
            self.velocity = (position - self.previous) / dt;
            self.pending = false;
        }
        self.velocity
    }

    /// Last measured velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Runs after platforms moved, before riders are carried.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureCarriersSet;

pub struct CarrierPlugin;

impl Plugin for CarrierPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, systems::begin_carrier_frame)
            .add_systems(PostUpdate, systems::measure_carriers.in_set(MeasureCarriersSet));
    }
}
