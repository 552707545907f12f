//! Rate-limited smoothing of raw axis input.

use crate::content::AxisSettings;

/// Move `current` toward `target` with separate acceleration and deceleration rates.
///
/// Growing in magnitude uses `accel`, shrinking uses `decel`. When the step
/// would cross zero, the value first decelerates toward zero and only the
/// part of the step left after reaching zero accelerates in the new
/// direction. With `snap`, a sign reversal of a non-zero target drops
/// `current` to zero first.
pub fn filter_step(current: f32, target: f32, snap: bool, accel: f32, decel: f32, dt: f32) -> f32 {
    let mut current = current;
    if snap && target != 0.0 && target.signum() != current.signum() {
        current = 0.0;
    }

    let max_accel = accel * dt;
    let max_decel = decel * dt;
    let diff = target - current;

    let step = if current >= 0.0 {
        if diff >= 0.0 {
            diff.min(max_accel)
        } else if diff < -current {
            // crossing zero within this step
            if current > max_decel {
                -max_decel
            } else {
                (diff + current).max(-max_accel) - current
            }
        } else {
            diff.max(-max_decel)
        }
    } else if diff <= 0.0 {
        diff.max(-max_accel)
    } else if diff > -current {
        if current < -max_decel {
            max_decel
        } else {
            (diff + current).min(max_accel) - current
        }
    } else {
        diff.min(max_decel)
    };

    current + step
}

/// A named input axis whose value follows the raw input at a limited rate.
#[derive(Debug, Clone, PartialEq)]
pub struct InputAxis {
    pub name: String,
    pub acceleration: f32,
    pub deceleration: f32,
    pub snap: bool,
    value: f32,
    raw: f32,
}

impl InputAxis {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_settings(&AxisSettings {
            name: name.into(),
            ..Default::default()
        })
    }

    pub fn from_settings(settings: &AxisSettings) -> Self {
        Self {
            name: settings.name.clone(),
            acceleration: settings.acceleration,
            deceleration: settings.deceleration,
            snap: settings.snap,
            value: 0.0,
            raw: 0.0,
        }
    }

    /// Advance the filtered value toward `raw` and clamp it to [-1, 1].
    pub fn update(&mut self, raw: f32, dt: f32) {
        self.raw = raw.clamp(-1.0, 1.0);
        self.value = filter_step(
            self.value,
            self.raw,
            self.snap,
            self.acceleration,
            self.deceleration,
            dt,
        )
        .clamp(-1.0, 1.0);
    }

    /// Filtered value in [-1, 1].
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Unfiltered input from the last update.
    pub fn raw(&self) -> f32 {
        self.raw
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(-1.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.raw = 0.0;
    }
}
