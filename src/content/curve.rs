//! Piecewise-linear response curves used by tuning values.

use serde::{Deserialize, Serialize};

/// A single `(input, output)` key of a [`ResponseCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CurveKey {
    pub input: f32,
    pub output: f32,
}

impl CurveKey {
    pub const fn new(input: f32, output: f32) -> Self {
        Self { input, output }
    }
}

/// Maps an input value to an output by linear interpolation between keys.
///
/// Inputs outside the key range evaluate to the first/last key output.
/// An empty curve evaluates to 0.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(transparent)]
pub struct ResponseCurve {
    pub keys: Vec<CurveKey>,
}

impl ResponseCurve {
    pub fn new(keys: impl Into<Vec<CurveKey>>) -> Self {
        Self { keys: keys.into() }
    }

    /// Straight line from `(x0, y0)` to `(x1, y1)`.
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new([CurveKey::new(x0, y0), CurveKey::new(x1, y1)])
    }

    pub fn evaluate(&self, input: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };

        if input <= first.input {
            return first.output;
        }
        if input >= last.input {
            return last.output;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if input >= a.input && input <= b.input {
                let span = b.input - a.input;
                if span <= f32::EPSILON {
                    return b.output;
                }
                let t = (input - a.input) / span;
                return a.output + (b.output - a.output) * t;
            }
        }

        last.output
    }

    /// True when key inputs never decrease.
    pub fn is_sorted(&self) -> bool {
        self.keys.windows(2).all(|pair| pair[0].input <= pair[1].input)
    }
}
