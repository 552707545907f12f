//! Carrier domain: frame bracketing for velocity measurement.

use bevy::prelude::*;

use crate::carrier::Carrier;

pub(crate) fn begin_carrier_frame(mut carriers: Query<(&mut Carrier, &Transform)>) {
    for (mut carrier, transform) in &mut carriers {
        carrier.begin_frame(transform.translation.truncate());
    }
}

pub(crate) fn measure_carriers(time: Res<Time>, mut carriers: Query<(&mut Carrier, &Transform)>) {
    let dt = time.delta_secs();
    for (mut carrier, transform) in &mut carriers {
        carrier.measure(transform.translation.truncate(), dt);
    }
}
