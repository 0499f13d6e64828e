//! Wire record -> semantic channel updates
//!
//! Pure and total: a record resolves into zero, one or two updates depending
//! on its flag bits and whether the capability map knows the index. When a
//! record carries both flags, the button update is emitted before the axis
//! update; the fixed order keeps downstream fan-out deterministic.

use crate::gamepad::device::CapabilityMap;
use crate::gamepad::wire::RawEvent;
use tracing::trace;

/// One semantic update addressed by capability-map name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelUpdate<'a> {
    Button { name: &'a str, pressed: i16 },
    Axis { name: &'a str, value: f32 },
}

/// Full-scale divisor for raw axis values.
///
/// The kernel reports axes in [-32767, 32767] but dividing by 32767 lets a
/// raw -32768 land slightly past -1 (about -1.00003). Command channels clamp
/// to [-1, 1] on write, so the artifact never reaches an actuator.
pub const AXIS_SCALE: f32 = 32767.0;

/// Normalizes a raw 16-bit axis value to (approximately) [-1, 1].
pub fn normalize_axis(raw: i16) -> f32 {
    raw as f32 / AXIS_SCALE
}

/// Resolves a record against the capability map.
///
/// Indices the map does not know are dropped silently; unmapped hardware
/// must not take the decoder down.
pub fn decode<'a>(raw: &RawEvent, map: &'a CapabilityMap) -> Vec<ChannelUpdate<'a>> {
    let mut updates = Vec::with_capacity(2);

    if raw.is_button() {
        match map.button(raw.index) {
            Some(name) => updates.push(ChannelUpdate::Button {
                name,
                pressed: raw.value,
            }),
            None => trace!("dropping button event with unmapped index {}", raw.index),
        }
    }

    if raw.is_axis() {
        match map.axis(raw.index) {
            Some(name) => updates.push(ChannelUpdate::Axis {
                name,
                value: normalize_axis(raw.value),
            }),
            None => trace!("dropping axis event with unmapped index {}", raw.index),
        }
    }

    updates
}
