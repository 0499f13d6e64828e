//! Reactive input state for one gamepad
//!
//! Holds the raw axis and button channels plus the two first-order derived
//! command channels. The derived reactions are wired at construction:
//!
//! - `y` axis -> `throttle` with the sign flipped (pushing the stick forward
//!   reads negative on the wire but commands positive throttle)
//! - `z` axis -> `steering`, passthrough
//!
//! Both run synchronously inside the axis write that produced them.

use crate::dataflow::Channel;
use crate::gamepad::decoder::ChannelUpdate;
use std::sync::Arc;
use tracing::{debug, trace};

/// The gamepad side of the command graph. Cloning shares the channels.
#[derive(Debug, Clone)]
pub struct Gamepad {
    pub x: Arc<Channel<f32>>,
    pub y: Arc<Channel<f32>>,
    pub z: Arc<Channel<f32>>,
    pub rz: Arc<Channel<f32>>,

    pub btn_a: Arc<Channel<i16>>,
    pub btn_b: Arc<Channel<i16>>,
    pub btn_x: Arc<Channel<i16>>,
    pub btn_y: Arc<Channel<i16>>,

    /// Derived from `y`, sign-flipped. Normalized command, not yet shaped.
    pub throttle: Arc<Channel<f32>>,
    /// Derived from `z`, passthrough. Normalized command, not yet shaped.
    pub steering: Arc<Channel<f32>>,
}

impl Gamepad {
    pub fn new() -> Self {
        let x = Channel::new("pad.x", 0.0);
        let y = Channel::new("pad.y", 0.0);
        let z = Channel::new("pad.z", 0.0);
        let rz = Channel::new("pad.rz", 0.0);

        let btn_a = Channel::new("pad.btn_a", 0);
        let btn_b = Channel::new("pad.btn_b", 0);
        let btn_x = Channel::new("pad.btn_x", 0);
        let btn_y = Channel::new("pad.btn_y", 0);

        let throttle = Channel::new("pad.throttle", 0.0);
        let steering = Channel::new("pad.steering", 0.0);

        let derived = Arc::clone(&throttle);
        y.subscribe(move |_, new| {
            trace!("throttle command {:.4}", -new);
            derived.write(-new);
        });

        let derived = Arc::clone(&steering);
        z.subscribe(move |_, new| {
            trace!("steering command {:.4}", new);
            derived.write(new);
        });

        Self {
            x,
            y,
            z,
            rz,
            btn_a,
            btn_b,
            btn_x,
            btn_y,
            throttle,
            steering,
        }
    }

    /// Routes one decoded update into the matching channel.
    ///
    /// Axes and buttons the pad does not model are ignored; the decoder
    /// already resolved them, they just have no role in driving.
    pub fn apply(&self, update: &ChannelUpdate<'_>) {
        match *update {
            ChannelUpdate::Axis { name, value } => match name {
                "x" => self.x.write(value),
                "y" => self.y.write(value),
                "z" => self.z.write(value),
                "rz" => self.rz.write(value),
                other => debug!("ignoring unmapped axis '{}'", other),
            },
            ChannelUpdate::Button { name, pressed } => match name {
                "a" => self.btn_a.write(pressed),
                "b" => self.btn_b.write(pressed),
                "x" => self.btn_x.write(pressed),
                "y" => self.btn_y.write(pressed),
                other => debug!("ignoring unmapped button '{}'", other),
            },
        }
    }
}

impl Default for Gamepad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_axis_inverts_into_throttle() {
        let pad = Gamepad::new();
        pad.apply(&ChannelUpdate::Axis {
            name: "y",
            value: 0.4,
        });
        assert_eq!(pad.y.get(), 0.4);
        assert_eq!(pad.throttle.get(), -0.4);
    }

    #[test]
    fn z_axis_passes_through_to_steering() {
        let pad = Gamepad::new();
        pad.apply(&ChannelUpdate::Axis {
            name: "z",
            value: -0.75,
        });
        assert_eq!(pad.z.get(), -0.75);
        assert_eq!(pad.steering.get(), -0.75);
    }

    #[test]
    fn button_updates_land_in_their_channels() {
        let pad = Gamepad::new();
        pad.apply(&ChannelUpdate::Button {
            name: "a",
            pressed: 1,
        });
        assert_eq!(pad.btn_a.get(), 1);
        pad.apply(&ChannelUpdate::Button {
            name: "a",
            pressed: 0,
        });
        assert_eq!(pad.btn_a.get(), 0);
    }

    #[test]
    fn unmapped_names_are_ignored() {
        let pad = Gamepad::new();
        pad.apply(&ChannelUpdate::Axis {
            name: "unknown(0x99)",
            value: 0.9,
        });
        pad.apply(&ChannelUpdate::Button {
            name: "tl2",
            pressed: 1,
        });
        assert_eq!(pad.throttle.get(), 0.0);
        assert_eq!(pad.steering.get(), 0.0);
    }

    #[test]
    fn clones_share_the_same_channels() {
        let pad = Gamepad::new();
        let view = pad.clone();
        pad.apply(&ChannelUpdate::Axis {
            name: "y",
            value: -1.0,
        });
        assert_eq!(view.throttle.get(), 1.0);
    }
}
