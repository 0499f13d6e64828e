//! Pad-to-car wiring and shutdown sequencing

use crate::car::Car;
use crate::dataflow::Link;
use crate::gamepad::Gamepad;
use tracing::info;

/// The fully linked teleoperation graph.
///
/// Holds the two live links from the pad's derived command channels into the
/// car. Dropping the session does not neutralize the car; call
/// [`Teleop::neutral`] on the shutdown path, interrupted or not, so the
/// actuators end at rest.
pub struct Teleop {
    pub pad: Gamepad,
    pub car: Car,
    steering_link: Link<f32>,
    throttle_link: Link<f32>,
}

impl Teleop {
    /// Binds pad.steering -> car.steering and pad.throttle -> car.throttle.
    pub fn link(pad: Gamepad, car: Car) -> Self {
        let steering_link = Link::bind(&pad.steering, &car.steering);
        let throttle_link = Link::bind(&pad.throttle, &car.throttle);
        info!("pad-car links established");
        Self {
            pad,
            car,
            steering_link,
            throttle_link,
        }
    }

    /// Writes zero steering and throttle, propagating through the links so
    /// the final actuator commands are the neutral duties.
    pub fn neutral(&self) {
        info!("commanding neutral steering and throttle");
        self.pad.steering.write(0.0);
        self.pad.throttle.write(0.0);
    }

    /// Tears the links down; subsequent pad writes no longer reach the car.
    pub fn unlink(self) -> (Gamepad, Car) {
        self.steering_link.unbind();
        self.throttle_link.unbind();
        (self.pad, self.car)
    }
}
