//! Vehicle command state: the steering and throttle destination channels
//!
//! Each command channel clamps writes to [-1, 1], then its observer shapes
//! the committed value through the motor parameters and hands the physical
//! duty to the backend. The backend call is fire-and-forget; a failed write
//! is logged and teleoperation continues, but it is logged precisely because
//! it can leave an actuator at a stale value.

use crate::car::backend::PwmBackend;
use crate::car::shaping::MotorParams;
use crate::dataflow::{clamp_symmetric, Channel};
use std::sync::Arc;
use tracing::{info, warn};

/// Per-car actuation parameters: shaping plus backend channel indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarParams {
    pub steering: MotorParams,
    pub throttle: MotorParams,
    pub steering_channel: u8,
    pub throttle_channel: u8,
}

impl Default for CarParams {
    fn default() -> Self {
        Self {
            steering: MotorParams::steering_defaults(),
            throttle: MotorParams::throttle_defaults(),
            steering_channel: 0,
            throttle_channel: 1,
        }
    }
}

/// The car side of the command graph. Cloning shares the channels.
#[derive(Debug, Clone)]
pub struct Car {
    pub steering: Arc<Channel<f32>>,
    pub throttle: Arc<Channel<f32>>,
}

impl Car {
    /// Builds the command channels and wires them to the backend.
    ///
    /// Both actuators are set to a raw zero duty first so the car starts
    /// from rest regardless of what the hardware held before.
    pub fn new(backend: Arc<dyn PwmBackend>, params: CarParams) -> Self {
        for (name, channel) in [
            ("steering", params.steering_channel),
            ("throttle", params.throttle_channel),
        ] {
            if let Err(e) = backend.set_duty(channel, 0.0) {
                warn!("failed to zero {} actuator at startup: {}", name, e);
            }
        }

        let steering = Channel::with_validator("car.steering", 0.0, clamp_symmetric);
        let throttle = Channel::with_validator("car.throttle", 0.0, clamp_symmetric);

        let sink = Arc::clone(&backend);
        let motor = params.steering;
        let index = params.steering_channel;
        steering.subscribe(move |_, new| {
            let physical = motor.shape(new);
            info!("steering {:+.3} -> duty {:+.3}", new, physical);
            if let Err(e) = sink.set_duty(index, physical) {
                warn!("steering actuator write failed: {}", e);
            }
        });

        let sink = backend;
        let motor = params.throttle;
        let index = params.throttle_channel;
        throttle.subscribe(move |_, new| {
            let physical = motor.shape(new);
            info!("throttle {:+.3} -> duty {:+.3}", new, physical);
            if let Err(e) = sink.set_duty(index, physical) {
                warn!("throttle actuator write failed: {}", e);
            }
        });

        Self { steering, throttle }
    }
}
