//! Normalized command -> physical duty value
//!
//! The shaping stage is the safety envelope: whatever the dataflow graph
//! commands, the value handed to an actuator is bounded by the per-motor
//! parameters here. Throttle is deliberately asymmetric, reverse is allowed
//! further (-0.25) than forward (+0.15). Steering carries no physical bound
//! by default; with the default gain and offset its output stays within
//! [-0.57, 0.73] for commands already clamped to [-1, 1].

/// Immutable per-actuator shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorParams {
    pub gain: f32,
    pub offset: f32,
    pub min_physical: f32,
    pub max_physical: f32,
}

impl MotorParams {
    /// Steering servo defaults: inverted gain, small trim offset, open limits.
    pub fn steering_defaults() -> Self {
        Self {
            gain: -0.65,
            offset: 0.08,
            min_physical: f32::NEG_INFINITY,
            max_physical: f32::INFINITY,
        }
    }

    /// Throttle defaults: soft gain, hard asymmetric envelope.
    pub fn throttle_defaults() -> Self {
        Self {
            gain: 0.25,
            offset: 0.0,
            min_physical: -0.25,
            max_physical: 0.15,
        }
    }

    /// Applies gain, offset and the physical clamp. Total over the real line.
    pub fn shape(&self, command: f32) -> f32 {
        (command * self.gain + self.offset).clamp(self.min_physical, self.max_physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn throttle_envelope_is_asymmetric() {
        let params = MotorParams::throttle_defaults();
        assert!(close(params.shape(1.0), 0.15));
        assert!(close(params.shape(-1.0), -0.25));
        assert!(close(params.shape(0.0), 0.0));
    }

    #[test]
    fn throttle_inside_envelope_scales_linearly() {
        let params = MotorParams::throttle_defaults();
        assert!(close(params.shape(0.4), 0.1));
        assert!(close(params.shape(-0.8), -0.2));
    }

    #[test]
    fn steering_applies_gain_and_offset_unclamped() {
        let params = MotorParams::steering_defaults();
        assert!(close(params.shape(1.0), -0.57));
        assert!(close(params.shape(-1.0), 0.73));
        assert!(close(params.shape(0.0), 0.08));
    }

    #[test]
    fn explicit_limits_bound_steering_too() {
        let params = MotorParams {
            min_physical: -0.5,
            max_physical: 0.5,
            ..MotorParams::steering_defaults()
        };
        assert!(close(params.shape(-1.0), 0.5));
        assert!(close(params.shape(1.0), -0.5));
    }
}
