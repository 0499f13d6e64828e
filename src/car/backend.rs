//! The one-operation actuator interface
//!
//! The car only ever calls `set_duty(channel, value)`; everything else about
//! the PWM hardware (addressing, frequency, init) is the backend's own
//! business. Failures are reported so the caller can log them, but the
//! command pipeline treats them as non-fatal: a dropped write must not stop
//! teleoperation.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("PWM transfer failed: {0}")]
    Transfer(String),

    #[error("failed to initialize PWM device: {0}")]
    Init(String),
}

/// Duty-cycle sink for one or more actuator channels.
///
/// `value` is a throttle-style fraction in [-1, 1]; how that maps to pulse
/// widths is up to the implementation.
pub trait PwmBackend: Send + Sync {
    fn set_duty(&self, channel: u8, value: f32) -> Result<(), BackendError>;
}

/// Default backend on development hosts: logs duties instead of driving
/// hardware.
#[derive(Debug, Default)]
pub struct LogBackend;

impl PwmBackend for LogBackend {
    fn set_duty(&self, channel: u8, value: f32) -> Result<(), BackendError> {
        debug!("pwm channel {} duty {:+.3}", channel, value);
        Ok(())
    }
}

/// Test backend recording every call in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: parking_lot::Mutex<Vec<(u8, f32)>>,
    pub fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MockBackend {
    pub fn calls(&self) -> Vec<(u8, f32)> {
        self.calls.lock().clone()
    }
}

#[cfg(test)]
impl PwmBackend for MockBackend {
    fn set_duty(&self, channel: u8, value: f32) -> Result<(), BackendError> {
        self.calls.lock().push((channel, value));
        if self.fail.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(BackendError::Transfer("injected failure".into()));
        }
        Ok(())
    }
}
