//! Car subsystem: command shaping and actuation
//!
//! 1. [`shaping`] - gain/offset/clamp transform from normalized command to
//!    physical duty value
//! 2. [`backend`] - the one-operation PWM interface the car drives
//! 3. [`pca9685`] - real PCA9685 servo driver over I2C (feature `pca9685`)
//! 4. [`car`] - the steering/throttle command channels wired to the backend

pub mod backend;
pub mod car;
#[cfg(feature = "pca9685")]
pub mod pca9685;
pub mod shaping;

pub use backend::{BackendError, LogBackend, PwmBackend};
pub use car::{Car, CarParams};
#[cfg(feature = "pca9685")]
pub use pca9685::Pca9685Backend;
pub use shaping::MotorParams;
