//! PCA9685 16-channel servo driver over I2C
//!
//! Drives continuous-rotation servos / ESCs the way the usual servo hats are
//! wired: 60 Hz PWM, pulse width 1500 µs at neutral, ±750 µs at full scale.
//! Register layout per the NXP datasheet; only the handful of registers this
//! driver touches are named.

use crate::car::backend::{BackendError, PwmBackend};
use parking_lot::Mutex;
use rppal::i2c::I2c;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const REG_MODE1: u8 = 0x00;
const REG_PRESCALE: u8 = 0xfe;
const REG_LED0_ON_L: u8 = 0x06;

const MODE1_SLEEP: u8 = 0x10;
const MODE1_AUTO_INCREMENT: u8 = 0x20;
const MODE1_RESTART: u8 = 0x80;

const OSCILLATOR_HZ: f64 = 25_000_000.0;
const COUNTS_PER_CYCLE: f64 = 4096.0;

const NEUTRAL_PULSE_US: f32 = 1500.0;
const PULSE_RANGE_US: f32 = 750.0;

fn write_register(bus: &mut I2c, register: u8, value: u8) -> Result<(), BackendError> {
    bus.smbus_write_byte(register, value)
        .map_err(|e| BackendError::Init(e.to_string()))
}

/// PCA9685-backed duty sink. One instance per hat.
pub struct Pca9685Backend {
    bus: Mutex<I2c>,
    frequency_hz: f64,
}

impl Pca9685Backend {
    /// Opens the I2C bus, selects the hat and programs the PWM frequency.
    pub fn new(address: u16, frequency_hz: f64) -> Result<Self, BackendError> {
        info!(
            "initializing PCA9685 at 0x{:02x}, {} Hz",
            address, frequency_hz
        );
        let mut bus = I2c::new().map_err(|e| BackendError::Init(e.to_string()))?;
        bus.set_slave_address(address)
            .map_err(|e| BackendError::Init(e.to_string()))?;

        let prescale = (OSCILLATOR_HZ / (COUNTS_PER_CYCLE * frequency_hz)).round() as u8 - 1;
        debug!("PCA9685 prescale value {}", prescale);

        // Prescale is only writable while the chip sleeps.
        write_register(&mut bus, REG_MODE1, MODE1_SLEEP)?;
        write_register(&mut bus, REG_PRESCALE, prescale)?;
        write_register(&mut bus, REG_MODE1, MODE1_AUTO_INCREMENT)?;
        thread::sleep(Duration::from_micros(500));
        write_register(&mut bus, REG_MODE1, MODE1_RESTART | MODE1_AUTO_INCREMENT)?;

        Ok(Self {
            bus: Mutex::new(bus),
            frequency_hz,
        })
    }

    fn duty_counts(&self, value: f32) -> u16 {
        let pulse_us = NEUTRAL_PULSE_US + value.clamp(-1.0, 1.0) * PULSE_RANGE_US;
        let counts =
            (pulse_us as f64 / 1_000_000.0) * self.frequency_hz * COUNTS_PER_CYCLE;
        counts.round().min(COUNTS_PER_CYCLE - 1.0) as u16
    }
}

impl PwmBackend for Pca9685Backend {
    fn set_duty(&self, channel: u8, value: f32) -> Result<(), BackendError> {
        let off = self.duty_counts(value);
        let base = REG_LED0_ON_L + 4 * channel;
        let frame = [0x00, 0x00, (off & 0xff) as u8, (off >> 8) as u8];

        let mut bus = self.bus.lock();
        bus.block_write(base, &frame)
            .map_err(|e| BackendError::Transfer(e.to_string()))
    }
}
