//! Teleoperation configuration
//!
//! Loaded from `~/.config/jetcar/config.toml` when present. Missing or
//! unparsable configuration degrades to the built-in defaults with a warning
//! rather than preventing startup; the defaults match the deployed car.
//! There is no runtime reconfiguration, the values are read once at startup.

use crate::car::{CarParams, MotorParams};
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_DIR: &str = "jetcar";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TeleopConfig {
    /// Joystick device node to read events from.
    pub device_path: PathBuf,
    pub steering: SteeringConfig,
    pub throttle: ThrottleConfig,
    pub i2c: I2cConfig,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct SteeringConfig {
    pub gain: f32,
    pub offset: f32,
    /// PWM backend channel index.
    pub channel: u8,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ThrottleConfig {
    pub gain: f32,
    /// Hard forward cap on the physical duty, after gain.
    pub max_forward: f32,
    /// Hard reverse cap (negative), after gain.
    pub max_backward: f32,
    /// PWM backend channel index.
    pub channel: u8,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct I2cConfig {
    pub address: u16,
    pub frequency_hz: f64,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from("/dev/input/js0"),
            steering: SteeringConfig::default(),
            throttle: ThrottleConfig::default(),
            i2c: I2cConfig::default(),
        }
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            gain: -0.65,
            offset: 0.08,
            channel: 0,
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            gain: 0.25,
            max_forward: 0.15,
            max_backward: -0.25,
            channel: 1,
        }
    }
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            address: 0x40,
            frequency_hz: 60.0,
        }
    }
}

impl TeleopConfig {
    /// Loads the user configuration, falling back to defaults on any
    /// problem. Startup must succeed even with a missing or broken file.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(config) => {
                debug!("loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("using default configuration ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Loads and parses one specific file; errors instead of falling back.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| eyre!("failed to read config file: {}", e))?;
        toml::from_str(&content).map_err(|e| eyre!("failed to parse config file: {}", e))
    }

    fn default_path() -> PathBuf {
        let mut base = dirs::config_dir().unwrap_or_else(|| {
            warn!("could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        base.push(CONFIG_DIR);
        base.push(CONFIG_FILE);
        base
    }

    /// Shaping and channel parameters for the car, derived from this config.
    pub fn car_params(&self) -> CarParams {
        CarParams {
            steering: MotorParams {
                gain: self.steering.gain,
                offset: self.steering.offset,
                min_physical: f32::NEG_INFINITY,
                max_physical: f32::INFINITY,
            },
            throttle: MotorParams {
                gain: self.throttle.gain,
                offset: 0.0,
                min_physical: self.throttle.max_backward,
                max_physical: self.throttle.max_forward,
            },
            steering_channel: self.steering.channel,
            throttle_channel: self.throttle.channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_car() {
        let config = TeleopConfig::default();
        assert_eq!(config.device_path, PathBuf::from("/dev/input/js0"));
        assert_eq!(config.steering.gain, -0.65);
        assert_eq!(config.steering.offset, 0.08);
        assert_eq!(config.throttle.gain, 0.25);
        assert_eq!(config.throttle.max_forward, 0.15);
        assert_eq!(config.throttle.max_backward, -0.25);
        assert_eq!(config.i2c.address, 0x40);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: TeleopConfig = toml::from_str(
            r#"
            device_path = "/dev/input/js1"

            [throttle]
            gain = 0.3
            "#,
        )
        .unwrap();
        assert_eq!(config.device_path, PathBuf::from("/dev/input/js1"));
        assert_eq!(config.throttle.gain, 0.3);
        assert_eq!(config.throttle.max_forward, 0.15);
        assert_eq!(config.steering, SteeringConfig::default());
    }

    #[test]
    fn car_params_carry_the_asymmetric_envelope() {
        let params = TeleopConfig::default().car_params();
        assert_eq!(params.throttle.min_physical, -0.25);
        assert_eq!(params.throttle.max_physical, 0.15);
        assert_eq!(params.steering.max_physical, f32::INFINITY);
        assert_eq!(params.steering_channel, 0);
        assert_eq!(params.throttle_channel, 1);
    }
}
