//! Gamepad subsystem: joydev protocol and input state
//!
//! Implements the device side of the pipeline:
//!
//! 1. [`device`] - joystick device handle, capability negotiation, event stream
//! 2. [`wire`] - fixed 8-byte joydev record layout
//! 3. [`names`] - kernel axis/button code tables
//! 4. [`decoder`] - record + capability map -> semantic channel updates
//! 5. [`pad`] - reactive input channels and derived steering/throttle
//! 6. [`collector`] - blocking ingestion loop feeding the pad
//!
//! # Architecture
//!
//! ```text
//! /dev/input/js0 ──► EventStream ──► decode ──► Gamepad channels
//!                    (RawEvent)     (updates)   (observer fan-out)
//! ```

pub mod collector;
pub mod decoder;
pub mod device;
pub mod names;
pub mod pad;
pub mod wire;

pub use collector::{EventPump, PumpError};
pub use decoder::{decode, normalize_axis, ChannelUpdate};
pub use device::{CapabilityMap, DeviceError, EventStream, JoystickDevice};
pub use pad::Gamepad;
pub use wire::RawEvent;
