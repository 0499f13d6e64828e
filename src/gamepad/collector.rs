//! Blocking ingestion loop feeding the pad channels
//!
//! One worker owns the device handle and performs read -> decode -> apply
//! synchronously per record; every channel write and the whole observer
//! fan-out happen on this thread. Run it on a blocking task, next to the
//! async control context that reads committed values and issues the final
//! neutral write on shutdown.
//!
//! Shutdown is cooperative via a [`CancellationToken`] checked between
//! events. There is no timeout on the blocking device read itself, so a
//! frozen device stalls the loop until the process exits.

use crate::gamepad::decoder::decode;
use crate::gamepad::device::{DeviceError, JoystickDevice};
use crate::gamepad::pad::Gamepad;
use chrono::Local;
use statum::{machine, state, transition};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Ingestion lifecycle states.
#[state]
#[derive(Debug, Clone)]
pub enum PumpState {
    Initializing,
    Streaming,
}

/// Event pump with compile-time state safety via statum.
///
/// Created around an already-negotiated device, transitions to Streaming and
/// then loops until disconnect or cancellation.
#[machine]
#[derive(Debug)]
pub struct EventPump<PumpState> {
    device: JoystickDevice,
    pad: Gamepad,
    shutdown: CancellationToken,
}

impl EventPump<Initializing> {
    pub fn create(device: JoystickDevice, pad: Gamepad, shutdown: CancellationToken) -> Self {
        info!(
            "creating event pump: {} axes, {} buttons",
            device.capabilities().axis_count(),
            device.capabilities().button_count()
        );
        Self::builder()
            .device(device)
            .pad(pad)
            .shutdown(shutdown)
            .build()
    }
}

#[transition]
impl EventPump<Initializing> {
    /// Transitions to the Streaming state.
    pub fn start(self) -> EventPump<Streaming> {
        info!("event pump entering streaming state");
        self.transition()
    }
}

impl EventPump<Streaming> {
    /// Reads one record, decodes it and applies the resulting updates.
    ///
    /// Returns the number of channel updates applied. Initial state-sync
    /// records are applied like live events; they seed the channels with the
    /// device's current positions.
    pub fn pump_next(&mut self) -> Result<usize, PumpError> {
        let raw = self.device.read_event()?;
        if raw.is_init() {
            debug!("state-sync record for index {}", raw.index);
        }

        let updates = decode(&raw, self.device.capabilities());
        for update in &updates {
            self.pad.apply(update);
        }
        Ok(updates.len())
    }

    /// Runs the ingestion loop until cancellation or disconnect.
    ///
    /// Disconnects propagate to the caller; reconnecting is the caller's
    /// decision, never attempted here.
    pub fn run(&mut self) -> Result<(), PumpError> {
        info!("starting gamepad event loop");

        let mut update_count: u64 = 0;
        let mut last_log_time = Local::now();
        let log_interval = chrono::Duration::seconds(10);

        while !self.shutdown.is_cancelled() {
            update_count += self.pump_next()? as u64;

            let now = Local::now();
            if now - last_log_time > log_interval {
                info!(
                    "event pump stats: {} channel updates in last {} seconds",
                    update_count,
                    log_interval.num_seconds()
                );
                update_count = 0;
                last_log_time = now;
            }
        }

        info!("event pump stopped by shutdown signal");
        Ok(())
    }
}
