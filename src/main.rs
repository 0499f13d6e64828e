pub mod car;
pub mod config;
pub mod dataflow;
pub mod gamepad;
pub mod teleop;

use crate::car::{Car, PwmBackend};
use crate::config::TeleopConfig;
use crate::gamepad::{EventPump, Gamepad, JoystickDevice};
use crate::teleop::Teleop;
use color_eyre::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config = TeleopConfig::load();
    info!("joystick device: {}", config.device_path.display());

    let backend = build_backend(&config)?;
    let pad = Gamepad::new();
    let car = Car::new(backend, config.car_params());
    let teleop = Teleop::link(pad.clone(), car);

    // Fatal if the device node cannot be opened; nothing to drive without it.
    let device = JoystickDevice::open(&config.device_path)?;

    let shutdown = CancellationToken::new();
    let pump_token = shutdown.clone();
    let mut pump_task = tokio::task::spawn_blocking(move || {
        let mut pump = EventPump::create(device, pad, pump_token).start();
        pump.run()
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            shutdown.cancel();
        }
        result = &mut pump_task => {
            match result {
                Ok(Ok(())) => info!("event pump finished"),
                Ok(Err(e)) => error!("event pump failed: {}", e),
                Err(e) => error!("event pump task panicked: {}", e),
            }
        }
    }

    // Actuators back to rest on every exit path.
    teleop.neutral();
    info!("steering and throttle neutralized, exiting");

    // The pump thread may still be parked in a blocking device read, which
    // would keep the runtime from shutting down; leave without waiting for it.
    std::process::exit(0);
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

#[cfg(feature = "pca9685")]
fn build_backend(config: &TeleopConfig) -> Result<Arc<dyn PwmBackend>> {
    use crate::car::Pca9685Backend;
    let backend = Pca9685Backend::new(config.i2c.address, config.i2c.frequency_hz)?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "pca9685"))]
fn build_backend(_config: &TeleopConfig) -> Result<Arc<dyn PwmBackend>> {
    use crate::car::LogBackend;
    info!("pca9685 feature disabled, logging duty cycles instead of driving hardware");
    Ok(Arc::new(LogBackend))
}
