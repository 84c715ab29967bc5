//! VentControl — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  SimulatedSensor   JsonFileStore   LogEventSink   axum   │
//! │  HardwareSensor    (ConfigPort)    (EventSink)    HTTP   │
//! │  (SensorPort)                                            │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ─────────────────  │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ ControlLoop (own thread) ─▶ decide() ─▶ SharedState│  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Shutdown: SIGINT/SIGTERM stops the HTTP server, then the loop is told
//! to stop; its cleanup path forces all actuators off and flushes settings.
#![deny(unused_must_use)]

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use log::{error, info, warn};
use tokio::net::TcpListener;

use ventcontrol::adapters::file_store::JsonFileStore;
use ventcontrol::adapters::http;
use ventcontrol::adapters::log_sink::LogEventSink;
use ventcontrol::adapters::logging;
use ventcontrol::app::service::{ControlLoop, stop_channel};
use ventcontrol::app::shared::SharedState;
use ventcontrol::app::store::ConfigStore;
use ventcontrol::config::RuntimeConfig;
use ventcontrol::sensors;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Runtime configuration + logging ────────────────────
    let (runtime, env_warnings) = RuntimeConfig::from_env();
    if let Some(e) = logging::init(&runtime.log_path)? {
        warn!(
            "Cannot open log file {} ({}), logging to console only",
            runtime.log_path.display(),
            e
        );
    }
    for w in env_warnings {
        warn!("{}", w);
    }
    info!("VentControl v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Settings (load or defaults) + shared state ─────────
    let store = ConfigStore::open(JsonFileStore::new(&runtime.settings_path));
    let shared = Arc::new(SharedState::new(store));

    // ── 3. Signal handlers, before anything needs cleaning up ─
    let shutdown = shutdown_signal().context("installing signal handlers")?;

    // ── 4. Control loop on its own thread ─────────────────────
    info!("Sensor mode: {:?}", runtime.sensor_mode);
    let sensor = sensors::build(runtime.sensor_mode);
    let (stop, stop_signal) = stop_channel();
    let mut control = ControlLoop::new(
        sensor,
        LogEventSink::new(),
        Arc::clone(&shared),
        runtime.cycle_period,
    );
    let loop_thread = thread::Builder::new()
        .name("control-loop".into())
        .spawn(move || control.run(&stop_signal))
        .context("spawning control loop thread")?;

    // ── 5. Status interface until a shutdown signal ───────────
    let served = match TcpListener::bind(runtime.bind_addr).await {
        Ok(listener) => http::serve(listener, Arc::clone(&shared), shutdown)
            .await
            .context("status interface failed"),
        Err(e) => Err(anyhow!(e).context(format!("binding {}", runtime.bind_addr))),
    };
    if let Err(e) = &served {
        error!("{:#}", e);
    }

    // ── 6. Cleanup path: always stop the loop and wait for it ─
    info!("Shutting down");
    stop.stop();
    tokio::task::spawn_blocking(move || loop_thread.join())
        .await?
        .map_err(|_| anyhow!("control loop thread panicked"))?;

    served?;
    info!("Shutdown complete");
    Ok(())
}

/// Install the interrupt and terminate handlers now and return a future
/// that resolves on the first signal. Signals that arrive before the future
/// is first polled are not lost.
#[cfg(unix)]
fn shutdown_signal() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("Interrupt received"),
            _ = terminate.recv() => info!("Terminate signal received"),
        }
    })
}

/// Resolves on Ctrl-C.
#[cfg(not(unix))]
fn shutdown_signal() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    let ctrl_c = tokio::signal::ctrl_c();
    Ok(async move {
        match ctrl_c.await {
            Ok(()) => info!("Interrupt received"),
            Err(e) => {
                error!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    })
}
