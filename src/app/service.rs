//! Control loop — the periodic sense → decide → publish → log cycle.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │      ControlLoop        │
//!  SharedState ◀─▶│  decide() · publish     │
//!                 └────────────────────────┘
//! ```
//!
//! Two states: `Running` from construction, `Stopped` after [`shutdown`].
//! `Stopped` is terminal. Whatever ends the loop, shutdown forces every
//! actuator off and flushes the live settings to storage. Dropping the loop
//! runs shutdown too, so a panic on the loop thread still unwinds through
//! the cleanup path.
//!
//! Timing is not drift-compensated: the loop sleeps the full period after
//! each cycle completes, so the observed period is the configured period
//! plus the time the cycle itself took.
//!
//! [`shutdown`]: ControlLoop::shutdown

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use log::{info, warn};

use crate::control::decide;

use super::events::AppEvent;
use super::ports::{EventSink, SensorPort};
use super::shared::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

// ───────────────────────────────────────────────────────────────
// Stop signalling
// ───────────────────────────────────────────────────────────────

/// Requests a stop. Cloneable; any clone can stop the loop.
#[derive(Debug, Clone)]
pub struct StopHandle(Sender<()>);

impl StopHandle {
    pub fn stop(&self) {
        // The loop may already be gone; nothing to do then.
        let _ = self.0.send(());
    }
}

/// Receiving side, owned by the loop. Dropping every [`StopHandle`] also
/// counts as a stop request.
#[derive(Debug)]
pub struct StopSignal(Receiver<()>);

impl StopSignal {
    /// Non-blocking check.
    pub fn is_requested(&self) -> bool {
        !matches!(self.0.try_recv(), Err(TryRecvError::Empty))
    }

    /// Sleep for up to `period`. Returns `true` as soon as a stop arrives.
    pub fn wait(&self, period: Duration) -> bool {
        !matches!(self.0.recv_timeout(period), Err(RecvTimeoutError::Timeout))
    }
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (StopHandle(tx), StopSignal(rx))
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop<S: SensorPort, E: EventSink> {
    sensor: S,
    sink: E,
    shared: Arc<SharedState>,
    period: Duration,
    state: LoopState,
    cycles: u64,
    sensor_degraded: bool,
}

impl<S: SensorPort, E: EventSink> ControlLoop<S, E> {
    pub fn new(sensor: S, sink: E, shared: Arc<SharedState>, period: Duration) -> Self {
        Self {
            sensor,
            sink,
            shared,
            period,
            state: LoopState::Running,
            cycles: 0,
            sensor_degraded: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run cycles until `stop` fires, then shut down.
    pub fn run(&mut self, stop: &StopSignal) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.shared.set_running(true);
        self.sink.emit(&AppEvent::Started {
            period: self.period,
            settings: self.shared.settings(),
        });

        while self.state == LoopState::Running {
            if stop.is_requested() {
                break;
            }
            self.tick();
            if stop.wait(self.period) {
                break;
            }
        }

        info!("Stop requested after {} cycles", self.cycles);
        self.shutdown();
    }

    /// Execute one cycle. Does nothing once stopped.
    pub fn tick(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }

        // 1. Sense (no lock held)
        let reading = self.sensor.read();
        let degraded = self.sensor.is_degraded();
        if degraded != self.sensor_degraded {
            self.sensor_degraded = degraded;
            self.sink.emit(&if degraded {
                AppEvent::SensorDegraded
            } else {
                AppEvent::SensorRecovered
            });
        }

        // 2. Decide against copies of the shared values
        let settings = self.shared.settings();
        let previous = self.shared.actuators();
        let decision = decide(&reading, &settings, &previous);

        // 3. Publish
        self.shared.publish(reading, decision.state);
        self.cycles += 1;
        self.shared.record_cycle(self.cycles, degraded);

        // 4. Log
        self.sink.emit(&AppEvent::Cycle {
            cycle: self.cycles,
            reading,
            state: decision.state,
        });
        for t in decision.transitions {
            self.sink.emit(&AppEvent::ActuatorChanged(t));
        }
    }

    /// The single cleanup path: actuators off, settings flushed, `Stopped`.
    /// Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;

        self.shared.force_all_off();
        self.shared.set_running(false);

        let settings_flushed = match self.shared.config().flush() {
            Ok(()) => true,
            Err(e) => {
                warn!("Final settings flush failed: {}", e);
                false
            }
        };

        self.sink.emit(&AppEvent::Stopped {
            cycles: self.cycles,
            settings_flushed,
        });
    }
}

impl<S: SensorPort, E: EventSink> Drop for ControlLoop<S, E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
