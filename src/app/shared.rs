//! Shared state between the control loop and the status interface.
//!
//! One [`SharedState`] is created at startup, wrapped in an `Arc`, and handed
//! to both the loop thread and the HTTP handlers. There is no global.
//!
//! Each shared value (settings, latest reading, actuator state) sits behind
//! its own mutex, held only for a copy or an assignment. When more than one
//! is needed at once the locks are always taken in the order
//! settings → reading → actuators, which is what makes [`snapshot`] and
//! [`publish`] consistent with each other.
//!
//! [`snapshot`]: SharedState::snapshot
//! [`publish`]: SharedState::publish

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::config::Settings;
use crate::control::{ActuatorState, SensorReading};

use super::store::ConfigStore;

/// Lock a mutex guarding plain data. A panic in another holder cannot leave
/// a `Copy` value half-written, so poisoning is ignored.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Consistent view of everything the status interface reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub sensor_data: SensorReading,
    pub state: ActuatorState,
    pub settings: Settings,
}

/// Loop liveness figures for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopHealth {
    pub running: bool,
    pub cycles: u64,
    pub sensor_degraded: bool,
}

pub struct SharedState {
    config: ConfigStore,
    reading: Mutex<SensorReading>,
    actuators: Mutex<ActuatorState>,
    running: AtomicBool,
    cycles: AtomicU64,
    sensor_degraded: AtomicBool,
}

impl SharedState {
    pub fn new(config: ConfigStore) -> Self {
        Self {
            config,
            reading: Mutex::new(SensorReading::default()),
            actuators: Mutex::new(ActuatorState::all_off()),
            running: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
            sensor_degraded: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn settings(&self) -> Settings {
        self.config.settings()
    }

    pub fn reading(&self) -> SensorReading {
        *lock(&self.reading)
    }

    pub fn actuators(&self) -> ActuatorState {
        *lock(&self.actuators)
    }

    /// Replace the reading and the actuator state as one unit.
    pub fn publish(&self, reading: SensorReading, state: ActuatorState) {
        let mut r = lock(&self.reading);
        let mut a = lock(&self.actuators);
        *r = reading;
        *a = state;
    }

    /// Force every actuator to its off position.
    pub fn force_all_off(&self) {
        *lock(&self.actuators) = ActuatorState::all_off();
    }

    /// Copy all three shared values under their locks.
    pub fn snapshot(&self) -> SystemSnapshot {
        let settings = self.config.current_guard();
        let reading = lock(&self.reading);
        let actuators = lock(&self.actuators);
        SystemSnapshot {
            sensor_data: *reading,
            state: *actuators,
            settings: *settings,
        }
    }

    pub fn health(&self) -> LoopHealth {
        LoopHealth {
            running: self.running.load(Ordering::Acquire),
            cycles: self.cycles.load(Ordering::Acquire),
            sensor_degraded: self.sensor_degraded.load(Ordering::Acquire),
        }
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    pub(crate) fn record_cycle(&self, cycles: u64, sensor_degraded: bool) {
        self.cycles.store(cycles, Ordering::Release);
        self.sensor_degraded.store(sensor_degraded, Ordering::Release);
    }
}
