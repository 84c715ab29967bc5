//! Mock adapters for integration tests.
//!
//! Every mock keeps its observable state behind an `Arc` so a clone can stay
//! with the test while the original moves into the control loop thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use ventcontrol::app::events::AppEvent;
use ventcontrol::app::ports::{ConfigPort, EventSink, SensorPort};
use ventcontrol::config::Settings;
use ventcontrol::control::SensorReading;
use ventcontrol::error::ConfigError;

// ── ScriptedSensor ────────────────────────────────────────────

/// Replays queued readings; repeats the last one when the queue runs dry.
#[derive(Clone)]
pub struct ScriptedSensor {
    queue: Arc<Mutex<VecDeque<SensorReading>>>,
    last: SensorReading,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new(readings: impl IntoIterator<Item = SensorReading>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(readings.into_iter().collect())),
            last: SensorReading::default(),
        }
    }

    pub fn constant(reading: SensorReading) -> Self {
        Self::new([reading])
    }

    pub fn push(&self, reading: SensorReading) {
        self.queue.lock().unwrap().push_back(reading);
    }
}

impl SensorPort for ScriptedSensor {
    fn read(&mut self) -> SensorReading {
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            self.last = next;
        }
        self.last
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ── MemConfigPort ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemConfigPort {
    pub stored: Arc<Mutex<Option<Settings>>>,
    pub saves: Arc<AtomicU32>,
    pub fail_saves: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MemConfigPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Option<Settings> {
        *self.stored.lock().unwrap()
    }

    pub fn saves(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigPort for MemConfigPort {
    fn load(&self) -> Result<Settings, ConfigError> {
        self.stored().ok_or(ConfigError::NotFound)
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ConfigError::Io(std::io::ErrorKind::PermissionDenied));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(*settings);
        Ok(())
    }
}

// ── Fixtures ──────────────────────────────────────────────────

#[allow(dead_code)]
pub fn reading(temperature: f32, humidity: f32, co2: f32, airflow: f32) -> SensorReading {
    SensorReading {
        temperature,
        humidity,
        co2,
        airflow,
    }
}
