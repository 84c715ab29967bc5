//! Values flowing through one control cycle.

use serde::Serialize;

/// A point-in-time sample of every sensor on the unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorReading {
    /// Supply air temperature (°C).
    pub temperature: f32,
    /// Relative humidity (%).
    pub humidity: f32,
    /// CO₂ concentration (ppm).
    pub co2: f32,
    /// Measured airflow through the unit.
    pub airflow: f32,
}

/// Commanded actuator positions.
///
/// The default value, everything off and the fan stopped, is also the
/// value forced on shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActuatorState {
    pub heating: bool,
    pub cooling: bool,
    pub humidifier: bool,
    /// Fan speed in percent (0–100).
    pub fan_speed: u8,
    pub recuperator: bool,
}

impl ActuatorState {
    /// All actuators off — safe default.
    pub fn all_off() -> Self {
        Self::default()
    }
}

/// A single actuator changing its commanded value, together with the
/// readings that caused it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Heating { on: bool, temperature: f32, target: f32 },
    Cooling { on: bool, temperature: f32, threshold: f32 },
    Humidifier { on: bool, humidity: f32, target: f32 },
    Fan { speed: u8, co2: f32, airflow: f32 },
    Recuperator { on: bool, temperature: f32 },
}
