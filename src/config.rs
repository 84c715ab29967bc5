//! Controller configuration.
//!
//! Two layers live here:
//!
//! - [`Settings`]: the tunable thresholds the decision rules run against.
//!   Persisted as a JSON document and patched at runtime through the
//!   status interface with a [`SettingsPatch`].
//! - [`RuntimeConfig`]: process-level knobs (bind address, file paths, cycle
//!   period, sensor mode) read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Tunable controller thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Temperature setpoint (°C).
    pub target_temp: f32,
    /// Relative humidity setpoint (%).
    pub target_humidity: f32,
    /// CO₂ concentration above which the fan is boosted (ppm).
    pub co2_limit: f32,
    /// Airflow below which the fan is boosted.
    pub min_airflow: f32,
    /// Master enable for the heat-recovery unit.
    pub recuperator_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_temp: 22.0,
            target_humidity: 50.0,
            co2_limit: 800.0,
            min_airflow: 30.0,
            recuperator_enabled: true,
        }
    }
}

fn check(value: f32, msg: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(msg))
    }
}

impl Settings {
    /// Reject NaN and infinite values. Any finite value is accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(self.target_temp, "target_temp must be finite")?;
        check(self.target_humidity, "target_humidity must be finite")?;
        check(self.co2_limit, "co2_limit must be finite")?;
        check(self.min_airflow, "min_airflow must be finite")?;
        Ok(())
    }

    /// Parse a stored settings document. All five fields are required.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        json_object(bytes).map_err(ConfigError::Corrupted)
    }
}

/// Deserialize `bytes` only if they hold a JSON object. The derived
/// deserializers would otherwise also map an array onto fields by position.
fn json_object<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    if value.is_object() {
        return serde_json::from_value(value).map_err(|e| e.to_string());
    }
    let kind = match value {
        Value::Object(_) => "an object",
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
    };
    Err(format!("expected a JSON object, got {kind}"))
}

/// A partial settings document. Absent (or `null`) fields are left as they
/// are; unknown fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub target_temp: Option<f32>,
    pub target_humidity: Option<f32>,
    pub co2_limit: Option<f32>,
    pub min_airflow: Option<f32>,
    pub recuperator_enabled: Option<bool>,
}

impl SettingsPatch {
    /// Parse a patch from a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, ConfigError> {
        json_object(body).map_err(ConfigError::MalformedPatch)
    }

    /// True if the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the provided fields over `base`. Does not validate.
    pub fn apply_to(&self, base: &Settings) -> Settings {
        Settings {
            target_temp: self.target_temp.unwrap_or(base.target_temp),
            target_humidity: self.target_humidity.unwrap_or(base.target_humidity),
            co2_limit: self.co2_limit.unwrap_or(base.co2_limit),
            min_airflow: self.min_airflow.unwrap_or(base.min_airflow),
            recuperator_enabled: self.recuperator_enabled.unwrap_or(base.recuperator_enabled),
        }
    }
}

// ---------------------------------------------------------------------------
// Process configuration
// ---------------------------------------------------------------------------

/// Which sensor source the control loop is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorMode {
    /// Noise-generating simulator.
    #[default]
    Simulated,
    /// Physical sensor device.
    Hardware,
}

impl FromStr for SensorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Ok(Self::Simulated),
            "hardware" | "hw" => Ok(Self::Hardware),
            other => Err(format!("unknown sensor mode '{other}'")),
        }
    }
}

/// Process-level configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Address the status interface listens on.
    pub bind_addr: SocketAddr,
    /// Durable settings document.
    pub settings_path: PathBuf,
    /// Persistent log destination (the console always gets a copy).
    pub log_path: PathBuf,
    /// Sleep between control cycles.
    pub cycle_period: Duration,
    pub sensor_mode: SensorMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            settings_path: PathBuf::from("settings.json"),
            log_path: PathBuf::from("ventilation.log"),
            cycle_period: Duration::from_secs(10),
            sensor_mode: SensorMode::Simulated,
        }
    }
}

pub const ENV_BIND: &str = "VENT_BIND";
pub const ENV_SETTINGS_PATH: &str = "VENT_SETTINGS_PATH";
pub const ENV_LOG_PATH: &str = "VENT_LOG_PATH";
pub const ENV_CYCLE_SECS: &str = "VENT_CYCLE_SECS";
pub const ENV_SENSOR_MODE: &str = "VENT_SENSOR_MODE";

impl RuntimeConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup.
    ///
    /// Invalid values fall back to the default for that key. The returned
    /// messages describe each fallback; they are logged once the logger is up.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut cfg = Self::default();
        let mut warnings = Vec::new();

        if let Some(raw) = lookup(ENV_BIND) {
            match raw.parse::<SocketAddr>() {
                Ok(addr) => cfg.bind_addr = addr,
                Err(e) => warnings.push(format!("{ENV_BIND}='{raw}' ignored: {e}")),
            }
        }
        if let Some(raw) = lookup(ENV_SETTINGS_PATH).filter(|s| !s.is_empty()) {
            cfg.settings_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_LOG_PATH).filter(|s| !s.is_empty()) {
            cfg.log_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_CYCLE_SECS) {
            match raw.parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => {
                    cfg.cycle_period = Duration::from_secs_f64(secs);
                }
                _ => warnings.push(format!(
                    "{ENV_CYCLE_SECS}='{raw}' ignored: expected a positive number of seconds"
                )),
            }
        }
        if let Some(raw) = lookup(ENV_SENSOR_MODE) {
            match raw.parse::<SensorMode>() {
                Ok(mode) => cfg.sensor_mode = mode,
                Err(e) => warnings.push(format!("{ENV_SENSOR_MODE} ignored: {e}")),
            }
        }

        (cfg, warnings)
    }
}
