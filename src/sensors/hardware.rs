//! Hardware sensor adapter.
//!
//! [`HardwareSensor`] sits between a [`SensorDevice`] driver and the control
//! loop. A failed device read must not stop the loop, so the adapter returns
//! the last good reading instead (or [`FALLBACK_READING`] if there has never
//! been one), logs a warning, and reports itself degraded until the device
//! answers again.

use log::{info, warn};

use crate::app::ports::SensorPort;
use crate::control::SensorReading;
use crate::error::SensorError;

/// Substitute used before any successful read.
pub const FALLBACK_READING: SensorReading = SensorReading {
    temperature: 20.0,
    humidity: 50.0,
    co2: 400.0,
    airflow: 40.0,
};

/// Driver for the physical sensor package.
pub trait SensorDevice {
    fn sample(&mut self) -> Result<SensorReading, SensorError>;
}

/// Placeholder driver used while no sensor package is wired up.
/// Every sample reports [`SensorError::NotConnected`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDevice;

impl SensorDevice for NoDevice {
    fn sample(&mut self) -> Result<SensorReading, SensorError> {
        Err(SensorError::NotConnected)
    }
}

fn plausible(r: &SensorReading) -> bool {
    (-40.0..=85.0).contains(&r.temperature)
        && (0.0..=100.0).contains(&r.humidity)
        && (0.0..=40_000.0).contains(&r.co2)
        && r.airflow.is_finite()
        && r.airflow >= 0.0
}

pub struct HardwareSensor<D> {
    device: D,
    last_good: Option<SensorReading>,
    consecutive_failures: u32,
}

impl<D: SensorDevice> HardwareSensor<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            last_good: None,
            consecutive_failures: 0,
        }
    }

    /// Failed reads since the last good one.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    fn sample_checked(&mut self) -> Result<SensorReading, SensorError> {
        let reading = self.device.sample()?;
        if plausible(&reading) {
            Ok(reading)
        } else {
            Err(SensorError::OutOfRange)
        }
    }
}

impl<D: SensorDevice> SensorPort for HardwareSensor<D> {
    fn read(&mut self) -> SensorReading {
        match self.sample_checked() {
            Ok(reading) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "Sensor device recovered after {} failed reads",
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                self.last_good = Some(reading);
                reading
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let fallback = self.last_good.unwrap_or(FALLBACK_READING);
                warn!(
                    "Sensor read failed ({}), using {} reading (failure #{})",
                    e,
                    if self.last_good.is_some() {
                        "last good"
                    } else {
                        "fallback"
                    },
                    self.consecutive_failures
                );
                fallback
            }
        }
    }

    fn is_degraded(&self) -> bool {
        self.consecutive_failures > 0
    }
}
