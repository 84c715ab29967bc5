//! Sensor sources.
//!
//! Two implementations of [`SensorPort`]:
//!
//! - [`simulated::SimulatedSensor`] draws bounded noise around nominal
//!   indoor conditions.
//! - [`hardware::HardwareSensor`] wraps a [`hardware::SensorDevice`] driver
//!   and substitutes a fallback reading whenever the device fails.
//!
//! The mode is chosen once, at construction, by [`build`].

pub mod hardware;
pub mod simulated;

use crate::app::ports::SensorPort;
use crate::config::SensorMode;

use hardware::{HardwareSensor, NoDevice};
use simulated::SimulatedSensor;

/// Construct the sensor source for `mode`.
pub fn build(mode: SensorMode) -> Box<dyn SensorPort + Send> {
    match mode {
        SensorMode::Simulated => Box::new(SimulatedSensor::new()),
        SensorMode::Hardware => Box::new(HardwareSensor::new(NoDevice)),
    }
}
