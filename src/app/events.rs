//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use std::time::Duration;

use crate::config::Settings;
use crate::control::{ActuatorState, SensorReading, Transition};

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop entered `Running`.
    Started { period: Duration, settings: Settings },

    /// One cycle completed and its result was published.
    Cycle {
        cycle: u64,
        reading: SensorReading,
        state: ActuatorState,
    },

    /// A single actuator changed its commanded value.
    ActuatorChanged(Transition),

    /// The sensor source fell back to a substitute reading.
    SensorDegraded,

    /// The sensor source is producing measurements again.
    SensorRecovered,

    /// Cleanup ran: actuators forced off and settings flushed.
    Stopped { cycles: u64, settings_flushed: bool },
}
