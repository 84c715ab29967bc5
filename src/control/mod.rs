//! Control core: cycle values and the pure decision rules.

pub mod decision;
pub mod state;

pub use decision::{Decision, decide};
pub use state::{ActuatorState, SensorReading, Transition};
