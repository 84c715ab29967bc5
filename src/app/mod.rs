//! Application core — control loop orchestration and shared state.
//!
//! All interaction with devices, files, and the logger happens through the
//! **port traits** in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod shared;
pub mod store;
