//! Port traits — the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop / ConfigStore (domain)
//! ```
//!
//! Driven adapters (sensor sources, settings storage, event sinks) implement
//! these traits. The domain never touches a device, a file, or the logger
//! directly, so every piece can be exercised with mocks.

use crate::config::Settings;
use crate::control::SensorReading;
use crate::error::ConfigError;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Source of one [`SensorReading`] per control cycle.
///
/// Reads never fail. An adapter that cannot reach its device substitutes a
/// fallback reading and reports the condition through [`is_degraded`].
///
/// [`is_degraded`]: SensorPort::is_degraded
pub trait SensorPort {
    /// Produce the reading for this cycle.
    fn read(&mut self) -> SensorReading;

    /// True while the last reading was a fallback rather than a measurement.
    fn is_degraded(&self) -> bool {
        false
    }
}

impl<S: SensorPort + ?Sized> SensorPort for Box<S> {
    fn read(&mut self) -> SensorReading {
        (**self).read()
    }

    fn is_degraded(&self) -> bool {
        (**self).is_degraded()
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ durable settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the settings document.
///
/// `save` MUST replace the stored document atomically: a concurrent `load`
/// observes either the old or the new document, never a partial one.
pub trait ConfigPort {
    /// Load settings from durable storage.
    /// Returns [`ConfigError::NotFound`] if nothing has been stored yet.
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Persist settings, replacing any previous document.
    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The control loop emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
