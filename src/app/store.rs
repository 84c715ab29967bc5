//! Live settings with write-through persistence.
//!
//! [`ConfigStore`] owns the in-memory [`Settings`] and a [`ConfigPort`] to
//! persist them. Two locks are involved:
//!
//! - `current` guards the value itself and is held only for a copy or an
//!   assignment, so the control loop never waits on file I/O.
//! - `writer` serializes mutations (merge → validate → assign → persist), so
//!   the stored document always matches the most recent in-memory value.
//!
//! A failed save leaves the in-memory value authoritative and marks the store
//! as pending. The next mutation or the shutdown flush writes it again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use log::{error, info, warn};

use crate::config::{Settings, SettingsPatch};
use crate::error::ConfigError;

use super::ports::ConfigPort;
use super::shared::lock;

pub struct ConfigStore {
    current: Mutex<Settings>,
    writer: Mutex<()>,
    port: Box<dyn ConfigPort + Send + Sync>,
    persist_pending: AtomicBool,
}

/// Load settings through `port`, substituting defaults on any failure.
pub fn load_or_default(port: &dyn ConfigPort) -> Settings {
    match port.load() {
        Ok(settings) => {
            info!("Settings loaded from storage");
            settings
        }
        Err(ConfigError::NotFound) => {
            info!("No stored settings, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!("Settings load failed ({}), using defaults", e);
            Settings::default()
        }
    }
}

impl ConfigStore {
    /// Build the store from whatever `port` currently holds (or defaults).
    pub fn open(port: impl ConfigPort + Send + Sync + 'static) -> Self {
        let settings = load_or_default(&port);
        Self::with_settings(port, settings)
    }

    /// Build the store with explicit initial settings. Nothing is loaded or
    /// saved.
    pub fn with_settings(port: impl ConfigPort + Send + Sync + 'static, settings: Settings) -> Self {
        Self {
            current: Mutex::new(settings),
            writer: Mutex::new(()),
            port: Box::new(port),
            persist_pending: AtomicBool::new(false),
        }
    }

    /// Copy of the live settings.
    pub fn settings(&self) -> Settings {
        *lock(&self.current)
    }

    pub(crate) fn current_guard(&self) -> MutexGuard<'_, Settings> {
        lock(&self.current)
    }

    /// Merge `patch` into the live settings, validate, and persist.
    ///
    /// Validation failures leave both the live and the stored settings
    /// untouched. A persistence failure is logged and does not fail the
    /// call: the new settings are live and will be written again later.
    pub fn apply_patch(&self, patch: &SettingsPatch) -> Result<Settings, ConfigError> {
        let _writer = lock(&self.writer);

        let merged = patch.apply_to(&self.settings());
        merged.validate()?;
        *lock(&self.current) = merged;

        if patch.is_empty() {
            info!("Settings patch was empty; re-persisting current settings");
        } else {
            info!("Settings updated: {:?}", merged);
        }
        let _ = self.persist(&merged);
        Ok(merged)
    }

    /// Persist the live settings unconditionally.
    pub fn flush(&self) -> Result<(), ConfigError> {
        let _writer = lock(&self.writer);
        let settings = self.settings();
        self.persist(&settings)
    }

    /// Whether the last save attempt failed.
    pub fn persist_pending(&self) -> bool {
        self.persist_pending.load(Ordering::Acquire)
    }

    fn persist(&self, settings: &Settings) -> Result<(), ConfigError> {
        match self.port.save(settings) {
            Ok(()) => {
                self.persist_pending.store(false, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                self.persist_pending.store(true, Ordering::Release);
                error!("Settings save failed ({}); keeping in-memory settings", e);
                Err(e)
            }
        }
    }
}
