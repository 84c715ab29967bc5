//! JSON file settings adapter.
//!
//! Implements [`ConfigPort`] over a single pretty-printed JSON document.
//!
//! - Validation: a loaded document must be a JSON object carrying all five
//!   fields with finite numbers; anything else is reported as an error so
//!   the caller falls back to defaults.
//! - Atomic writes: the document is written to a sibling `*.tmp` file,
//!   synced, then renamed over the target. A concurrent reader sees either
//!   the old or the new file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::ports::ConfigPort;
use crate::config::Settings;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigPort for JsonFileStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        let bytes = fs::read(&self.path)?;
        let settings = Settings::from_json(&bytes)?;
        settings.validate()?;
        debug!("JsonFileStore: loaded {}", self.path.display());
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;

        let tmp = self.tmp_path();
        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.write_all(b"\n")?;
            file.sync_all()
        };
        write_tmp()
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| ConfigError::Io(e.kind()))?;
        debug!("JsonFileStore: saved {}", self.path.display());
        Ok(())
    }
}
