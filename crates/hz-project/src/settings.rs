//! Persistence of user-tunable values across restarts.
//!
//! The engine itself never touches disk; the embedder loads these settings
//! at startup and replays them through the controller's setters, and saves
//! them whenever the user adjusts a value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProjectResult;

/// User-adjustable values that outlive a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Per-zone floor-area edits (zone key -> m²).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub floor_area_overrides: BTreeMap<String, f64>,
    #[serde(default)]
    pub preheat_enabled: bool,
    /// Armed preheat deadline, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheat_end: Option<DateTime<Utc>>,
    /// User-selected discharge zone key, overriding the installation file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_zone: Option<String>,
}

/// JSON-file-backed store for [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Conventional location next to an installation file.
    pub fn for_installation(installation_path: &Path) -> Self {
        let dir = installation_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(dir.join(".hydrozone").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored settings; a missing file yields the defaults.
    pub fn load(&self) -> ProjectResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, settings: &Settings) -> ProjectResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
