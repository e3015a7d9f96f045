use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const PREFS_DIR: &str = "player_stats_terminal";
const PREFS_FILE: &str = "prefs.json";
const DARK_ENABLED: &str = "enabled";
const DARK_DISABLED: &str = "disabled";

/// Durable home of the dark-mode flag.
pub trait PreferenceStore: Send {
    fn load_dark_mode(&self) -> bool;
    fn save_dark_mode(&mut self, enabled: bool) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefsFile {
    #[serde(rename = "darkMode", default)]
    dark_mode: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the override when given, otherwise the XDG config location.
    pub fn at_default_path(override_path: Option<PathBuf>) -> Option<Self> {
        override_path.or_else(prefs_path).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load_dark_mode(&self) -> bool {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return false;
        };
        let Ok(prefs) = serde_json::from_str::<PrefsFile>(&raw) else {
            return false;
        };
        prefs.dark_mode.as_deref() == Some(DARK_ENABLED)
    }

    fn save_dark_mode(&mut self, enabled: bool) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("create prefs dir")?;
        }
        let prefs = PrefsFile {
            dark_mode: Some(if enabled { DARK_ENABLED } else { DARK_DISABLED }.to_string()),
        };
        let json = serde_json::to_string_pretty(&prefs).context("serialize prefs")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write prefs")?;
        fs::rename(&tmp, &self.path).context("swap prefs")?;
        Ok(())
    }
}

/// Process-local store for when no config directory can be resolved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    dark_mode: bool,
}

impl MemoryPreferenceStore {
    pub fn with_dark_mode(dark_mode: bool) -> Self {
        Self { dark_mode }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_dark_mode(&self) -> bool {
        self.dark_mode
    }

    fn save_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.dark_mode = enabled;
        Ok(())
    }
}

fn prefs_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(PREFS_DIR).join(PREFS_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".config").join(PREFS_DIR).join(PREFS_FILE))
}
