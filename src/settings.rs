//! Persistent settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the dictionary path.
pub const DICTIONARY_ENV: &str = "AARON_DICTIONARY";

const MAX_RECENT_FILES: usize = 10;

/// Settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON array of known names, used to resolve identifiers.
    pub dictionary_path: Option<PathBuf>,
    /// Place each bound at its own pivot instead of parent pivot + offset.
    pub use_pivot: bool,
    /// Appended to the source path when saving without an explicit target.
    pub save_suffix: String,
    /// Most recent first.
    pub recent_files: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary_path: None,
            use_pivot: true,
            save_suffix: "_saved.json".to_string(),
            recent_files: Vec::new(),
        }
    }
}

impl Settings {
    /// Settings file path in the user config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("aaron");
            p.push("settings.json");
            p
        })
    }

    /// Load from the user config dir, falling back to defaults
    pub fn load() -> Self {
        Self::default_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load from `path`; unreadable or invalid files give defaults
    pub fn load_from(path: &Path) -> Self {
        let settings = std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok());
        if settings.is_none() && path.exists() {
            tracing::warn!("ignoring unreadable settings file {}", path.display());
        }
        settings.unwrap_or_default()
    }

    /// Save to the user config dir
    pub fn save(&self) -> crate::Result<()> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add file to recent files list (moves to top if already present)
    pub fn add_recent(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Where a document loaded from `source` is saved by default
    pub fn save_path_for(&self, source: &Path) -> PathBuf {
        let mut name = source.as_os_str().to_owned();
        name.push(&self.save_suffix);
        PathBuf::from(name)
    }
}

/// Per-run replacements for persisted settings (command line, environment).
/// They apply to one session and are never written back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub dictionary_path: Option<PathBuf>,
    pub use_pivot: Option<bool>,
}

impl Overrides {
    /// Overrides taken from the environment (`AARON_DICTIONARY`).
    pub fn from_env() -> Self {
        Self {
            dictionary_path: std::env::var_os(DICTIONARY_ENV).map(PathBuf::from),
            use_pivot: None,
        }
    }
}
