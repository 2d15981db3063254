//! Panel state persistence
//!
//! The host owns the panel state: an opaque JSON object that the engine
//! deserializes into a partial config on startup and writes back after every
//! mutation. This module provides:
//! - The on-disk state file format ([`PanelStateFile`])
//! - The persistence port used by the session ([`StateStore`]) with a file and
//!   an in-memory implementation
//! - Loading topic lists for the command line tool
//!
//! # App Data Location
//!
//! The default state file lives in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.refsig.panel/`
//! - **macOS**: `~/Library/Application Support/dev.refsig.panel/`
//! - **Windows**: `%APPDATA%\dev.refsig.panel\`
//!
//! # Example
//!
//! ```ignore
//! use refsig::config::{JsonFileStore, StateStore, VariantKind};
//!
//! let store = JsonFileStore::new("panel_state.json", VariantKind::Multi);
//! let state = store.load()?.unwrap_or_default();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{RefSigError, Result, ResultExt};
use crate::types::Topic;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.refsig.panel";

/// Default panel state filename
pub const STATE_FILE: &str = "panel_state.json";

/// Current state file format version
pub const STATE_FILE_VERSION: u32 = 1;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        RefSigError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            RefSigError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the default state file
pub fn default_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(STATE_FILE))
}

// ==================== Variant ====================

/// Which configuration schema a state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    #[default]
    Multi,
    Single,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Multi => "multi",
            VariantKind::Single => "single",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = RefSigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "multi" => Ok(VariantKind::Multi),
            "single" => Ok(VariantKind::Single),
            other => Err(RefSigError::Config(format!(
                "Unknown variant '{}' (expected multi or single)",
                other
            ))),
        }
    }
}

// ==================== State File ====================

/// On-disk panel state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelStateFile {
    /// Version for future migration support
    #[serde(default = "default_state_version")]
    pub version: u32,

    /// Schema of `state`
    #[serde(default)]
    pub variant: VariantKind,

    /// The host's opaque state, i.e. a (partial) serialized config
    #[serde(default)]
    pub state: serde_json::Value,
}

fn default_state_version() -> u32 {
    STATE_FILE_VERSION
}

impl PanelStateFile {
    pub fn new(variant: VariantKind, state: serde_json::Value) -> Self {
        Self {
            version: STATE_FILE_VERSION,
            variant,
            state,
        }
    }

    /// Load a state file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RefSigError::Config(format!("Failed to read state file {:?}: {}", path, e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            RefSigError::Config(format!("Failed to parse state file {:?}: {}", path, e))
        })
    }

    /// Load a state file, falling back to an empty state of `variant`
    pub fn load_or_default(path: impl AsRef<Path>, variant: VariantKind) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::new(variant, serde_json::Value::Null);
        }

        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load panel state, using defaults: {}", e);
            Self::new(variant, serde_json::Value::Null)
        })
    }

    /// Save the state file as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RefSigError::Config(format!("Failed to create state directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RefSigError::Config(format!("Failed to serialize state: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            RefSigError::Config(format!("Failed to write state file {:?}: {}", path, e))
        })
    }
}

// ==================== State Store ====================

/// Persistence port for the panel state
#[cfg_attr(test, mockall::automock)]
pub trait StateStore {
    /// Stored state, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<serde_json::Value>>;

    /// Replace the stored state
    fn save(&mut self, state: &serde_json::Value) -> Result<()>;
}

/// Stores the panel state in a [`PanelStateFile`]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    variant: VariantKind,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, variant: VariantKind) -> Self {
        Self {
            path: path.into(),
            variant,
        }
    }

    /// Store at the default location in the app data directory
    pub fn at_default_location(variant: VariantKind) -> Result<Self> {
        let dir = ensure_app_data_dir()?;
        Ok(Self::new(dir.join(STATE_FILE), variant))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<serde_json::Value>> {
        if !self.path.exists() {
            tracing::debug!("No panel state at {:?}", self.path);
            return Ok(None);
        }

        let file = PanelStateFile::load(&self.path)?;
        if file.variant != self.variant {
            return Err(RefSigError::Config(format!(
                "State file {:?} holds a {} config, expected {}",
                self.path, file.variant, self.variant
            )));
        }
        Ok(Some(file.state))
    }

    fn save(&mut self, state: &serde_json::Value) -> Result<()> {
        PanelStateFile::new(self.variant, state.clone()).save(&self.path)?;
        tracing::debug!("Saved panel state to {:?}", self.path);
        Ok(())
    }
}

/// Keeps the panel state in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<serde_json::Value>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: serde_json::Value) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    pub fn state(&self) -> Option<&serde_json::Value> {
        self.state.as_ref()
    }

    /// Number of saves so far
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<serde_json::Value>> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &serde_json::Value) -> Result<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}

// ==================== Topics ====================

#[derive(Deserialize)]
#[serde(untagged)]
enum TopicsFile {
    List(Vec<Topic>),
    Table { topics: Vec<Topic> },
}

impl From<TopicsFile> for Vec<Topic> {
    fn from(file: TopicsFile) -> Self {
        match file {
            TopicsFile::List(topics) | TopicsFile::Table { topics } => topics,
        }
    }
}

/// Parse a topic list
///
/// JSON may be a bare array or `{"topics": [...]}`; TOML uses `[[topics]]`.
pub fn parse_topics(content: &str, toml_format: bool) -> Result<Vec<Topic>> {
    let file: TopicsFile = if toml_format {
        toml::from_str(content).map_err(|e| RefSigError::Serialization(e.to_string()))?
    } else {
        serde_json::from_str(content)?
    };
    Ok(file.into())
}

/// Load a topic list, choosing the format from the file extension
pub fn load_topics(path: impl AsRef<Path>) -> Result<Vec<Topic>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(RefSigError::from)
        .with_context(|| format!("Failed to read topics file {:?}", path))?;

    let toml_format = path.extension().is_some_and(|ext| ext == "toml");
    let topics = parse_topics(&content, toml_format)
        .with_context(|| format!("Failed to parse topics file {:?}", path))?;

    tracing::debug!("Loaded {} topic(s) from {:?}", topics.len(), path);
    Ok(topics)
}
