//! Configuration loading.
//!
//! `config/settings.yml` is deep-merged with an optional
//! `config/settings.local.yml` before being deserialized, and
//! `config/sources.yml` supplies the feed list. The result is an immutable
//! [`AppConfig`] that callers pass to each component.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::{debug, warn};
use crate::types::SourceDescriptor;
use crate::{Error, Result};

pub const CONFIG_DIR: &str = "config";
pub const SETTINGS_FILE: &str = "settings.yml";
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.yml";
pub const SOURCES_FILE: &str = "sources.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub topics: Vec<String>,
    pub max_items_per_digest: usize,
    pub bedrock: BedrockSettings,
    pub weekly: WeeklySettings,
    pub storage: StorageSettings,
    pub slack: SlackSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            max_items_per_digest: 10,
            bedrock: BedrockSettings::default(),
            weekly: WeeklySettings::default(),
            storage: StorageSettings::default(),
            slack: SlackSettings::default(),
        }
    }
}

impl Settings {
    /// Model used by the weekly curator, falling back to the daily model.
    pub fn weekly_model_id(&self) -> &str {
        self.weekly
            .model_id
            .as_deref()
            .unwrap_or(&self.bedrock.model_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedrockSettings {
    pub region: String,
    pub model_id: String,
    pub max_tokens: u32,
    /// Overrides `https://bedrock-runtime.<region>.amazonaws.com`.
    pub endpoint: Option<String>,
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            model_id: "us.anthropic.claude-haiku-4-5-20251001-v1:0".to_string(),
            max_tokens: 4096,
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySettings {
    pub model_id: Option<String>,
    pub max_items: usize,
    pub lookback_days: u32,
}

impl Default for WeeklySettings {
    fn default() -> Self {
        Self {
            model_id: None,
            max_items: 5,
            lookback_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: "digests".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    pub webhook_url: Option<String>,
    pub test_webhook_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<SourceDescriptor>,
}

/// Everything a run needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory relative storage paths are resolved against.
    pub root: PathBuf,
    pub settings: Settings,
    pub sources: Vec<SourceDescriptor>,
}

impl AppConfig {
    pub fn new(root: impl Into<PathBuf>, settings: Settings, sources: Vec<SourceDescriptor>) -> Self {
        Self {
            root: root.into(),
            settings,
            sources,
        }
    }

    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config_dir = root.join(CONFIG_DIR);

        let settings = load_settings(&config_dir)?;
        let sources = load_sources(&config_dir.join(SOURCES_FILE))?;
        debug!(
            "Loaded configuration from {} ({} sources, {} topics)",
            config_dir.display(),
            sources.len(),
            settings.topics.len()
        );

        Ok(Self { root, settings, sources })
    }
}

fn load_settings(config_dir: &Path) -> Result<Settings> {
    let base = read_yaml(&config_dir.join(SETTINGS_FILE))?;
    let local_path = config_dir.join(LOCAL_SETTINGS_FILE);
    let merged = if local_path.exists() {
        debug!("Merging local overrides from {}", local_path.display());
        deep_merge(base, read_yaml(&local_path)?)
    } else {
        base
    };

    if merged.is_null() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml::from_value(merged)?)
}

fn load_sources(path: &Path) -> Result<Vec<SourceDescriptor>> {
    if !path.exists() {
        warn!("No sources file at {}, no feeds will be fetched", path.display());
        return Ok(Vec::new());
    }
    let content = read_file(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: SourcesFile = serde_yaml::from_str(&content)?;
    Ok(file.sources)
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = read_file(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))
}

/// Recursively merges `overlay` into `base`. Mappings merge key by key; any
/// other overlay value replaces the base value. A null overlay (e.g. an empty
/// file) leaves `base` untouched.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (base, Value::Null) => base,
        (Value::Mapping(mut base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Mapping(base)
        }
        (_, overlay) => overlay,
    }
}
