//! TOML-based widget configuration.
//!
//! Holds:
//! - the class markers the handlers look for in the markup
//! - dispatch limits
//! - caption overrides used by the markup builder
//!
//! Configuration is stored at `~/.config/recurrence-widget/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError, Result};

/// Class names that identify widget parts in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Marks the root of one widget instance.
    #[serde(default = "default_container")]
    pub container: String,
    /// Carried by every field group region.
    #[serde(default = "default_field")]
    pub field: String,
    /// Added to checkbox labels whose box is checked.
    #[serde(default = "default_selected")]
    pub selected: String,
    #[serde(default = "default_frequency_select")]
    pub frequency_select: String,
    #[serde(default = "default_interval_label")]
    pub interval_label: String,
}

/// Event dispatch limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_max_events")]
    pub max_events_per_action: u32,
    /// Dispatched events kept for inspection; older ones are discarded.
    #[serde(default = "default_event_log_limit")]
    pub event_log_limit: u32,
}

/// Widget configuration.
///
/// Serialized to/from TOML at `~/.config/recurrence-widget/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Fields rendered without any label element.
    #[serde(default)]
    pub hidden_labels: Vec<String>,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Field name -> caption. An empty caption renders an empty label.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn default_container() -> String {
    "recurrence-widget".into()
}
fn default_field() -> String {
    "recurrence-field".into()
}
fn default_selected() -> String {
    "selected".into()
}
fn default_frequency_select() -> String {
    "freq".into()
}
fn default_interval_label() -> String {
    "interval-lbl".into()
}
fn default_max_events() -> u32 {
    64
}
fn default_event_log_limit() -> u32 {
    256
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            field: default_field(),
            selected: default_selected(),
            frequency_select: default_frequency_select(),
            interval_label: default_interval_label(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_events_per_action: default_max_events(),
            event_log_limit: default_event_log_limit(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            hidden_labels: Vec::new(),
            markers: MarkerConfig::default(),
            dispatch: DispatchConfig::default(),
            labels: BTreeMap::new(),
        }
    }
}

/// Returns `~/.config/recurrence-widget[-dev]/`.
///
/// Set RECURRENCE_WIDGET_ENV=dev to use the development directory.
pub fn config_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RECURRENCE_WIDGET_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("recurrence-widget-dev")
    } else {
        base_dir.join("recurrence-widget")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

impl WidgetConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if !is_leaf {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            // Caption overrides are free-form: any key under `labels` is accepted.
            let new_value = match obj.get(part) {
                Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                Some(serde_json::Value::Number(_)) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                Some(_) => serde_json::Value::String(value.into()),
                None if key.starts_with("labels.") => serde_json::Value::String(value.into()),
                None => return Err(unknown()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`, writing defaults there when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default widget config: {e}");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Caption for a field, honoring overrides. `None` means the field
    /// gets no label element at all.
    pub fn label_for<'a>(&'a self, field: &str, default: &'a str) -> Option<&'a str> {
        if self.hidden_labels.iter().any(|f| f == field) {
            return None;
        }
        Some(self.labels.get(field).map(String::as_str).unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = WidgetConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: WidgetConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: WidgetConfig = toml::from_str("[markers]\nselected = \"is-on\"\n").unwrap();
        assert_eq!(parsed.markers.selected, "is-on");
        assert_eq!(parsed.markers.container, "recurrence-widget");
        assert_eq!(parsed.dispatch.max_events_per_action, 64);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.get("markers.container").as_deref(), Some("recurrence-widget"));
        assert_eq!(cfg.get("dispatch.max_events_per_action").as_deref(), Some("64"));
        assert!(cfg.get("markers.missing").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = WidgetConfig::default();
        cfg.set("dispatch.max_events_per_action", "16").unwrap();
        cfg.set("markers.selected", "active").unwrap();
        assert_eq!(cfg.dispatch.max_events_per_action, 16);
        assert_eq!(cfg.markers.selected, "active");
    }

    #[test]
    fn set_accepts_new_label_overrides() {
        let mut cfg = WidgetConfig::default();
        cfg.set("labels.interval", "Repeat every").unwrap();
        assert_eq!(cfg.label_for("interval", "Every"), Some("Repeat every"));
        assert_eq!(cfg.label_for("freq", "Frequency"), Some("Frequency"));
    }

    #[test]
    fn hidden_labels_suppress_caption() {
        let mut cfg = WidgetConfig::default();
        cfg.set("hidden_labels", r#"["interval"]"#).unwrap();
        cfg.set("labels.interval", "Repeat every").unwrap();
        assert_eq!(cfg.label_for("interval", "Every"), None);
        assert_eq!(cfg.label_for("ending", "Ending"), Some("Ending"));
    }

    #[test]
    fn old_config_without_new_keys_loads() {
        let parsed: WidgetConfig =
            toml::from_str("[dispatch]\nmax_events_per_action = 8\n").unwrap();
        assert_eq!(parsed.dispatch.event_log_limit, 256);
        assert!(parsed.hidden_labels.is_empty());
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = WidgetConfig::default();
        assert!(cfg.set("markers.nope", "x").is_err());
        assert!(cfg.set("dispatch.max_events_per_action", "lots").is_err());
        assert!(cfg.set("", "x").is_err());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = WidgetConfig::load_from(&path).unwrap();
        assert_eq!(cfg, WidgetConfig::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("markers.selected", "on").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(WidgetConfig::load_from(&path).unwrap().markers.selected, "on");
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "markers = 3").unwrap();
        assert!(WidgetConfig::load_from(&path).is_err());
    }
}
