//! TOML-based application configuration.
//!
//! Stores:
//! - Scheduling settings (priority policy, search horizon, day-part inference)
//! - The default user preference applied when a request carries none
//!
//! Configuration is stored at `~/.config/focusplan/config.toml`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::plan::{PlanOptions, DEFAULT_SEARCH_DAYS};
use crate::preference::UserPreference;
use crate::scheduler::PriorityPolicy;
use crate::timeline::DayPartInference;
use crate::validation::{validate_preference, validate_search_days};

/// Scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default)]
    pub priority_policy: PriorityPolicy,
    #[serde(default = "default_search_days")]
    pub search_days: u32,
    /// Read day-part bands from deadline clock values
    #[serde(default = "default_true")]
    pub infer_day_part: bool,
    /// 0 means the deadline must hit a marker exactly.
    #[serde(default)]
    pub day_part_tolerance_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub preference: UserPreference,
}

fn default_search_days() -> u32 {
    DEFAULT_SEARCH_DAYS
}
fn default_true() -> bool {
    true
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            priority_policy: PriorityPolicy::default(),
            search_days: default_search_days(),
            infer_day_part: true,
            day_part_tolerance_minutes: 0,
        }
    }
}

impl SchedulingConfig {
    pub fn day_part_inference(&self) -> DayPartInference {
        match (self.infer_day_part, self.day_part_tolerance_minutes) {
            (false, _) => DayPartInference::Disabled,
            (true, 0) => DayPartInference::Exact,
            (true, minutes) => DayPartInference::Within(minutes),
        }
    }
}

impl Config {
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
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

    /// Set a config value in memory by dot-separated key.
    ///
    /// The updated config must still deserialize and pass preference range
    /// checks; otherwise `self` is left unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;

        validate_search_days(updated.scheduling.search_days).map_err(|e| invalid(e.to_string()))?;
        validate_preference(&updated.preference).map_err(|e| invalid(e.to_string()))?;

        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Every leaf key with its value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (name, child) in map {
                        let key = if prefix.is_empty() {
                            name.clone()
                        } else {
                            format!("{prefix}.{name}")
                        };
                        walk(&key, child, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Planning options for a call starting at `search_start`.
    pub fn plan_options(&self, search_start: NaiveDateTime) -> PlanOptions {
        PlanOptions::new(search_start)
            .with_policy(self.scheduling.priority_policy)
            .with_search_days(self.scheduling.search_days)
            .with_day_part_inference(self.scheduling.day_part_inference())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[scheduling]\npriority_policy = \"fifo\"\n").unwrap();
        assert_eq!(parsed.scheduling.priority_policy, PriorityPolicy::Fifo);
        assert_eq!(parsed.scheduling.search_days, 7);
        assert_eq!(parsed.preference, UserPreference::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("scheduling.priority_policy").as_deref(), Some("eisenhower"));
        assert_eq!(cfg.get("preference.maxFocusDuration").as_deref(), Some("120"));
        assert!(cfg.get("scheduling.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "scheduling.infer_day_part", "false").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "scheduling.infer_day_part").unwrap(),
            &serde_json::Value::Bool(false)
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "scheduling.nonexistent", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("scheduling.infer_day_part", "not_a_bool").is_err());
        assert!(cfg.apply("scheduling.priority_policy", "random").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn apply_enforces_preference_ranges() {
        let mut cfg = Config::default();
        assert!(cfg.apply("preference.maxFocusDuration", "600").is_err());
        assert!(cfg.apply("scheduling.search_days", "0").is_err());
        assert!(cfg.apply("scheduling.search_days", "200000000").is_err());
        assert_eq!(cfg.scheduling.search_days, DEFAULT_SEARCH_DAYS);

        cfg.apply("preference.maxFocusDuration", "90").unwrap();
        assert_eq!(cfg.preference.max_focus_duration, 90);
    }

    #[test]
    fn apply_accepts_json_for_lists() {
        let mut cfg = Config::default();
        cfg.apply(
            "preference.noDisturbSlots",
            r#"[{"start": "12:00", "end": "13:00"}]"#,
        )
        .unwrap();
        assert_eq!(cfg.preference.no_disturb_slots.len(), 1);
    }

    #[test]
    fn day_part_inference_follows_settings() {
        let mut cfg = SchedulingConfig::default();
        assert_eq!(cfg.day_part_inference(), DayPartInference::Exact);
        cfg.day_part_tolerance_minutes = 10;
        assert_eq!(cfg.day_part_inference(), DayPartInference::Within(10));
        cfg.infer_day_part = false;
        assert_eq!(cfg.day_part_inference(), DayPartInference::Disabled);
    }

    #[test]
    fn entries_list_every_leaf() {
        let entries = Config::default().entries();
        assert!(entries
            .iter()
            .any(|(k, v)| k == "scheduling.search_days" && v == "7"));
        assert!(entries.iter().any(|(k, _)| k == "preference.bufferBetweenEvents"));
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("scheduling.search_days", "3").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().scheduling.search_days, 3);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scheduling = 5").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
