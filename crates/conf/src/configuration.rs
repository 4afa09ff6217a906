//! The key/value configuration store read by every pipeline stage.

use crate::error::{ConfError, Result};
use crate::keys;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Flat string store with typed getters.
///
/// Values are kept as strings and interpreted on read, the way Java
/// properties are. Lists are comma separated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    /// Creates an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration pre-populated with the runner defaults
    pub fn with_defaults() -> Self {
        let mut conf = Self::new();
        conf.set(keys::DATA_MODEL_FORMAT, "text");
        conf.set(keys::SPLITTER, "ratio");
        conf.set(keys::CV_NUMBER, 1);
        conf.set(keys::TRAINSET_RATIO, 0.8);
        conf.set(keys::CONVERT_SEP, ",");
        conf.set(keys::EVAL_ENABLE, true);
        conf.set(keys::RANKING_TOP_N, 10);
        conf.set(keys::NEIGHBORS_KNN, 50);
        conf.set(keys::RESULT_DIR, "result");
        conf.set(keys::RANDOM_SEED, 1);
        conf
    }

    /// Loads defaults, then overlays the given file.
    ///
    /// `.toml` files are flattened into dotted keys; anything else is read
    /// as `key=value` properties.
    pub fn load(path: &Path) -> Result<Self> {
        let mut conf = Self::with_defaults();
        conf.merge_file(path)?;
        Ok(conf)
    }

    /// Overlays the entries of a config file onto this configuration
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|source| ConfError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            let table = content
                .parse::<toml::Table>()
                .map_err(|source| ConfError::Toml {
                    path: path.to_path_buf(),
                    source,
                })?;
            self.merge_toml(&table);
        } else {
            self.merge_properties(&content)?;
        }

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Overlays `key=value` lines. `#` and `!` start comments.
    pub fn merge_properties(&mut self, content: &str) -> Result<()> {
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = split_pair(line).ok_or_else(|| ConfError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            })?;
            self.set(key, value);
        }
        Ok(())
    }

    /// Overlays a parsed TOML table, flattening nested tables into dotted keys
    pub fn merge_toml(&mut self, table: &toml::Table) {
        flatten_table("", table, self);
    }

    /// Applies command-line style `key=value` overrides
    pub fn apply_overrides<I, S>(&mut self, overrides: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (idx, raw) in overrides.into_iter().enumerate() {
            let raw = raw.as_ref();
            let (key, value) = split_pair(raw).ok_or_else(|| ConfError::MalformedLine {
                line: idx + 1,
                content: raw.to_string(),
            })?;
            self.set(key, value);
        }
        Ok(())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.insert(key.into(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw string value, `None` when absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Raw value, treating blank strings as absent
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Value that must be present
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get_non_empty(key)
            .ok_or_else(|| ConfError::MissingKey(key.to_string()))
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_non_empty(key)
            .map(|raw| {
                raw.parse::<i64>().map_err(|e| ConfError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> Result<i64> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }

    pub fn get_float_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.get_non_empty(key) {
            Some(raw) => raw.parse::<f64>().map_err(|e| ConfError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    /// Boolean flag; an absent key reads as `false`
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get_non_empty(key) {
            None => Ok(false),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(ConfError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: "expected a boolean".to_string(),
                }),
            },
        }
    }

    /// Comma separated list; empty when the key is absent
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The cross-validation fold index injected by the job, if any
    pub fn fold_index(&self) -> Result<Option<u32>> {
        self.get_int(keys::CV_INDEX)?
            .map(|index| {
                u32::try_from(index).map_err(|e| ConfError::InvalidValue {
                    key: keys::CV_INDEX.to_string(),
                    value: index.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn flatten_table(prefix: &str, table: &toml::Table, conf: &mut Configuration) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_table(&full_key, inner, conf),
            other => conf.set(full_key, scalar_to_string(other)),
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
